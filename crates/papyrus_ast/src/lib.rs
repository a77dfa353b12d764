//! papyrus_ast: Syntax tree definitions for Papyrus scripts.
//!
//! Nodes live in a [`SyntaxTree`] arena and refer to each other by
//! [`NodeId`]. The node set is closed ([`NodeKind`]) so that every consumer
//! dispatching on node kind is checked for exhaustiveness by the compiler.
//! Trees are produced by a parser or, in tests and tools, by [`TreeBuilder`].

pub mod builder;
pub mod node;
pub mod tree;
pub mod types;
pub mod visitor;

// Re-export key types
pub use builder::TreeBuilder;
pub use node::*;
pub use tree::SyntaxTree;
pub use types::*;
pub use visitor::{visit_tree, VisitControl};
