//! papyrus_core: Core utilities shared by the Papyrus type-checking crates.
//!
//! Provides source ranges for nodes and diagnostics, and the splitting of
//! colon-separated script names into namespace and name parts.

pub mod names;
pub mod text;

// Re-export commonly used types
pub use names::NameParts;
pub use text::{TextRange, TextSpan};
