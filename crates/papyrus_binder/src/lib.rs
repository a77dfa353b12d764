//! papyrus_binder: Symbol table construction for Papyrus scripts.
//!
//! The binder walks each script tree, creates a symbol for every
//! declaration, records script members in source order and fills the local
//! tables of container nodes that name lookup later walks.

mod binder;
mod symbol;

pub use binder::Binder;
pub use symbol::{LocalTable, Symbol, SymbolFlags, SymbolKind, SymbolTable, TypeReference};
