//! papyrus_checker: Type checking for Papyrus scripts.
//!
//! A [`TypeChecker`] is one analysis session over a bound program. It owns
//! the type arena and the memo tables, resolves names and member lookups,
//! infers expression types and validates a script subtree into a
//! [`DiagnosticCollection`](papyrus_diagnostics::DiagnosticCollection).

mod array;
mod checker;
mod error;
mod evaluator;
pub mod lookup;
mod resolver;
mod scope;
pub mod types;
mod validator;

pub use checker::TypeChecker;
pub use error::CheckError;
pub use lookup::LookupFlags;
pub use resolver::ScriptResolver;
pub use scope::SymbolSearch;
pub use types::{IntrinsicKind, Type, TypeKind, TypeTable};
