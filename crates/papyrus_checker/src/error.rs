//! Internal checker failures.

use thiserror::Error;

/// A failure that stops validation of one node. The validator turns it into
/// a diagnostic at that node and moves on.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("'{name}' is not a function or event")]
    NotCallable { name: String },

    #[error("expected {expected} node, found {found}")]
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
    },
}
