//! papyrus_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every user-facing message the binder and checker can produce is declared
//! once in [`messages`]. A realized [`Diagnostic`] carries the formatted text,
//! the message code and an optional file and source span.

use papyrus_core::text::{TextRange, TextSpan};
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 2304).
    pub code: u32,
    /// The category of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Display name of the script file, filled in by the program.
    pub file: Option<String>,
    /// The source span the diagnostic is anchored at, if any.
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a diagnostic anchored at a node range.
    pub fn at(range: TextRange, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: Some(range.to_span()),
            ..Self::new(message, args)
        }
    }

    /// Attach a file name to this diagnostic.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} P{}: {}", self.category, self.code, self.message_text)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// An append-only sink of diagnostics.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append an error anchored at `range`.
    pub fn add_error(&mut self, message: &DiagnosticMessage, args: &[&str], range: TextRange) {
        self.add(Diagnostic::at(range, message, args));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn extend_from_slice(&mut self, diagnostics: &[Diagnostic]) {
        self.diagnostics.extend_from_slice(diagnostics);
    }

    /// Set the file name on every diagnostic that does not have one yet.
    pub fn assign_file(&mut self, file: &str) {
        for diagnostic in &mut self.diagnostics {
            if diagnostic.file.is_none() {
                diagnostic.file = Some(file.to_string());
            }
        }
    }

    /// The message texts, in insertion order.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|d| d.message_text.clone())
            .collect()
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let file_cmp = a.file.cmp(&b.file);
            if file_cmp != std::cmp::Ordering::Equal {
                return file_cmp;
            }
            let a_pos = a.span.map(|s| s.start).unwrap_or(0);
            let b_pos = b.span.map(|s| s.start).unwrap_or(0);
            a_pos.cmp(&b_pos)
        });
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Declaration errors (1000-1999)
    // ========================================================================
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1003, Error, "Identifier expected.");
    pub const EXPECTED_LEFT_HAND_SIDE: DiagnosticMessage = diag!(1109, Error, "Expected left-hand side of assignment expression");
    pub const EXPECTED_RIGHT_HAND_SIDE: DiagnosticMessage = diag!(1110, Error, "Expected right-hand side of assignment expression");

    // ========================================================================
    // Semantic errors (2000-2999)
    // ========================================================================
    pub const CANNOT_FIND_NAME_0: DiagnosticMessage = diag!(2304, Error, "Cannot find name '{0}'");
    pub const TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1: DiagnosticMessage = diag!(2322, Error, "Type '{0}' is not assignable to type '{1}'.");
    pub const ARGUMENT_OF_TYPE_0_IS_NOT_ASSIGNABLE_TO_PARAMETER_OF_TYPE_1: DiagnosticMessage = diag!(2345, Error, "Argument of type '{0}' is not assignable to parameter of type '{1}'.");
    pub const LEFT_HAND_SIDE_CANNOT_BE_ASSIGNED_TO: DiagnosticMessage = diag!(2364, Error, "Left-hand side cannot be assigned to");
    pub const OPERATOR_0_CANNOT_BE_APPLIED_TO_TYPES_1_AND_2: DiagnosticMessage = diag!(2365, Error, "Operator '{0}' cannot be applied to types '{1}' and '{2}'.");
    pub const BLOCK_SCOPED_VARIABLE_0_USED_BEFORE_ITS_DECLARATION: DiagnosticMessage = diag!(2448, Error, "Block-scoped variable '{0}' used before its declaration.");
    pub const CANNOT_REDECLARE_0: DiagnosticMessage = diag!(2451, Error, "Cannot redeclare {0}.");
    pub const LEFT_HAND_SIDE_IS_CONST_OR_READ_ONLY: DiagnosticMessage = diag!(2540, Error, "Left-hand side is const or read-only");
    // The two call-signature messages below are literal; N and X are not placeholders.
    pub const EXPECTED_N_PARAMETERS_GOT_N: DiagnosticMessage = diag!(2554, Error, "Expected N parameters, got N");
    pub const NO_OPTIONAL_PARAMETER_NAMED_X: DiagnosticMessage = diag!(2561, Error, "No optional parameter named X");
    pub const OPTIONAL_NAME_ALREADY_USED: DiagnosticMessage = diag!(2562, Error, "Optional name already used");

    // ========================================================================
    // Internal errors (9000-9999)
    // ========================================================================
    pub const CHECK_FAILED_0: DiagnosticMessage = diag!(9001, Error, "{0}");
}
