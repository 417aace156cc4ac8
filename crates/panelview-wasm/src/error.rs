//! Error types for the evaluator, codec and drawing pipeline.

use thiserror::Error;

/// Errors raised while loading, saving or editing a panel program.
#[derive(Debug, Error)]
pub enum PanelError {
    /// A required element is missing from the document.
    #[error("format error: {0}")]
    Format(String),

    /// The document is not well-formed XML.
    #[error("xml error: {0}")]
    Xml(String),

    /// A single operation could not be read or written.
    #[error("operation #{index} ({type_name}): {message}")]
    Operation {
        /// Position of the operation in document order.
        index: usize,
        /// Declared `TypeName` of the operation.
        type_name: String,
        /// What went wrong.
        message: String,
    },

    /// Serialization failed outside of any operation.
    #[error("write error: {0}")]
    Write(String),

    /// An edit addressed an operation that does not exist.
    #[error("operation index {index} out of range (have {len})")]
    OperationIndex {
        /// Requested index.
        index: usize,
        /// Number of operations in the session.
        len: usize,
    },

    /// A save was requested before any file path was known.
    #[error("no file path associated with the session")]
    NoPath,

    /// Filesystem failure during load or save.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the arithmetic coordinate evaluator.
///
/// These never reach callers of [`crate::expr::evaluate`]; they exist so the
/// lenient `0.0` default is applied in exactly one place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A character survived sanitising but is not part of the grammar.
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),

    /// A numeric literal could not be parsed.
    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    /// The right-hand side of a division evaluated to zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A `(` without its matching `)`.
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    /// Parentheses nested deeper than the evaluator accepts.
    #[error("expression nesting exceeds {0} levels")]
    NestingTooDeep(u32),

    /// The expression ended where an operand was expected.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// Tokens remained after a complete expression was parsed.
    #[error("unexpected trailing input")]
    TrailingInput,
}

/// Errors that can occur while building drawing geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// A geometry operation produced degenerate output.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// An arc could not be constructed from its endpoints and radius.
    #[error("arc error: {0}")]
    ArcError(String),
}
