//! Configuration errors
//!
//! A failed rule is data and lands in the [`ErrorReport`](crate::ErrorReport).
//! A rule table that cannot run at all is a programming mistake upstream and
//! is reported through the types below instead.

use thiserror::Error;

/// The validator was configured with something it cannot execute.
///
/// Never recorded as a validation failure and never counted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The rule name has neither a built-in nor a custom implementation.
    #[error("field `{field}`: rule `{rule}` has no built-in or custom implementation")]
    UnknownRule {
        /// Field key the rule was declared on.
        field: String,
        /// The unresolved rule name.
        rule: String,
    },

    /// The invocation list has no trailing message, or the message is not a string.
    #[error("field `{field}`: rule `{rule}` invocation must end with a string error message")]
    MissingMessage {
        /// Field key the rule was declared on.
        field: String,
        /// Rule name.
        rule: String,
    },

    /// The parameters do not fit the built-in rule they are declared for.
    #[error("field `{field}`: rule `{rule}`: {source}")]
    InvalidParams {
        /// Field key the rule was declared on.
        field: String,
        /// Rule name.
        rule: String,
        /// What was wrong with the parameters.
        #[source]
        source: ParamError,
    },

    /// The encoding name is not one the length rules understand.
    #[error("unknown encoding `{0}`")]
    UnknownEncoding(String),

    /// A custom message template without exactly one `[{message}]` marker.
    #[error("message template `{0}` must contain the `[{{message}}]` marker exactly once")]
    InvalidTemplate(String),
}

/// A built-in rule's parameters failed to bind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// Wrong number of parameters.
    #[error("expected {expected} parameter(s), got {got}")]
    Arity {
        /// Accepted parameter counts, e.g. `"2"` or `"0 or 1"`.
        expected: &'static str,
        /// Parameters actually supplied.
        got: usize,
    },

    /// A parameter has the wrong type or an out-of-range value.
    #[error("parameter {index}: {reason}")]
    Invalid {
        /// Zero-based position among the parameters (the message is not counted).
        index: usize,
        /// Human-readable reason.
        reason: String,
    },
}

impl ParamError {
    pub(crate) fn invalid(index: usize, reason: impl Into<String>) -> Self {
        ParamError::Invalid {
            index,
            reason: reason.into(),
        }
    }
}
