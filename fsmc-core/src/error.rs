//! Core error types.

use thiserror::Error;

/// Broad classes of failure, independent of the concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input text or an unsupported top-level keyword.
    Format,
    /// Start-state inference could not settle on a single state.
    Ambiguity,
    /// Chaining could not be performed.
    Composition,
    /// A spec value violates the data model invariants.
    Invalid,
}

/// Errors from parsing, rendering, decoding and chaining FSM specs.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("malformed input at line {line}: {reason}")]
    Format { line: usize, reason: String },

    #[error("unsupported top-level keyword: '{keyword}'")]
    UnsupportedKeyword { keyword: String },

    #[error("multiple start states found: {}", .candidates.join(", "))]
    AmbiguousStart { candidates: Vec<String> },

    #[error("no start state found: every state is the target of a transition")]
    NoStartState,

    #[error("cannot chain an empty list of FSMs")]
    EmptyChain,

    #[error("invalid FSM spec: {reason}")]
    InvalidSpec { reason: String },

    #[error("invalid transition key: '{key}' (expected '(state, SYMBOL)')")]
    InvalidKey { key: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FsmError {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        FsmError::Format {
            line,
            reason: reason.into(),
        }
    }

    /// Returns the class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsmError::Format { .. }
            | FsmError::UnsupportedKeyword { .. }
            | FsmError::InvalidKey { .. }
            | FsmError::Yaml(_) => ErrorKind::Format,
            FsmError::AmbiguousStart { .. } | FsmError::NoStartState => ErrorKind::Ambiguity,
            FsmError::EmptyChain => ErrorKind::Composition,
            FsmError::InvalidSpec { .. } => ErrorKind::Invalid,
        }
    }

    /// Returns a stable error code suitable for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            FsmError::Format { .. } => "BAD_FORMAT",
            FsmError::UnsupportedKeyword { .. } => "UNSUPPORTED_KEYWORD",
            FsmError::AmbiguousStart { .. } => "AMBIGUOUS_START",
            FsmError::NoStartState => "NO_START_STATE",
            FsmError::EmptyChain => "EMPTY_CHAIN",
            FsmError::InvalidSpec { .. } => "INVALID_SPEC",
            FsmError::InvalidKey { .. } => "BAD_FORMAT",
            FsmError::Yaml(_) => "BAD_FORMAT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(FsmError::format(3, "bad").kind(), ErrorKind::Format);
        assert_eq!(
            FsmError::UnsupportedKeyword {
                keyword: "pie".to_string()
            }
            .kind(),
            ErrorKind::Format
        );
        assert_eq!(
            FsmError::AmbiguousStart {
                candidates: vec!["A".to_string(), "B".to_string()]
            }
            .kind(),
            ErrorKind::Ambiguity
        );
        assert_eq!(FsmError::EmptyChain.kind(), ErrorKind::Composition);
    }

    #[test]
    fn test_messages() {
        let err = FsmError::AmbiguousStart {
            candidates: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(err.to_string(), "multiple start states found: A, B");
        assert_eq!(err.error_code(), "AMBIGUOUS_START");

        let err = FsmError::format(7, "expected 1 or 3 tokens, found 2");
        assert_eq!(
            err.to_string(),
            "malformed input at line 7: expected 1 or 3 tokens, found 2"
        );
    }
}
