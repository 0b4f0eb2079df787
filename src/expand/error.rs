use thiserror::Error;

/// A malformed or unrecognized `${...}` marker.
///
/// `position` is the zero-based character offset into the text handed to
/// [`expand`](super::expand).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at position {position}: {reason}")]
pub struct SyntaxError {
    pub position: usize,
    pub reason: String,
}

impl SyntaxError {
    pub fn new(position: usize, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn unterminated(position: usize) -> Self {
        Self::new(position, "unterminated expansion marker, expected '}'")
    }

    pub(crate) fn unrecognized(position: usize, body: &str) -> Self {
        Self::new(
            position,
            format!("unrecognized expansion syntax '${{{}}}'", body),
        )
    }
}
