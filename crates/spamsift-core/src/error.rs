use thiserror::Error;

/// Per-request failures reported back to the caller as `ok=false` responses.
///
/// The display strings are the wire-level `error` field verbatim, so they
/// are part of the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    #[error("Message is empty.")]
    EmptyMessage,

    #[error("Message too long (max {0} characters).")]
    MessageTooLong(usize),
}
