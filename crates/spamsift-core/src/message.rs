//! Input validation for prediction requests.
//!
//! Rules are applied in order and the first failing rule wins: trim, reject
//! empty, reject over-length. Nothing else — no encoding checks, no language
//! detection.

use crate::error::PredictError;

/// Longest accepted message, counted in Unicode scalar values after trimming.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// Validate a raw message, returning the trimmed slice on success.
pub fn validate_message(raw: &str) -> Result<&str, PredictError> {
    let message = raw.trim();

    if message.is_empty() {
        return Err(PredictError::EmptyMessage);
    }

    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(PredictError::MessageTooLong(MAX_MESSAGE_CHARS));
    }

    Ok(message)
}
