pub mod error;
pub mod message;
pub mod prediction;

pub use error::PredictError;
pub use message::{MAX_MESSAGE_CHARS, validate_message};
pub use prediction::{Label, Prediction, SpamClass};
