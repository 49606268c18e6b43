//! The predictor seam between model backends and the prediction service.

use spamsift_core::SpamClass;

/// A loaded model capable of classifying one message at a time.
///
/// Handles are created once at startup and shared read-only across request
/// handlers, so implementations must be `Send + Sync`.
pub trait Predictor: std::fmt::Debug + Send + Sync {
    /// Classify a message as ham or spam.
    fn classify(&self, message: &str) -> anyhow::Result<SpamClass>;

    /// Probability mass the model assigns to the spam class.
    ///
    /// `None` means the loaded artifact has no probability support — the
    /// capability is decided at load time, not probed per call. `Some(Err)`
    /// means the capability exists but this call failed; callers degrade
    /// that to a null probability rather than failing the prediction.
    fn spam_probability(&self, message: &str) -> Option<anyhow::Result<f64>>;
}
