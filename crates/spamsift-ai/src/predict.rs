//! The prediction service: validate one message, run it through the loaded
//! predictor, and shape the result.

use std::time::Instant;

use tracing::debug;

use spamsift_core::{Prediction, validate_message};

use crate::predictor::Predictor;

/// Classify a single raw message.
///
/// Validation failures come back as `Ok(Prediction::Rejected { .. })` — they
/// are caller mistakes, not service failures. A classify error from the
/// backend propagates as `Err`. A probability failure never fails the
/// request: the result degrades to a null probability.
pub fn predict_one(predictor: &dyn Predictor, raw: &str) -> anyhow::Result<Prediction> {
    let message = match validate_message(raw) {
        Ok(m) => m,
        Err(reject) => return Ok(Prediction::rejected(reject.to_string())),
    };

    let start = Instant::now();

    let class = predictor.classify(message)?;

    let spam_probability = match predictor.spam_probability(message) {
        Some(Ok(p)) => Some(p),
        Some(Err(err)) => {
            debug!(%err, "probability estimate failed, degrading to null");
            None
        }
        None => None,
    };

    let latency_ms = round2(start.elapsed().as_secs_f64() * 1000.0);

    Ok(Prediction::success(class, spam_probability, latency_ms))
}

/// Round to 2 decimal places for the wire format.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
