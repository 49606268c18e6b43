//! Default model backend: a linear classifier deserialized from a JSON
//! artifact produced by the external training pipeline.
//!
//! The artifact carries a term vocabulary, one weight per term, a bias, and
//! an optional Platt calibration block. This code never fits anything — it
//! deserializes the artifact once and forwards messages to it. Tokenization
//! (lowercase, split on non-alphanumeric) must match the training pipeline's
//! analyzer or scores are meaningless.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use spamsift_core::SpamClass;

use crate::predictor::Predictor;

/// Preferred artifact file name, checked first.
pub const PRIMARY_ARTIFACT: &str = "spam_classifier.json";
/// Legacy artifact file name (same JSON payload), checked second.
pub const LEGACY_ARTIFACT: &str = "spam_classifier.model";

/// Linear spam classifier loaded from a serialized artifact.
///
/// Positive scores denote spam; the sign convention comes from the training
/// side (ham=0, spam=1).
#[derive(Debug, Deserialize)]
pub struct LinearModel {
    vocabulary: HashMap<String, u32>,
    weights: Vec<f32>,
    bias: f32,
    #[serde(default)]
    calibration: Option<Calibration>,
}

/// Platt-scaling parameters mapping a raw score to a spam probability.
/// Present iff the training pipeline calibrated the model.
#[derive(Debug, Clone, Copy, Deserialize)]
struct Calibration {
    slope: f32,
    intercept: f32,
}

impl LinearModel {
    /// Load the artifact from `model_dir`, trying [`PRIMARY_ARTIFACT`] then
    /// [`LEGACY_ARTIFACT`].
    ///
    /// Any failure here is startup-fatal: a missing artifact (both names),
    /// an unreadable file, or a payload that does not deserialize. There is
    /// no other fallback and no lazy loading.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let primary = model_dir.join(PRIMARY_ARTIFACT);
        let legacy = model_dir.join(LEGACY_ARTIFACT);

        let path = if primary.exists() {
            primary
        } else if legacy.exists() {
            legacy
        } else {
            anyhow::bail!(
                "model artifact not found; expected one of {} or {}",
                primary.display(),
                legacy.display()
            );
        };

        let bytes =
            fs::read(&path).with_context(|| format!("read model artifact {}", path.display()))?;
        let model: LinearModel = serde_json::from_slice(&bytes)
            .with_context(|| format!("deserialize model artifact {}", path.display()))?;

        // Every vocabulary index must land inside the weight table, otherwise
        // the artifact is corrupt.
        for (term, &idx) in &model.vocabulary {
            anyhow::ensure!(
                (idx as usize) < model.weights.len(),
                "corrupt model artifact {}: term {term:?} has index {idx} but only {} weights",
                path.display(),
                model.weights.len()
            );
        }

        info!(
            path = %path.display(),
            terms = model.vocabulary.len(),
            calibrated = model.calibration.is_some(),
            "loaded spam classifier"
        );
        Ok(model)
    }

    /// Number of vocabulary terms.
    pub fn term_count(&self) -> usize {
        self.vocabulary.len()
    }

    /// Raw decision score for a message; positive means spam.
    fn score(&self, message: &str) -> f32 {
        let mut score = self.bias;
        for token in tokenize(message) {
            if let Some(&idx) = self.vocabulary.get(token.as_str()) {
                score += self.weights[idx as usize];
            }
        }
        score
    }
}

impl Predictor for LinearModel {
    fn classify(&self, message: &str) -> anyhow::Result<SpamClass> {
        let class = if self.score(message) > 0.0 {
            SpamClass::Spam
        } else {
            SpamClass::Ham
        };
        Ok(class)
    }

    fn spam_probability(&self, message: &str) -> Option<anyhow::Result<f64>> {
        let cal = self.calibration.as_ref()?;
        let p = sigmoid(cal.slope * self.score(message) + cal.intercept) as f64;
        if p.is_finite() {
            Some(Ok(p.clamp(0.0, 1.0)))
        } else {
            Some(Err(anyhow::anyhow!(
                "calibration produced a non-finite probability"
            )))
        }
    }
}

/// Lowercase alphanumeric tokens, matching the training analyzer.
fn tokenize(message: &str) -> impl Iterator<Item = String> + '_ {
    message
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
