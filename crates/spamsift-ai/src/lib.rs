//! Inference layer: model artifact loading and single-message spam prediction.

mod linear;
#[cfg(feature = "onnx")]
mod onnx;
mod predict;
mod predictor;

pub use linear::{LEGACY_ARTIFACT, LinearModel, PRIMARY_ARTIFACT};
#[cfg(feature = "onnx")]
pub use onnx::OnnxPredictor;
pub use predict::predict_one;
pub use predictor::Predictor;
