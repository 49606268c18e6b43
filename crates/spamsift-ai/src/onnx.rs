//! ONNX Runtime model backend.
//!
//! Loads a transformer-based spam classifier exported to ONNX. The model
//! directory must contain `model.onnx` and `tokenizer.json`, and the graph
//! must take `input_ids`/`attention_mask`/`token_type_ids` and emit the
//! predicted class as an int64 tensor (output 0) with optional class
//! probabilities as a two-wide float tensor (output 1) — the usual layout of
//! sklearn-onnx and optimum exports.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use spamsift_core::SpamClass;

use crate::predictor::Predictor;

/// Spam classifier executed by ONNX Runtime.
///
/// The session is behind a mutex because the runtime requires exclusive
/// access per run; the predictor itself stays read-only after load.
pub struct OnnxPredictor {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    has_probability: bool,
}

impl std::fmt::Debug for OnnxPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPredictor")
            .field("has_probability", &self.has_probability)
            .finish_non_exhaustive()
    }
}

impl OnnxPredictor {
    /// Load a classifier from a directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let session = Session::builder()?.commit_from_file(&model_path)?;

        // Probability support is decided here, once: the graph must expose a
        // second output shaped [batch, 2]. Anything else and the capability
        // is refused rather than risking a misread probability vector.
        let has_probability = match session.outputs().get(1).map(|o| o.dtype()) {
            Some(ort::value::ValueType::Tensor { shape, .. }) => shape.last().copied() == Some(2),
            _ => false,
        };

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;

        // Truncate to the export's max sequence length.
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: 512,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;

        info!(
            model = %model_path.display(),
            probability = has_probability,
            "loaded ONNX spam classifier"
        );
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            has_probability,
        })
    }

    /// Run one message through the graph, returning the predicted class and,
    /// when the graph provides it, the probability mass on the spam class.
    fn run_model(&self, message: &str) -> anyhow::Result<(i64, Option<f64>)> {
        let encoding = self
            .tokenizer
            .encode(message, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let seq_len = encoding.get_ids().len();
        let shape = [1i64, seq_len as i64];

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding
            .get_type_ids()
            .iter()
            .map(|&t| t as i64)
            .collect();

        let ids_tensor = Tensor::from_array((shape, input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.into_boxed_slice()))?;
        let type_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("inference session poisoned"))?;

        let outputs = session.run(ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
            "token_type_ids" => type_tensor,
        ])?;

        let (label_shape, labels) = outputs[0].try_extract_tensor::<i64>()?;
        let dims: &[i64] = label_shape;
        anyhow::ensure!(
            !labels.is_empty(),
            "unexpected label output shape: {dims:?}"
        );
        let label = labels[0];

        let spam_probability = if self.has_probability {
            let (prob_shape, probs) = outputs[1].try_extract_tensor::<f32>()?;
            let dims: &[i64] = prob_shape;
            anyhow::ensure!(
                dims.last().copied() == Some(2) && probs.len() >= 2,
                "unexpected probability output shape: {dims:?}"
            );
            // Training-side class ordering: ham at index 0, spam at index 1.
            Some(probs[1] as f64)
        } else {
            None
        };

        Ok((label, spam_probability))
    }
}

impl Predictor for OnnxPredictor {
    fn classify(&self, message: &str) -> anyhow::Result<SpamClass> {
        let (label, _) = self.run_model(message)?;
        match label {
            0 => Ok(SpamClass::Ham),
            1 => Ok(SpamClass::Spam),
            other => anyhow::bail!("model emitted unknown class {other}"),
        }
    }

    fn spam_probability(&self, message: &str) -> Option<anyhow::Result<f64>> {
        if !self.has_probability {
            return None;
        }
        Some(self.run_model(message).and_then(|(_, p)| {
            p.map(|v| v.clamp(0.0, 1.0))
                .ok_or_else(|| anyhow::anyhow!("probability output missing"))
        }))
    }
}
