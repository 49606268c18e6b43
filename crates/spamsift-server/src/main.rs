//! spamsift: loads a pre-trained spam classifier once at startup and serves
//! single-message predictions over JSON.

mod routes;

use std::path::Path;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};

use spamsift_ai::{LinearModel, Predictor};

/// Request body cap, enforced by the framework before any prediction logic runs.
const MAX_BODY_BYTES: usize = 1024 * 1024;

const BIND_ADDR: (&str, u16) = ("127.0.0.1", 5000);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Fail fast: a missing or corrupt artifact means the process never
    // starts serving.
    let predictor = load_predictor(Path::new("model"))?;

    tracing::info!(
        "spamsift v{} listening on http://{}:{}",
        env!("CARGO_PKG_VERSION"),
        BIND_ADDR.0,
        BIND_ADDR.1
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(predictor.clone()))
            .app_data(web::JsonConfig::default().limit(MAX_BODY_BYTES))
            .service(routes::index)
            .service(routes::predict)
    })
    .bind(BIND_ADDR)?
    .run()
    .await?;

    Ok(())
}

/// Build the single process-wide predictor handle.
///
/// With the `onnx` feature, a `model.onnx` in the model directory selects
/// the ONNX Runtime backend; otherwise the linear artifact loader runs with
/// its own two-candidate-path contract.
fn load_predictor(model_dir: &Path) -> anyhow::Result<Arc<dyn Predictor>> {
    #[cfg(feature = "onnx")]
    if model_dir.join("model.onnx").exists() {
        return Ok(Arc::new(spamsift_ai::OnnxPredictor::load(model_dir)?));
    }

    Ok(Arc::new(LinearModel::load(model_dir)?))
}
