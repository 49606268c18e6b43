//! HTTP handlers: the landing page and the prediction endpoint.

use std::sync::Arc;

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use spamsift_ai::{Predictor, predict_one};
use spamsift_core::Prediction;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// A missing `message` field is treated as an empty message.
    #[serde(default)]
    message: String,
}

#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("index.html"))
}

#[post("/api/predict")]
pub async fn predict(
    predictor: web::Data<Arc<dyn Predictor>>,
    body: web::Json<PredictRequest>,
) -> actix_web::Result<HttpResponse> {
    let result: Prediction = predict_one(predictor.get_ref().as_ref(), &body.message)
        .map_err(actix_web::error::ErrorInternalServerError)?;

    let response = if result.is_ok() {
        HttpResponse::Ok().json(result)
    } else {
        HttpResponse::BadRequest().json(result)
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use spamsift_ai::{LinearModel, PRIMARY_ARTIFACT};
    use spamsift_core::SpamClass;

    /// Hand-trained fixture: promotional terms flag spam, meeting talk is ham.
    const FIXTURE: &str = r#"{
        "vocabulary": {"win": 0, "free": 1, "prize": 2, "meeting": 3, "tomorrow": 4},
        "weights": [2.0, 2.0, 2.0, -2.0, -2.0],
        "bias": -1.0,
        "calibration": {"slope": 1.0, "intercept": 0.0}
    }"#;

    fn fixture_predictor() -> Arc<dyn Predictor> {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PRIMARY_ARTIFACT), FIXTURE).unwrap();
        Arc::new(LinearModel::load(dir.path()).unwrap())
    }

    /// POST `payload` to /api/predict against a fresh app, returning status
    /// and parsed body (Null when the body is not JSON).
    async fn call_predict(payload: Value) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(fixture_predictor()))
                .app_data(web::JsonConfig::default().limit(crate::MAX_BODY_BYTES))
                .service(index)
                .service(predict),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let bytes = test::read_body(resp).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[actix_web::test]
    async fn index_serves_html() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(fixture_predictor()))
                .service(index)
                .service(predict),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        assert!(content_type.starts_with("text/html"), "{content_type}");
    }

    #[actix_web::test]
    async fn empty_message_is_rejected_with_400() {
        let (status, body) = call_predict(json!({ "message": "" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Message is empty.");
    }

    #[actix_web::test]
    async fn missing_message_field_is_treated_as_empty() {
        let (status, body) = call_predict(json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Message is empty.");
    }

    #[actix_web::test]
    async fn over_length_message_is_rejected_with_400() {
        let (status, body) = call_predict(json!({ "message": "a".repeat(5001) })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Message too long (max 5000 characters).");
    }

    #[actix_web::test]
    async fn promotional_message_classifies_as_spam() {
        let (status, body) = call_predict(json!({ "message": "Win a free prize now!!!" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["label"], "SPAM");
        assert_eq!(body["raw_class"], 1);
        let p = body["spam_probability"]
            .as_f64()
            .expect("fixture is calibrated");
        assert!((0.0..=1.0).contains(&p), "probability out of range: {p}");
        assert!(body["latency_ms"].as_f64().unwrap() >= 0.0);
    }

    #[actix_web::test]
    async fn plain_message_classifies_as_ham() {
        let (status, body) =
            call_predict(json!({ "message": "See you at the meeting tomorrow." })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["label"], "HAM");
        assert_eq!(body["raw_class"], 0);
    }

    #[actix_web::test]
    async fn success_body_parses_as_prediction() {
        let (status, body) = call_predict(json!({ "message": "win a free prize" })).await;
        assert_eq!(status, StatusCode::OK);

        let parsed: Prediction = serde_json::from_value(body).unwrap();
        match parsed {
            Prediction::Success { class, .. } => assert_eq!(class, SpamClass::Spam),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn oversized_body_is_rejected_by_the_framework() {
        // 2 MiB body, over the 1 MiB JsonConfig cap.
        let (status, _) = call_predict(json!({ "message": "x".repeat(2 * 1024 * 1024) })).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
