use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    engine::SpamEngine,
    error::AppError,
    types::{ClassifyRequest, ClassifyResponse, ModelInfoResponse},
    web,
};

pub type AppState = Arc<SpamEngine>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(web::index).post(web::submit))
        .route("/api/classify", post(classify))
        .route("/api/model", get(model_info))
        .route("/metrics", get(metrics))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn classify(
    State(engine): State<AppState>,
    Json(payload): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let response = engine.classify(&payload.message)?;
    info!(
        "Classify request {} -> {} ({:.1}% spam)",
        response.request_id,
        response.prediction.label,
        response.prediction.spam_prob * 100.0
    );
    Ok(Json(response))
}

pub async fn model_info(State(engine): State<AppState>) -> Json<ModelInfoResponse> {
    Json(engine.model_info())
}

pub async fn metrics(State(engine): State<AppState>) -> String {
    engine.metrics().format()
}

pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "spam-engine",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(SpamEngine::new(Arc::new(fixtures::context()), 5)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_classify_contract() {
        let response = app()
            .oneshot(post_json("/api/classify", serde_json::json!({"message": "FREE cash prize click now"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["prediction"]["label"], "Spam");
        let ham = body["prediction"]["hamProb"].as_f64().unwrap();
        let spam = body["prediction"]["spamProb"].as_f64().unwrap();
        assert!((ham + spam - 1.0).abs() < 1e-6);
        assert_eq!(body["explanation"]["isEmpty"], false);
        assert_eq!(body["explanation"]["entries"][0]["term"], "free");
        assert!(body["requestId"].is_string());
        assert!(body["summary"].as_str().unwrap().contains("Spam"));
    }

    #[tokio::test]
    async fn test_ham_label_serialization() {
        let response = app()
            .oneshot(post_json("/api/classify", serde_json::json!({"message": "lunch meeting tomorrow"})))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["prediction"]["label"], "Not Spam");
    }

    #[tokio::test]
    async fn test_blank_message_is_bad_request() {
        let response = app()
            .oneshot(post_json("/api/classify", serde_json::json!({"message": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status"], 400);
        assert!(body["error"].as_str().unwrap().contains("non-empty"));
    }

    #[test]
    fn test_health_handler() {
        let Json(body) = tokio_test::block_on(health_check());
        assert_eq!(body["service"], "spam-engine");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_model_info_and_health() {
        let response = app()
            .oneshot(Request::builder().uri("/api/model").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["vocabularySize"], 8);
        assert_eq!(body["topK"], 5);

        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }
}
