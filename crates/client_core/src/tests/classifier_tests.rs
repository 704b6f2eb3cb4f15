use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use shared::{
    domain::{PredictionResult, ThemeKey},
    error::TRANSPORT_FAILURE_MESSAGE,
    protocol::{PredictReply, PredictRequest},
};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};
use url::Url;

use crate::{
    classifier::{Classifier, HttpClassifier},
    controller::{OverlapPolicy, PredictionController},
    error::ClassifyError,
};

#[derive(Debug)]
struct CapturedRequest {
    content_type: Option<String>,
    body: PredictRequest,
}

#[derive(Clone)]
struct PredictServerState {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    delay: Duration,
    tx: Arc<Mutex<Option<oneshot::Sender<CapturedRequest>>>>,
}

async fn predict(
    State(state): State<PredictServerState>,
    headers: HeaderMap,
    Json(body): Json<PredictRequest>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    if let Some(tx) = state.tx.lock().await.take() {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let _ = tx.send(CapturedRequest { content_type, body });
    }
    tokio::time::sleep(state.delay).await;
    (
        state.status,
        [(header::CONTENT_TYPE, state.content_type)],
        state.body,
    )
}

async fn spawn_predict_server(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<String>,
    delay: Duration,
) -> Result<(Url, oneshot::Receiver<CapturedRequest>)> {
    let (tx, rx) = oneshot::channel();
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = PredictServerState {
        status,
        content_type,
        body: body.into(),
        delay,
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/predict", post(predict))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((Url::parse(&format!("http://{addr}/predict"))?, rx))
}

async fn spawn_json_server(
    status: StatusCode,
    body: serde_json::Value,
) -> Result<(Url, oneshot::Receiver<CapturedRequest>)> {
    spawn_predict_server(status, "application/json", body.to_string(), Duration::ZERO).await
}

fn classifier(endpoint: Url) -> HttpClassifier {
    HttpClassifier::new(endpoint, Duration::from_secs(5)).expect("build classifier")
}

#[tokio::test]
async fn posts_text_as_json_and_decodes_prediction() {
    let (endpoint, request_rx) = spawn_json_server(
        StatusCode::OK,
        serde_json::json!({ "prediction": "joy", "confidence": 87.0 }),
    )
    .await
    .expect("spawn server");

    let reply = classifier(endpoint)
        .classify("I passed my exam")
        .await
        .expect("classify");

    assert_eq!(
        reply,
        PredictReply::Prediction(PredictionResult::new("joy", 87.0))
    );
    let captured = request_rx.await.expect("captured request");
    assert_eq!(captured.body.text, "I passed my exam");
    assert_eq!(captured.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn error_payload_with_client_error_status_is_an_application_error() {
    let (endpoint, _request_rx) = spawn_json_server(
        StatusCode::BAD_REQUEST,
        serde_json::json!({ "error": "No text provided" }),
    )
    .await
    .expect("spawn server");

    let reply = classifier(endpoint)
        .classify("text")
        .await
        .expect("classify");

    assert_eq!(reply, PredictReply::Error("No text provided".to_string()));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let (endpoint, _request_rx) = spawn_predict_server(
        StatusCode::OK,
        "text/html",
        "<h1>Internal Server Error</h1>",
        Duration::ZERO,
    )
    .await
    .expect("spawn server");

    let err = classifier(endpoint)
        .classify("text")
        .await
        .expect_err("must fail");

    assert!(
        matches!(err, ClassifyError::MalformedBody { status: 200, .. }),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn server_error_without_body_is_malformed() {
    let (endpoint, _request_rx) = spawn_predict_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        "text/plain",
        "",
        Duration::ZERO,
    )
    .await
    .expect("spawn server");

    let err = classifier(endpoint)
        .classify("text")
        .await
        .expect_err("must fail");

    assert!(
        matches!(err, ClassifyError::MalformedBody { status: 500, .. }),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn reply_without_confidence_is_incomplete() {
    let (endpoint, _request_rx) = spawn_json_server(
        StatusCode::OK,
        serde_json::json!({ "prediction": "joy" }),
    )
    .await
    .expect("spawn server");

    let err = classifier(endpoint)
        .classify("text")
        .await
        .expect_err("must fail");

    assert!(
        matches!(
            err,
            ClassifyError::MissingField {
                status: 200,
                field: "confidence"
            }
        ),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn refused_connection_is_a_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let endpoint = Url::parse(&format!("http://{addr}/predict")).expect("url");

    let err = classifier(endpoint)
        .classify("text")
        .await
        .expect_err("must fail");

    assert!(matches!(err, ClassifyError::Request(_)), "unexpected error: {err}");
    assert_eq!(err.failure().message, TRANSPORT_FAILURE_MESSAGE);
}

#[tokio::test]
async fn slow_classifier_times_out() {
    let (endpoint, _request_rx) = spawn_predict_server(
        StatusCode::OK,
        "application/json",
        r#"{"prediction":"joy","confidence":1}"#,
        Duration::from_secs(5),
    )
    .await
    .expect("spawn server");
    let timeout = Duration::from_millis(200);
    let classifier = HttpClassifier::new(endpoint, timeout).expect("build classifier");

    let err = classifier.classify("text").await.expect_err("must time out");

    assert!(
        matches!(err, ClassifyError::Timeout(t) if t == timeout),
        "unexpected error: {err}"
    );
}

#[test]
fn default_endpoint_targets_local_service() {
    let classifier = HttpClassifier::with_default_endpoint().expect("build classifier");
    assert_eq!(
        classifier.endpoint().as_str(),
        "http://127.0.0.1:5000/predict"
    );
    assert_eq!(classifier.timeout(), Duration::from_secs(30));
}

#[tokio::test]
async fn controller_round_trip_over_http() {
    let (endpoint, request_rx) = spawn_json_server(
        StatusCode::OK,
        serde_json::json!({ "prediction": "Surprise", "confidence": 64.12 }),
    )
    .await
    .expect("spawn server");
    let controller = PredictionController::new(
        Arc::new(classifier(endpoint)),
        OverlapPolicy::IgnoreWhilePending,
    );

    controller.set_text("You did what?!");
    let view = controller.submit_and_wait().await;

    assert_eq!(view.result, Some(PredictionResult::new("Surprise", 64.12)));
    assert_eq!(view.theme_key, ThemeKey::Surprise);
    assert_eq!(
        request_rx.await.expect("captured request").body.text,
        "You did what?!"
    );
}

#[tokio::test]
async fn controller_reports_unreachable_service() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let endpoint = Url::parse(&format!("http://{addr}/predict")).expect("url");
    let controller = PredictionController::new(
        Arc::new(classifier(endpoint)),
        OverlapPolicy::IgnoreWhilePending,
    );

    controller.set_text("hello?");
    let view = controller.submit_and_wait().await;

    assert_eq!(view.error_message.as_deref(), Some(TRANSPORT_FAILURE_MESSAGE));
    assert!(!view.is_loading);
}
