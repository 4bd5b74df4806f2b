use super::*;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use shared::error::ErrorKind;
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    tx: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
}

async fn handle_simulate(
    State(state): State<StubState>,
    Json(payload): Json<Value>,
) -> (StatusCode, String) {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }
    (state.status, state.body.clone())
}

async fn spawn_stub_server(
    status: StatusCode,
    body: impl Into<String>,
    delay: Option<Duration>,
) -> std::io::Result<(String, oneshot::Receiver<Value>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = StubState {
        status,
        body: body.into(),
        delay,
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/simulate", post(handle_simulate))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), rx))
}

fn ok_body() -> String {
    json!({
        "final_investment_value": 10205.0,
        "total_returns": 205.0,
        "monthly_values": [10100, 10205],
        "investment_breakdown": {"equity": 6000, "bonds": 4000}
    })
    .to_string()
}

#[tokio::test]
async fn posts_request_json_and_parses_result() {
    let (server_url, payload_rx) = spawn_stub_server(StatusCode::OK, ok_body(), None)
        .await
        .expect("spawn server");
    let client = HttpSimulationClient::new(server_url);
    let request = build_request("10000", "medium", "1").expect("valid input");

    let result = client.simulate(request).await.expect("simulate");

    let payload = payload_rx.await.expect("payload");
    assert_eq!(payload["initial_investment"].as_f64(), Some(10000.0));
    assert_eq!(payload["risk_tolerance"], "medium");
    assert_eq!(payload["num_days"], 365);

    assert_eq!(result.monthly_values, vec![dec!(10100), dec!(10205)]);
    assert_eq!(
        result.category_names().collect::<Vec<_>>(),
        vec!["equity", "bonds"]
    );
}

#[tokio::test]
async fn non_success_status_is_transport_failure() {
    let (server_url, _payload_rx) =
        spawn_stub_server(StatusCode::INTERNAL_SERVER_ERROR, "boom", None)
            .await
            .expect("spawn server");
    let client = HttpSimulationClient::new(server_url);
    let request = build_request("100", "low", "1").expect("valid input");

    let err = client.simulate(request).await.expect_err("500 must fail");

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.detail().contains("500"), "detail: {}", err.detail());
}

#[tokio::test]
async fn refused_connection_is_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = HttpSimulationClient::new(format!("http://{addr}"));
    let request = build_request("100", "low", "1").expect("valid input");

    let err = client.simulate(request).await.expect_err("nothing listening");
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn unparseable_body_is_malformed_response() {
    let (server_url, _payload_rx) = spawn_stub_server(StatusCode::OK, "<html>oops</html>", None)
        .await
        .expect("spawn server");
    let client = HttpSimulationClient::new(server_url);
    let request = build_request("100", "high", "2").expect("valid input");

    let err = client.simulate(request).await.expect_err("html body");
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn empty_series_is_malformed_response() {
    let body = json!({
        "final_investment_value": 100.0,
        "total_returns": 0.0,
        "monthly_values": [],
        "investment_breakdown": {"bank": 100.0}
    })
    .to_string();
    let (server_url, _payload_rx) = spawn_stub_server(StatusCode::OK, body, None)
        .await
        .expect("spawn server");
    let client = HttpSimulationClient::new(server_url);
    let request = build_request("100", "high", "1").expect("valid input");

    let err = client.simulate(request).await.expect_err("empty series");
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn slow_service_hits_configured_timeout() {
    let (server_url, _payload_rx) = spawn_stub_server(
        StatusCode::OK,
        ok_body(),
        Some(Duration::from_secs(5)),
    )
    .await
    .expect("spawn server");
    let client = HttpSimulationClient::with_timeout(server_url, Some(Duration::from_millis(100)))
        .expect("client");
    let request = build_request("100", "medium", "1").expect("valid input");

    let err = client.simulate(request).await.expect_err("timeout");
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn endpoint_strips_trailing_slash_from_base_url() {
    let client = HttpSimulationClient::new("http://localhost:5000/ ");
    assert_eq!(client.endpoint(), "http://localhost:5000/simulate");

    let nested = HttpSimulationClient::new("https://example.test/api/");
    assert_eq!(nested.endpoint(), "https://example.test/api/simulate");
}
