//! End-to-end tests against a fake LED service served by axum.
//!
//! These drive the real [`LedClient`] over HTTP through [`StatusSync`] and
//! [`HistoryView`].

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use ledpanel_core::{
    AggregateRequest, ClientConfig, Error, ErrorKind, HistoryListing, HistoryOrder, HistoryView,
    LedClient, LedService, StateEncoding, StatusSync, WriteMethod,
};
use ledpanel_types::{ChartKind, LedId};

#[derive(Default)]
struct FakeState {
    history: HashMap<u32, Value>,
    failing_history: HashSet<u32>,
    totals: Option<Value>,
    line: HashMap<u32, Value>,
    reports: HashMap<u32, Value>,
    fail_writes: bool,
    writes: Vec<(Method, u32, Value)>,
}

type Shared = Arc<Mutex<FakeState>>;

#[derive(Deserialize)]
struct LedQuery {
    led_id: u32,
}

async fn history(State(state): State<Shared>, Query(q): Query<LedQuery>) -> Response {
    let state = state.lock().unwrap();
    if state.failing_history.contains(&q.led_id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "database unavailable"})),
        )
            .into_response();
    }
    Json(state.history.get(&q.led_id).cloned().unwrap_or(json!([]))).into_response()
}

async fn write(
    method: Method,
    State(state): State<Shared>,
    Path(id): Path<u32>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail_writes {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "relay stuck"})),
        )
            .into_response();
    }
    state.writes.push((method, id, body));
    Json(json!({"ok": true})).into_response()
}

async fn totals(State(state): State<Shared>) -> Json<Value> {
    Json(state.lock().unwrap().totals.clone().unwrap_or(json!([])))
}

async fn line(State(state): State<Shared>, Query(q): Query<LedQuery>) -> Json<Value> {
    Json(
        state
            .lock()
            .unwrap()
            .line
            .get(&q.led_id)
            .cloned()
            .unwrap_or(json!([])),
    )
}

async fn reports(State(state): State<Shared>, Query(q): Query<LedQuery>) -> Json<Value> {
    Json(
        state
            .lock()
            .unwrap()
            .reports
            .get(&q.led_id)
            .cloned()
            .unwrap_or(json!([])),
    )
}

async fn spawn_server(state: Shared) -> String {
    let app = Router::new()
        .route("/historial", get(history))
        .route("/led/{id}", put(write).post(write))
        .route("/estadisticas/tiempos", get(totals))
        .route("/estadisticas/linea", get(line))
        .route("/reportes", get(reports))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn setup(config: impl FnOnce(ClientConfig) -> ClientConfig) -> (Shared, Arc<LedClient>) {
    let state: Shared = Arc::new(Mutex::new(FakeState::default()));
    let url = spawn_server(Arc::clone(&state)).await;
    let client = LedClient::new(config(ClientConfig::new(url))).unwrap();
    (state, Arc::new(client))
}

fn id(n: u32) -> LedId {
    LedId::new(n).unwrap()
}

fn ids(ns: &[u32]) -> Vec<LedId> {
    ns.iter().map(|n| id(*n)).collect()
}

// --- StatusSync ---

#[tokio::test]
async fn refresh_all_settles_every_led() {
    let (state, client) = setup(|c| c).await;
    {
        let mut s = state.lock().unwrap();
        s.history.insert(
            1,
            json!([
                {"timestamp": "T2", "estado": "ENCENDIDO"},
                {"timestamp": "T1", "estado": "APAGADO"}
            ]),
        );
        s.history.insert(2, json!([{"timestamp": "T1", "estado": "APAGADO"}]));
        s.failing_history.insert(3);
    }

    let sync = StatusSync::new(client, ids(&[1, 2, 3, 4]));
    let leds = sync.refresh_all().await;

    assert!(leds.iter().all(|led| !led.is_loading));
    let on: Vec<bool> = leds.iter().map(|led| led.is_on).collect();
    assert_eq!(on, vec![true, false, false, false]);
}

#[tokio::test]
async fn toggle_writes_negated_state() {
    let (state, client) = setup(|c| c).await;
    state
        .lock()
        .unwrap()
        .history
        .insert(1, json!([{"timestamp": "T1", "estado": "ENCENDIDO"}]));

    let sync = StatusSync::new(client, ids(&[1]));
    sync.refresh_all().await;

    let new_state = sync.toggle(id(1), true).await.unwrap();
    assert!(!new_state);
    assert!(!sync.get(id(1)).await.unwrap().is_on);

    let writes = state.lock().unwrap().writes.clone();
    assert_eq!(writes, vec![(Method::PUT, 1, json!({"estado": false}))]);
}

#[tokio::test]
async fn failed_toggle_keeps_local_state() {
    let (state, client) = setup(|c| c).await;
    {
        let mut s = state.lock().unwrap();
        s.history
            .insert(1, json!([{"timestamp": "T1", "estado": "ENCENDIDO"}]));
        s.fail_writes = true;
    }

    let sync = StatusSync::new(client, ids(&[1]));
    sync.refresh_all().await;

    let err = sync.toggle(id(1), true).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UserActionFailure);
    match &err {
        Error::ToggleFailed { source, .. } => {
            assert!(source.to_string().contains("relay stuck"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(sync.get(id(1)).await.unwrap().is_on);
}

#[tokio::test]
async fn post_with_integer_encoding() {
    let (state, client) = setup(|c| {
        c.write_method(WriteMethod::Post)
            .state_encoding(StateEncoding::Int)
    })
    .await;

    let sync = StatusSync::new(client, ids(&[2]));
    assert!(sync.set(id(2), true).await.unwrap());

    let writes = state.lock().unwrap().writes.clone();
    assert_eq!(writes, vec![(Method::POST, 2, json!({"estado": 1}))]);
}

#[tokio::test]
async fn oldest_first_history_is_reversed() {
    let (state, client) = setup(|c| c.history_order(HistoryOrder::OldestFirst)).await;
    state.lock().unwrap().history.insert(
        1,
        json!([
            {"timestamp": "T1", "estado": "APAGADO"},
            {"timestamp": "T2", "estado": "ENCENDIDO"}
        ]),
    );

    let records = client.history(id(1)).await.unwrap();
    assert_eq!(records[0].timestamp.as_str(), "T2");

    let sync = StatusSync::new(client, ids(&[1]));
    assert!(sync.refresh_all().await[0].is_on);
}

#[tokio::test]
async fn bad_old_row_does_not_hide_newest_state() {
    let (state, client) = setup(|c| c).await;
    state.lock().unwrap().history.insert(
        1,
        json!([
            {"timestamp": "T3", "estado": "ENCENDIDO"},
            {"timestamp": "T2", "estado": "APAGADO"},
            {"timestamp": "T1", "estado": null}
        ]),
    );

    let sync = StatusSync::new(Arc::clone(&client), ids(&[1]));
    assert!(sync.refresh_all().await[0].is_on);

    let view = HistoryView::new(client);
    assert_eq!(
        view.fetch_history(id(1)).await.render(),
        "T3 → ON\nT2 → OFF"
    );
}

#[tokio::test]
async fn bad_newest_row_reads_as_off() {
    let (state, client) = setup(|c| c).await;
    state.lock().unwrap().history.insert(
        1,
        json!([
            {"timestamp": "T2", "estado": "ROTO"},
            {"timestamp": "T1", "estado": "ENCENDIDO"}
        ]),
    );

    let err = client.latest_record(id(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);

    let sync = StatusSync::new(client, ids(&[1]));
    let leds = sync.refresh_all().await;
    assert!(!leds[0].is_on);
    assert!(!leds[0].is_loading);
}

// --- HistoryView ---

#[tokio::test]
async fn history_listing_text() {
    let (state, client) = setup(|c| c).await;
    state
        .lock()
        .unwrap()
        .history
        .insert(1, json!([{"timestamp": "T1", "estado": "ENCENDIDO"}]));

    let view = HistoryView::new(client);
    assert_eq!(view.fetch_history(id(1)).await.render(), "T1 → ON");
    assert_eq!(view.fetch_history(id(2)).await.render(), "Sin eventos.");
}

#[tokio::test]
async fn malformed_history_is_reported_distinctly() {
    let (state, client) = setup(|c| c).await;
    state
        .lock()
        .unwrap()
        .history
        .insert(1, json!({"rows": []}));

    let view = HistoryView::new(Arc::clone(&client));
    let listing = view.fetch_history(id(1)).await;
    assert!(matches!(listing, HistoryListing::Failed(_)));
    assert_eq!(listing.render(), "No se pudo obtener el historial.");

    let err = client.history(id(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn bar_aggregate_projection() {
    let (state, client) = setup(|c| c).await;
    state.lock().unwrap().totals = Some(json!([
        {"led_id": 1, "estado": "ENCENDIDO", "total_horas": 5},
        {"led_id": 2, "estado": "ENCENDIDO", "total_horas": 0}
    ]));

    let view = HistoryView::new(client);
    let series = view.fetch_aggregate(AggregateRequest::OnTimeTotals).await;
    assert_eq!(series.labels, vec!["LED 1", "LED 2"]);
    assert_eq!(series.values, vec![5.0, 0.0]);
    assert_eq!(series.title, "Horas Encendido por LED");
}

#[tokio::test]
async fn non_array_aggregate_is_empty_series() {
    let (state, client) = setup(|c| c).await;
    state.lock().unwrap().totals = Some(json!({"error": "not ready"}));

    let view = HistoryView::new(Arc::clone(&client));
    let series = view.fetch_aggregate(AggregateRequest::OnTimeTotals).await;
    assert!(series.is_empty());
    assert_eq!(series.kind, ChartKind::OnTimeTotals);

    let err = client.time_totals().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn line_and_duration_aggregates() {
    let (state, client) = setup(|c| c).await;
    {
        let mut s = state.lock().unwrap();
        s.line.insert(
            3,
            json!([
                {"timestamp": "2024-05-01T08:15:00Z", "estado": 1},
                {"timestamp": "2024-05-01T09:30:00Z", "estado": 0}
            ]),
        );
        s.reports.insert(
            3,
            json!([
                {"inicio": "A", "fin": "B", "duracion_formato": "00:02:00", "duracion_segundos": 120},
                {"inicio": "C", "fin": "D"}
            ]),
        );
    }

    let view = HistoryView::new(client);
    let line = view
        .fetch_aggregate(AggregateRequest::StateTimeline(id(3)))
        .await;
    assert_eq!(line.labels, vec!["08:15:00", "09:30:00"]);
    assert_eq!(line.values, vec![1.0, 0.0]);
    assert_eq!(line.title, "Cambios de Estado LED 3");

    let durations = view
        .fetch_aggregate(AggregateRequest::SessionDurations(id(3)))
        .await;
    assert_eq!(durations.labels, vec!["#1", "#2"]);
    assert_eq!(durations.values, vec![120.0, 0.0]);

    let sessions = view.fetch_sessions(id(3)).await.unwrap();
    assert_eq!(sessions[0].duration_label.as_deref(), Some("00:02:00"));
}

// --- Network failures ---

#[tokio::test]
async fn unreachable_service_is_network_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Arc::new(LedClient::new(ClientConfig::new(format!("http://{}", addr))).unwrap());
    let err = client.history(id(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkFailure);

    let sync = StatusSync::new(Arc::clone(&client), ids(&[1, 2]));
    let leds = sync.refresh_all().await;
    assert!(leds.iter().all(|led| !led.is_loading && !led.is_on));

    let view = HistoryView::new(client);
    assert!(view.fetch_history(id(1)).await.is_failed());
    assert!(
        view.fetch_aggregate(AggregateRequest::OnTimeTotals)
            .await
            .is_empty()
    );
}
