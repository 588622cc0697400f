#![allow(dead_code)]

//! In-process stand-in for the COVID-19 aggregation API.
//!
//! Each upstream runs on its own thread with its own runtime so it outlives
//! the runtime of whichever test started it.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    net::TcpListener,
    sync::{Arc, Mutex},
    time::Duration,
};

pub const SLOW_DELAY: Duration = Duration::from_secs(3);

#[derive(Clone, Default)]
pub struct Fixtures {
    pub metadata: Value,
    pub metadata_unavailable: bool,
    pub summary: Value,
    pub series: HashMap<String, Value>,
    /// Countries whose series arrives only after `SLOW_DELAY`.
    pub slow: Vec<String>,
    /// Countries whose series request fails with a 500.
    pub failing: Vec<String>,
}

impl Fixtures {
    pub fn scenario() -> Self {
        let mut series = HashMap::new();
        series.insert(
            "Sri Lanka".to_string(),
            json!([
                { "date": "2021-04-30", "confirmed": 90, "confirmed_daily": 4, "deaths": 2, "deaths_daily": 0 },
                { "date": "2021-05-01", "confirmed": 100, "confirmed_daily": 10, "deaths": 3, "deaths_daily": 1, "recovered": 70 }
            ]),
        );
        series.insert(
            "India".to_string(),
            json!([
                { "date": "2021-05-01", "confirmed": 100, "confirmed_daily": 10, "deaths": 5, "deaths_daily": 1 }
            ]),
        );

        Self {
            metadata: json!({
                "countries": ["Sri Lanka", "India"],
                "first_date": "2020-01-22",
                "last_date": "2021-05-01"
            }),
            metadata_unavailable: false,
            summary: json!([
                { "confirmed": 10, "deaths": 1 },
                { "confirmed": 20, "deaths": 2, "recovered": 5 }
            ]),
            series,
            slow: Vec::new(),
            failing: Vec::new(),
        }
    }

    pub fn with_country(mut self, name: &str, records: Value) -> Self {
        if let Some(countries) = self.metadata["countries"].as_array_mut() {
            countries.push(json!(name));
        }
        self.series.insert(name.to_string(), records);
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
}

#[derive(Clone)]
struct Shared {
    fixtures: Arc<Fixtures>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Shared {
    fn record(&self, path: &str, query: HashMap<String, String>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            query,
        });
    }
}

pub struct Upstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Upstream {
    pub fn start(fixtures: Fixtures) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind upstream port");
        listener.set_nonblocking(true).expect("nonblocking upstream socket");
        let addr = listener.local_addr().unwrap();

        let requests = Arc::new(Mutex::new(Vec::new()));
        let shared = Shared {
            fixtures: Arc::new(fixtures),
            requests: Arc::clone(&requests),
        };
        let app = Router::new()
            .route("/api/metadata", get(metadata))
            .route("/api/global_and_us", get(summary))
            .route("/api/global", get(country_series))
            .with_state(shared);

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("upstream runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("upstream listener");
                axum::serve(listener, app).await.expect("upstream server");
            });
        });

        Self {
            base_url: format!("http://{addr}/api"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|request| request.path == path).count()
    }
}

/// A base URL nothing listens on.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/api")
}

async fn metadata(State(shared): State<Shared>, Query(query): Query<HashMap<String, String>>) -> Response {
    shared.record("metadata", query);
    if shared.fixtures.metadata_unavailable {
        return (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response();
    }
    Json(shared.fixtures.metadata.clone()).into_response()
}

async fn summary(State(shared): State<Shared>, Query(query): Query<HashMap<String, String>>) -> Response {
    shared.record("global_and_us", query);
    Json(shared.fixtures.summary.clone()).into_response()
}

async fn country_series(State(shared): State<Shared>, Query(query): Query<HashMap<String, String>>) -> Response {
    let country = query.get("country").cloned().unwrap_or_default();
    shared.record("global", query);

    if shared.fixtures.slow.contains(&country) {
        tokio::time::sleep(SLOW_DELAY).await;
    }
    if shared.fixtures.failing.contains(&country) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    let records = shared
        .fixtures
        .series
        .get(&country)
        .cloned()
        .unwrap_or_else(|| json!([]));
    Json(records).into_response()
}
