#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::TcpListener as StdTcpListener,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::get,
};
use chrono::{NaiveDate, Timelike};
use timesales_exporter::{tz::ExchangeTz, window::TradingWindow};

pub const TOKEN: &str = "test-token";

pub const REFERENCE_BODY: &str = r#"{"series":{"data":[{"timestamp":"2024-01-02T09:30","open":"100.0","high":"100.5","low":"99.8","close":"100.2","volume":"12345"}]}}"#;

/// One request as the mock API saw it.
#[derive(Debug, Clone, Default)]
pub struct SeenRequest {
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub accept: Option<String>,
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

/// A local stand-in for `https://api.tradier.com/v1` serving one canned reply.
pub struct MockTradier {
    pub base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockTradier {
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = Canned {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.into(),
            seen: Arc::clone(&seen),
        };
        let app = Router::new()
            .route("/v1/markets/timesales", get(timesales))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        Self {
            base_url: format!("http://{addr}/v1"),
            seen,
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("lock").clone()
    }
}

async fn timesales(
    State(canned): State<Canned>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    canned.seen.lock().expect("lock").push(SeenRequest {
        query,
        authorization: header_text(header::AUTHORIZATION),
        accept: header_text(header::ACCEPT),
    });

    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
}

/// A base URL nothing listens on.
pub fn refused_base_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}/v1")
}

/// A fixed mid-session window on 2024-01-02.
pub fn midday_window() -> TradingWindow {
    let now = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    TradingWindow::for_wall_clock(now).unwrap()
}

/// Some fixed-offset zone whose current hour falls in `hours`.
///
/// Lets binary tests pick "after the open" or "before the open" regardless
/// of when they run.
pub fn zone_with_hour_in(hours: std::ops::RangeInclusive<u32>) -> String {
    (-12..=14)
        .map(|offset: i32| match offset {
            // Etc/GMT signs are inverted: Etc/GMT-5 is UTC+5.
            0 => "Etc/GMT".to_string(),
            o if o > 0 => format!("Etc/GMT-{o}"),
            o => format!("Etc/GMT+{}", -o),
        })
        .find(|name| {
            let tz: ExchangeTz = name.parse().expect("known zone");
            let now = tz.now();
            // Leave room before the hour rolls over mid-test.
            hours.contains(&now.hour()) && now.minute() < 58
        })
        .expect("some offset matches")
}
