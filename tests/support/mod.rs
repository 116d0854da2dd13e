//! Shared fixtures for the integration tests: a canned transport and JSON
//! builders for the API entities.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};

use splitsio::{Client, Error, FetchResponse, PageMeta, Result, Transport};

const TIMESTAMP: &str = "2018-01-01T00:00:00.000Z";

/// Transport serving canned responses keyed by endpoint, recording every
/// request it receives.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<HashMap<String, FetchResponse>>,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register the response for `endpoint`.
    pub fn respond(&self, endpoint: &str, meta: Option<PageMeta>, body: Value) {
        self.responses
            .lock()
            .insert(endpoint.to_string(), FetchResponse { meta, body });
    }

    /// Every endpoint requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Transport for FakeTransport {
    fn get(&self, endpoint: &str) -> Result<FetchResponse> {
        self.requests.lock().push(endpoint.to_string());
        self.responses
            .lock()
            .get(endpoint)
            .cloned()
            .ok_or_else(|| Error::transport(endpoint, "connection refused"))
    }
}

/// Client wired to the given fake transport.
pub fn client_over(transport: &Arc<FakeTransport>) -> Client {
    Client::with_transport(Arc::clone(transport) as Arc<dyn Transport>)
}

pub fn category_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP
    })
}

pub fn game_json(id: &str, name: &str, shortname: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "shortname": shortname,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP
    })
}

pub fn runner_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "twitch_id": null,
        "twitch_name": null,
        "display_name": name,
        "name": name,
        "avatar": "https://example.org/avatar.png",
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP
    })
}

/// A run without historic data, optionally tied to a category.
pub fn run_json(id: &str, category: Option<Value>) -> Value {
    json!({
        "id": id,
        "srdc_id": null,
        "realtime_duration_ms": 5_400_000,
        "realtime_sum_of_best_ms": null,
        "gametime_duration_ms": 0,
        "gametime_sum_of_best_ms": null,
        "default_timing": "real",
        "program": "livesplit",
        "attempts": 12,
        "image_url": null,
        "parsed_at": TIMESTAMP,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
        "video_url": null,
        "game": null,
        "category": category,
        "runners": [],
        "segments": [],
        "histories": null
    })
}

/// A run with run-level histories in deliberately shuffled order.
pub fn historic_run_json(id: &str) -> Value {
    let mut run = run_json(id, None);
    run["histories"] = json!([
        {"attempt_number": 3, "realtime_duration_ms": 5_460_000, "gametime_duration_ms": null},
        {"attempt_number": 1, "realtime_duration_ms": 5_520_000, "gametime_duration_ms": null},
        {"attempt_number": 2, "realtime_duration_ms": null, "gametime_duration_ms": null}
    ]);
    run
}
