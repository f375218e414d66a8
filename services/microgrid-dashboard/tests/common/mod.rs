//! In-memory REST backend shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use microgrid_dashboard::api::ApiClient;
use microgrid_dashboard::io::{HttpClient, HttpResponse};
use microgrid_dashboard::{DashboardError, Result};

pub const BASE_URL: &str = "http://fake-backend/api/v1";

#[derive(Debug, Default)]
struct Inner {
    offline: bool,
    failing_writes: bool,
    collections: HashMap<String, Vec<Value>>,
    next_id: u64,
    requests: Vec<String>,
}

/// Stores JSON records per collection path and assigns ids on POST
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<Inner>>,
}

fn response(status: u16, body: Value) -> Result<HttpResponse> {
    Ok(HttpResponse {
        status,
        body: if body.is_null() {
            String::new()
        } else {
            body.to_string()
        },
    })
}

/// Split `.../solar/solar_system/3` into (`solar/solar_system/`, Some("3")).
fn split_path(path: &str) -> (String, Option<String>) {
    match path.rsplit_once('/') {
        Some((collection, id)) if !id.is_empty() => {
            (format!("{}/", collection), Some(id.to_string()))
        }
        _ => (path.to_string(), None),
    }
}

fn id_matches(record: &Value, id: &str) -> bool {
    match &record["id"] {
        Value::Number(n) => n.to_string() == id,
        Value::String(s) => s == id,
        _ => false,
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(Arc::new(self.clone()), BASE_URL)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Every request fails at the transport level while offline.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Writes answer 500 while set; reads keep working.
    pub fn set_failing_writes(&self, failing: bool) {
        self.lock().failing_writes = failing;
    }

    pub fn seed(&self, path: &str, records: Vec<Value>) {
        let mut inner = self.lock();
        let max_id = records
            .iter()
            .filter_map(|r| r["id"].as_u64())
            .max()
            .unwrap_or(0);
        inner.next_id = inner.next_id.max(max_id);
        inner.collections.insert(path.to_string(), records);
    }

    pub fn records(&self, path: &str) -> Vec<Value> {
        self.lock().collections.get(path).cloned().unwrap_or_default()
    }

    /// Requests seen so far, as `METHOD path`
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.starts_with(&format!("{} ", method)))
            .count()
    }

    fn record(&self, method: &str, url: &str) -> Result<String> {
        let mut inner = self.lock();
        let path = url
            .strip_prefix(BASE_URL)
            .unwrap_or(url)
            .trim_start_matches('/')
            .to_string();
        inner.requests.push(format!("{} {}", method, path));
        if inner.offline {
            return Err(DashboardError::Http(format!(
                "{} {} failed: connection refused",
                method, url
            )));
        }
        Ok(path)
    }
}

#[async_trait]
impl HttpClient for FakeBackend {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        let path = self.record("GET", url)?;
        let inner = self.lock();

        if let Some(records) = inner.collections.get(&path) {
            let limit = query
                .iter()
                .find(|(k, _)| *k == "limit")
                .and_then(|(_, v)| v.parse::<usize>().ok())
                .unwrap_or(records.len());
            let skip = records.len().saturating_sub(limit);
            return response(200, Value::Array(records[skip..].to_vec()));
        }

        let (collection, id) = split_path(&path);
        match (inner.collections.get(&collection), id) {
            (Some(records), Some(id)) => match records.iter().find(|r| id_matches(r, &id)) {
                Some(record) => response(200, record.clone()),
                None => response(404, json!({"detail": "Not found"})),
            },
            // an unseeded collection is empty
            (_, None) => response(200, json!([])),
            (None, Some(_)) => response(404, json!({"detail": "Not found"})),
        }
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse> {
        let path = self.record("POST", url)?;
        let mut inner = self.lock();
        if inner.failing_writes {
            return response(500, json!({"detail": "Internal Server Error"}));
        }

        inner.next_id += 1;
        let mut record = body.clone();
        record["id"] = json!(inner.next_id);
        record["created_at"] = json!("2025-12-16T10:00:00Z");
        inner
            .collections
            .entry(path)
            .or_default()
            .push(record.clone());
        response(201, record)
    }

    async fn put_json(&self, url: &str, body: &Value) -> Result<HttpResponse> {
        let path = self.record("PUT", url)?;
        let mut inner = self.lock();
        if inner.failing_writes {
            return response(500, json!({"detail": "Internal Server Error"}));
        }

        let (collection, id) = split_path(&path);
        let Some(id) = id else {
            return response(405, Value::Null);
        };
        let Some(records) = inner.collections.get_mut(&collection) else {
            return response(404, json!({"detail": "Not found"}));
        };
        match records.iter_mut().find(|r| id_matches(r, &id)) {
            Some(record) => {
                let mut updated = body.clone();
                updated["id"] = record["id"].clone();
                *record = updated.clone();
                response(200, updated)
            }
            None => response(404, json!({"detail": "Not found"})),
        }
    }

    async fn delete(&self, url: &str) -> Result<HttpResponse> {
        let path = self.record("DELETE", url)?;
        let mut inner = self.lock();
        if inner.failing_writes {
            return response(500, json!({"detail": "Internal Server Error"}));
        }

        let (collection, id) = split_path(&path);
        let records = inner.collections.get_mut(&collection);
        match (records, id) {
            (Some(records), Some(id)) => {
                let before = records.len();
                records.retain(|r| !id_matches(r, &id));
                if records.len() < before {
                    response(204, Value::Null)
                } else {
                    response(404, json!({"detail": "Not found"}))
                }
            }
            _ => response(404, json!({"detail": "Not found"})),
        }
    }
}

pub fn solar_system(id: u64, name: &str, power_kw: f64, status: &str) -> Value {
    json!({"id": id, "name": name, "power_kw": power_kw, "status": status})
}

pub fn wind_turbine(id: u64, name: &str, power: f64, status: &str) -> Value {
    json!({"id": id, "name": name, "power": power, "status": status})
}

/// `count` log rows, one per hour on 2025-12-16, oldest first
pub fn log_rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": i + 1,
                "timestamp": format!("2025-12-16T{:02}:{:02}:00Z", (i / 60) % 24, i % 60),
                "solar_ac": 1.5,
                "wind_ac": 2.0,
                "load": 3.0,
                "soc": 0.5,
                "action": "idle",
                "reward": 0.1,
            })
        })
        .collect()
}
