//! Router harness and store doubles for HTTP API tests.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::{DateTime, Utc};
use rstest::fixture;
use serde_json::Value;
use tower::ServiceExt;
use wayfinder::agent::adapters::memory::InMemoryAgentRepository;
use wayfinder::api::{AppState, Backends, router};
use wayfinder::capability::adapters::memory::InMemoryCapabilityRepository;
use wayfinder::common::{Endpoint, ManualClock};
use wayfinder::service_registry::{
    adapters::memory::InMemoryLivenessStore,
    domain::{HealthSnapshot, ServiceId, ServiceName, ServiceRecord, ServiceUpdate, Ttl},
    ports::{HealthProbe, LivenessStore, LivenessStoreError, LivenessStoreResult, ProbeOutcome},
};

/// Probe that always reports the same outcome.
pub struct FixedProbe(pub ProbeOutcome);

#[async_trait]
impl HealthProbe for FixedProbe {
    async fn check(&self, _health_check_url: &Endpoint) -> ProbeOutcome {
        self.0.clone()
    }
}

/// Liveness store whose backend is unreachable.
pub struct UnreachableLivenessStore;

fn unreachable() -> LivenessStoreError {
    LivenessStoreError::persistence(io::Error::other("connection refused"))
}

#[async_trait]
impl LivenessStore for UnreachableLivenessStore {
    async fn insert(&self, _record: &ServiceRecord) -> LivenessStoreResult<()> {
        Err(unreachable())
    }

    async fn find_live(
        &self,
        _id: ServiceId,
        _now: DateTime<Utc>,
    ) -> LivenessStoreResult<Option<ServiceRecord>> {
        Err(unreachable())
    }

    async fn touch(
        &self,
        _id: ServiceId,
        _at: DateTime<Utc>,
        _now: DateTime<Utc>,
    ) -> LivenessStoreResult<ServiceRecord> {
        Err(unreachable())
    }

    async fn update_live(
        &self,
        _id: ServiceId,
        _update: &ServiceUpdate,
        _at: DateTime<Utc>,
        _now: DateTime<Utc>,
    ) -> LivenessStoreResult<ServiceRecord> {
        Err(unreachable())
    }

    async fn record_health(
        &self,
        _id: ServiceId,
        _snapshot: &HealthSnapshot,
        _now: DateTime<Utc>,
    ) -> LivenessStoreResult<()> {
        Err(unreachable())
    }

    async fn remove_live(&self, _id: ServiceId, _now: DateTime<Utc>) -> LivenessStoreResult<()> {
        Err(unreachable())
    }

    async fn scan_live(&self, _now: DateTime<Utc>) -> LivenessStoreResult<Vec<ServiceRecord>> {
        Err(unreachable())
    }

    async fn scan_live_by_name(
        &self,
        _name: &ServiceName,
        _now: DateTime<Utc>,
    ) -> LivenessStoreResult<Vec<ServiceRecord>> {
        Err(unreachable())
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> LivenessStoreResult<usize> {
        Err(unreachable())
    }
}

/// Router wired to in-memory stores and a manual clock.
pub struct TestApp {
    /// Router under test.
    pub router: Router,
    /// Clock shared with every service.
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Builds an app over `liveness`, probing with `probe`.
    pub fn with(liveness: Arc<dyn LivenessStore>, probe: Arc<dyn HealthProbe>) -> Self {
        let clock = Arc::new(ManualClock::new(DateTime::<Utc>::UNIX_EPOCH));
        let backends = Backends {
            liveness,
            agents: Arc::new(InMemoryAgentRepository::new()),
            capabilities: Arc::new(InMemoryCapabilityRepository::new()),
            probe,
        };
        let state = AppState::new(backends, Arc::clone(&clock), Ttl::DEFAULT);
        Self {
            router: router(Arc::new(state)),
            clock,
        }
    }

    /// Sends a request and decodes the JSON response, `Value::Null` when
    /// the body is empty.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let decoded = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };
        (status, decoded)
    }

    /// Sends a raw, possibly malformed, JSON body.
    pub async fn send_raw(&self, method: Method, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request should build");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        (
            status,
            serde_json::from_slice(&bytes).expect("error body should be JSON"),
        )
    }
}

/// App over a fresh in-memory liveness store whose probe reports healthy.
#[fixture]
pub fn app() -> TestApp {
    TestApp::with(
        Arc::new(InMemoryLivenessStore::new()),
        Arc::new(FixedProbe(ProbeOutcome::Healthy)),
    )
}

/// Returns the `error` kind of an error body.
pub fn error_kind(body: &Value) -> &str {
    body.get("error").and_then(Value::as_str).unwrap_or_default()
}

/// Returns a string field of a JSON object.
pub fn field<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}
