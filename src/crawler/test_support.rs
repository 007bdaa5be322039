//! In-memory transport used by the crawler unit tests

use crate::crawler::transport::{HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// Fake site: a fixed map of URL to response, with per-URL request counts
///
/// Unknown URLs fail with a transport error. When a gate is installed, every
/// request except the listed open URLs waits for a gate permit before it
/// answers, and the number of such waiting requests is tracked.
#[derive(Default)]
pub struct FakeSite {
    responses: HashMap<String, (u16, Bytes)>,
    failures: Vec<String>,
    counts: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
    gate: Option<Gate>,
}

struct Gate {
    permits: Arc<Semaphore>,
    open: Vec<String>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Handle to a gate installed with [`FakeSite::gated`]
#[derive(Clone)]
pub struct GateHandle {
    pub permits: Arc<Semaphore>,
    pub in_flight: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
}

impl GateHandle {
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn open(&self) {
        self.permits.add_permits(1024);
    }
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.bytes(url, 200, html.as_bytes())
    }

    pub fn status(self, url: &str, status: u16) -> Self {
        self.bytes(url, status, b"error")
    }

    pub fn bytes(mut self, url: &str, status: u16, body: &[u8]) -> Self {
        self.responses
            .insert(url.to_string(), (status, Bytes::copy_from_slice(body)));
        self
    }

    /// Makes requests for `url` fail at the transport level
    pub fn failing(mut self, url: &str) -> Self {
        self.failures.push(url.to_string());
        self
    }

    /// Adds a small delay to every response so concurrent branches overlap
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Holds every request except `open` until the returned handle releases it
    pub fn gated(mut self, open: &[&str]) -> (Self, GateHandle) {
        let handle = GateHandle {
            permits: Arc::new(Semaphore::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        };
        self.gate = Some(Gate {
            permits: handle.permits.clone(),
            open: open.iter().map(|s| s.to_string()).collect(),
            in_flight: handle.in_flight.clone(),
            peak: handle.peak.clone(),
        });
        (self, handle)
    }

    /// Number of GETs issued for `url`
    pub fn count(&self, url: &str) -> usize {
        self.counts
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    /// Every requested URL with its request count
    pub fn requests(&self) -> HashMap<String, usize> {
        self.counts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeSite {
    async fn get(&self, url: &Url, _timeout: Duration) -> Result<HttpResponse, TransportError> {
        *self
            .counts
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        if let Some(gate) = &self.gate {
            if !gate.open.iter().any(|open| open == url.as_str()) {
                let now = gate.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                gate.peak.fetch_max(now, Ordering::SeqCst);
                // Decrements even if the request is dropped while waiting
                let _waiting = InFlightGuard(gate.in_flight.clone());
                if let Ok(permit) = gate.permits.acquire().await {
                    permit.forget();
                }
            }
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failures.iter().any(|f| f == url.as_str()) {
            return Err(TransportError::Request {
                url: url.to_string(),
                message: "simulated failure".to_string(),
            });
        }

        match self.responses.get(url.as_str()) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Err(TransportError::Request {
                url: url.to_string(),
                message: "no such page".to_string(),
            }),
        }
    }
}
