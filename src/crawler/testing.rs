//! In-memory stand-ins for the network and the timer, shared by unit tests

use crate::crawler::fetcher::{Transport, TransportError};
use crate::crawler::retry::Clock;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Clock that never waits and remembers every requested delay
#[derive(Debug, Clone, Default)]
pub struct RecordingClock {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for RecordingClock {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        self.sleeps.lock().unwrap().push(duration);
        Box::pin(async {})
    }
}

#[derive(Debug, Default)]
struct MapState {
    pages: HashMap<String, String>,
    failures_left: HashMap<String, u32>,
    requests: HashMap<String, u32>,
}

/// Serves fixed bodies by exact URL
///
/// Unknown URLs fail with a non-transient error so a missing fixture ends the
/// test instead of retrying forever.
#[derive(Debug, Clone, Default)]
pub struct MapTransport {
    state: Arc<Mutex<MapState>>,
}

impl MapTransport {
    pub fn with_page(self, url: &str, body: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(url.to_string(), body.into());
        self
    }

    /// Makes the first `count` requests for `url` fail with HTTP 503
    pub fn failing_first(self, url: &str, count: u32) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures_left
            .insert(url.to_string(), count);
        self
    }

    pub fn requests_for(&self, url: &str) -> u32 {
        self.state
            .lock()
            .unwrap()
            .requests
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_requests(&self) -> u32 {
        self.state.lock().unwrap().requests.values().sum()
    }
}

impl Transport for MapTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, TransportError>> {
        let outcome = {
            let mut state = self.state.lock().unwrap();
            *state.requests.entry(url.to_string()).or_default() += 1;

            let failing = match state.failures_left.get_mut(url) {
                Some(left) if *left > 0 => {
                    *left -= 1;
                    true
                }
                _ => false,
            };

            if failing {
                Err(TransportError::Status {
                    url: url.to_string(),
                    status: 503,
                })
            } else {
                state
                    .pages
                    .get(url)
                    .cloned()
                    .ok_or_else(|| TransportError::InvalidRequest {
                        url: url.to_string(),
                        message: "no page registered".to_string(),
                    })
            }
        };
        Box::pin(async move { outcome })
    }
}
