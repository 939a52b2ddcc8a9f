//! In-memory doubles for provider tests
//!
//! Available to this crate's tests and, through the `testing` feature, to the
//! provider crates' tests.

use crate::error::{CloudError, Result};
use crate::http::{ApiRequest, ApiResponse, Method, Transport};
use crate::observer::{Event, Observer};
use crate::poll::Sleeper;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Serves scripted responses per `(method, path)` and records every request
///
/// Responses for a route are served in the order they were scripted; the
/// last one keeps being served once the rest are used up. Query parameters
/// do not take part in routing. A request to an unscripted route fails with
/// [`CloudError::Transport`].
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response for a route
    pub fn respond(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.push(method, path, ApiResponse::new(status, body.to_string()));
    }

    /// Queue a response without a body, e.g. 204 No Content
    pub fn respond_empty(&self, method: Method, path: &str, status: u16) {
        self.push(method, path, ApiResponse::new(status, Vec::new()));
    }

    /// Queue a 200 JSON response for a GET route
    pub fn ok_json(&self, path: &str, body: serde_json::Value) {
        self.respond(Method::Get, path, 200, body);
    }

    fn push(&self, method: Method, path: &str, response: ApiResponse) {
        lock(&self.routes)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    /// Requests that change remote state
    pub fn mutations(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.is_mutating())
            .collect()
    }

    /// Number of requests received for one route
    pub fn count(&self, method: Method, path: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        lock(&self.requests).push(request.clone());

        let mut routes = lock(&self.routes);
        let queue = routes
            .get_mut(&(request.method, request.path.clone()))
            .filter(|queue| !queue.is_empty())
            .ok_or_else(|| {
                CloudError::Transport(format!(
                    "no scripted response for {} {}",
                    request.method, request.path
                ))
            })?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        response.ok_or_else(|| CloudError::Transport("empty response queue".to_string()))
    }
}

/// Records requested waits and returns immediately
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        lock(&self.slept).clone()
    }

    pub fn total(&self) -> Duration {
        lock(&self.slept).iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        lock(&self.slept).push(duration);
    }
}

/// Keeps the rendered form of every event
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        lock(&self.events).clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        lock(&self.events)
            .iter()
            .filter(|e| e.contains(needle))
            .count()
    }
}

impl Observer for RecordingObserver {
    fn on_event(&self, event: &Event<'_>) {
        lock(&self.events).push(event.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_response_is_sticky() {
        let transport = ScriptedTransport::new();
        transport.ok_json("droplets/1", serde_json::json!({"n": 1}));
        transport.ok_json("droplets/1", serde_json::json!({"n": 2}));

        let request = ApiRequest::get("droplets/1");
        let mut seen = Vec::new();
        for _ in 0..3 {
            let value: serde_json::Value = transport.send(&request).await.unwrap().json().unwrap();
            seen.push(value["n"].as_u64().unwrap());
        }

        assert_eq!(seen, vec![1, 2, 2]);
        assert_eq!(transport.count(Method::Get, "droplets/1"), 3);
    }

    #[tokio::test]
    async fn test_unscripted_route_fails() {
        let transport = ScriptedTransport::new();
        let result = transport.send(&ApiRequest::delete("droplets/9")).await;

        assert!(matches!(result, Err(CloudError::Transport(_))));
        assert_eq!(transport.mutations().len(), 1);
    }
}
