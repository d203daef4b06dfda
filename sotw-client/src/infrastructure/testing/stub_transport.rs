use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;

use crate::infrastructure::transport::{RawResponse, RequestConfig, Transport, TransportError};

/// Observable transport activity, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEvent {
    Started { method: String, path: String },
    Finished { method: String, path: String, status: Option<u16> },
}

impl CallEvent {
    pub fn path(&self) -> &str {
        match self {
            CallEvent::Started { path, .. } | CallEvent::Finished { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone)]
struct ScriptedReply {
    outcome: Result<RawResponse, TransportError>,
    gate: Option<Arc<Notify>>,
}

#[derive(Debug, Default)]
struct StubState {
    replies: HashMap<(String, String), VecDeque<ScriptedReply>>,
    events: Vec<CallEvent>,
    requests: Vec<RequestConfig>,
}

/// Scripted in-memory [`Transport`].
///
/// Replies are queued per `(method, path)`; the last queued reply keeps
/// answering once the queue is down to one. Unscripted calls get a 404.
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
    inner: Arc<Mutex<StubState>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: &str, path: &str, status: u16, body: Vec<u8>) {
        self.push(
            method,
            path,
            ScriptedReply {
                outcome: Ok(RawResponse { status, body }),
                gate: None,
            },
        );
    }

    pub fn reply_json(&self, method: &str, path: &str, status: u16, body: Value) {
        self.reply(method, path, status, body.to_string().into_bytes());
    }

    /// Queue a reply that is held back until the returned gate is notified.
    pub fn reply_gated(&self, method: &str, path: &str, status: u16, body: Value) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.push(
            method,
            path,
            ScriptedReply {
                outcome: Ok(RawResponse {
                    status,
                    body: body.to_string().into_bytes(),
                }),
                gate: Some(Arc::clone(&gate)),
            },
        );
        gate
    }

    /// Queue a connection-level failure.
    pub fn fail(&self, method: &str, path: &str, message: &str) {
        self.push(
            method,
            path,
            ScriptedReply {
                outcome: Err(TransportError(message.to_string())),
                gate: None,
            },
        );
    }

    /// Drop everything scripted for `(method, path)`.
    pub fn forget(&self, method: &str, path: &str) {
        self.inner
            .lock()
            .replies
            .remove(&(method.to_ascii_uppercase(), path.to_string()));
    }

    pub fn events(&self) -> Vec<CallEvent> {
        self.inner.lock().events.clone()
    }

    pub fn requests(&self) -> Vec<RequestConfig> {
        self.inner.lock().requests.clone()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> usize {
        self.inner
            .lock()
            .requests
            .iter()
            .filter(|request| request.method.as_str() == method && request.path == path)
            .count()
    }

    /// Poll until `count` calls to `path` have started. Returns `false` if
    /// that does not happen within a couple of seconds.
    pub async fn wait_for_started(&self, method: &str, path: &str, count: usize) -> bool {
        for _ in 0..2_000 {
            if self.calls_to(method, path) >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        false
    }

    fn push(&self, method: &str, path: &str, reply: ScriptedReply) {
        self.inner
            .lock()
            .replies
            .entry((method.to_ascii_uppercase(), path.to_string()))
            .or_default()
            .push_back(reply);
    }

    fn next_reply(state: &mut StubState, key: &(String, String)) -> Option<ScriptedReply> {
        let queue = state.replies.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: &RequestConfig) -> Result<RawResponse, TransportError> {
        let method = request.method.as_str().to_string();
        let key = (method.clone(), request.path.clone());

        let reply = {
            let mut state = self.inner.lock();
            state.events.push(CallEvent::Started {
                method: method.clone(),
                path: request.path.clone(),
            });
            state.requests.push(request.clone());
            Self::next_reply(&mut state, &key)
        };

        let outcome = match reply {
            Some(ScriptedReply { outcome, gate }) => {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                outcome
            }
            None => Ok(RawResponse {
                status: 404,
                body: br#"{"detail": "Not Found"}"#.to_vec(),
            }),
        };

        self.inner.lock().events.push(CallEvent::Finished {
            method,
            path: request.path.clone(),
            status: outcome.as_ref().ok().map(|raw| raw.status),
        });
        outcome
    }
}
