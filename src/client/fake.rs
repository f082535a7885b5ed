use std::collections::VecDeque;
use std::error::Error as StdError;
use std::io;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::{BoxFuture, HttpResponse, HttpTransport};

#[derive(Debug, Clone)]
pub(super) struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub(super) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug)]
struct FakeTransportState {
    requests: Vec<RecordedRequest>,
    responses: VecDeque<(u16, String)>,
}

impl FakeTransport {
    pub fn new(response_status: u16, response_body: impl Into<String>) -> Self {
        Self::sequence(vec![(response_status, response_body.into())])
    }

    /// Replay `responses` in order; the last one repeats forever.
    pub fn sequence(responses: Vec<(u16, String)>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeTransportState {
                requests: Vec::new(),
                responses: responses.into(),
            })),
        }
    }

    /// Every request fails before reaching the server.
    pub fn unreachable() -> Self {
        Self::sequence(Vec::new())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request was sent")
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| {
                request
                    .body
                    .get("method")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned()
            })
            .collect()
    }
}

impl HttpTransport for FakeTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(String, String)>,
        body: Value,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let next = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(RecordedRequest {
                    url: url.to_owned(),
                    headers,
                    body,
                });
                if state.responses.len() > 1 {
                    state.responses.pop_front()
                } else {
                    state.responses.front().cloned()
                }
            };
            match next {
                Some((status, body)) => Ok(HttpResponse { status, body }),
                None => Err(Box::new(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )) as Box<dyn StdError + Send + Sync>),
            }
        })
    }
}
