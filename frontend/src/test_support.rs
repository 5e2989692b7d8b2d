//! Recording transport and helpers for controller tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::{Api, HttpRequest, HttpResponse, Transport, TransportError};
use crate::config::ClientConfig;
use crate::pages::Effect;
use crate::session::{MemorySession, SessionStore};

/// Records every request and replays queued responses in order. With the
/// queue empty it answers `200 {}`.
#[derive(Default)]
pub struct RecordingTransport {
    requests: RefCell<Vec<HttpRequest>>,
    responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl RecordingTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.respond_raw(status, &body.to_string());
    }

    pub fn respond_raw(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail(&self, reason: &str) {
        self.responses
            .borrow_mut()
            .push_back(Err(TransportError::Fetch(reason.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[async_trait(?Send)]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 200,
                body: json!({}).to_string(),
            })
        })
    }
}

pub fn api_with(transport: &Rc<RecordingTransport>, token: Option<&str>) -> (Api, Rc<MemorySession>) {
    let session = Rc::new(match token {
        Some(token) => MemorySession::with_token(token),
        None => MemorySession::default(),
    });
    let api = Api::new(
        ClientConfig::default(),
        transport.clone() as Rc<dyn Transport>,
        session.clone() as Rc<dyn SessionStore>,
    );
    (api, session)
}

pub fn body_json(request: &HttpRequest) -> Value {
    request
        .body
        .as_deref()
        .map(|body| serde_json::from_str(body).expect("request body is JSON"))
        .unwrap_or(Value::Null)
}

/// Awaits the request carried by `effect` and returns the follow-up message.
pub async fn resolve<M>(effect: Effect<M>) -> M {
    match effect {
        Effect::Perform(pending) => pending.await,
        _ => panic!("expected a pending request"),
    }
}
