use async_trait::async_trait;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::request::{HttpRequest, HttpResponse};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("no browser window available")]
    NoWindow,
    #[error("request failed: {0}")]
    Fetch(String),
}

/// Sends a resolved request and returns status plus raw body text.
/// Futures are not `Send`: the browser event loop is single-threaded.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `window.fetch` transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

fn js_error(value: JsValue) -> TransportError {
    TransportError::Fetch(format!("{value:?}"))
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let window = web_sys::window().ok_or(TransportError::NoWindow)?;

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = &request.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let fetch_request = Request::new_with_str_and_init(&request.url, &opts).map_err(js_error)?;
        for (name, value) in &request.headers {
            fetch_request.headers().set(name, value).map_err(js_error)?;
        }

        let response: Response = JsFuture::from(window.fetch_with_request(&fetch_request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        let status = response.status();
        let text_promise = response.text().map_err(js_error)?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(js_error)?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}

/// reqwest-backed transport for native builds.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| TransportError::Fetch(e.to_string()))?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Fetch(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Fetch(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
