//! HTTP client wrapper. Every network call made by the pages passes through
//! [`Api::call`].

mod error;
mod request;
mod transport;

use std::rc::Rc;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    AuthToken, Credentials, NewTask, OAuthProvider, Profile, ProfileUpdate, Registration, Task,
    TaskEnvelope, TaskId, TaskListing, TaskPatch,
};

use crate::config::ClientConfig;
use crate::session::{LocalStorageSession, MemorySession, SessionStore};

pub use error::{ApiError, ErrorKind, FieldErrors};
pub use request::{HttpRequest, HttpResponse, Method, RequestOptions};
#[cfg(not(target_arch = "wasm32"))]
pub use transport::ReqwestTransport;
pub use transport::{FetchTransport, Transport, TransportError};

/// Cheap to clone; pending requests hold their own handle.
#[derive(Clone)]
pub struct Api {
    config: Rc<ClientConfig>,
    transport: Rc<dyn Transport>,
    session: Rc<dyn SessionStore>,
}

impl Api {
    pub fn new(
        config: ClientConfig,
        transport: Rc<dyn Transport>,
        session: Rc<dyn SessionStore>,
    ) -> Self {
        Self {
            config: Rc::new(config),
            transport,
            session,
        }
    }

    /// `fetch` plus `localStorage`, falling back to an in-memory session when
    /// storage is blocked.
    pub fn browser(config: ClientConfig) -> Self {
        let session: Rc<dyn SessionStore> = if LocalStorageSession::is_available() {
            Rc::new(LocalStorageSession::new(config.token_key.clone()))
        } else {
            warn!("localStorage unavailable, session will not survive a reload");
            Rc::new(MemorySession::default())
        };
        Self::new(config, Rc::new(FetchTransport), session)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    fn default_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if let Some(token) = self.session.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }

    pub fn prepare(&self, endpoint: &str, options: RequestOptions) -> HttpRequest {
        HttpRequest {
            method: options.method,
            url: self.config.endpoint_url(endpoint),
            headers: request::merge_headers(self.default_headers(), options.headers),
            body: options.body,
        }
    }

    /// Issues one request. A 2xx body is returned as parsed; anything else
    /// becomes an [`ApiError`] carrying the parsed body.
    pub async fn call(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let request = self.prepare(endpoint, options);
        let method = request.method;
        debug!("{} {}", method.as_str(), request.url);

        let response = self.transport.send(request).await?;
        debug!("{} {} -> {}", method.as_str(), endpoint, response.status);

        let body = error::parse_body(&response.body);
        if response.is_success() {
            Ok(body)
        } else {
            let err = ApiError::from_response(response.status, body);
            debug!("{} {} rejected as {}", method.as_str(), endpoint, err.kind());
            Err(err)
        }
    }

    async fn call_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let value = self.call(endpoint, options).await?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::unexpected(format!("unexpected response from {endpoint}: {e}")))
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, ApiError> {
        let options = RequestOptions::new(Method::Post).json(credentials)?;
        self.call_as("/login", options).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<AuthToken, ApiError> {
        let options = RequestOptions::new(Method::Post).json(registration)?;
        self.call_as("/register", options).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.call("/logout", RequestOptions::new(Method::Post))
            .await
            .map(|_| ())
    }

    pub async fn current_user(&self) -> Result<Profile, ApiError> {
        self.call_as("/user", RequestOptions::get()).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Value, ApiError> {
        let options = RequestOptions::new(Method::Put).json(update)?;
        self.call("/user/profile", options).await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.call_as::<TaskListing>("/tasks", RequestOptions::get())
            .await
            .map(TaskListing::into_tasks)
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        let options = RequestOptions::new(Method::Post).json(task)?;
        self.call_as::<TaskEnvelope>("/tasks", options)
            .await
            .map(TaskEnvelope::into_task)
    }

    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        let options = RequestOptions::new(Method::Put).json(patch)?;
        self.call_as::<TaskEnvelope>(&format!("/tasks/{id}"), options)
            .await
            .map(TaskEnvelope::into_task)
    }

    pub async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        self.call(&format!("/tasks/{id}"), RequestOptions::new(Method::Delete))
            .await
            .map(|_| ())
    }

    /// Unauthenticated diagnostic echo.
    pub async fn probe(&self) -> Result<Value, ApiError> {
        self.call("/test", RequestOptions::get()).await
    }

    pub fn oauth_url(&self, provider: OAuthProvider) -> String {
        self.config.oauth_url(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{api_with, body_json, RecordingTransport};
    use serde_json::json;

    #[tokio::test]
    async fn attaches_default_headers_and_bearer_token() {
        let transport = RecordingTransport::new();
        let (api, _) = api_with(&transport, Some("tok-1"));

        api.call("/tasks", RequestOptions::get()).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "http://127.0.0.1:8000/api/tasks");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("authorization"), Some("Bearer tok-1"));
    }

    #[tokio::test]
    async fn no_authorization_without_session() {
        let transport = RecordingTransport::new();
        let (api, _) = api_with(&transport, None);

        api.probe().await.unwrap();

        assert_eq!(transport.last_request().unwrap().header("Authorization"), None);
    }

    #[tokio::test]
    async fn token_is_read_on_every_call() {
        let transport = RecordingTransport::new();
        let (api, session) = api_with(&transport, None);

        api.probe().await.unwrap();
        session.store("late").unwrap();
        api.probe().await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].header("Authorization"), None);
        assert_eq!(requests[1].header("Authorization"), Some("Bearer late"));
    }

    #[tokio::test]
    async fn caller_headers_override_defaults() {
        let transport = RecordingTransport::new();
        let (api, _) = api_with(&transport, Some("stored"));

        let options = RequestOptions::new(Method::Post)
            .header("Authorization", "Bearer explicit")
            .header("X-Requested-With", "XMLHttpRequest");
        api.call("/logout", options).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer explicit"));
        assert_eq!(request.header("X-Requested-With"), Some("XMLHttpRequest"));
        let auth_headers = request
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("authorization"))
            .count();
        assert_eq!(auth_headers, 1);
    }

    #[tokio::test]
    async fn success_returns_body_unchanged() {
        let transport = RecordingTransport::new();
        transport.respond(200, json!({"data": {"nested": true}}));
        let (api, _) = api_with(&transport, None);

        let value = api.call("/anything", RequestOptions::get()).await.unwrap();
        assert_eq!(value, json!({"data": {"nested": true}}));
    }

    #[tokio::test]
    async fn unparseable_success_body_is_empty_object() {
        let transport = RecordingTransport::new();
        transport.respond_raw(204, "");
        let (api, _) = api_with(&transport, None);

        let value = api.call("/tasks/1", RequestOptions::new(Method::Delete)).await.unwrap();
        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn non_2xx_raises_parsed_body() {
        let transport = RecordingTransport::new();
        transport.respond(422, json!({"message": "invalid", "errors": {"title": ["required"]}}));
        let (api, _) = api_with(&transport, None);

        let err = api.call("/tasks", RequestOptions::get()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.body().unwrap()["message"], "invalid");
    }

    #[tokio::test]
    async fn unparseable_error_body_is_unknown_with_empty_object() {
        let transport = RecordingTransport::new();
        transport.respond_raw(502, "Bad Gateway");
        let (api, _) = api_with(&transport, None);

        let err = api.call("/tasks", RequestOptions::get()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.body(), Some(&json!({})));
    }

    #[tokio::test]
    async fn listing_without_tasks_key_is_unknown_error() {
        let transport = RecordingTransport::new();
        transport.respond(200, json!({"message": "ok"}));
        let (api, _) = api_with(&transport, Some("tok"));

        let err = api.list_tasks().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let transport = RecordingTransport::new();
        transport.fail("connection refused");
        let (api, _) = api_with(&transport, None);

        let err = api.probe().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn update_task_sends_patch_to_task_path() {
        let transport = RecordingTransport::new();
        transport.respond(
            200,
            json!({"task": {"id": 4, "title": "t", "description": null, "is_completed": true}}),
        );
        let (api, _) = api_with(&transport, Some("tok"));

        let task = api.update_task(4, &TaskPatch::completion(true)).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Put);
        assert!(request.url.ends_with("/tasks/4"));
        assert_eq!(body_json(&request), json!({"is_completed": true}));
        assert!(task.is_completed);
    }

    #[tokio::test]
    async fn login_without_token_field_is_an_error() {
        let transport = RecordingTransport::new();
        transport.respond(200, json!({"user": {"id": 1}}));
        let (api, _) = api_with(&transport, None);

        let credentials = Credentials {
            email: "a@b.c".into(),
            password: "pw".into(),
        };
        let err = api.login(&credentials).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }
}
