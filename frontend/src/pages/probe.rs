use log::error;
use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use serde_json::Value;

use super::Effect;
use crate::api::{Api, ApiError};

#[derive(Debug, Clone)]
pub enum Msg {
    Loaded(Result<Value, ApiError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeState {
    Loading,
    Loaded(Value),
    Failed(String),
}

/// Diagnostic page: calls `/test` and shows the raw response.
pub struct ProbePage {
    api: Api,
    pub state: ProbeState,
}

impl ProbePage {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: ProbeState::Loading,
        }
    }

    pub fn mount(&mut self) -> Effect<Msg> {
        self.state = ProbeState::Loading;
        let api = self.api.clone();
        Effect::perform(async move { Msg::Loaded(api.probe().await) })
    }

    pub fn update(&mut self, msg: Msg) -> Effect<Msg> {
        match msg {
            Msg::Loaded(Ok(value)) => self.state = ProbeState::Loaded(value),
            Msg::Loaded(Err(err)) => {
                error!("API probe failed: {err}");
                self.state = ProbeState::Failed(err.to_string());
            }
        }
        Effect::None
    }

    pub fn view(&self) -> Node<Msg> {
        div(
            [class("p-6")],
            [
                h1([class("text-xl font-bold mb-4")], [text("API Test Page")]),
                match &self.state {
                    ProbeState::Loading => p([], [text("Loading...")]),
                    ProbeState::Loaded(value) => pre(
                        [class("bg-gray-100 p-4 rounded")],
                        [text(serde_json::to_string_pretty(value).unwrap_or_default())],
                    ),
                    ProbeState::Failed(reason) => p([class("text-red-600")], [text(reason)]),
                },
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{api_with, resolve, RecordingTransport};
    use serde_json::json;

    #[tokio::test]
    async fn renders_raw_echo() {
        let transport = RecordingTransport::new();
        transport.respond(200, json!({"message": "API is working"}));
        let (api, _) = api_with(&transport, None);
        let mut page = ProbePage::new(api);

        let next = resolve(page.mount()).await;
        page.update(next);

        assert!(transport.last_request().unwrap().url.ends_with("/test"));
        assert_eq!(page.state, ProbeState::Loaded(json!({"message": "API is working"})));
    }

    #[tokio::test]
    async fn failure_is_shown() {
        let transport = RecordingTransport::new();
        transport.fail("offline");
        let (api, _) = api_with(&transport, None);
        let mut page = ProbePage::new(api);

        let next = resolve(page.mount()).await;
        page.update(next);

        assert!(matches!(page.state, ProbeState::Failed(_)));
    }
}
