use log::LevelFilter;
use shared::OAuthProvider;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_TOKEN_KEY: &str = "token";

/// Client settings. A browser bundle has no process environment, so overrides
/// are baked in at build time through `TASKMATE_API_BASE_URL` and `TASKMATE_LOG`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub token_key: String,
    pub log_level: LevelFilter,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            log_level: LevelFilter::Info,
        }
    }
}

impl ClientConfig {
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        if let Some(base) = option_env!("TASKMATE_API_BASE_URL") {
            config.api_base_url = base.to_string();
        }
        if let Some(level) = option_env!("TASKMATE_LOG").and_then(|l| l.parse::<LevelFilter>().ok()) {
            config.log_level = level;
        }
        config
    }

    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base_url = base.into();
        self
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Full-page OAuth hand-off; the backend handles the callback.
    pub fn oauth_url(&self, provider: OAuthProvider) -> String {
        self.endpoint_url(&format!("auth/{}/", provider.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_with_single_slash() {
        let config = ClientConfig::default().with_base_url("http://host/api/");
        assert_eq!(config.endpoint_url("/tasks/7"), "http://host/api/tasks/7");
        assert_eq!(config.endpoint_url("user"), "http://host/api/user");
    }

    #[test]
    fn oauth_url_keeps_trailing_slash() {
        let config = ClientConfig::default();
        assert_eq!(
            config.oauth_url(OAuthProvider::Google),
            "http://127.0.0.1:8000/api/auth/google/"
        );
    }
}
