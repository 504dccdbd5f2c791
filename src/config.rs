/// Client configuration for the Upbit REST API.
use std::time::Duration;

/// Production REST host.
pub const UPBIT_API_BASE: &str = "https://api.upbit.com";

/// Configuration for [`UpbitApi`](crate::api::UpbitApi).
///
/// `timeout` is the only deadline a call is subject to; when `None` the call
/// blocks until the transport resolves or fails.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_base: String,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl ApiConfig {
    /// Configuration pointing at a custom host (proxies, mock servers).
    pub fn with_base_url(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Join an API path (starting with `/`) onto the configured host.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: UPBIT_API_BASE.into(),
            timeout: None,
            user_agent: None,
        }
    }
}
