//! Client configuration.

use std::env;

pub const DEFAULT_BASE_URL: &str = "https://public-api.wordpress.com";

/// Where the API lives and how requests identify themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    access_token: Option<String>,
    user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
            user_agent: None,
        }
    }

    /// Read `ACTIVITY_API_BASE_URL`, `ACTIVITY_API_TOKEN` and
    /// `ACTIVITY_API_USER_AGENT`. Unset or empty variables are ignored.
    pub fn from_env() -> Self {
        let read = |name: &str| env::var(name).ok().filter(|value| !value.is_empty());

        let mut config = Self::new(read("ACTIVITY_API_BASE_URL").as_deref().unwrap_or(DEFAULT_BASE_URL));
        config.access_token = read("ACTIVITY_API_TOKEN");
        config.user_agent = read("ACTIVITY_API_USER_AGENT");
        config
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Headers sent with every request.
    pub(crate) fn default_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if let Some(token) = &self.access_token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        if let Some(user_agent) = &self.user_agent {
            headers.push(("user-agent".to_string(), user_agent.clone()));
        }
        headers
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
