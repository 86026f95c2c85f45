//! Connection configuration for building a client.
//!
//! The surrounding application owns how configuration is loaded (YAML file,
//! environment, hard-coded in a test); this crate only defines the shape.
//! A `ClientConfig` is handed to `Client::from_config` once and treated as
//! immutable afterward.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Default API context path, the versioned root every endpoint URL is built
/// under.
pub const DEFAULT_CONTEXT: &str = "/wp-json/wp/v2";

/// Connection settings: where the service lives and how to authenticate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_context")]
    pub context: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

impl ClientConfig {
    /// Anonymous configuration against the default context path.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            context: default_context(),
            username: None,
            password: None,
        }
    }

    /// Same configuration with HTTP Basic credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// The root every endpoint URL is built from: base URL (trailing slash
    /// stripped) plus context path.
    pub fn api_root(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.context)
    }

    /// The `Authorization` header value for these credentials, if any.
    pub fn auth_header(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => {
                let encoded = STANDARD.encode(format!("{user}:{pass}"));
                Some(format!("Basic {encoded}"))
            }
            _ => None,
        }
    }
}
