//! UI server configuration from environment variables
//!
//! Wraps the client configuration with the HTTP-facing settings.

use std::env;

use vault_client::ClientConfig;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct UiConfig {
    /// Address the HTTP server listens on
    pub bind_address: String,
    /// CORS origins; `None` allows any origin (development mode)
    pub allowed_origins: Option<Vec<String>>,
    pub client: ClientConfig,
}

impl UiConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `BIND_ADDRESS`: listen address (default `127.0.0.1:3000`)
    /// - `ALLOWED_ORIGINS`: comma separated CORS origins
    /// - everything read by [`ClientConfig::from_env`]
    pub fn from_env() -> Self {
        let bind_address =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .ok()
            .and_then(|origins| parse_origins(&origins));

        Self {
            bind_address,
            allowed_origins,
            client: ClientConfig::from_env(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            allowed_origins: None,
            client: ClientConfig::default(),
        }
    }
}

/// Split a comma separated origin list, ignoring blanks
pub fn parse_origins(origins: &str) -> Option<Vec<String>> {
    let list: Vec<String> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}
