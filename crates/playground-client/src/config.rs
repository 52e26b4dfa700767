//! Client configuration and endpoint URLs.

use playground_snapshot::TraceTarget;

use crate::error::ClientError;

/// Environment variable overriding [`ClientConfig::server_url`].
pub const SERVER_URL_ENV: &str = "SCRIPT_PLAYGROUND_URL";

/// Server URL used when none is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Path prefix of the interpreter's API routes.
pub const DEFAULT_API_PREFIX: &str = "api";

/// Configuration shared by [`StepClient`](crate::StepClient) and
/// [`StreamClient`](crate::StreamClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the interpreter service (e.g. `http://localhost:8080`).
    pub server_url: String,
    /// Path prefix of the API routes (e.g. `api`).
    pub api_prefix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

impl ClientConfig {
    /// Default configuration with the server URL taken from
    /// `SCRIPT_PLAYGROUND_URL` when it is set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                config.server_url = url.trim().to_string();
            }
        }
        config
    }

    /// URL of the input's route, e.g. `http://host/api/transaction/{id}/input/{n}`.
    fn input_url(&self, base: &str, target: &TraceTarget) -> String {
        format!(
            "{}/{}/transaction/{}/input/{}",
            base.trim_end_matches('/'),
            self.api_prefix.trim_matches('/'),
            target.transaction_id,
            target.input_index
        )
    }

    /// URL of the step endpoint for `step` operations.
    pub fn step_url(&self, target: &TraceTarget, step: u64) -> String {
        format!(
            "{}/interpret-with-steps/{}",
            self.input_url(&self.server_url, target),
            step
        )
    }

    /// WebSocket URL of the streaming endpoint.
    ///
    /// `http` maps to `ws` and `https` to `wss`; `ws`/`wss` are kept as is.
    pub fn stream_url(&self, target: &TraceTarget) -> Result<String, ClientError> {
        let (scheme, rest) = self
            .server_url
            .split_once("://")
            .ok_or_else(|| ClientError::InvalidUrl(self.server_url.clone()))?;

        let ws_scheme = match scheme.to_ascii_lowercase().as_str() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            _ => return Err(ClientError::InvalidUrl(self.server_url.clone())),
        };

        let base = format!("{ws_scheme}://{rest}");
        Ok(format!("{}/stream-interpret", self.input_url(&base, target)))
    }
}
