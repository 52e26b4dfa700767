//! HTTP client for the stepwise interpretation endpoint.

use playground_snapshot::{InterpreterSnapshot, TraceTarget};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// HTTP client asking the interpreter for the snapshot after N operations.
#[derive(Debug, Clone)]
pub struct StepClient {
    /// Client configuration.
    config: ClientConfig,
    /// Underlying HTTP client.
    client: reqwest::Client,
}

impl StepClient {
    /// Create a new step client with the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::new();
        Self { config, client }
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the snapshot after exactly `step` operations of `target`.
    ///
    /// A `step` past the end of the scripts is answered by the interpreter;
    /// whatever it returns is passed through.
    pub async fn fetch_step(
        &self,
        target: &TraceTarget,
        step: u64,
    ) -> Result<InterpreterSnapshot, ClientError> {
        let url = self.config.step_url(target, step);
        debug!(%target, step, "fetching interpreter step");

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();

        if status.as_u16() == 404 {
            return Err(ClientError::NotFound);
        }

        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::ServerError {
                status_code: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let snapshot = InterpreterSnapshot::from_json(&text)?;
        Ok(snapshot)
    }
}
