//! Sidecar fetcher
//!
//! Issues one GET per call against the local configuration sidecar and
//! shapes the result according to the configured [`ResponseMode`].

use reqwest::Client;
use tracing::{debug, warn};

use crate::config::{FetchConfig, ResponseMode};
use crate::error::{Error, Result};
use crate::protocol::{ConfigRequest, ConfigResponse, FetchOutput, RawBody};

/// HTTP client wrapper for the configuration sidecar
#[derive(Debug, Clone)]
pub struct ConfigFetcher {
    client: Client,
}

impl ConfigFetcher {
    /// Build a fetcher with its own connection pool.
    ///
    /// No timeout or retry is configured; the hosting runtime's deadline
    /// bounds every call.
    pub fn new() -> Result<Self> {
        let client = Client::builder().no_proxy().build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch the configuration document named by `config`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The sidecar cannot be reached or the body cannot be read
    /// - The mode is [`ResponseMode::Raw`] and the status is not 2xx
    ///
    /// In envelope mode every upstream status is copied into the envelope.
    pub async fn fetch(&self, config: &FetchConfig) -> Result<FetchOutput> {
        let request = ConfigRequest::new(&config.target, &config.endpoint);
        debug!(url = request.url(), mode = %config.mode, "Fetching configuration");

        let response = self.client.get(request.url()).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "Sidecar responded");

        match config.mode {
            ResponseMode::Raw => {
                if !status.is_success() {
                    warn!(status = status.as_u16(), url = request.url(), "Sidecar returned an error status");
                    return Err(Error::UpstreamStatus(status.as_u16()));
                }
                let body = response.bytes().await?;
                Ok(FetchOutput::Raw(RawBody(body)))
            }
            ResponseMode::Envelope => {
                let body = response.bytes().await?;
                Ok(FetchOutput::Envelope(ConfigResponse::new(body, status.as_u16())))
            }
        }
    }
}
