//! Lambda invocation handler

use appconfig_shared::{ConfigFetcher, FetchConfig, FetchOutput};
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

/// Per-process state shared by every invocation
pub struct Handler {
    fetcher: ConfigFetcher,
    config: FetchConfig,
}

impl Handler {
    pub fn new(fetcher: ConfigFetcher, config: FetchConfig) -> Self {
        Self { fetcher, config }
    }

    /// Forward the invocation to the sidecar. The event payload is ignored.
    pub async fn handle(&self, event: LambdaEvent<Value>) -> Result<FetchOutput, Error> {
        let (_payload, context) = event.into_parts();
        info!(
            request_id = %context.request_id,
            application = %self.config.target.application,
            configuration = %self.config.target.configuration,
            "Fetching configuration"
        );

        self.fetcher.fetch(&self.config).await.map_err(|e| {
            error!(request_id = %context.request_id, "Fetch failed: {}", e);
            e.into()
        })
    }
}
