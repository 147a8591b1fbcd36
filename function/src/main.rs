use appconfig_shared::{ConfigFetcher, FetchConfig};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod handler;

use handler::Handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // CloudWatch stamps each line itself
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bootstrap=info,appconfig_shared=info")),
        )
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .init();

    let config = FetchConfig::from_env()?;
    info!(
        "Serving {}/{}/{} from {}:{} ({} mode)",
        config.target.application,
        config.target.environment,
        config.target.configuration,
        config.endpoint.host,
        config.endpoint.port,
        config.mode,
    );

    let handler = Handler::new(ConfigFetcher::new()?, config);
    let handler = &handler;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler.handle(event).await
    }))
    .await
}
