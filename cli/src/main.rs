use anyhow::{Context, Result};
use appconfig_shared::config::{DEFAULT_HOST, DEFAULT_PORT, ENV_APP, ENV_ENV, ENV_NAME, ENV_PORT};
use appconfig_shared::{
    ConfigFetcher, ConfigTarget, Error, FetchConfig, FetchOutput, ResponseMode, SidecarEndpoint,
};
use clap::{Parser, ValueEnum};
use std::io::Write;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "appconfig-fetch")]
#[command(version = "0.1.0")]
#[command(about = "Fetch a configuration document from the local AppConfig sidecar", long_about = None)]
struct Cli {
    /// Configuration application
    #[arg(long, env = ENV_APP)]
    app: String,

    /// Configuration environment
    #[arg(long, env = ENV_ENV)]
    env: String,

    /// Configuration profile
    #[arg(long, env = ENV_NAME)]
    name: String,

    /// Sidecar host
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Sidecar port
    #[arg(long, env = ENV_PORT, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Output shape
    #[arg(short, long, value_enum, default_value_t = Mode::Envelope)]
    mode: Mode,

    /// Print only this top-level property of the JSON document
    #[arg(short, long)]
    prop: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Raw,
    Envelope,
}

impl From<Mode> for ResponseMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Raw => ResponseMode::Raw,
            Mode::Envelope => ResponseMode::Envelope,
        }
    }
}

impl Cli {
    fn fetch_config(&self) -> Result<FetchConfig> {
        let endpoint = SidecarEndpoint {
            host: self.host.clone(),
            port: self.port,
        };
        let target = ConfigTarget::new(self.app.as_str(), self.env.as_str(), self.name.as_str())
            .map_err(|e| describe(e, &endpoint))?;
        // Property lookup needs the upstream status
        let mode = match self.prop {
            Some(_) => ResponseMode::Envelope,
            None => self.mode.into(),
        };
        Ok(FetchConfig::new(target, endpoint, mode))
    }
}

/// Attach a hint matching the error family
fn describe(err: Error, endpoint: &SidecarEndpoint) -> anyhow::Error {
    let hint = if err.is_configuration() {
        "Invalid configuration target".to_string()
    } else if err.is_transport() {
        format!(
            "Sidecar at {}:{} did not serve the configuration",
            endpoint.host, endpoint.port
        )
    } else {
        "Configuration document is unusable".to_string()
    };
    anyhow::Error::new(err).context(hint)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.fetch_config()?;
    info!("Fetching from {}:{}", config.endpoint.host, config.endpoint.port);

    let fetcher = ConfigFetcher::new().context("Failed to build HTTP client")?;
    let output = fetcher
        .fetch(&config)
        .await
        .map_err(|e| describe(e, &config.endpoint))?;

    let mut stdout = std::io::stdout().lock();
    match (&cli.prop, &output) {
        (Some(key), FetchOutput::Envelope(envelope)) => {
            let value = envelope
                .property(key)
                .map_err(|e| describe(e, &config.endpoint))?;
            serde_json::to_writer_pretty(&mut stdout, &value)?;
            writeln!(stdout)?;
        }
        (_, FetchOutput::Raw(_)) => stdout.write_all(output.body())?,
        (None, FetchOutput::Envelope(_)) => {
            serde_json::to_writer_pretty(&mut stdout, &output)?;
            writeln!(stdout)?;
        }
    }
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "appconfig-fetch",
            "--app", "app1",
            "--env", "prod",
            "--name", "Flags",
            "--port", "2999",
            "--mode", "raw",
        ])
        .unwrap();
        let config = cli.fetch_config().unwrap();
        assert_eq!(config.target.application, "app1");
        assert_eq!(config.endpoint.host, "localhost");
        assert_eq!(config.endpoint.port, 2999);
        assert_eq!(config.mode, ResponseMode::Raw);
    }

    #[test]
    fn test_empty_target_rejected() {
        let cli = Cli::try_parse_from([
            "appconfig-fetch",
            "--app", "",
            "--env", "prod",
            "--name", "Flags",
        ])
        .unwrap();
        assert!(cli.fetch_config().is_err());
    }

    #[test]
    fn test_prop_forces_envelope() {
        let cli = Cli::try_parse_from([
            "appconfig-fetch",
            "--app", "app1",
            "--env", "prod",
            "--name", "Env",
            "--mode", "raw",
            "--prop", "apiUrl",
        ])
        .unwrap();
        assert_eq!(cli.prop.as_deref(), Some("apiUrl"));
        assert_eq!(cli.fetch_config().unwrap().mode, ResponseMode::Envelope);
    }

    #[test]
    fn test_describe_by_family() {
        let endpoint = SidecarEndpoint::default();

        let err = describe(Error::UpstreamStatus(404), &endpoint);
        assert_eq!(err.to_string(), "Sidecar at localhost:2772 did not serve the configuration");

        let err = describe(Error::EmptyVar("CONFIG_APP"), &endpoint);
        assert_eq!(err.to_string(), "Invalid configuration target");

        let err = describe(Error::MissingProperty("apiUrl".into()), &endpoint);
        assert_eq!(err.to_string(), "Configuration document is unusable");
        assert!(format!("{:#}", err).contains("no property \"apiUrl\""));
    }
}
