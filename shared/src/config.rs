//! Fetch configuration
//!
//! Everything a fetch needs is read from the environment once, validated,
//! and then passed explicitly into each call.

use std::collections::HashMap;
use std::env::VarError;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Configuration application identifier
pub const ENV_APP: &str = "CONFIG_APP";
/// Configuration environment identifier
pub const ENV_ENV: &str = "CONFIG_ENV";
/// Configuration profile identifier
pub const ENV_NAME: &str = "CONFIG_NAME";
/// Output shape selector (`raw` or `envelope`)
pub const ENV_MODE: &str = "CONFIG_RESPONSE_MODE";
/// Port the AppConfig sidecar listens on
pub const ENV_PORT: &str = "AWS_APPCONFIG_EXTENSION_HTTP_PORT";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 2772;

/// Which configuration document to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTarget {
    pub application: String,
    pub environment: String,
    pub configuration: String,
}

impl ConfigTarget {
    pub fn new(
        application: impl Into<String>,
        environment: impl Into<String>,
        configuration: impl Into<String>,
    ) -> Result<Self> {
        let target = Self {
            application: application.into(),
            environment: environment.into(),
            configuration: configuration.into(),
        };
        target.validate()?;
        Ok(target)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            (ENV_APP, &self.application),
            (ENV_ENV, &self.environment),
            (ENV_NAME, &self.configuration),
        ] {
            if value.is_empty() {
                return Err(Error::EmptyVar(key));
            }
        }
        Ok(())
    }
}

/// Where the configuration sidecar listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarEndpoint {
    pub host: String,
    pub port: u16,
}

impl Default for SidecarEndpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Shape of the value returned to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseMode {
    /// Upstream body, verbatim
    Raw,
    /// Gateway envelope with body, headers and status code
    #[default]
    Envelope,
}

impl FromStr for ResponseMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(ResponseMode::Raw),
            "envelope" => Ok(ResponseMode::Envelope),
            _ => Err(Error::InvalidVar {
                name: ENV_MODE,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseMode::Raw => f.write_str("raw"),
            ResponseMode::Envelope => f.write_str("envelope"),
        }
    }
}

/// Validated configuration for a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub target: ConfigTarget,
    pub endpoint: SidecarEndpoint,
    pub mode: ResponseMode,
}

impl FetchConfig {
    pub fn new(target: ConfigTarget, endpoint: SidecarEndpoint, mode: ResponseMode) -> Self {
        Self {
            target,
            endpoint,
            mode,
        }
    }

    /// Load configuration from the process environment.
    ///
    /// Only the recognised keys are read; other variables may hold any bytes.
    pub fn from_env() -> Result<Self> {
        let mut vars = Vec::new();
        for key in [ENV_APP, ENV_ENV, ENV_NAME, ENV_PORT, ENV_MODE] {
            match std::env::var(key) {
                Ok(value) => vars.push((key, value)),
                Err(VarError::NotPresent) => {}
                Err(VarError::NotUnicode(value)) => {
                    return Err(Error::InvalidVar {
                        name: key,
                        value: value.to_string_lossy().into_owned(),
                    })
                }
            }
        }
        Self::from_vars(vars)
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut required = |key: &'static str| vars.remove(key).ok_or(Error::MissingVar(key));
        let application = required(ENV_APP)?;
        let environment = required(ENV_ENV)?;
        let configuration = required(ENV_NAME)?;
        let target = ConfigTarget::new(application, environment, configuration)?;

        let mut endpoint = SidecarEndpoint::default();
        if let Some(port) = vars.get(ENV_PORT) {
            endpoint.port = port.trim().parse().map_err(|_| Error::InvalidVar {
                name: ENV_PORT,
                value: port.clone(),
            })?;
        }

        let mode = match vars.get(ENV_MODE) {
            Some(mode) if !mode.trim().is_empty() => mode.parse()?,
            _ => ResponseMode::default(),
        };

        Ok(Self::new(target, endpoint, mode))
    }
}
