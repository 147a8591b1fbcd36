//! AppConfig Fetch Shared Library
//!
//! Configuration, request/response types and the sidecar fetcher used by
//! both the Lambda function and the command-line tool.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod protocol;

pub use config::{ConfigTarget, FetchConfig, ResponseMode, SidecarEndpoint};
pub use error::{Error, Result};
pub use fetcher::ConfigFetcher;
pub use protocol::{ConfigRequest, ConfigResponse, FetchOutput, RawBody};
