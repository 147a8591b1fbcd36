//! Request and response types for sidecar communication.

use bytes::Bytes;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::config::{ConfigTarget, SidecarEndpoint};
use crate::error::{Error, Result};

/// Content type announced by the gateway envelope
pub const ENVELOPE_CONTENT_TYPE: &str = "application/json";

/// GET request for a single configuration document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRequest {
    url: String,
}

impl ConfigRequest {
    /// Identifiers are interpolated as-is, without percent-encoding.
    pub fn new(target: &ConfigTarget, endpoint: &SidecarEndpoint) -> Self {
        let url = format!(
            "http://{}:{}/applications/{}/environments/{}/configurations/{}",
            endpoint.host,
            endpoint.port,
            target.application,
            target.environment,
            target.configuration,
        );
        Self { url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Upstream body returned verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody(pub Bytes);

impl RawBody {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for RawBody {
    // JSON documents pass through without surrounding whitespace, anything
    // else becomes a string
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match serde_json::from_slice::<&RawValue>(&self.0) {
            Ok(raw) => raw.serialize(serializer),
            Err(_) => serialize_lossy(&self.0, serializer),
        }
    }
}

/// Headers attached to the gateway envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeHeaders {
    #[serde(rename = "Content-Type")]
    pub content_type: String,
}

impl Default for EnvelopeHeaders {
    fn default() -> Self {
        Self {
            content_type: ENVELOPE_CONTENT_TYPE.to_string(),
        }
    }
}

/// Gateway envelope wrapping the upstream response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    #[serde(serialize_with = "serialize_lossy")]
    pub body: Bytes,
    pub headers: EnvelopeHeaders,
    pub is_base64_encoded: bool,
    pub status_code: u16,
}

impl ConfigResponse {
    /// Header and encoding flag are fixed; only body and status come from upstream.
    pub fn new(body: Bytes, status_code: u16) -> Self {
        Self {
            body,
            headers: EnvelopeHeaders::default(),
            is_base64_encoded: false,
            status_code,
        }
    }

    /// Top-level property of a JSON object document, served with HTTP 200.
    pub fn property(&self, key: &str) -> Result<Value> {
        if self.status_code != 200 {
            return Err(Error::UpstreamStatus(self.status_code));
        }
        let mut document: Map<String, Value> = serde_json::from_slice(&self.body)?;
        document
            .remove(key)
            .ok_or_else(|| Error::MissingProperty(key.to_string()))
    }
}

/// Result of a single fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FetchOutput {
    Raw(RawBody),
    Envelope(ConfigResponse),
}

impl FetchOutput {
    pub fn body(&self) -> &[u8] {
        match self {
            FetchOutput::Raw(raw) => raw.as_bytes(),
            FetchOutput::Envelope(envelope) => &envelope.body,
        }
    }
}

fn serialize_lossy<S: Serializer>(
    body: &Bytes,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(body))
}
