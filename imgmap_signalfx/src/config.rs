// THEORY:
// The ingest endpoint, token and sender name used to be literals in code. They
// now come from the environment, read once at start-up into an `IngestConfig`.
// Parsing goes through a lookup function so tests can feed values without
// touching the process environment.

use imgmap::{ImgMapError, ImgMapResult};
use reqwest::Url;
use std::time::Duration;

pub const INGEST_URL_VAR: &str = "IMGMAP_INGEST_URL";
pub const TOKEN_VAR: &str = "IMGMAP_TOKEN";
pub const SENDER_VAR: &str = "IMGMAP_SENDER";
pub const BATCH_SIZE_VAR: &str = "IMGMAP_BATCH_SIZE";
pub const TIMEOUT_VAR: &str = "IMGMAP_TIMEOUT_SECS";

pub const DEFAULT_INGEST_URL: &str = "https://ingest.signalfx.com";
pub const DEFAULT_SENDER: &str = "PixelSender";
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DATAPOINT_PATH: &str = "v2/datapoint";

/// Where and how to deliver datapoints.
#[derive(Clone)]
pub struct IngestConfig {
    /// The ingest base URL, always ending in `/`.
    pub endpoint: Url,
    /// Access token sent with every request.
    pub token: String,
    /// Name this sender reports in its `User-Agent`.
    pub sender: String,
    /// Datapoints per request.
    pub batch_size: usize,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &"<redacted>")
            .field("sender", &self.sender)
            .field("batch_size", &self.batch_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl IngestConfig {
    /// Reads the configuration from `IMGMAP_*` environment variables.
    pub fn from_env() -> ImgMapResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Unset and blank values fall back
    /// to defaults, except the token which is required.
    pub fn from_lookup<F>(lookup: F) -> ImgMapResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let raw_url = value(INGEST_URL_VAR).unwrap_or_else(|| DEFAULT_INGEST_URL.to_string());
        let endpoint = parse_endpoint(&raw_url)?;

        let token = value(TOKEN_VAR)
            .ok_or_else(|| ImgMapError::Configuration(format!("{TOKEN_VAR} is not set")))?;
        let sender = value(SENDER_VAR).unwrap_or_else(|| DEFAULT_SENDER.to_string());

        let batch_size = match value(BATCH_SIZE_VAR) {
            Some(raw) => parse_positive(BATCH_SIZE_VAR, &raw)?,
            None => DEFAULT_BATCH_SIZE,
        };
        let timeout_secs = match value(TIMEOUT_VAR) {
            Some(raw) => parse_positive(TIMEOUT_VAR, &raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint,
            token,
            sender,
            batch_size,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// The URL datapoint batches are posted to.
    pub fn datapoint_url(&self) -> ImgMapResult<Url> {
        self.endpoint
            .join(DATAPOINT_PATH)
            .map_err(|err| ImgMapError::Configuration(format!("Bad ingest URL {}: {err}", self.endpoint)))
    }
}

fn parse_endpoint(raw: &str) -> ImgMapResult<Url> {
    let mut url = Url::parse(raw).map_err(|err| ImgMapError::Configuration(format!("Bad ingest URL {raw}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ImgMapError::Configuration(format!(
            "Bad ingest URL {raw}: scheme must be http or https"
        )));
    }
    // Without the trailing slash `join` would replace the last path segment.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_positive<T>(key: &str, raw: &str) -> ImgMapResult<T>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match raw.parse::<T>() {
        Ok(parsed) if parsed != T::default() => Ok(parsed),
        _ => Err(ImgMapError::Configuration(format!(
            "{key} must be a positive integer, got {raw:?}"
        ))),
    }
}
