// THEORY:
// `SignalFxSink` is the HTTP implementation of the core `MetricSink`. It owns one
// `reqwest::Client` carrying the token header, user agent and timeout, and hands
// out `SignalFxSession`s that share it.
//
// A session buffers datapoints and posts a batch whenever `batch_size` of them
// are waiting, then posts the remainder on `close`. A batch is taken out of the
// buffer before it is sent, so a failed batch is dropped rather than re-sent by
// the final flush. Nothing here retries.

use crate::config::IngestConfig;
use crate::protocol::{Datapoint, DatapointUpload};
use imgmap::core_modules::sink::{MetricSink, Session};
use imgmap::pipeline::LabeledSample;
use imgmap::{ImgMapError, ImgMapResult};
use log::debug;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

const TOKEN_HEADER: &str = "x-sf-token";

/// Delivers samples to a SignalFx-compatible ingest endpoint.
#[derive(Debug, Clone)]
pub struct SignalFxSink {
    client: reqwest::Client,
    datapoint_url: Url,
    batch_size: usize,
}

impl SignalFxSink {
    pub fn new(config: IngestConfig) -> ImgMapResult<Self> {
        Self::with_client_builder(config, reqwest::Client::builder())
    }

    /// Like [`SignalFxSink::new`], starting from a caller-prepared builder (proxy or
    /// TLS settings). Token, user agent and timeout are applied on top.
    pub fn with_client_builder(config: IngestConfig, builder: reqwest::ClientBuilder) -> ImgMapResult<Self> {
        let mut token = HeaderValue::from_str(&config.token)
            .map_err(|_| ImgMapError::Configuration("Token contains characters not allowed in a header".into()))?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(TOKEN_HEADER), token);

        let client = builder
            .default_headers(headers)
            .user_agent(config.sender.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|err| ImgMapError::Configuration(format!("Could not build the HTTP client: {err}")))?;

        Ok(Self {
            datapoint_url: config.datapoint_url()?,
            batch_size: config.batch_size.max(1),
            client,
        })
    }
}

impl MetricSink for SignalFxSink {
    type Session = SignalFxSession;

    async fn create_session(&self) -> ImgMapResult<SignalFxSession> {
        Ok(SignalFxSession {
            client: self.client.clone(),
            datapoint_url: self.datapoint_url.clone(),
            batch_size: self.batch_size,
            pending: Vec::new(),
            batches_sent: 0,
            datapoints_sent: 0,
        })
    }
}

/// One run's worth of buffered datapoints.
pub struct SignalFxSession {
    client: reqwest::Client,
    datapoint_url: Url,
    batch_size: usize,
    /// Datapoints waiting for the next request.
    pending: Vec<Datapoint>,
    batches_sent: u64,
    datapoints_sent: u64,
}

impl SignalFxSession {
    async fn flush(&mut self) -> ImgMapResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let upload = DatapointUpload {
            gauge: std::mem::take(&mut self.pending),
        };
        let count = upload.gauge.len();

        let response = self
            .client
            .post(self.datapoint_url.clone())
            .json(&upload)
            .send()
            .await
            .map_err(|err| ImgMapError::Transmission(Box::new(err)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImgMapError::Transmission(
                format!("ingest endpoint answered {status}: {}", body.trim()).into(),
            ));
        }

        self.batches_sent += 1;
        self.datapoints_sent += count as u64;
        debug!(
            "Sent batch {} ({} datapoints, {} total)",
            self.batches_sent, count, self.datapoints_sent
        );
        Ok(())
    }
}

impl Session for SignalFxSession {
    async fn submit(&mut self, sample: LabeledSample) -> ImgMapResult<()> {
        self.pending.push(Datapoint::from(sample));
        if self.pending.len() >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    async fn close(mut self) -> ImgMapResult<()> {
        self.flush().await
    }
}
