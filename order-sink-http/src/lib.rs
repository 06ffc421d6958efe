//! Order sink that POSTs the submission payload as JSON to an HTTP endpoint.
//!
//! By default the response is not inspected: once the request completes the
//! order counts as delivered, whatever the status code. Set
//! [`HttpSinkConfig::verify_status`] to treat non-2xx answers as rejections.

use std::time::Duration;

use async_trait::async_trait;
use order_core::models::SubmissionPayload;
use order_core::sink::{Delivery, OrderSink, SinkError};
use reqwest::{Client, Url};
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSinkConfig {
    pub url: String,
    pub verify_status: bool,
    pub timeout: Duration,
}

impl HttpSinkConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            verify_status: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct HttpOrderSink {
    client: Client,
    url: Url,
    verify_status: bool,
}

impl HttpOrderSink {
    pub fn new(config: &HttpSinkConfig) -> Result<Self, SinkError> {
        let raw = config.url.trim();
        if raw.is_empty() {
            return Err(SinkError::NotConfigured("no sink URL set".to_string()));
        }
        let url = Url::parse(raw)
            .map_err(|e| SinkError::NotConfigured(format!("invalid sink URL '{raw}': {e}")))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url,
            verify_status: config.verify_status,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl OrderSink for HttpOrderSink {
    async fn send(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<Delivery, SinkError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    SinkError::Encode(e.to_string())
                } else {
                    SinkError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        debug!(url = %self.url, status = status.as_u16(), "order sink answered");

        if !self.verify_status {
            return Ok(Delivery::Unverified);
        }
        if status.is_success() {
            Ok(Delivery::Confirmed {
                status: status.as_u16(),
            })
        } else {
            warn!(status = status.as_u16(), "order sink rejected the order");
            Err(SinkError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}
