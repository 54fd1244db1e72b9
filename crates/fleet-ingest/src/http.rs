//! `reqwest`-backed ingestion client.
//!
//! Each report is a JSON `POST` of a [`LocationReport`] to the configured
//! endpoint.  The client carries the `tracing::Span` it was constructed
//! with; every request runs inside a child `report` span so its events are
//! attributed to the owning simulation run.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{Instrument, Span};

use fleet_agent::LocationReport;
use fleet_core::SimConfig;

use crate::{IngestError, IngestResult, LocationSink, Outcome};

/// Stateless apart from its connection pool; clone or share freely.
#[derive(Clone, Debug)]
pub struct HttpIngestClient {
    client:   Client,
    endpoint: Url,
    span:     Span,
}

impl HttpIngestClient {
    /// Build a client that posts to `endpoint`, giving up on any request
    /// after `timeout`.
    ///
    /// # Errors
    ///
    /// [`IngestError::InvalidEndpoint`] if `endpoint` is not an `http` or
    /// `https` URL, [`IngestError::Client`] if the HTTP client cannot be
    /// initialised.
    pub fn new(endpoint: &str, timeout: Duration, span: Span) -> IngestResult<Self> {
        let url = Url::parse(endpoint).map_err(|e| IngestError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason:   e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(IngestError::InvalidEndpoint {
                endpoint: endpoint.to_owned(),
                reason:   format!("unsupported scheme {:?}", url.scheme()),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint: url, span })
    }

    /// Client for `config.endpoint` with `config.request_timeout()`.
    pub fn from_config(config: &SimConfig, span: Span) -> IngestResult<Self> {
        Self::new(&config.endpoint, config.request_timeout(), span)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LocationSink for HttpIngestClient {
    async fn report(&self, report: &LocationReport) -> Outcome {
        let span = tracing::debug_span!(
            parent: &self.span,
            "report",
            driver_id = %report.identity,
        );

        async {
            let result = self
                .client
                .post(self.endpoint.clone())
                .json(report)
                .send()
                .await;

            let resp = match result {
                Ok(resp) => resp,
                Err(e) if e.is_timeout() => return Outcome::failed("request timed out"),
                Err(e) => return Outcome::failed(e.to_string()),
            };

            // Read the body to the end so the connection goes back to the pool.
            let status = resp.status();
            if let Err(e) = resp.bytes().await {
                tracing::debug!(error = %e, "response body not read");
            }

            if status.is_success() {
                tracing::debug!(status = status.as_u16(), "acknowledged");
                Outcome::Delivered { status: status.as_u16() }
            } else {
                Outcome::failed(format!("HTTP {status}"))
            }
        }
        .instrument(span)
        .await
    }
}
