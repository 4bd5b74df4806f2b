use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{SimulationRequest, SimulationResult},
    error::ClientError,
    protocol::{parse_simulation_result, SimulateRequestBody, SIMULATE_PATH},
};
use tracing::{info, warn};

pub mod controller;
pub mod export;
pub mod format;
pub mod request;
pub mod store;

pub use controller::{ResultView, SubmissionController, SubmissionState, SubmitError};
pub use export::{CsvExport, ExportError, EXPORT_FILE_NAME, EXPORT_MIME_TYPE};
pub use request::{build_request, RawSimulationInput};
pub use store::ResultStore;

/// The remote simulation engine. One call per `simulate`, no retries.
#[async_trait]
pub trait SimulationService: Send + Sync {
    async fn simulate(&self, request: SimulationRequest) -> Result<SimulationResult, ClientError>;
}

pub struct HttpSimulationClient {
    http: Client,
    base_url: String,
}

impl HttpSimulationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ClientError::transport(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, SIMULATE_PATH)
    }
}

#[async_trait]
impl SimulationService for HttpSimulationClient {
    async fn simulate(&self, request: SimulationRequest) -> Result<SimulationResult, ClientError> {
        let endpoint = self.endpoint();
        info!(
            %endpoint,
            risk_tolerance = %request.risk_tolerance,
            num_days = request.num_days,
            "submitting simulation request"
        );

        let res = self
            .http
            .post(&endpoint)
            .json(&SimulateRequestBody::from(&request))
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|err| {
                warn!(%endpoint, error = %err, "simulation request failed");
                ClientError::transport(describe_transport_error(&err))
            })?;

        let body = res.bytes().await.map_err(|err| {
            warn!(%endpoint, error = %err, "failed to read simulation response body");
            ClientError::transport(describe_transport_error(&err))
        })?;

        parse_simulation_result(&body).inspect_err(|err| {
            warn!(%endpoint, error = %err, "simulation response rejected");
        })
    }
}

fn normalize_base_url(raw: String) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if let Some(status) = err.status() {
        return format!("service responded with HTTP {status}");
    }
    if err.is_timeout() {
        return format!("request timed out: {err}");
    }
    if err.is_connect() {
        return format!("connection failed: {err}");
    }
    err.to_string()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
