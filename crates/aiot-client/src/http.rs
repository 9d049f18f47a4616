//! ---
//! aiot_section: "05-networking-external-interfaces"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "reqwest-backed prediction client."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use aiot_common::BackendConfig;
use aiot_sim::{PredictionResult, SimulationRequest};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, Result};
use crate::PredictionService;

/// Posts simulation requests to `{base_url}{endpoint}` and decodes the JSON answer.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    http: Client,
    endpoint: Url,
}

impl HttpPredictionClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let endpoint = config
            .prediction_url()
            .map_err(|err| ClientError::InvalidEndpoint(format!("{err:#}")))?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Build)?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn predict(&self, request: &SimulationRequest) -> Result<PredictionResult> {
        debug!(endpoint = %self.endpoint, points = request.time_series.len(), "submitting time series");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::status(status, &body));
        }
        let result: PredictionResult = serde_json::from_str(&body)?;
        info!(
            status = %result.status,
            score = result.average_anomaly_score,
            preview = result.submitted_data_preview.as_ref().map_or(0, Vec::len),
            "prediction received"
        );
        Ok(result)
    }
}
