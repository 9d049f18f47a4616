//! ---
//! aiot_section: "05-networking-external-interfaces"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Prediction service seam and HTTP implementation."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
//! Client side of the anomaly-detection service. The panel only depends on
//! [`PredictionService`]; [`HttpPredictionClient`] is the production
//! implementation.

use aiot_sim::{PredictionResult, SimulationRequest};
use async_trait::async_trait;

pub mod error;
pub mod http;

pub use error::ClientError;
pub use http::HttpPredictionClient;

/// Submits a simulated series and returns the service's verdict.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(
        &self,
        request: &SimulationRequest,
    ) -> Result<PredictionResult, ClientError>;
}
