//! ---
//! aiot_section: "12-operator-panel"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Submission controller driving one request/response cycle."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use aiot_client::{ClientError, PredictionService};
use aiot_sim::{PredictionResult, Regime, SimulationRequest, TimeSeriesGenerator};
use tracing::{debug, error, info};

use crate::state::ViewState;

/// Owns the view state and the stream generator.
///
/// A cycle is either driven in one go with [`SimulationPanel::submit`], or split
/// into [`SimulationPanel::begin`] and [`SimulationPanel::complete`] when the
/// caller needs to keep drawing while the request is in flight.
#[derive(Debug)]
pub struct SimulationPanel {
    state: ViewState,
    generator: TimeSeriesGenerator,
    in_flight: Option<Regime>,
}

impl SimulationPanel {
    pub fn new(generator: TimeSeriesGenerator) -> Self {
        Self {
            state: ViewState::default(),
            generator,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn controls_enabled(&self) -> bool {
        self.state.controls_enabled()
    }

    /// Enter the submitting phase and build the request to send.
    ///
    /// Returns `None` while a request is already in flight: the controls are
    /// disabled and the action is dropped.
    pub fn begin(&mut self, regime: Regime) -> Option<SimulationRequest> {
        if !self.controls_enabled() {
            debug!(%regime, "action ignored while a prediction is pending");
            return None;
        }
        self.state.start_submission();
        self.in_flight = Some(regime);
        let request = self.generator.generate(regime);
        info!(
            %regime,
            points = request.time_series.len(),
            power_kw = ?request.time_series.iter().map(|p| p.power_kw).collect::<Vec<_>>(),
            "submitting simulated stream"
        );
        Some(request)
    }

    /// Fold the outcome of the pending request into the view state.
    pub fn complete(&mut self, outcome: Result<PredictionResult, ClientError>) {
        let regime = self.in_flight.take();
        match outcome {
            Ok(result) => {
                info!(
                    event = "submission.completed",
                    outcome = "success",
                    regime = ?regime,
                    status = %result.status,
                    score = result.average_anomaly_score,
                    "prediction applied"
                );
                self.state.apply_result(result);
            }
            Err(err) => {
                error!(
                    event = "submission.completed",
                    outcome = "fault",
                    regime = ?regime,
                    error = %err,
                    "prediction request failed"
                );
                self.state.apply_failure();
            }
        }
    }

    /// Run a whole cycle against `service`. Returns `false` when the action was
    /// dropped because another request is pending.
    pub async fn submit<S>(&mut self, service: &S, regime: Regime) -> bool
    where
        S: PredictionService + ?Sized,
    {
        let Some(request) = self.begin(regime) else {
            return false;
        };
        let outcome = service.predict(&request).await;
        self.complete(outcome);
        true
    }
}
