//! ---
//! aiot_section: "12-operator-panel"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Panel view state and its transitions."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use aiot_sim::{PredictionResult, ScoredPoint};
use tracing::warn;

pub const INITIAL_STATUS: &str = "Waiting for a run...";
pub const INITIAL_MESSAGE: &str = "Send a normal or an anomalous data stream.";
pub const SUBMITTING_STATUS: &str = "Sending data, waiting for the AI prediction...";
pub const ERROR_STATUS: &str = "Error";
pub const ERROR_MESSAGE: &str = "The API call failed. Check that the backend service is running \
and reachable at the configured address, and that it accepts cross-origin requests from this client.";

/// Lifecycle of the panel: `Idle -> Submitting -> Succeeded | Failed -> Submitting ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Everything the panel renders. Overwritten by every submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub status: String,
    pub score: Option<f64>,
    pub message: String,
    pub phase: Phase,
    /// Backend-annotated preview of the last submission.
    pub last_data: Vec<ScoredPoint>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            status: INITIAL_STATUS.to_owned(),
            score: None,
            message: INITIAL_MESSAGE.to_owned(),
            phase: Phase::Idle,
            last_data: Vec::new(),
        }
    }
}

impl ViewState {
    pub fn loading(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Both action controls share this flag.
    pub fn controls_enabled(&self) -> bool {
        !self.loading()
    }

    pub(crate) fn start_submission(&mut self) {
        self.phase = Phase::Submitting;
        self.status = SUBMITTING_STATUS.to_owned();
        self.message.clear();
    }

    pub(crate) fn apply_result(&mut self, result: PredictionResult) {
        match result.submitted_data_preview {
            Some(preview) => self.last_data = preview,
            None => {
                warn!(
                    field = "submitted_data_preview",
                    "prediction response is missing the scored preview; clearing preview table"
                );
                self.last_data.clear();
            }
        }
        self.status = result.status;
        self.score = Some(result.average_anomaly_score);
        self.message = result.message;
        self.phase = Phase::Succeeded;
    }

    /// The preview of the previous successful run is left in place.
    pub(crate) fn apply_failure(&mut self) {
        self.status = ERROR_STATUS.to_owned();
        self.score = None;
        self.message = ERROR_MESSAGE.to_owned();
        self.phase = Phase::Failed;
    }
}
