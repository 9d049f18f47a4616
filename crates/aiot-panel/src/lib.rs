//! ---
//! aiot_section: "12-operator-panel"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Simulation panel exports."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
//! The simulation panel: view state, the controller that drives one
//! submission cycle, and a front-end agnostic rendering of the result.

pub mod panel;
pub mod render;
pub mod state;

pub use panel::SimulationPanel;
pub use render::{
    action_label, format_power, format_score, format_timestamp, render, ActionView, BadgeTone,
    PanelView, PointLabel, PreviewRow, RenderSettings, ScoreTone, ScoreView, StatusBadge,
    LOADING_LABEL, MISSING_SCORE, TIMESTAMP_FORMAT,
};
pub use state::{
    Phase, ViewState, ERROR_MESSAGE, ERROR_STATUS, INITIAL_MESSAGE, INITIAL_STATUS,
    SUBMITTING_STATUS,
};
