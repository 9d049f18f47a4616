//! ---
//! aiot_section: "12-operator-panel"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Pure projection of the view state into displayable text and tones."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use aiot_common::{DisplayConfig, DisplayTimezone};
use aiot_sim::{Regime, ScoredPoint};
use chrono::{DateTime, Local, Utc};

use crate::state::ViewState;

pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
pub const LOADING_LABEL: &str = "Loading...";
pub const MISSING_SCORE: &str = "--";

/// Display knobs taken from the `[display]` configuration section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub timezone: DisplayTimezone,
    pub score_alert_threshold: f64,
    pub point_alert_threshold: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for RenderSettings {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            timezone: config.timezone,
            score_alert_threshold: config.score_alert_threshold,
            point_alert_threshold: config.point_alert_threshold,
        }
    }
}

/// Badge colouring, keyed off the literal status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Alert,
    Ok,
    Neutral,
}

impl BadgeTone {
    pub fn for_status(status: &str) -> Self {
        match status {
            "Warning" => BadgeTone::Alert,
            "Normal" => BadgeTone::Ok,
            _ => BadgeTone::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTone {
    /// Below the alert threshold: lower scores are more anomalous.
    Low,
    Ok,
}

impl ScoreTone {
    fn classify(score: f64, threshold: f64) -> Self {
        if score < threshold {
            ScoreTone::Low
        } else {
            ScoreTone::Ok
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLabel {
    Anomalous,
    Normal,
}

impl PointLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointLabel::Anomalous => "Anomalous",
            PointLabel::Normal => "Normal",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusBadge {
    pub text: String,
    pub tone: BadgeTone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreView {
    pub text: String,
    pub tone: ScoreTone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionView {
    pub regime: Regime,
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRow {
    pub timestamp: String,
    pub power: String,
    pub score: Option<ScoreView>,
    pub label: PointLabel,
}

impl PreviewRow {
    pub fn score_text(&self) -> &str {
        self.score.as_ref().map_or(MISSING_SCORE, |s| s.text.as_str())
    }
}

/// Everything a front end needs to draw the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub badge: StatusBadge,
    pub score: Option<ScoreView>,
    pub message: String,
    pub actions: [ActionView; 2],
    pub rows: Vec<PreviewRow>,
}

/// Four decimals, whatever the magnitude.
pub fn format_score(score: f64) -> String {
    format!("{score:.4}")
}

pub fn format_power(power_kw: f64) -> String {
    format!("{power_kw:.2}")
}

pub fn format_timestamp(timestamp: DateTime<Utc>, timezone: DisplayTimezone) -> String {
    match timezone {
        DisplayTimezone::Local => timestamp
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        DisplayTimezone::Utc => timestamp.format(TIMESTAMP_FORMAT).to_string(),
    }
}

pub fn action_label(regime: Regime) -> &'static str {
    match regime {
        Regime::Normal => "Send normal data (low power)",
        Regime::Anomalous => "Send anomalous data (high power)",
    }
}

pub fn render(state: &ViewState, settings: &RenderSettings) -> PanelView {
    let enabled = state.controls_enabled();
    let show_loading = state.loading() && state.last_data.is_empty();
    let action = |regime| ActionView {
        regime,
        label: if show_loading {
            LOADING_LABEL
        } else {
            action_label(regime)
        },
        enabled,
    };

    PanelView {
        badge: StatusBadge {
            text: state.status.clone(),
            tone: BadgeTone::for_status(&state.status),
        },
        score: state.score.map(|score| ScoreView {
            text: format_score(score),
            tone: ScoreTone::classify(score, settings.score_alert_threshold),
        }),
        message: state.message.clone(),
        actions: [action(Regime::Normal), action(Regime::Anomalous)],
        rows: state
            .last_data
            .iter()
            .map(|point| preview_row(point, settings))
            .collect(),
    }
}

fn preview_row(point: &ScoredPoint, settings: &RenderSettings) -> PreviewRow {
    PreviewRow {
        timestamp: format_timestamp(point.timestamp, settings.timezone),
        power: format_power(point.power_kw),
        score: point.anomaly_score.map(|score| ScoreView {
            text: format_score(score),
            tone: ScoreTone::classify(score, settings.point_alert_threshold),
        }),
        label: if point.is_anomalous() {
            PointLabel::Anomalous
        } else {
            PointLabel::Normal
        },
    }
}
