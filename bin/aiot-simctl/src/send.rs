//! ---
//! aiot_section: "05-networking-external-interfaces"
//! aiot_subsection: "binary"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Headless submission and request preview commands."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use std::io::{self, Write};

use aiot_client::{HttpPredictionClient, PredictionService};
use aiot_common::AppConfig;
use aiot_panel::{render, PanelView, Phase, RenderSettings, SimulationPanel};
use aiot_sim::{PredictionResult, Regime, TimeSeriesGenerator};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use tokio::runtime::Runtime;

use crate::RegimeArg;

#[derive(Debug, Args)]
pub struct SendOptions {
    /// Which power regime to simulate
    #[arg(long, value_enum)]
    pub regime: RegimeArg,
    /// Print the raw service response as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct GenerateOptions {
    /// Which power regime to simulate
    #[arg(long, value_enum)]
    pub regime: RegimeArg,
    /// Seed overriding `simulation.seed`
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Execute one submission cycle and report it. Fails when the request failed.
pub fn run(options: &SendOptions, config: &AppConfig) -> Result<()> {
    let client = HttpPredictionClient::new(&config.backend)?;
    let mut panel = SimulationPanel::new(TimeSeriesGenerator::new(config.simulation.seed));
    let runtime = Runtime::new()?;
    let raw = runtime.block_on(send_once(&mut panel, &client, options.regime.into()));

    let mut stdout = io::stdout().lock();
    if options.json {
        let value = match &raw {
            Some(result) => serde_json::to_value(result)?,
            None => serde_json::json!({
                "status": panel.state().status,
                "message": panel.state().message,
            }),
        };
        serde_json::to_writer_pretty(&mut stdout, &value)?;
        stdout.write_all(b"\n")?;
    } else {
        let view = render(panel.state(), &RenderSettings::from(&config.display));
        stdout.write_all(format_view(&view).as_bytes())?;
    }
    stdout.flush()?;

    if panel.state().phase == Phase::Failed {
        return Err(anyhow!(
            "prediction request to {} failed",
            client.endpoint()
        ));
    }
    Ok(())
}

/// Run a cycle through the panel, handing back the raw response on success.
pub(crate) async fn send_once<S>(
    panel: &mut SimulationPanel,
    service: &S,
    regime: Regime,
) -> Option<PredictionResult>
where
    S: PredictionService + ?Sized,
{
    let request = panel.begin(regime)?;
    let outcome = service.predict(&request).await;
    let raw = outcome.as_ref().ok().cloned();
    panel.complete(outcome);
    raw
}

pub fn generate(options: &GenerateOptions, config: &AppConfig) -> Result<()> {
    let seed = options.seed.or(config.simulation.seed);
    let request = TimeSeriesGenerator::new(seed).generate(options.regime.into());
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &request)
        .context("failed to encode the simulated request")?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Plain-text rendering of the panel for terminals without the UI.
pub(crate) fn format_view(view: &PanelView) -> String {
    let score = view.score.as_ref().map_or("--", |s| s.text.as_str());
    let mut out = format!(
        "Status:  {}\nScore:   {score}\nMessage: {}\n",
        view.badge.text, view.message
    );
    if !view.rows.is_empty() {
        out.push_str(&format!(
            "\n{:<21} {:>10} {:>14}  Label\n",
            "Timestamp", "Power (kW)", "Anomaly score"
        ));
        for row in &view.rows {
            out.push_str(&format!(
                "{:<21} {:>10} {:>14}  {}\n",
                row.timestamp,
                row.power,
                row.score_text(),
                row.label.as_str()
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiot_client::ClientError;
    use aiot_common::DisplayTimezone;
    use aiot_panel::ERROR_STATUS;
    use aiot_sim::{ScoredPoint, SimulationRequest};
    use async_trait::async_trait;

    struct FlagEverything;

    #[async_trait]
    impl PredictionService for FlagEverything {
        async fn predict(
            &self,
            request: &SimulationRequest,
        ) -> std::result::Result<PredictionResult, ClientError> {
            Ok(PredictionResult {
                status: "Warning".to_owned(),
                average_anomaly_score: -0.08,
                message: "high draw detected".to_owned(),
                submitted_data_preview: Some(
                    request
                        .time_series
                        .iter()
                        .cloned()
                        .map(|point| ScoredPoint {
                            anomaly_score: Some(-0.08),
                            is_anomaly: Some(-1),
                            ..ScoredPoint::from(point)
                        })
                        .collect(),
                ),
            })
        }
    }

    struct Offline;

    #[async_trait]
    impl PredictionService for Offline {
        async fn predict(
            &self,
            _request: &SimulationRequest,
        ) -> std::result::Result<PredictionResult, ClientError> {
            Err(ClientError::InvalidEndpoint("offline".to_owned()))
        }
    }

    fn utc() -> RenderSettings {
        RenderSettings {
            timezone: DisplayTimezone::Utc,
            ..RenderSettings::default()
        }
    }

    #[tokio::test]
    async fn send_once_returns_raw_result_and_renders_table() {
        let mut panel = SimulationPanel::new(TimeSeriesGenerator::new(Some(8)));
        let raw = send_once(&mut panel, &FlagEverything, Regime::Anomalous)
            .await
            .unwrap();
        assert_eq!(raw.status, "Warning");

        let text = format_view(&render(panel.state(), &utc()));
        assert!(text.contains("Status:  Warning"), "{text}");
        assert!(text.contains("Score:   -0.0800"), "{text}");
        assert_eq!(text.matches("Anomalous").count(), 3, "{text}");

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8, "{text}");
        assert_eq!(lines[3], "");
        assert_eq!(
            lines[4],
            format!("{:<21} {:>10} {:>14}  Label", "Timestamp", "Power (kW)", "Anomaly score")
        );
        assert!(lines[5].ends_with("  Anomalous"), "{text}");
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn failed_send_reports_error_without_table() {
        let mut panel = SimulationPanel::new(TimeSeriesGenerator::new(Some(8)));
        assert!(send_once(&mut panel, &Offline, Regime::Normal).await.is_none());
        assert_eq!(panel.state().phase, Phase::Failed);

        let text = format_view(&render(panel.state(), &utc()));
        assert!(text.starts_with(&format!("Status:  {ERROR_STATUS}")), "{text}");
        assert!(text.contains("Score:   --"), "{text}");
        assert!(!text.contains("Timestamp"), "{text}");
    }
}
