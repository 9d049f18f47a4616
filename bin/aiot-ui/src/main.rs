//! ---
//! aiot_section: "12-operator-panel"
//! aiot_subsection: "binary"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Terminal simulation panel."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use aiot_client::{ClientError, HttpPredictionClient, PredictionService};
use aiot_common::{init_tracing, AppConfig, DEFAULT_CONFIG_PATH};
use aiot_panel::{
    render, BadgeTone, PanelView, PointLabel, RenderSettings, ScoreTone, SimulationPanel,
};
use aiot_sim::{PredictionResult, Regime, TimeSeriesGenerator};
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::{Frame, Terminal};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

const TITLE: &str = "AIoT power anomaly simulator";
const INTRO: &str = "Send a simulated household power stream to the detection service \
and inspect how it scores each reading.";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Send simulated power streams to the anomaly detector from a terminal panel"
)]
struct Cli {
    /// Configuration file (falls back to configs/aiot-sim.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Base URL of the detection service, overriding the configuration file
    #[arg(long, env = "AIOT_SIM_BASE_URL")]
    base_url: Option<String>,
    /// Seed for reproducible streams
    #[arg(long)]
    seed: Option<u64>,
    /// Redraw interval in milliseconds
    #[arg(long, default_value_t = 250)]
    refresh: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Send(Regime),
    Quit,
}

fn action_for(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('1') => {
            Some(Action::Send(Regime::Normal))
        }
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('2') => {
            Some(Action::Send(Regime::Anomalous))
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

type Outcome = Result<PredictionResult, ClientError>;

struct App {
    panel: SimulationPanel,
    settings: RenderSettings,
    client: Arc<HttpPredictionClient>,
    runtime: Runtime,
    outcome_tx: UnboundedSender<Outcome>,
    outcome_rx: UnboundedReceiver<Outcome>,
}

impl App {
    fn new(config: &AppConfig, runtime: Runtime) -> Result<Self> {
        let client = HttpPredictionClient::new(&config.backend)
            .context("failed to build the prediction client")?;
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Ok(Self {
            panel: SimulationPanel::new(TimeSeriesGenerator::new(config.simulation.seed)),
            settings: RenderSettings::from(&config.display),
            client: Arc::new(client),
            runtime,
            outcome_tx,
            outcome_rx,
        })
    }

    fn send(&mut self, regime: Regime) {
        let Some(request) = self.panel.begin(regime) else {
            return;
        };
        let client = Arc::clone(&self.client);
        let tx = self.outcome_tx.clone();
        self.runtime.spawn(async move {
            let outcome = client.predict(&request).await;
            // the receiver only goes away on shutdown
            let _ = tx.send(outcome);
        });
    }

    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.panel.complete(outcome);
        }
    }

    fn endpoint(&self) -> String {
        self.client.endpoint().to_string()
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = AppConfig::load(&candidates)?;
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    if cli.seed.is_some() {
        config.simulation.seed = cli.seed;
    }
    // the terminal owns stdout and stderr
    config.logging.console = false;
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing("aiot-ui", &config.logging)?;
    let runtime = Runtime::new().context("failed to start the async runtime")?;
    let mut app = App::new(&config, runtime)?;
    info!(endpoint = %app.endpoint(), "terminal panel starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let result = run_app(&mut terminal, &mut app, Duration::from_millis(cli.refresh.max(50)));
    cleanup_terminal(&mut terminal)?;
    if let Err(err) = result {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
    info!("terminal panel stopped");
    Ok(())
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let endpoint = app.endpoint();
    loop {
        app.drain_outcomes();
        let view = render(app.panel.state(), &app.settings);
        terminal.draw(|frame| draw_ui(frame, &view, &endpoint))?;
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if handle_input(app, key) {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match action_for(key.code) {
        Some(Action::Quit) => return true,
        Some(Action::Send(regime)) => app.send(regime),
        None => {}
    }
    false
}

fn badge_style(tone: BadgeTone) -> Style {
    match tone {
        BadgeTone::Alert => Style::default()
            .bg(Color::Red)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        BadgeTone::Ok => Style::default()
            .bg(Color::Green)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
        BadgeTone::Neutral => Style::default().bg(Color::DarkGray).fg(Color::White),
    }
}

fn score_style(tone: ScoreTone) -> Style {
    match tone {
        ScoreTone::Low => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ScoreTone::Ok => Style::default().fg(Color::Green),
    }
}

fn draw_ui(frame: &mut Frame, view: &PanelView, endpoint: &str) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let intro = Paragraph::new(vec![
        Line::from(INTRO),
        Line::from(Span::styled(
            format!("Endpoint: {endpoint}"),
            Style::default().fg(Color::Gray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(TITLE, Style::default().fg(Color::Cyan))),
    );
    frame.render_widget(intro, layout[0]);

    let mut actions = Vec::new();
    for (key, action) in ["n", "a"].into_iter().zip(&view.actions) {
        let style = if action.enabled {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        actions.push(Span::styled(format!("[{key}] {}", action.label), style));
        actions.push(Span::raw("    "));
    }
    let actions = Paragraph::new(Line::from(actions))
        .block(Block::default().borders(Borders::ALL).title("Actions"));
    frame.render_widget(actions, layout[1]);

    let score = match &view.score {
        Some(score) => Span::styled(score.text.clone(), score_style(score.tone)),
        None => Span::styled("--", Style::default().fg(Color::Gray)),
    };
    let results = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(format!(" {} ", view.badge.text), badge_style(view.badge.tone)),
        ]),
        Line::from(vec![Span::raw("Average anomaly score: "), score]),
        Line::from(view.message.as_str()),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Result"));
    frame.render_widget(results, layout[2]);

    let preview_block = Block::default()
        .borders(Borders::ALL)
        .title("Submitted data preview");
    if view.rows.is_empty() {
        let empty = Paragraph::new("(no scored preview)")
            .style(Style::default().fg(Color::Gray))
            .block(preview_block);
        frame.render_widget(empty, layout[3]);
    } else {
        let rows: Vec<Row> = view
            .rows
            .iter()
            .map(|row| {
                let score = match &row.score {
                    Some(score) => Cell::from(Span::styled(score.text.clone(), score_style(score.tone))),
                    None => Cell::from(row.score_text().to_owned()),
                };
                let label_style = match row.label {
                    PointLabel::Anomalous => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    PointLabel::Normal => Style::default().fg(Color::Green),
                };
                Row::new(vec![
                    Cell::from(row.timestamp.clone()),
                    Cell::from(row.power.clone()),
                    score,
                    Cell::from(Span::styled(row.label.as_str(), label_style)),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(21),
            Constraint::Length(12),
            Constraint::Length(15),
            Constraint::Min(10),
        ];
        let table = Table::new(rows, widths)
            .header(
                Row::new(vec!["Timestamp", "Power (kW)", "Anomaly score", "Label"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .block(preview_block);
        frame.render_widget(table, layout[3]);
    }

    let help = Paragraph::new("n/1 send normal  a/2 send anomalous  q quit")
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(help, layout[4]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(action_for(KeyCode::Char('n')), Some(Action::Send(Regime::Normal)));
        assert_eq!(action_for(KeyCode::Char('1')), Some(Action::Send(Regime::Normal)));
        assert_eq!(
            action_for(KeyCode::Char('a')),
            Some(Action::Send(Regime::Anomalous))
        );
        assert_eq!(
            action_for(KeyCode::Char('2')),
            Some(Action::Send(Regime::Anomalous))
        );
        assert_eq!(action_for(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(action_for(KeyCode::Char('x')), None);
    }

    #[test]
    fn base_url_flag_overrides_config() {
        let cli = Cli::try_parse_from([
            "aiot-ui",
            "--config",
            "does/not/exist.toml",
            "--base-url",
            "http://10.0.0.5:9000",
            "--seed",
            "4",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.backend.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.simulation.seed, Some(4));
        assert!(!config.logging.console);
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        let cli = Cli::try_parse_from(["aiot-ui", "--base-url", "not a url"]).unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn alert_badge_is_red() {
        assert_eq!(badge_style(BadgeTone::Alert).bg, Some(Color::Red));
        assert_eq!(badge_style(BadgeTone::Ok).bg, Some(Color::Green));
        assert_eq!(score_style(ScoreTone::Low).fg, Some(Color::Red));
    }
}
