//! ---
//! aiot_section: "05-networking-external-interfaces"
//! aiot_subsection: "binary"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Control CLI for the AIoT power simulator."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use std::path::PathBuf;

use aiot_common::{init_tracing, AppConfig, DEFAULT_CONFIG_PATH};
use aiot_sim::Regime;
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

mod dataset;
mod send;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "AIoT power simulator control utility",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalOptions {
    /// Configuration file (falls back to configs/aiot-sim.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Base URL of the detection service, overriding the configuration file
    #[arg(long, global = true, env = "AIOT_SIM_BASE_URL")]
    pub base_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Send one simulated stream and print the scored result
    Send(send::SendOptions),
    /// Print a simulated request body without sending it
    Generate(send::GenerateOptions),
    /// Write a labelled training dataset as CSV
    Dataset(dataset::DatasetOptions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegimeArg {
    Normal,
    Anomalous,
}

impl From<RegimeArg> for Regime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::Normal => Regime::Normal,
            RegimeArg::Anomalous => Regime::Anomalous,
        }
    }
}

fn load_config(global: &GlobalOptions) -> Result<AppConfig> {
    let mut candidates = Vec::new();
    if let Some(path) = &global.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = AppConfig::load(&candidates)?;
    if let Some(base_url) = &global.base_url {
        config.backend.base_url = base_url.clone();
        config.validate()?;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.global)?;
    init_tracing("aiot-simctl", &config.logging)?;
    match cli.command {
        Commands::Send(options) => send::run(&options, &config)?,
        Commands::Generate(options) => send::generate(&options, &config)?,
        Commands::Dataset(options) => dataset::run(&options)?,
    }
    Ok(())
}
