//! ---
//! aiot_section: "01-core-functionality"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Shared configuration and logging primitives."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
//! Shared primitives for the AIoT power simulator workspace.
//! This crate exposes configuration loading and tracing setup consumed by
//! both the terminal panel and the control CLI.

pub mod config;
pub mod logging;

pub use config::{
    AppConfig, BackendConfig, DisplayConfig, DisplayTimezone, LoadedAppConfig, LoggingConfig,
    SimulationConfig, DEFAULT_CONFIG_PATH,
};
pub use logging::{init_tracing, LogFormat};
