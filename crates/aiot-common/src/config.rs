//! ---
//! aiot_section: "01-core-functionality"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Configuration model and loader for the simulator binaries."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::debug;
use url::Url;

use crate::logging::LogFormat;

/// Default location searched when neither `--config` nor `AIOT_SIM_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "configs/aiot-sim.toml";

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_owned()
}

fn default_endpoint() -> String {
    "/predict_anomaly".to_owned()
}

fn default_score_alert_threshold() -> f64 {
    0.1
}

fn default_point_alert_threshold() -> f64 {
    0.05
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_console() -> bool {
    true
}

/// Primary configuration object for the simulator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    /// `None` when no file was found and built-in defaults are in effect.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "AIOT_SIM_CONFIG";

    /// Load configuration, respecting the `AIOT_SIM_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    ///
    /// The environment override wins and must exist. Otherwise the first
    /// existing candidate is used; when none exists the defaults apply.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        let env_path = std::env::var(Self::ENV_CONFIG_PATH).ok();
        Self::resolve(env_path.as_deref(), candidates)
    }

    fn resolve<P: AsRef<Path>>(env_path: Option<&str>, candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Some(env_path) = env_path.map(str::trim).filter(|p| !p.is_empty()) {
            let path = PathBuf::from(env_path);
            let config = Self::from_path(&path)?;
            return Ok(LoadedAppConfig {
                config,
                source: Some(path),
            });
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(LoadedAppConfig {
            config: Self::default(),
            source: None,
        })
    }

    /// Parse and validate a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.backend.validate()?;
        self.display.validate()?;
        Ok(())
    }
}

/// Location of the anomaly-detection service.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout. Unset leaves the HTTP client's own default in place.
    #[serde(default, rename = "timeout_secs")]
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            timeout: None,
        }
    }
}

impl BackendConfig {
    /// Full prediction URL: the base URL with the endpoint path appended verbatim.
    pub fn prediction_url(&self) -> Result<Url> {
        let joined = format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint);
        Url::parse(&joined).with_context(|| format!("invalid prediction url {joined}"))
    }

    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.base_url)
            .with_context(|| format!("backend.base_url {} is not a valid url", self.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(anyhow!(
                "backend.base_url must use http or https, got {}",
                base.scheme()
            ));
        }
        if !self.endpoint.starts_with('/') {
            return Err(anyhow!(
                "backend.endpoint must start with '/', got {}",
                self.endpoint
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible streams. Unset draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Time zone used when rendering preview timestamps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayTimezone {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub timezone: DisplayTimezone,
    /// Average scores below this value are highlighted.
    #[serde(default = "default_score_alert_threshold")]
    pub score_alert_threshold: f64,
    /// Per-point scores below this value are highlighted.
    #[serde(default = "default_point_alert_threshold")]
    pub point_alert_threshold: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: DisplayTimezone::default(),
            score_alert_threshold: default_score_alert_threshold(),
            point_alert_threshold: default_point_alert_threshold(),
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("score_alert_threshold", self.score_alert_threshold),
            ("point_alert_threshold", self.point_alert_threshold),
        ] {
            if !value.is_finite() {
                return Err(anyhow!("display.{name} must be a finite number"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
    /// Mirror events to stderr. The terminal UI forces this off.
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
            console: default_console(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file.flush().expect("flush config");
        file
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let config = AppConfig::default();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.backend.endpoint, "/predict_anomaly");
        assert!(config.backend.timeout.is_none());
        assert_eq!(
            config.backend.prediction_url().unwrap().as_str(),
            "http://127.0.0.1:8000/predict_anomaly"
        );
        config.validate().unwrap();
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let loaded =
            AppConfig::resolve(None, &[PathBuf::from("does/not/exist.toml")]).unwrap();
        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.display.score_alert_threshold, 0.1);
    }

    #[test]
    fn first_existing_candidate_wins() {
        let file = write_config(
            r#"
            [backend]
            base_url = "http://sensor-gw:9000/api/"
            timeout_secs = 5

            [simulation]
            seed = 7

            [display]
            timezone = "utc"
            "#,
        );
        let candidates = [PathBuf::from("does/not/exist.toml"), file.path().to_path_buf()];
        let loaded = AppConfig::resolve(None, &candidates).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(file.path()));
        let config = loaded.config;
        assert_eq!(config.backend.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.display.timezone, DisplayTimezone::Utc);
        assert_eq!(
            config.backend.prediction_url().unwrap().as_str(),
            "http://sensor-gw:9000/api/predict_anomaly"
        );
    }

    #[test]
    fn env_override_takes_precedence() {
        let chosen = write_config("[backend]\nendpoint = \"/v2/predict\"\n");
        let ignored = write_config("[backend]\nendpoint = \"/ignored\"\n");
        let env = chosen.path().display().to_string();
        let loaded = AppConfig::resolve(Some(&env), &[ignored.path()]).unwrap();
        assert_eq!(loaded.config.backend.endpoint, "/v2/predict");
    }

    #[test]
    fn env_override_must_exist() {
        let err = AppConfig::resolve::<PathBuf>(Some("missing/aiot.toml"), &[]).unwrap_err();
        assert!(err.to_string().contains("unable to read config file"));
    }

    #[test]
    fn rejects_malformed_backend() {
        let file = write_config("[backend]\nbase_url = \"not a url\"\n");
        assert!(AppConfig::from_path(file.path()).is_err());

        let backend = BackendConfig {
            endpoint: "predict_anomaly".to_owned(),
            ..BackendConfig::default()
        };
        assert!(backend.validate().is_err());

        let backend = BackendConfig {
            base_url: "ftp://127.0.0.1".to_owned(),
            ..BackendConfig::default()
        };
        assert!(backend.validate().is_err());
    }
}
