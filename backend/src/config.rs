//! Startup configuration, read once from the environment in `main.rs`.
//!
//! | Variable               | Default      |
//! |------------------------|--------------|
//! | `CHATBOT_HOST`         | `127.0.0.1`  |
//! | `CHATBOT_PORT`         | `8000`       |
//! | `REPORT_PATH`          | `output.csv` |
//! | `REPORT_DURATION_SECS` | `10`         |
//! | `REPORT_STEPS`         | `10`         |

use crate::job_controller::report::ReportSettings;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub report: ReportSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("CHATBOT_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "CHATBOT_PORT", 8000u16)?;
        let output_path = lookup("REPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("output.csv"));
        let duration_secs = parse_or(&lookup, "REPORT_DURATION_SECS", 10u64)?;
        let steps = parse_or(&lookup, "REPORT_STEPS", 10u32)?.max(1);

        Ok(AppConfig {
            host,
            port,
            report: ReportSettings {
                output_path,
                duration: Duration::from_secs(duration_secs),
                steps,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.report.output_path, PathBuf::from("output.csv"));
        assert_eq!(config.report.duration, Duration::from_secs(10));
        assert_eq!(config.report.steps, 10);
    }

    #[test]
    fn zero_steps_is_clamped_to_one() {
        let config = config_from(&[("REPORT_STEPS", "0")]).unwrap();
        assert_eq!(config.report.steps, 1);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = config_from(&[("CHATBOT_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("CHATBOT_PORT"));
    }
}
