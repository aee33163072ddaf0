//! Layered settings: defaults -> config file -> `JOBSCAN_*` env vars.
//! CLI flags are applied on top by the binary.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::render::OutputTarget;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Fallback log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Sort key applied when none is given; empty keeps file order.
    #[serde(default)]
    pub default_sort: String,

    /// Where listings are rendered, see [`OutputTarget`].
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_output() -> String {
    "stdout".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_sort: String::new(),
            output: default_output(),
        }
    }
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_file, Environment::with_prefix("JOBSCAN"))
    }

    fn load_with_env(config_file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())?
            .set_default("default_sort", "")?
            .set_default("output", default_output())?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder.add_source(env).build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if OutputTarget::parse(&self.output).is_none() {
            return Err(ConfigError::Invalid {
                key: "output",
                reason: format!(
                    "unknown output format `{}`, use 'stdout', 'json', or a file path",
                    self.output
                ),
            });
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "log_level",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env() -> Environment {
        Environment::with_prefix("JOBSCAN").source(Some(HashMap::new()))
    }

    #[test]
    fn defaults_without_sources() {
        let s = Settings::load_with_env(None, no_env()).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(f, "default_sort = \"titleAsc\"\noutput = \"out/listing.csv\"").unwrap();

        let s = Settings::load_with_env(Some(f.path()), no_env()).unwrap();
        assert_eq!(s.default_sort, "titleAsc");
        assert_eq!(s.output, "out/listing.csv");
        assert_eq!(s.log_level, "warn");
    }

    #[test]
    fn env_overrides_file() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(f, "log_level = \"error\"").unwrap();

        let env = Environment::with_prefix("JOBSCAN").source(Some(HashMap::from([(
            "JOBSCAN_LOG_LEVEL".to_string(),
            "debug".to_string(),
        )])));
        let s = Settings::load_with_env(Some(f.path()), env).unwrap();
        assert_eq!(s.log_level, "debug");
    }

    #[test]
    fn rejects_unknown_output() {
        let s = Settings {
            output: "printer".into(),
            ..Default::default()
        };
        assert!(matches!(
            s.validate(),
            Err(ConfigError::Invalid { key: "output", .. })
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let r = Settings::load_with_env(Some(Path::new("/nonexistent/jobscan.toml")), no_env());
        assert!(matches!(r, Err(ConfigError::Source(_))));
    }
}
