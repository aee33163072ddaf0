//! Error types for loading listings and settings.

use std::path::PathBuf;

use thiserror::Error;

/// Why a listing file could not be installed. Always recoverable: the
/// previously loaded collection stays active.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be opened or mapped
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Contents are not JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// JSON, but the top level is not an array of listings
    #[error("expected a JSON array of listings, found {found}")]
    NotAnArray { found: &'static str },
}

impl LoadError {
    /// Message shown to the user when a load is rejected.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Io { path, source } => {
                format!("Could not read file {}: {source}", path.display())
            }
            LoadError::InvalidJson(_) | LoadError::NotAnArray { .. } => {
                format!("Invalid JSON file format. ({self})")
            }
        }
    }
}

/// Settings could not be loaded or hold an unusable value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn read_failures_are_not_called_bad_json() {
        let err = LoadError::Io {
            path: PathBuf::from("jobs.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.user_message();
        assert!(msg.starts_with("Could not read file jobs.json"));
        assert!(!msg.contains("Invalid JSON"));
    }

    #[test]
    fn format_failures_keep_the_familiar_notice() {
        let bad = serde_json::from_str::<serde_json::Value>("[{").unwrap_err();
        assert!(LoadError::from(bad)
            .user_message()
            .starts_with("Invalid JSON file format."));

        let not_array = LoadError::NotAnArray { found: "an object" };
        assert_eq!(
            not_array.user_message(),
            "Invalid JSON file format. (expected a JSON array of listings, found an object)"
        );
    }
}
