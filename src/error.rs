/// Error types for each subsystem
///
/// All errors are `Clone` so they can be carried inside UI messages.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn one input file into a board item
#[derive(Debug, Clone, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("failed to encode thumbnail for {name}: {reason}")]
    Encode { name: String, reason: String },

    #[error("background task failed: {0}")]
    Task(String),
}

/// Failure while rendering or writing an export
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("invalid scene: {0}")]
    Scene(String),

    #[error("cannot allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Encode(String),

    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("background task failed: {0}")]
    Task(String),
}

/// Failure to load or store the configuration file
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("config I/O error on {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("cannot serialize config: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = IngestError::Decode {
            name: "cat.png".into(),
            reason: "bad header".into(),
        };
        assert_eq!(err.to_string(), "failed to decode cat.png: bad header");

        let err = ExportError::Surface { width: 0, height: 10 };
        assert_eq!(err.to_string(), "cannot allocate a 0x10 surface");
    }

    #[test]
    fn test_json_error_becomes_parse_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
