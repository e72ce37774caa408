// src/error.rs
//! Unified error handling for rPPG Core
//!
//! The numeric core never fails: degenerate input is handled by explicit
//! policy (zero contributions, neutral defaults, "not ready" reports). This
//! type only covers the surfaces around it, configuration and the worker
//! transport.

use thiserror::Error;

/// Unified error type for the crate
#[derive(Debug, Error)]
pub enum PulseError {
    /// A configuration value failed validation
    #[error("[CONFIG] Configuration error in {component}: {reason}")]
    Configuration {
        component: String,
        reason: String,
    },

    /// Configuration sources could not be read or deserialized
    #[error("[CONFIG] Failed to load configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    /// Configuration could not be written as TOML
    #[error("[CONFIG] Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The pipeline worker is gone and can no longer accept messages
    #[error("[WORKER] Pipeline worker is not running (during {operation})")]
    WorkerDisconnected { operation: String },

    /// The pipeline worker thread could not be started
    #[error("[WORKER] Failed to spawn pipeline worker: {0}")]
    WorkerSpawn(std::io::Error),

    /// Filesystem access failed
    #[error("[IO] {0}")]
    Io(#[from] std::io::Error),
}

impl PulseError {
    /// Build a configuration error for `component`
    pub fn configuration(component: &str, reason: impl Into<String>) -> Self {
        PulseError::Configuration {
            component: component.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a disconnected-worker error for `operation`
    pub fn disconnected(operation: &str) -> Self {
        PulseError::WorkerDisconnected {
            operation: operation.to_string(),
        }
    }
}

/// Result type alias for rPPG operations
pub type RppgResult<T> = Result<T, PulseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = PulseError::configuration("band", "min_hz must be below max_hz");
        let display = format!("{}", err);
        assert!(display.starts_with("[CONFIG]"));
        assert!(display.contains("band"));
        assert!(display.contains("min_hz must be below max_hz"));
    }

    #[test]
    fn test_disconnected_display() {
        let err = PulseError::disconnected("add_sample");
        assert_eq!(
            err.to_string(),
            "[WORKER] Pipeline worker is not running (during add_sample)"
        );
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PulseError>();
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: PulseError = io.into();
        assert!(matches!(err, PulseError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }
}
