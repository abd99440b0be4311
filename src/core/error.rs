//! Error types for the plugin registry.

use crate::plugin::interface::PluginError;
use thiserror::Error;

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in registry operations.
#[derive(Error, Debug)]
pub enum Error {
    // Registration errors
    #[error("plugin name <{0}> is already registered")]
    DuplicateName(String),

    #[error("plugin <{0}> not found")]
    NotFound(String),

    #[error("registry is full ({0} plugins)")]
    CapacityExceeded(usize),

    // Lifecycle errors
    #[error("plugin <{name}> failed to activate")]
    ActivationFailed {
        name: String,
        #[source]
        source: PluginError,
    },

    // Configuration errors
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("logging initialization failed: {0}")]
    LoggingInit(String),
}

impl Error {
    /// Name of the plugin the error is attributed to, if any.
    pub fn plugin_name(&self) -> Option<&str> {
        match self {
            Error::DuplicateName(name)
            | Error::NotFound(name)
            | Error::ActivationFailed { name, .. } => Some(name.as_str()),
            Error::CapacityExceeded(_) | Error::InvalidConfig(_) | Error::LoggingInit(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_activation_failed_display() {
        let err = Error::ActivationFailed {
            name: "cache".to_string(),
            source: PluginError::new("port in use"),
        };

        // Cause is reachable only through the source chain
        assert_eq!(err.to_string(), "plugin <cache> failed to activate");
        assert_eq!(err.plugin_name(), Some("cache"));
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("port in use"));
    }

    #[test]
    fn test_plugin_name() {
        assert_eq!(Error::NotFound("a".into()).plugin_name(), Some("a"));
        assert_eq!(Error::CapacityExceeded(4).plugin_name(), None);
    }

    #[test]
    fn test_from_serde_json() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
