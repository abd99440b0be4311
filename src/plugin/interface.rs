//! Plugin interface definition.
//!
//! Defines the two-method lifecycle contract every plugin implements.

use std::fmt;

/// Result type for plugin hooks.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Error raised by a plugin's activation hook.
///
/// The registry treats it as opaque and only wraps it with the plugin name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginError {
    /// Error message
    pub message: String,
    /// Hint for the host on whether retrying may succeed. The registry
    /// never reads it.
    pub recoverable: bool,
}

impl PluginError {
    /// Create a new error.
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            recoverable: true,
        }
    }

    /// Create a fatal error.
    pub fn fatal(message: &str) -> Self {
        Self {
            message: message.to_string(),
            recoverable: false,
        }
    }

    /// Wrap any error raised inside a plugin.
    pub fn from_error<E: std::error::Error>(err: E) -> Self {
        Self::new(&err.to_string())
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PluginError {}

impl From<&str> for PluginError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for PluginError {
    fn from(message: String) -> Self {
        Self {
            message,
            recoverable: true,
        }
    }
}

impl From<std::io::Error> for PluginError {
    fn from(err: std::io::Error) -> Self {
        Self::from_error(err)
    }
}

/// Plugin trait that all plugins must implement.
///
/// Hooks take `&self`: the registry shares plugins with callers through
/// `Arc`, so implementations keep any mutable state behind interior
/// mutability.
pub trait Plugin: Send + Sync {
    /// Bring the plugin into a running state.
    fn activate(&self) -> PluginResult<()>;

    /// Bring the plugin to a stopped state. Must not fail; implementations
    /// suppress or log their own errors.
    fn deactivate(&self);
}

type ActivateFn = Box<dyn Fn() -> PluginResult<()> + Send + Sync>;
type DeactivateFn = Box<dyn Fn() + Send + Sync>;

/// A plugin built from a pair of closures.
pub struct FnPlugin {
    on_activate: ActivateFn,
    on_deactivate: DeactivateFn,
}

impl FnPlugin {
    /// Create a plugin from activation and deactivation closures.
    pub fn new<A, D>(on_activate: A, on_deactivate: D) -> Self
    where
        A: Fn() -> PluginResult<()> + Send + Sync + 'static,
        D: Fn() + Send + Sync + 'static,
    {
        Self {
            on_activate: Box::new(on_activate),
            on_deactivate: Box::new(on_deactivate),
        }
    }

    /// A plugin whose hooks do nothing.
    pub fn noop() -> Self {
        Self::new(|| Ok(()), || {})
    }
}

impl fmt::Debug for FnPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPlugin").finish_non_exhaustive()
    }
}

impl Plugin for FnPlugin {
    fn activate(&self) -> PluginResult<()> {
        (self.on_activate)()
    }

    fn deactivate(&self) {
        (self.on_deactivate)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_plugin_error() {
        let err = PluginError::new("boom");
        assert!(err.recoverable);
        assert_eq!(err.to_string(), "boom");

        let fatal = PluginError::fatal("gone");
        assert!(!fatal.recoverable);
    }

    #[test]
    fn test_plugin_error_conversions() {
        let from_str: PluginError = "a".into();
        let from_string: PluginError = String::from("a").into();
        assert_eq!(from_str, from_string);

        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: PluginError = io.into();
        assert_eq!(err.message, "port taken");
    }

    #[test]
    fn test_fn_plugin() {
        let calls = Arc::new(AtomicUsize::new(0));
        let on = Arc::clone(&calls);
        let off = Arc::clone(&calls);

        let plugin = FnPlugin::new(
            move || {
                on.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            move || {
                off.fetch_add(10, Ordering::SeqCst);
            },
        );

        plugin.activate().unwrap();
        plugin.deactivate();
        assert_eq!(calls.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn test_fn_plugin_failure() {
        let plugin = FnPlugin::new(|| Err(PluginError::fatal("no config")), || {});
        let err = plugin.activate().unwrap_err();
        assert_eq!(err.message, "no config");
        assert!(!err.recoverable);
    }

    #[test]
    fn test_noop_plugin() {
        let plugin = FnPlugin::noop();
        assert!(plugin.activate().is_ok());
        plugin.deactivate();
    }
}
