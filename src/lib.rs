//! # plugin-lifecycle
//!
//! An ordered, thread-safe registry for named plugins implementing a
//! two-method lifecycle contract:
//! - **Registration order** drives bulk activation
//! - **Activation order** is unwound in reverse on bulk deactivation
//! - One exclusive lock makes every operation atomic
//!
//! ## Quick Start
//!
//! ```rust
//! use plugin_lifecycle::plugin::{FnPlugin, PluginRegistry};
//! use std::sync::Arc;
//!
//! let registry = PluginRegistry::default();
//! registry.register("cache", Arc::new(FnPlugin::noop()), false).unwrap();
//! registry.register("http", Arc::new(FnPlugin::noop()), false).unwrap();
//!
//! registry.activate_all().unwrap();
//! assert!(registry.is_active("http").unwrap());
//!
//! // Stops "http" before "cache"
//! registry.deactivate_all();
//! ```

pub mod core;
pub mod monitoring;
pub mod plugin;

pub use crate::core::error::{Error, Result};
pub use plugin::{Plugin, PluginError, PluginRegistry, PluginStatus, RegistryConfig};
