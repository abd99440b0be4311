//! Plugin Module
//!
//! Provides the plugin lifecycle architecture:
//! - Plugin interface
//! - Plugin registry
//! - Registry configuration

pub mod config;
pub mod interface;
pub mod registry;

pub use config::RegistryConfig;
pub use interface::{FnPlugin, Plugin, PluginError, PluginResult};
pub use registry::{EntrySnapshot, PluginRegistry, PluginStatus};
