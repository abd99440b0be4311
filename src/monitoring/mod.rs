//! Monitoring Module
//!
//! Provides observability for the registry:
//! - Structured logging via `tracing`

pub mod logging;

pub use logging::{init_logging, LogFormat, LogLevel, LoggerConfig};
