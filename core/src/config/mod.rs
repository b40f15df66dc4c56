//! Engine configuration management

pub mod engine_config;

pub use engine_config::{EngineConfig, LoggingConfig};
