// Library interface for RunRS modules
// This allows the CLI and integration tests to access the core functionality

pub mod config;
pub mod duration;
pub mod error;
pub mod import;
pub mod logging;
pub mod models;
pub mod riegel;
pub mod vdot;
pub mod zones;

// Re-export commonly used types for convenience
pub use config::RunRsConfig;
pub use duration::{format_duration, parse_duration, parse_duration_strict};
pub use error::{Result, RunRsError};
pub use import::HistoryImporter;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use riegel::RiegelPredictor;
pub use vdot::VdotAnalyzer;
pub use zones::ZoneAggregator;
