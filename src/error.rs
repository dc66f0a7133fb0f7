//! Unified error hierarchy for RunRS
//!
//! Provides a structured error type system shared across the analytics
//! modules, with severity classification and integration with the tracing
//! system.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all RunRS operations
#[derive(Debug, Error)]
pub enum RunRsError {
    /// Duration/date string parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Performance-history import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Calculation errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// String decoding errors for durations, dates and numeric fields
#[derive(Debug, Error)]
pub enum ParseError {
    /// Duration string does not match `H:MM:SS` or `M:SS`
    #[error("Invalid duration {text:?}: {reason}")]
    InvalidDuration { text: String, reason: String },

    /// Date string not recognized by any supported format
    #[error("Invalid date: {text:?}")]
    InvalidDate { text: String },

    /// Numeric field could not be decoded
    #[error("Invalid number in {field}: {value:?}")]
    InvalidNumber { field: String, value: String },
}

/// Performance-history import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// Required column missing from the input header
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    /// File contained no usable rows at all
    #[error("No usable rows in {path}")]
    NoUsableRows { path: PathBuf },

    /// Underlying CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Calculation errors
#[derive(Debug, Error)]
pub enum CalculationError {
    /// Invalid parameter
    #[error("Invalid parameter for {calculation}: {parameter}={value}")]
    InvalidParameter {
        calculation: String,
        parameter: String,
        value: String,
    },

    /// Insufficient data for calculation
    #[error("Insufficient data for {calculation}: {reason}")]
    InsufficientData { calculation: String, reason: String },
}

/// Result type alias for RunRS operations
pub type Result<T> = std::result::Result<T, RunRsError>;

impl RunRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RunRsError::Parse(_) => ErrorSeverity::Warning,
            RunRsError::Import(ImportError::NoUsableRows { .. }) => ErrorSeverity::Warning,
            RunRsError::Import(_) => ErrorSeverity::Error,
            RunRsError::Calculation(_) => ErrorSeverity::Warning,
            RunRsError::Configuration(_) => ErrorSeverity::Error,
            RunRsError::Io(_) => ErrorSeverity::Error,
            RunRsError::Internal(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RunRsError::Parse(ParseError::InvalidDuration { text, .. }) => {
                format!("Could not read {:?} as a time. Use H:MM:SS or M:SS.", text)
            }
            RunRsError::Import(ImportError::MissingColumn { column }) => {
                format!(
                    "The history file is missing a {:?} column. Expected distance_km, time and date columns.",
                    column
                )
            }
            RunRsError::Import(ImportError::NoUsableRows { path }) => {
                format!("No usable performances found in {}", path.display())
            }
            RunRsError::Configuration(reason) => {
                format!("Configuration problem: {}", reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = RunRsError::Parse(ParseError::InvalidDuration {
            text: "abc".to_string(),
            reason: "non-numeric".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = RunRsError::Configuration("no thresholds".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Error);

        let err = RunRsError::Internal("test".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_messages() {
        let err = RunRsError::Import(ImportError::MissingColumn {
            column: "date".to_string(),
        });
        assert!(err.user_message().contains("date"));

        let err = RunRsError::Parse(ParseError::InvalidDuration {
            text: "later".to_string(),
            reason: "non-numeric".to_string(),
        });
        assert!(err.user_message().contains("H:MM:SS"));
    }

    #[test]
    fn test_severity_tracing_levels() {
        assert_eq!(
            ErrorSeverity::Warning.to_tracing_level(),
            tracing::Level::WARN
        );
        assert_eq!(
            ErrorSeverity::Critical.to_tracing_level(),
            tracing::Level::ERROR
        );
    }
}
