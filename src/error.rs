//! Error types and handling infrastructure for gesture-scroll.
//!
//! This module provides a centralized error type using `thiserror`. The binary layers
//! `anyhow` context on top of it.
//!
//! ## What is (and is not) an error here
//!
//! - **Recoverable**: configuration problems, a stopped engine, output write failures.
//!   These surface as [`GestureScrollError`].
//! - **Contract violations**: an unsupported phase passed to `report_sample`, or an
//!   event that carries both a gesture phase and a momentum phase. These panic; they
//!   indicate a bug in the caller or in the engine itself, not a runtime condition.
//! - **Designed no-ops**: zero-delta samples and skipped momentum runs are logged and
//!   dropped, never reported as errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for gesture-scroll operations.
#[derive(Error, Debug)]
pub enum GestureScrollError {
    /// A configuration value is out of range or inconsistent
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Reading a configuration file failed
    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML or has unknown keys
    #[error("Invalid config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// The requested drag preset does not exist
    #[error("Unknown animation preset: {name}")]
    UnknownPreset { name: String },

    /// The engine task has stopped and can no longer accept commands
    #[error("Scroll engine is no longer running")]
    EngineClosed,

    /// Writing an event record to its destination failed
    #[error("Event sink failed: {message}")]
    SinkError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for gesture-scroll operations.
pub type Result<T> = std::result::Result<T, GestureScrollError>;

impl GestureScrollError {
    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an UnknownPreset error for the given preset name
    pub fn unknown_preset(name: impl Into<String>) -> Self {
        Self::UnknownPreset { name: name.into() }
    }

    /// Create a SinkError from an io::Error with additional context
    pub fn sink(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::SinkError {
            message: message.into(),
            source,
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

// I/O failures outside of config loading only happen while writing records
impl From<std::io::Error> for GestureScrollError {
    fn from(err: std::io::Error) -> Self {
        Self::sink("write failed", err)
    }
}
