//! Error types for Stacksmith.
//!
//! The stack declarations themselves are infallible literal constructions;
//! errors only arise at the synthesis boundary (duplicate identifiers, broken
//! dependency wiring, template serialization, filesystem output) and when
//! loading configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stacksmith operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Stacksmith.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Stack Composition Errors
    // ========================================================================
    /// Two resources, parameters, or outputs in one stack share a logical id.
    #[error("Duplicate logical id '{logical_id}' in stack '{stack}'")]
    DuplicateLogicalId {
        /// Stack name
        stack: String,
        /// Conflicting logical id
        logical_id: String,
    },

    /// Two stacks in one app share a name.
    #[error("Duplicate stack name '{0}'")]
    DuplicateStack(String),

    /// A stack declares a dependency on a stack the app does not contain.
    #[error("Stack '{stack}' depends on unknown stack '{dependency}'")]
    UnknownDependency {
        /// Depending stack name
        stack: String,
        /// Missing dependency name
        dependency: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    // ========================================================================
    // Synthesis Errors
    // ========================================================================
    /// Resource properties failed to serialize into template JSON.
    #[error("Failed to serialize properties for '{logical_id}': {message}")]
    PropertySerialization {
        /// Logical id of the resource
        logical_id: String,
        /// Error message
        message: String,
    },

    // ========================================================================
    // IO / Serialization Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Creates a new duplicate logical id error.
    pub fn duplicate_logical_id(stack: impl Into<String>, logical_id: impl Into<String>) -> Self {
        Self::DuplicateLogicalId {
            stack: stack.into(),
            logical_id: logical_id.into(),
        }
    }

    /// Creates a new unknown dependency error.
    pub fn unknown_dependency(stack: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::UnknownDependency {
            stack: stack.into(),
            dependency: dependency.into(),
        }
    }

    /// Creates a new property serialization error.
    pub fn property_serialization(
        logical_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::PropertySerialization {
            logical_id: logical_id.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::DuplicateLogicalId { .. }
            | Error::DuplicateStack(_)
            | Error::UnknownDependency { .. } => 2,
            Error::InvalidConfig { .. } | Error::ConfigFileNotFound(_) => 3,
            _ => 1,
        }
    }
}
