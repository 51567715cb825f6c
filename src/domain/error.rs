//! Error types for nestview.
//!
//! This module defines the centralized error type [`NestviewError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. Only the edges
//! of the application can fail (reading data, schema, catalog, theme and config
//! files, or evaluating a full expression). Path addressing, completion and the
//! status state machine are total and never produce these errors.

use thiserror::Error;

/// The main error type for nestview operations.
///
/// Most variants wrap underlying errors from external crates using `#[from]`
/// for automatic conversion.
///
/// # Examples
///
/// ```
/// use nestview::domain::NestviewError;
///
/// fn validate_schema() -> Result<(), NestviewError> {
///     Err(NestviewError::Schema("list.title_field is required".to_string()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum NestviewError {
    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document (data tree or schema) could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A TOML document (data tree, schema, catalog, theme or config) could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The view schema is structurally invalid.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The function catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A complete expression could not be evaluated.
    ///
    /// Raised by [`Evaluator`](crate::domain::node::Evaluator) implementations;
    /// the application turns it into an error flash instead of propagating it.
    #[error("{0}")]
    Evaluation(String),
}

/// A specialized `Result` type for nestview operations.
pub type Result<T> = std::result::Result<T, NestviewError>;
