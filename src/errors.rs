/*!
 * Error types for the genderize application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur in the prompt transform
#[derive(Error, Debug)]
pub enum GenderizeError {
    /// Error when a gender code does not normalize to a recognized value
    #[error("invalid gender code '{0}': accepted values are 'M' or 'F' (case-insensitive)")]
    InvalidGenderCode(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration handling
    #[error("Config error: {0}")]
    Config(String),

    /// Error from the prompt transform
    #[error("Genderize error: {0}")]
    Genderize(#[from] GenderizeError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
