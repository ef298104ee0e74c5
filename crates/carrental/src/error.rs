//! Error types for carrental.
//!
//! This module defines all error types used throughout the carrental crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::records::{CustomerId, DecodeError, RentalId};

/// The main error type for carrental operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Workflow Errors ===
    /// No customer has the requested id.
    #[error("customer not found: {id}")]
    CustomerNotFound {
        /// The id that was looked up.
        id: CustomerId,
    },

    /// No car has the requested license plate.
    #[error("car not found: {license}")]
    CarNotFound {
        /// The license plate that was looked up.
        license: String,
    },

    /// No rental has the requested id.
    #[error("rental not found: {id}")]
    RentalNotFound {
        /// The id that was looked up.
        id: RentalId,
    },

    /// The car is currently rented out.
    #[error("car is not available for rent: {license}")]
    CarUnavailable {
        /// License plate of the rented car.
        license: String,
    },

    /// The rental was already closed by an earlier return.
    #[error("rental {id} was already returned")]
    AlreadyReturned {
        /// The rental id.
        id: RentalId,
    },

    /// A car with this license plate is already in the store.
    #[error("a car with license plate {license} already exists")]
    DuplicateCar {
        /// The conflicting license plate.
        license: String,
    },

    /// Every id of this kind has been handed out.
    #[error("no {kind} ids left to assign")]
    IdsExhausted {
        /// Record kind whose counter ran out.
        kind: &'static str,
    },

    // === Persistence Errors ===
    /// A line in a persisted data file could not be decoded.
    #[error("malformed record in {path} at line {line}: {source}")]
    MalformedRecord {
        /// Path to the data file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// The decoding failure.
        #[source]
        source: DecodeError,
    },

    /// Failed to read a data file.
    #[error("failed to read {path}: {source}")]
    DataRead {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a data file.
    #[error("failed to write {path}: {source}")]
    DataWrite {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Shell Errors ===
    /// The interactive input stream ended.
    #[error("input closed")]
    InputClosed,

    // === I/O Errors ===
    /// File system or console operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for carrental operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a car-not-found error.
    #[must_use]
    pub fn car_not_found(license: impl Into<String>) -> Self {
        Self::CarNotFound {
            license: license.into(),
        }
    }

    /// Create a car-unavailable error.
    #[must_use]
    pub fn car_unavailable(license: impl Into<String>) -> Self {
        Self::CarUnavailable {
            license: license.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error is a missing customer, car or rental.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CustomerNotFound { .. } | Self::CarNotFound { .. } | Self::RentalNotFound { .. }
        )
    }

    /// Check if this error is a user-level rejection that leaves the session running.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.is_not_found()
            || matches!(
                self,
                Self::CarUnavailable { .. }
                    | Self::AlreadyReturned { .. }
                    | Self::DuplicateCar { .. }
                    | Self::IdsExhausted { .. }
            )
    }
}
