//! `carrental` - A small car rental record store
//!
//! This library keeps cars, customers, rentals and payments in memory,
//! persists them to comma-delimited text files, and drives the rental and
//! payment workflows behind an interactive menu shell.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod records;
pub mod report;
pub mod shell;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use records::{
    Car, Customer, CustomerId, DecodeError, LineRecord, Payment, PaymentId, Rental, RentalId,
};
pub use storage::{DataFiles, Store, StoreStats};
