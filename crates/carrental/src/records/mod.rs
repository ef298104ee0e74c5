//! Record types for carrental.
//!
//! This module defines the four persisted record kinds (cars, customers,
//! rentals and payments) together with the comma-delimited line encoding
//! they are stored in.
//!
//! The encoding is positional and does not escape the delimiter, so a
//! free-text value containing a comma cannot be stored. Callers accepting
//! user input check values with [`is_storable_text`] first.

mod car;
mod customer;
mod payment;
mod rental;

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use car::Car;
pub use customer::Customer;
pub use payment::Payment;
pub use rental::Rental;

/// Field delimiter used by the line encoding.
pub const DELIMITER: char = ',';

/// Encoded end timestamp of a rental whose car is still out.
pub const OPEN_RENTAL_SENTINEL: &str = "N/A";

/// Textual format of every persisted timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time with second precision.
pub type Timestamp = NaiveDateTime;

/// Errors produced while decoding a single encoded line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The line did not split into the expected number of fields.
    #[error("{kind} record: expected {expected} fields, found {found}")]
    FieldCount {
        /// Record kind being decoded.
        kind: &'static str,
        /// Number of fields the kind requires.
        expected: usize,
        /// Number of fields present.
        found: usize,
    },

    /// A field could not be parsed.
    #[error("{kind} record: invalid {field} '{value}': {reason}")]
    InvalidField {
        /// Record kind being decoded.
        kind: &'static str,
        /// Name of the offending field.
        field: &'static str,
        /// Raw field text.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// The record's id leaves no room for a following id.
    #[error("{kind} record: id {id} is out of range")]
    IdOutOfRange {
        /// Record kind being decoded.
        kind: &'static str,
        /// The offending id.
        id: u32,
    },

    /// The record's key is already taken by an earlier record.
    #[error("{kind} record: duplicate key {key}")]
    DuplicateKey {
        /// Record kind being decoded.
        kind: &'static str,
        /// The repeated key.
        key: String,
    },
}

/// A record that is persisted as one delimited line of text.
pub trait LineRecord: Sized {
    /// Short lowercase name of the record kind (for logs and errors).
    const KIND: &'static str;

    /// Encode the record as a single line, without a trailing newline.
    fn encode(&self) -> String;

    /// Decode a record from a single line.
    ///
    /// # Errors
    ///
    /// Returns an error if the field count is wrong or any field fails to parse.
    fn decode(line: &str) -> Result<Self, DecodeError>;
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// The first id handed out for a fresh store.
            pub const FIRST: Self = Self(1);

            /// The id following this one, or `None` past the last
            /// representable id.
            #[must_use]
            pub fn checked_next(self) -> Option<Self> {
                self.0.checked_add(1).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

record_id!(
    /// Identifier of a customer.
    CustomerId
);
record_id!(
    /// Identifier of a rental.
    RentalId
);
record_id!(
    /// Identifier of a payment.
    PaymentId
);

/// Current local time truncated to whole seconds, so it survives encoding.
#[must_use]
pub fn now() -> Timestamp {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Format a timestamp the way it is persisted and displayed.
#[must_use]
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Check whether a free-text value can be stored without corrupting its line.
#[must_use]
pub fn is_storable_text(value: &str) -> bool {
    !value.contains(DELIMITER) && !value.contains(['\n', '\r'])
}

/// Split a line into exactly `expected` fields.
pub(crate) fn split_fields<'a>(
    kind: &'static str,
    line: &'a str,
    expected: usize,
) -> Result<Vec<&'a str>, DecodeError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != expected {
        return Err(DecodeError::FieldCount {
            kind,
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

/// Parse a numeric (or otherwise `FromStr`) field.
pub(crate) fn parse_field<T>(
    kind: &'static str,
    field: &'static str,
    value: &str,
) -> Result<T, DecodeError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| DecodeError::InvalidField {
            kind,
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a timestamp field.
pub(crate) fn parse_timestamp(
    kind: &'static str,
    field: &'static str,
    value: &str,
) -> Result<Timestamp, DecodeError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|e| {
        DecodeError::InvalidField {
            kind,
            field,
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
pub(crate) fn ts(s: &str) -> Timestamp {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
}
