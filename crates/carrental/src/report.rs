//! Read-only listings and the system status summary.

use std::fmt;
use std::io::{self, Write};

use crate::error::Result;
use crate::storage::{Store, StoreStats};

/// The four record collections, as selectable for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// The car fleet.
    Cars,
    /// Registered customers.
    Customers,
    /// Rental transactions.
    Rentals,
    /// Recorded payments.
    Payments,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cars => write!(f, "cars"),
            Self::Customers => write!(f, "customers"),
            Self::Rentals => write!(f, "rentals"),
            Self::Payments => write!(f, "payments"),
        }
    }
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "System Status:")?;
        writeln!(f, "Total Cars: {}", self.cars)?;
        writeln!(f, "Total Customers: {}", self.customers)?;
        writeln!(f, "Total Rentals: {}", self.rentals)?;
        write!(f, "Total Payments: {}", self.payments)
    }
}

/// Write the plain-text listing of one collection.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_listing<W: Write>(store: &Store, kind: RecordKind, out: &mut W) -> io::Result<()> {
    match kind {
        RecordKind::Cars => write_section(out, "Car List", Some("Car"), store.cars()),
        RecordKind::Customers => {
            write_section(out, "Customer List", Some("Customer"), store.customers())
        }
        RecordKind::Rentals => write_section(out, "Rental Report", None, store.rentals()),
        RecordKind::Payments => {
            write_section(out, "Payment List", Some("Payment"), store.payments())
        }
    }
}

/// Render one collection as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn listing_json(store: &Store, kind: RecordKind) -> Result<String> {
    let json = match kind {
        RecordKind::Cars => serde_json::to_string_pretty(store.cars())?,
        RecordKind::Customers => serde_json::to_string_pretty(store.customers())?,
        RecordKind::Rentals => serde_json::to_string_pretty(store.rentals())?,
        RecordKind::Payments => serde_json::to_string_pretty(store.payments())?,
    };
    Ok(json)
}

/// Render the collection counts as JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn status_json(stats: &StoreStats) -> Result<String> {
    Ok(serde_json::to_string_pretty(stats)?)
}

fn write_section<W: Write, T: fmt::Display>(
    out: &mut W,
    title: &str,
    item_label: Option<&str>,
    items: &[T],
) -> io::Result<()> {
    let header = format!("-------- {title} --------");
    let rule = "-".repeat(header.len());
    writeln!(out, "{header}")?;
    for (i, item) in items.iter().enumerate() {
        if let Some(label) = item_label {
            writeln!(out, "{label} {}:", i + 1)?;
        }
        writeln!(out, "{item}")?;
        writeln!(out, "{rule}")?;
    }
    Ok(())
}
