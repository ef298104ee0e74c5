use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    format_timestamp, parse_field, parse_timestamp, split_fields, DecodeError, LineRecord,
    PaymentId, RentalId, Timestamp,
};

/// A payment recorded against a rental.
///
/// Payments form an append-only log: nothing ties the amount to the
/// rental's cost, and a rental may have any number of payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier, assigned by the store.
    pub id: PaymentId,
    /// The rental being paid for.
    pub rental_id: RentalId,
    /// Amount paid.
    pub amount: f64,
    /// Free-text payment method, e.g. `Cash` or `CreditCard`.
    pub method: String,
    /// When the payment was taken.
    pub date: Timestamp,
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Payment ID: {}", self.id)?;
        writeln!(f, "Rental ID: {}", self.rental_id)?;
        writeln!(f, "Amount: ${}", self.amount)?;
        writeln!(f, "Payment Method: {}", self.method)?;
        write!(f, "Payment Date: {}", format_timestamp(&self.date))
    }
}

impl LineRecord for Payment {
    const KIND: &'static str = "payment";

    fn encode(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.id,
            self.rental_id,
            self.amount,
            self.method,
            format_timestamp(&self.date)
        )
    }

    fn decode(line: &str) -> Result<Self, DecodeError> {
        let fields = split_fields(Self::KIND, line, 5)?;
        Ok(Self {
            id: parse_field(Self::KIND, "id", fields[0])?,
            rental_id: parse_field(Self::KIND, "rental_id", fields[1])?,
            amount: parse_field(Self::KIND, "amount", fields[2])?,
            method: fields[3].to_string(),
            date: parse_timestamp(Self::KIND, "date", fields[4])?,
        })
    }
}
