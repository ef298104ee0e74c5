use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    format_timestamp, parse_field, parse_timestamp, split_fields, CustomerId, DecodeError,
    LineRecord, RentalId, Timestamp, OPEN_RENTAL_SENTINEL,
};

/// A rental transaction.
///
/// The total cost is fixed when the rental is created and is not adjusted
/// when the car comes back early or late.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    /// Unique identifier, assigned by the store.
    pub id: RentalId,
    /// The renting customer.
    pub customer_id: CustomerId,
    /// License plate of the rented car.
    pub car_license: String,
    /// When the car left.
    pub start: Timestamp,
    /// When the car came back; `None` while it is still out.
    pub end: Option<Timestamp>,
    /// Price per day times the requested number of days.
    pub total_cost: f64,
}

impl Rental {
    /// Whether the car of this rental is still out.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    fn end_text(&self) -> String {
        self.end
            .as_ref()
            .map_or_else(|| OPEN_RENTAL_SENTINEL.to_string(), format_timestamp)
    }
}

impl fmt::Display for Rental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rental ID: {}", self.id)?;
        writeln!(f, "Customer ID: {}", self.customer_id)?;
        writeln!(f, "Car License: {}", self.car_license)?;
        writeln!(f, "Rental Start: {}", format_timestamp(&self.start))?;
        writeln!(f, "Rental End: {}", self.end_text())?;
        write!(f, "Total Cost: ${}", self.total_cost)
    }
}

impl LineRecord for Rental {
    const KIND: &'static str = "rental";

    fn encode(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.id,
            self.customer_id,
            self.car_license,
            format_timestamp(&self.start),
            self.end_text(),
            self.total_cost
        )
    }

    fn decode(line: &str) -> Result<Self, DecodeError> {
        let fields = split_fields(Self::KIND, line, 6)?;
        let end = if fields[4].trim() == OPEN_RENTAL_SENTINEL {
            None
        } else {
            Some(parse_timestamp(Self::KIND, "end", fields[4])?)
        };
        Ok(Self {
            id: parse_field(Self::KIND, "id", fields[0])?,
            customer_id: parse_field(Self::KIND, "customer_id", fields[1])?,
            car_license: fields[2].to_string(),
            start: parse_timestamp(Self::KIND, "start", fields[3])?,
            end,
            total_cost: parse_field(Self::KIND, "total_cost", fields[5])?,
        })
    }
}
