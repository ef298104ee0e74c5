use std::fmt;

use serde::{Deserialize, Serialize};

use super::{parse_field, split_fields, CustomerId, DecodeError, LineRecord};

/// A registered customer. Customers are never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier, assigned by the store.
    pub id: CustomerId,
    /// Full name.
    pub name: String,
    /// Driver license number.
    pub driver_license: String,
    /// Phone, email or address.
    pub contact_info: String,
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Customer ID: {}", self.id)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Driver License: {}", self.driver_license)?;
        write!(f, "Contact Info: {}", self.contact_info)
    }
}

impl LineRecord for Customer {
    const KIND: &'static str = "customer";

    fn encode(&self) -> String {
        format!(
            "{},{},{},{}",
            self.id, self.name, self.driver_license, self.contact_info
        )
    }

    fn decode(line: &str) -> Result<Self, DecodeError> {
        let fields = split_fields(Self::KIND, line, 4)?;
        Ok(Self {
            id: parse_field(Self::KIND, "id", fields[0])?,
            name: fields[1].to_string(),
            driver_license: fields[2].to_string(),
            contact_info: fields[3].to_string(),
        })
    }
}
