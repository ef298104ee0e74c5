use std::fmt;

use serde::{Deserialize, Serialize};

use super::{parse_field, split_fields, DecodeError, LineRecord};

/// A car in the rental fleet, keyed by license plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    /// License plate, unique across the fleet.
    pub license_plate: String,
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Model year.
    pub year: i32,
    /// Rental price per day.
    pub price_per_day: f64,
    /// Whether the car can currently be rented.
    pub available: bool,
}

impl Car {
    /// Create a new car. New cars are available.
    #[must_use]
    pub fn new(
        license_plate: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        price_per_day: f64,
    ) -> Self {
        Self {
            license_plate: license_plate.into(),
            brand: brand.into(),
            model: model.into(),
            year,
            price_per_day,
            available: true,
        }
    }

    /// Cost of renting this car for the given number of days.
    ///
    /// The day count is not range-checked.
    #[must_use]
    pub fn cost_for(&self, days: i32) -> f64 {
        self.price_per_day * f64::from(days)
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "License Plate: {}", self.license_plate)?;
        writeln!(f, "Brand: {}", self.brand)?;
        writeln!(f, "Model: {}", self.model)?;
        writeln!(f, "Year: {}", self.year)?;
        writeln!(f, "Price per Day: ${}", self.price_per_day)?;
        write!(
            f,
            "Availability: {}",
            if self.available {
                "Available"
            } else {
                "Not Available"
            }
        )
    }
}

impl LineRecord for Car {
    const KIND: &'static str = "car";

    fn encode(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.license_plate,
            self.brand,
            self.model,
            self.year,
            self.price_per_day,
            u8::from(self.available)
        )
    }

    fn decode(line: &str) -> Result<Self, DecodeError> {
        let fields = split_fields(Self::KIND, line, 6)?;
        Ok(Self {
            license_plate: fields[0].to_string(),
            brand: fields[1].to_string(),
            model: fields[2].to_string(),
            year: parse_field(Self::KIND, "year", fields[3])?,
            price_per_day: parse_field(Self::KIND, "price_per_day", fields[4])?,
            available: fields[5] == "1",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_car_is_available() {
        let car = Car::new("ABC123", "Toyota", "Corolla", 2020, 50.0);
        assert!(car.available);
        assert_eq!(car.license_plate, "ABC123");
    }

    #[test]
    fn test_encode() {
        let mut car = Car::new("ABC123", "Toyota", "Corolla", 2020, 49.5);
        assert_eq!(car.encode(), "ABC123,Toyota,Corolla,2020,49.5,1");
        car.available = false;
        assert_eq!(car.encode(), "ABC123,Toyota,Corolla,2020,49.5,0");
    }

    #[test]
    fn test_whole_price_encodes_without_fraction() {
        let car = Car::new("X1", "Kia", "Rio", 2018, 50.0);
        assert_eq!(car.encode(), "X1,Kia,Rio,2018,50,1");
    }

    #[test]
    fn test_round_trip() {
        let mut car = Car::new("ZZ-900", "Volvo", "V70", 2011, 72.25);
        car.available = false;
        assert_eq!(Car::decode(&car.encode()).unwrap(), car);
    }

    #[test]
    fn test_availability_decodes_by_exact_match() {
        assert!(Car::decode("A,B,C,2000,10,1").unwrap().available);
        assert!(!Car::decode("A,B,C,2000,10,0").unwrap().available);
        assert!(!Car::decode("A,B,C,2000,10,true").unwrap().available);
    }

    #[test]
    fn test_decode_rejects_bad_year() {
        let err = Car::decode("A,B,C,twenty,10,1").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { field: "year", .. }));
    }

    #[test]
    fn test_decode_rejects_embedded_delimiter() {
        let car = Car::new("A1", "Mercedes, Benz", "C", 2019, 90.0);
        assert!(matches!(
            Car::decode(&car.encode()),
            Err(DecodeError::FieldCount { found: 7, .. })
        ));
    }

    #[test]
    fn test_cost_for() {
        let car = Car::new("A", "B", "C", 2000, 50.0);
        assert!((car.cost_for(3) - 150.0).abs() < f64::EPSILON);
        assert!((car.cost_for(0)).abs() < f64::EPSILON);
        assert!((car.cost_for(-2) + 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display() {
        let car = Car::new("ABC123", "Toyota", "Corolla", 2020, 50.0);
        let text = car.to_string();
        assert!(text.contains("License Plate: ABC123"));
        assert!(text.contains("Price per Day: $50"));
        assert!(text.ends_with("Availability: Available"));
    }
}
