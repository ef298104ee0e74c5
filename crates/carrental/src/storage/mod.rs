//! Storage layer for carrental.
//!
//! This module provides the in-memory [`Store`] holding every record kind in
//! insertion order, keyed lookups over those collections, and flat-file
//! persistence (see [`files`]).

pub mod files;

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::records::{
    Car, Customer, CustomerId, DecodeError, LineRecord, Payment, PaymentId, Rental, RentalId,
    Timestamp,
};

pub use files::DataFiles;

/// In-memory record store.
///
/// Holds four ordered collections plus the next-id counters for the kinds
/// whose ids are assigned here. Every collection keeps a key index in step
/// with it, so each key maps to exactly one record.
#[derive(Debug, Clone)]
pub struct Store {
    cars: Vec<Car>,
    customers: Vec<Customer>,
    rentals: Vec<Rental>,
    payments: Vec<Payment>,
    car_index: HashMap<String, usize>,
    customer_index: HashMap<CustomerId, usize>,
    rental_index: HashMap<RentalId, usize>,
    payment_index: HashMap<PaymentId, usize>,
    next_customer_id: CustomerId,
    next_rental_id: RentalId,
    next_payment_id: PaymentId,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create an empty store whose counters all start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cars: Vec::new(),
            customers: Vec::new(),
            rentals: Vec::new(),
            payments: Vec::new(),
            car_index: HashMap::new(),
            customer_index: HashMap::new(),
            rental_index: HashMap::new(),
            payment_index: HashMap::new(),
            next_customer_id: CustomerId::FIRST,
            next_rental_id: RentalId::FIRST,
            next_payment_id: PaymentId::FIRST,
        }
    }

    /// Load a store from the given data files.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or contains a malformed line.
    pub fn load(files: &DataFiles) -> Result<Self> {
        files::load(files)
    }

    /// Write every record to the given data files, replacing their contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or a file cannot be written.
    pub fn save(&self, files: &DataFiles) -> Result<()> {
        files::save(self, files)
    }

    /// All cars in insertion order.
    #[must_use]
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    /// All customers in insertion order.
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// All rentals in insertion order.
    #[must_use]
    pub fn rentals(&self) -> &[Rental] {
        &self.rentals
    }

    /// All payments in insertion order.
    #[must_use]
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// The id the next added customer will receive.
    #[must_use]
    pub fn next_customer_id(&self) -> CustomerId {
        self.next_customer_id
    }

    /// The id the next added rental will receive.
    #[must_use]
    pub fn next_rental_id(&self) -> RentalId {
        self.next_rental_id
    }

    /// The id the next added payment will receive.
    #[must_use]
    pub fn next_payment_id(&self) -> PaymentId {
        self.next_payment_id
    }

    /// Find a car by license plate.
    #[must_use]
    pub fn find_car(&self, license: &str) -> Option<&Car> {
        self.car_index.get(license).map(|&i| &self.cars[i])
    }

    /// Find a customer by id.
    #[must_use]
    pub fn find_customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customer_index.get(&id).map(|&i| &self.customers[i])
    }

    /// Find a rental by id.
    #[must_use]
    pub fn find_rental(&self, id: RentalId) -> Option<&Rental> {
        self.rental_index.get(&id).map(|&i| &self.rentals[i])
    }

    /// Find a payment by id.
    #[must_use]
    pub fn find_payment(&self, id: PaymentId) -> Option<&Payment> {
        self.payment_index.get(&id).map(|&i| &self.payments[i])
    }

    /// Add a car to the fleet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCar`] if a car with the same license plate exists.
    pub fn add_car(&mut self, car: Car) -> Result<()> {
        if self.car_index.contains_key(&car.license_plate) {
            return Err(Error::DuplicateCar {
                license: car.license_plate,
            });
        }
        debug!("Adding car {}", car.license_plate);
        self.car_index
            .insert(car.license_plate.clone(), self.cars.len());
        self.cars.push(car);
        Ok(())
    }

    /// Remove a car by license plate, returning it.
    ///
    /// Rentals referring to the car are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CarNotFound`] if no car has that license plate.
    pub fn remove_car(&mut self, license: &str) -> Result<Car> {
        let index = self
            .car_index
            .remove(license)
            .ok_or_else(|| Error::car_not_found(license))?;
        let car = self.cars.remove(index);
        // Positions after the removed car shift down by one.
        for slot in self.car_index.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        debug!("Removed car {}", car.license_plate);
        Ok(car)
    }

    /// Set a car's availability flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CarNotFound`] if no car has that license plate.
    pub fn set_car_available(&mut self, license: &str, available: bool) -> Result<()> {
        let &index = self
            .car_index
            .get(license)
            .ok_or_else(|| Error::car_not_found(license))?;
        self.cars[index].available = available;
        debug!("Car {} availability set to {}", license, available);
        Ok(())
    }

    /// Register a customer under the next customer id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdsExhausted`] once no further customer id exists.
    pub fn add_customer(
        &mut self,
        name: impl Into<String>,
        driver_license: impl Into<String>,
        contact_info: impl Into<String>,
    ) -> Result<CustomerId> {
        let id = self.next_customer_id;
        self.next_customer_id = id.checked_next().ok_or(Error::IdsExhausted {
            kind: Customer::KIND,
        })?;
        self.customer_index.insert(id, self.customers.len());
        self.customers.push(Customer {
            id,
            name: name.into(),
            driver_license: driver_license.into(),
            contact_info: contact_info.into(),
        });
        debug!("Added customer {}", id);
        Ok(id)
    }

    /// Append an open rental under the next rental id.
    ///
    /// This does not check the references or touch the car; use
    /// [`crate::operations::rent_car`] for the full workflow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdsExhausted`] once no further rental id exists.
    pub fn add_rental(
        &mut self,
        customer_id: CustomerId,
        car_license: impl Into<String>,
        start: Timestamp,
        total_cost: f64,
    ) -> Result<RentalId> {
        let id = self.next_rental_id;
        self.next_rental_id = id.checked_next().ok_or(Error::IdsExhausted {
            kind: Rental::KIND,
        })?;
        self.rental_index.insert(id, self.rentals.len());
        self.rentals.push(Rental {
            id,
            customer_id,
            car_license: car_license.into(),
            start,
            end: None,
            total_cost,
        });
        debug!("Added rental {}", id);
        Ok(id)
    }

    /// Record the end of a rental. The cost is left as it is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RentalNotFound`] if no rental has that id.
    pub fn close_rental(&mut self, id: RentalId, end: Timestamp) -> Result<&Rental> {
        let &index = self
            .rental_index
            .get(&id)
            .ok_or(Error::RentalNotFound { id })?;
        self.rentals[index].end = Some(end);
        debug!("Closed rental {}", id);
        Ok(&self.rentals[index])
    }

    /// Append a payment under the next payment id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdsExhausted`] once no further payment id exists.
    pub fn add_payment(
        &mut self,
        rental_id: RentalId,
        amount: f64,
        method: impl Into<String>,
        date: Timestamp,
    ) -> Result<PaymentId> {
        let id = self.next_payment_id;
        self.next_payment_id = id.checked_next().ok_or(Error::IdsExhausted {
            kind: Payment::KIND,
        })?;
        self.payment_index.insert(id, self.payments.len());
        self.payments.push(Payment {
            id,
            rental_id,
            amount,
            method: method.into(),
            date,
        });
        debug!("Added payment {} for rental {}", id, rental_id);
        Ok(id)
    }

    /// Get per-collection record counts.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            cars: self.cars.len(),
            customers: self.customers.len(),
            rentals: self.rentals.len(),
            payments: self.payments.len(),
        }
    }

    pub(crate) fn restore_car(&mut self, car: Car) -> std::result::Result<(), DecodeError> {
        let key = car.license_plate.clone();
        restore(&mut self.cars, &mut self.car_index, key, car)
    }

    pub(crate) fn restore_customer(
        &mut self,
        customer: Customer,
    ) -> std::result::Result<(), DecodeError> {
        let id = customer.id;
        let next = id.checked_next().ok_or(DecodeError::IdOutOfRange {
            kind: Customer::KIND,
            id: id.0,
        })?;
        restore(&mut self.customers, &mut self.customer_index, id, customer)?;
        self.next_customer_id = self.next_customer_id.max(next);
        Ok(())
    }

    pub(crate) fn restore_rental(&mut self, rental: Rental) -> std::result::Result<(), DecodeError> {
        let id = rental.id;
        let next = id.checked_next().ok_or(DecodeError::IdOutOfRange {
            kind: Rental::KIND,
            id: id.0,
        })?;
        restore(&mut self.rentals, &mut self.rental_index, id, rental)?;
        self.next_rental_id = self.next_rental_id.max(next);
        Ok(())
    }

    pub(crate) fn restore_payment(
        &mut self,
        payment: Payment,
    ) -> std::result::Result<(), DecodeError> {
        let id = payment.id;
        let next = id.checked_next().ok_or(DecodeError::IdOutOfRange {
            kind: Payment::KIND,
            id: id.0,
        })?;
        restore(&mut self.payments, &mut self.payment_index, id, payment)?;
        self.next_payment_id = self.next_payment_id.max(next);
        Ok(())
    }
}

/// Append a loaded record, refusing a key that is already present.
fn restore<K, T>(
    records: &mut Vec<T>,
    index: &mut HashMap<K, usize>,
    key: K,
    record: T,
) -> std::result::Result<(), DecodeError>
where
    K: Eq + Hash + ToString,
    T: LineRecord,
{
    if index.contains_key(&key) {
        return Err(DecodeError::DuplicateKey {
            kind: T::KIND,
            key: key.to_string(),
        });
    }
    index.insert(key, records.len());
    records.push(record);
    Ok(())
}

/// Record counts per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of cars.
    pub cars: usize,
    /// Number of customers.
    pub customers: usize,
    /// Number of rentals.
    pub rentals: usize,
    /// Number of payments.
    pub payments: usize,
}
