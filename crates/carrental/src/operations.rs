//! Rental and payment workflows.
//!
//! Each workflow validates its references against the [`Store`] before
//! mutating anything, so a failed call leaves the store untouched. The
//! `*_at` variants take the current time explicitly.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::records::{self, CustomerId, PaymentId, RentalId, Timestamp};
use crate::storage::Store;

/// Outcome of a successful rental.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RentalReceipt {
    /// Id of the new rental.
    pub rental_id: RentalId,
    /// Cost fixed at rental time.
    pub total_cost: f64,
}

/// Outcome of a successful return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnReceipt {
    /// The closed rental.
    pub rental_id: RentalId,
    /// License plate of the returned car.
    pub car_license: String,
    /// Whether the car was still in the fleet and was marked available again.
    pub car_released: bool,
}

/// Rent a car to a customer for `days` days, starting now.
///
/// # Errors
///
/// See [`rent_car_at`].
pub fn rent_car(
    store: &mut Store,
    customer_id: CustomerId,
    license: &str,
    days: i32,
) -> Result<RentalReceipt> {
    rent_car_at(store, customer_id, license, days, records::now())
}

/// Rent a car to a customer for `days` days, starting at `start`.
///
/// The cost is the car's daily price times `days`. The day count is taken
/// as given, including zero or negative values.
///
/// # Errors
///
/// Returns [`Error::CustomerNotFound`], [`Error::CarNotFound`] or
/// [`Error::CarUnavailable`]; in each case nothing is changed.
pub fn rent_car_at(
    store: &mut Store,
    customer_id: CustomerId,
    license: &str,
    days: i32,
    start: Timestamp,
) -> Result<RentalReceipt> {
    if store.find_customer(customer_id).is_none() {
        warn!("Rent rejected: unknown customer {}", customer_id);
        return Err(Error::CustomerNotFound { id: customer_id });
    }
    let car = store.find_car(license).ok_or_else(|| {
        warn!("Rent rejected: unknown car {}", license);
        Error::car_not_found(license)
    })?;
    if !car.available {
        warn!("Rent rejected: car {} is already rented", license);
        return Err(Error::car_unavailable(license));
    }

    let total_cost = car.cost_for(days);
    let rental_id = store.add_rental(customer_id, license, start, total_cost)?;
    store.set_car_available(license, false)?;

    info!(
        "Rental {} opened: customer {} took {} for {} days ({})",
        rental_id, customer_id, license, days, total_cost
    );
    Ok(RentalReceipt {
        rental_id,
        total_cost,
    })
}

/// Return the car of a rental now.
///
/// # Errors
///
/// See [`return_car_at`].
pub fn return_car(store: &mut Store, rental_id: RentalId) -> Result<ReturnReceipt> {
    return_car_at(store, rental_id, records::now())
}

/// Return the car of a rental at `end`.
///
/// The rental's cost is not recalculated. If the car has been removed from
/// the fleet in the meantime the rental is still closed.
///
/// # Errors
///
/// Returns [`Error::RentalNotFound`] for an unknown id and
/// [`Error::AlreadyReturned`] for a rental that is already closed.
pub fn return_car_at(
    store: &mut Store,
    rental_id: RentalId,
    end: Timestamp,
) -> Result<ReturnReceipt> {
    let rental = store.find_rental(rental_id).ok_or_else(|| {
        warn!("Return rejected: unknown rental {}", rental_id);
        Error::RentalNotFound { id: rental_id }
    })?;
    if !rental.is_open() {
        warn!("Return rejected: rental {} already closed", rental_id);
        return Err(Error::AlreadyReturned { id: rental_id });
    }

    let car_license = store.close_rental(rental_id, end)?.car_license.clone();
    let car_released = store.find_car(&car_license).is_some();
    if car_released {
        store.set_car_available(&car_license, true)?;
    } else {
        warn!(
            "Rental {} closed but car {} is no longer in the fleet",
            rental_id, car_license
        );
    }

    info!("Rental {} closed, car {} returned", rental_id, car_license);
    Ok(ReturnReceipt {
        rental_id,
        car_license,
        car_released,
    })
}

/// Record a payment against a rental, dated now.
///
/// # Errors
///
/// See [`process_payment_at`].
pub fn process_payment(
    store: &mut Store,
    rental_id: RentalId,
    amount: f64,
    method: &str,
) -> Result<PaymentId> {
    process_payment_at(store, rental_id, amount, method, records::now())
}

/// Record a payment against a rental, dated `date`.
///
/// The amount is not compared with the rental's cost and a rental may be
/// paid any number of times.
///
/// # Errors
///
/// Returns [`Error::RentalNotFound`] if the rental id is unknown.
pub fn process_payment_at(
    store: &mut Store,
    rental_id: RentalId,
    amount: f64,
    method: &str,
    date: Timestamp,
) -> Result<PaymentId> {
    if store.find_rental(rental_id).is_none() {
        warn!("Payment rejected: unknown rental {}", rental_id);
        return Err(Error::RentalNotFound { id: rental_id });
    }
    let payment_id = store.add_payment(rental_id, amount, method, date)?;
    info!(
        "Payment {} of {} by {} recorded for rental {}",
        payment_id, amount, method, rental_id
    );
    Ok(payment_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ts, Car, OPEN_RENTAL_SENTINEL};
    use crate::LineRecord;

    fn create_test_store() -> Store {
        crate::logging::init_test_logging();
        let mut store = Store::new();
        store
            .add_car(Car::new("ABC123", "Toyota", "Corolla", 2020, 50.0))
            .unwrap();
        store
            .add_customer("Ann Smith", "DL-1", "ann@example.com")
            .unwrap();
        store
    }

    fn snapshot(store: &Store) -> (Vec<Car>, usize, usize, RentalId, PaymentId) {
        (
            store.cars().to_vec(),
            store.rentals().len(),
            store.payments().len(),
            store.next_rental_id(),
            store.next_payment_id(),
        )
    }

    #[test]
    fn test_end_to_end_rent_return_pay() {
        let mut store = create_test_store();

        let receipt = rent_car(&mut store, CustomerId(1), "ABC123", 3).unwrap();
        assert_eq!(receipt.rental_id, RentalId(1));
        assert!((receipt.total_cost - 150.0).abs() < f64::EPSILON);
        let rental = store.find_rental(RentalId(1)).unwrap();
        assert!(rental.encode().contains(&format!(",{},", OPEN_RENTAL_SENTINEL)));
        assert!(!store.find_car("ABC123").unwrap().available);

        let returned = return_car(&mut store, RentalId(1)).unwrap();
        assert!(returned.car_released);
        let rental = store.find_rental(RentalId(1)).unwrap();
        assert!(rental.end.is_some());
        assert!((rental.total_cost - 150.0).abs() < f64::EPSILON);
        assert!(store.find_car("ABC123").unwrap().available);

        let payment_id = process_payment(&mut store, RentalId(1), 150.0, "Cash").unwrap();
        assert_eq!(payment_id, PaymentId(1));
        let payment = store.find_payment(payment_id).unwrap();
        assert_eq!(payment.rental_id, RentalId(1));
        assert_eq!(payment.method, "Cash");
    }

    #[test]
    fn test_rent_records_start_time() {
        let mut store = create_test_store();
        let start = ts("2024-06-01 12:00:00");
        rent_car_at(&mut store, CustomerId(1), "ABC123", 2, start).unwrap();
        assert_eq!(store.rentals()[0].start, start);
        assert!(store.rentals()[0].is_open());
    }

    #[test]
    fn test_rent_unknown_customer() {
        let mut store = create_test_store();
        let before = snapshot(&store);
        let err = rent_car(&mut store, CustomerId(99), "ABC123", 3).unwrap_err();
        assert!(matches!(err, Error::CustomerNotFound { id: CustomerId(99) }));
        assert_eq!(snapshot(&store), before);
    }

    #[test]
    fn test_rent_unknown_car() {
        let mut store = create_test_store();
        let before = snapshot(&store);
        let err = rent_car(&mut store, CustomerId(1), "NOPE", 3).unwrap_err();
        assert!(matches!(err, Error::CarNotFound { .. }));
        assert_eq!(snapshot(&store), before);
    }

    #[test]
    fn test_rent_unavailable_car() {
        let mut store = create_test_store();
        rent_car(&mut store, CustomerId(1), "ABC123", 1).unwrap();
        let before = snapshot(&store);

        let err = rent_car(&mut store, CustomerId(1), "ABC123", 2).unwrap_err();
        assert!(matches!(err, Error::CarUnavailable { .. }));
        assert_eq!(snapshot(&store), before);
    }

    #[test]
    fn test_rent_does_not_validate_days() {
        let mut store = create_test_store();
        let receipt = rent_car(&mut store, CustomerId(1), "ABC123", -2).unwrap();
        assert!((receipt.total_cost + 100.0).abs() < f64::EPSILON);

        store.add_car(Car::new("ZERO", "A", "B", 2000, 80.0)).unwrap();
        let receipt = rent_car(&mut store, CustomerId(1), "ZERO", 0).unwrap();
        assert!(receipt.total_cost.abs() < f64::EPSILON);
    }

    #[test]
    fn test_return_unknown_rental() {
        let mut store = create_test_store();
        rent_car(&mut store, CustomerId(1), "ABC123", 1).unwrap();
        let before = snapshot(&store);

        let err = return_car(&mut store, RentalId(42)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(snapshot(&store), before);
        assert!(store.find_rental(RentalId(1)).unwrap().is_open());
    }

    #[test]
    fn test_return_keeps_cost_regardless_of_duration() {
        let mut store = create_test_store();
        rent_car_at(&mut store, CustomerId(1), "ABC123", 3, ts("2024-01-01 10:00:00")).unwrap();
        return_car_at(&mut store, RentalId(1), ts("2024-01-20 10:00:00")).unwrap();
        let rental = store.find_rental(RentalId(1)).unwrap();
        assert!((rental.total_cost - 150.0).abs() < f64::EPSILON);
        assert_eq!(rental.end, Some(ts("2024-01-20 10:00:00")));
    }

    #[test]
    fn test_return_twice_rejected() {
        let mut store = create_test_store();
        rent_car(&mut store, CustomerId(1), "ABC123", 1).unwrap();
        return_car_at(&mut store, RentalId(1), ts("2024-01-02 10:00:00")).unwrap();

        // The car goes out again under a new rental.
        rent_car(&mut store, CustomerId(1), "ABC123", 1).unwrap();

        let err = return_car(&mut store, RentalId(1)).unwrap_err();
        assert!(matches!(err, Error::AlreadyReturned { id: RentalId(1) }));
        assert!(!store.find_car("ABC123").unwrap().available);
        assert_eq!(
            store.find_rental(RentalId(1)).unwrap().end,
            Some(ts("2024-01-02 10:00:00"))
        );
    }

    #[test]
    fn test_return_after_car_removed() {
        let mut store = create_test_store();
        rent_car(&mut store, CustomerId(1), "ABC123", 1).unwrap();
        store.remove_car("ABC123").unwrap();

        let receipt = return_car(&mut store, RentalId(1)).unwrap();
        assert!(!receipt.car_released);
        assert!(!store.find_rental(RentalId(1)).unwrap().is_open());
    }

    #[test]
    fn test_payment_unknown_rental() {
        let mut store = create_test_store();
        let before = snapshot(&store);
        let err = process_payment(&mut store, RentalId(1), 10.0, "Cash").unwrap_err();
        assert!(matches!(err, Error::RentalNotFound { .. }));
        assert_eq!(snapshot(&store), before);
    }

    #[test]
    fn test_payments_are_unconstrained() {
        let mut store = create_test_store();
        rent_car(&mut store, CustomerId(1), "ABC123", 3).unwrap();

        let first = process_payment(&mut store, RentalId(1), 20.0, "Cash").unwrap();
        let second = process_payment(&mut store, RentalId(1), 500.0, "CreditCard").unwrap();
        assert_eq!(first, PaymentId(1));
        assert_eq!(second, PaymentId(2));
        assert_eq!(store.payments().len(), 2);
    }

    #[test]
    fn test_rental_ids_continue_after_load_counters() {
        let mut store = create_test_store();
        store
            .restore_rental(crate::records::Rental {
                id: RentalId(10),
                customer_id: CustomerId(1),
                car_license: "OLD".to_string(),
                start: ts("2023-01-01 10:00:00"),
                end: Some(ts("2023-01-02 10:00:00")),
                total_cost: 10.0,
            })
            .unwrap();

        let receipt = rent_car(&mut store, CustomerId(1), "ABC123", 1).unwrap();
        assert_eq!(receipt.rental_id, RentalId(11));
    }
}
