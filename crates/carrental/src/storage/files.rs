//! Flat-file persistence for the record store.
//!
//! Each record kind lives in its own text file, one encoded record per
//! line, no header. Loading skips blank lines and treats any other line
//! that fails to decode as fatal. Saving rewrites every file in full.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::records::{Car, Customer, DecodeError, LineRecord, Payment, Rental};

use super::Store;

/// Default file name for cars.
pub const CARS_FILE: &str = "cars.txt";

/// Default file name for customers.
pub const CUSTOMERS_FILE: &str = "customers.txt";

/// Default file name for rentals.
pub const RENTALS_FILE: &str = "rentals.txt";

/// Default file name for payments.
pub const PAYMENTS_FILE: &str = "payments.txt";

/// Locations of the four data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    /// Directory holding the files; created on save if missing.
    pub dir: PathBuf,
    /// Cars file.
    pub cars: PathBuf,
    /// Customers file.
    pub customers: PathBuf,
    /// Rentals file.
    pub rentals: PathBuf,
    /// Payments file.
    pub payments: PathBuf,
}

impl DataFiles {
    /// Use the default file names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::with_names(dir, CARS_FILE, CUSTOMERS_FILE, RENTALS_FILE, PAYMENTS_FILE)
    }

    /// Use custom file names inside `dir`.
    #[must_use]
    pub fn with_names(
        dir: impl AsRef<Path>,
        cars: &str,
        customers: &str,
        rentals: &str,
        payments: &str,
    ) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            cars: dir.join(cars),
            customers: dir.join(customers),
            rentals: dir.join(rentals),
            payments: dir.join(payments),
            dir,
        }
    }
}

/// Load every data file into a fresh store.
///
/// Missing files load as empty collections.
///
/// # Errors
///
/// Returns an error if a file cannot be read, or if a line is malformed or
/// repeats a key.
pub fn load(files: &DataFiles) -> Result<Store> {
    let mut store = Store::new();

    let cars = read_records::<Car>(&files.cars, |car| store.restore_car(car))?;
    let customers =
        read_records::<Customer>(&files.customers, |customer| store.restore_customer(customer))?;
    let rentals = read_records::<Rental>(&files.rentals, |rental| store.restore_rental(rental))?;
    let payments =
        read_records::<Payment>(&files.payments, |payment| store.restore_payment(payment))?;

    info!(
        "Loaded {} cars, {} customers, {} rentals, {} payments from {}",
        cars,
        customers,
        rentals,
        payments,
        files.dir.display()
    );
    Ok(store)
}

/// Write every collection to its data file, replacing previous contents.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or a file cannot
/// be written.
pub fn save(store: &Store, files: &DataFiles) -> Result<()> {
    if !files.dir.as_os_str().is_empty() && !files.dir.exists() {
        fs::create_dir_all(&files.dir).map_err(|source| Error::DirectoryCreate {
            path: files.dir.clone(),
            source,
        })?;
    }

    write_records(&files.cars, store.cars())?;
    write_records(&files.customers, store.customers())?;
    write_records(&files.rentals, store.rentals())?;
    write_records(&files.payments, store.payments())?;

    let stats = store.stats();
    info!(
        "Saved {} cars, {} customers, {} rentals, {} payments to {}",
        stats.cars,
        stats.customers,
        stats.rentals,
        stats.payments,
        files.dir.display()
    );
    Ok(())
}

/// Decode each non-blank line of `path` and hand it to `sink`.
///
/// Returns the number of records read.
fn read_records<T: LineRecord>(
    path: &Path,
    mut sink: impl FnMut(T) -> std::result::Result<(), DecodeError>,
) -> Result<usize> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No {} file at {}, starting empty", T::KIND, path.display());
            return Ok(0);
        }
        Err(source) => {
            return Err(Error::DataRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut count = 0;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| Error::DataRead {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        T::decode(&line)
            .and_then(&mut sink)
            .map_err(|source| Error::MalformedRecord {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })?;
        count += 1;
    }
    Ok(count)
}

fn write_records<T: LineRecord>(path: &Path, records: &[T]) -> Result<()> {
    let write_err = |source| Error::DataWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut out = BufWriter::new(File::create(path).map_err(write_err)?);
    for record in records {
        writeln!(out, "{}", record.encode()).map_err(write_err)?;
    }
    out.flush().map_err(write_err)?;
    debug!("Wrote {} {} records to {}", records.len(), T::KIND, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ts, CustomerId, PaymentId, RentalId};
    use tempfile::TempDir;

    fn populated_store() -> Store {
        let mut store = Store::new();
        store
            .add_car(Car::new("ABC123", "Toyota", "Corolla", 2020, 50.0))
            .unwrap();
        store
            .add_car(Car::new("DEF456", "Honda", "Civic", 2019, 42.5))
            .unwrap();
        store
            .add_car(Car::new("GHI789", "Ford", "Focus", 2021, 55.0))
            .unwrap();
        store.remove_car("DEF456").unwrap();
        store.set_car_available("GHI789", false).unwrap();

        let ann = store
            .add_customer("Ann Smith", "DL-1", "ann@example.com")
            .unwrap();
        let bob = store.add_customer("Bob Jones", "DL-2", "555-0100").unwrap();

        let r1 = store
            .add_rental(ann, "ABC123", ts("2024-02-01 08:00:00"), 150.0)
            .unwrap();
        store.close_rental(r1, ts("2024-02-03 18:30:00")).unwrap();
        store
            .add_rental(bob, "GHI789", ts("2024-02-05 09:15:00"), 110.0)
            .unwrap();

        store
            .add_payment(r1, 100.0, "CreditCard", ts("2024-02-03 18:35:00"))
            .unwrap();
        store
            .add_payment(r1, 50.0, "Cash", ts("2024-02-04 10:00:00"))
            .unwrap();
        store
    }

    #[test]
    fn test_in_dir_uses_default_names() {
        let files = DataFiles::in_dir("/data");
        assert_eq!(files.cars, PathBuf::from("/data/cars.txt"));
        assert_eq!(files.customers, PathBuf::from("/data/customers.txt"));
        assert_eq!(files.rentals, PathBuf::from("/data/rentals.txt"));
        assert_eq!(files.payments, PathBuf::from("/data/payments.txt"));
    }

    #[test]
    fn test_load_missing_files_gives_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = load(&DataFiles::in_dir(dir.path())).unwrap();
        assert_eq!(store.stats(), crate::storage::StoreStats::default());
        assert_eq!(store.next_customer_id(), CustomerId(1));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let files = DataFiles::in_dir(dir.path());
        let store = populated_store();

        save(&store, &files).unwrap();
        let loaded = load(&files).unwrap();

        assert_eq!(loaded.cars(), store.cars());
        assert_eq!(loaded.customers(), store.customers());
        assert_eq!(loaded.rentals(), store.rentals());
        assert_eq!(loaded.payments(), store.payments());
        assert!(loaded.next_customer_id() >= store.next_customer_id());
        assert!(loaded.next_rental_id() >= store.next_rental_id());
        assert!(loaded.next_payment_id() >= store.next_payment_id());
    }

    #[test]
    fn test_saved_file_format() {
        let dir = TempDir::new().unwrap();
        let files = DataFiles::in_dir(dir.path());
        save(&populated_store(), &files).unwrap();

        let cars = fs::read_to_string(&files.cars).unwrap();
        assert_eq!(
            cars,
            "ABC123,Toyota,Corolla,2020,50,1\nGHI789,Ford,Focus,2021,55,0\n"
        );
        let rentals = fs::read_to_string(&files.rentals).unwrap();
        assert!(rentals.ends_with("2,2,GHI789,2024-02-05 09:15:00,N/A,110\n"));
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let files = DataFiles::in_dir(dir.path().join("nested").join("data"));
        save(&Store::new(), &files).unwrap();
        assert!(files.cars.exists());
        assert_eq!(fs::read_to_string(&files.payments).unwrap(), "");
    }

    #[test]
    fn test_load_skips_blank_lines_and_advances_counters() {
        let dir = TempDir::new().unwrap();
        let files = DataFiles::in_dir(dir.path());
        fs::write(&files.customers, "3,Ann,DL1,x\n\n7,Bob,DL2,y\n").unwrap();
        fs::write(
            &files.rentals,
            "5,3,ABC123,2024-01-01 10:00:00,N/A,99.5\n",
        )
        .unwrap();
        fs::write(&files.payments, "12,5,99.5,Cash,2024-01-02 10:00:00\n").unwrap();

        let store = load(&files).unwrap();
        assert_eq!(store.customers().len(), 2);
        assert_eq!(store.next_customer_id(), CustomerId(8));
        assert_eq!(store.next_rental_id(), RentalId(6));
        assert_eq!(store.next_payment_id(), PaymentId(13));
    }

    #[test]
    fn test_load_malformed_line_reports_position() {
        let dir = TempDir::new().unwrap();
        let files = DataFiles::in_dir(dir.path());
        fs::write(&files.cars, "ABC123,Toyota,Corolla,2020,50,1\nbroken line\n").unwrap();

        let err = load(&files).unwrap_err();
        match err {
            Error::MalformedRecord { path, line, .. } => {
                assert_eq!(path, files.cars);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_rejects_id_without_successor() {
        let dir = TempDir::new().unwrap();
        let files = DataFiles::in_dir(dir.path());
        fs::write(&files.customers, "1,Ann,DL1,x\n4294967295,Bob,DL2,y\n").unwrap();

        let err = load(&files).unwrap_err();
        match err {
            Error::MalformedRecord { line, source, .. } => {
                assert_eq!(line, 2);
                assert!(matches!(
                    source,
                    DecodeError::IdOutOfRange {
                        kind: "customer",
                        id: u32::MAX
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ids_stay_unique_across_save_and_reload_near_the_limit() {
        let dir = TempDir::new().unwrap();
        let files = DataFiles::in_dir(dir.path());
        fs::write(&files.customers, "4294967294,Ann,DL1,x\n").unwrap();

        let mut store = load(&files).unwrap();
        assert!(matches!(
            store.add_customer("Bob", "DL2", "y"),
            Err(Error::IdsExhausted { .. })
        ));
        save(&store, &files).unwrap();

        let reloaded = load(&files).unwrap();
        assert_eq!(reloaded.customers().len(), 1);
    }

    #[test]
    fn test_load_duplicate_key_is_malformed() {
        let dir = TempDir::new().unwrap();
        let files = DataFiles::in_dir(dir.path());
        fs::write(&files.customers, "1,Ann,DL1,x\n1,Bob,DL2,y\n").unwrap();

        let err = load(&files).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRecord {
                line: 2,
                source: DecodeError::DuplicateKey { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_load_accepts_crlf_lines() {
        let dir = TempDir::new().unwrap();
        let files = DataFiles::in_dir(dir.path());
        fs::write(&files.cars, "ABC123,Toyota,Corolla,2020,50,1\r\n").unwrap();

        let store = load(&files).unwrap();
        assert!(store.find_car("ABC123").unwrap().available);
    }
}
