//! Interactive menu shell.
//!
//! The shell reads one menu choice at a time from any [`BufRead`] and writes
//! prompts and results to any [`Write`], calling into the store and the
//! workflows in [`crate::operations`]. Rejected operations are reported and
//! the menu is shown again; only I/O failures end the loop early.

use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::operations;
use crate::records::{is_storable_text, Car, CustomerId, RentalId};
use crate::report::{write_listing, RecordKind};
use crate::storage::Store;

const MENU: &str = "
----- Car Rental System Menu -----
1. Add Car
2. Remove Car
3. List Cars
4. Add Customer
5. List Customers
6. Rent Car
7. Return Car
8. Process Payment
9. Generate Report
10. System Status
11. Extra Processing
0. Exit";

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Add a car to the fleet.
    AddCar,
    /// Remove a car by license plate.
    RemoveCar,
    /// List all cars.
    ListCars,
    /// Register a customer.
    AddCustomer,
    /// List all customers.
    ListCustomers,
    /// Rent a car.
    RentCar,
    /// Return a rented car.
    ReturnCar,
    /// Record a payment.
    ProcessPayment,
    /// List all rentals.
    GenerateReport,
    /// Show collection counts.
    SystemStatus,
    /// Run the processing demo.
    ExtraProcessing,
    /// Leave the shell.
    Exit,
}

impl FromStr for MenuChoice {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let choice = match s.trim().parse::<u8>().map_err(|_| ())? {
            1 => Self::AddCar,
            2 => Self::RemoveCar,
            3 => Self::ListCars,
            4 => Self::AddCustomer,
            5 => Self::ListCustomers,
            6 => Self::RentCar,
            7 => Self::ReturnCar,
            8 => Self::ProcessPayment,
            9 => Self::GenerateReport,
            10 => Self::SystemStatus,
            11 => Self::ExtraProcessing,
            0 => Self::Exit,
            _ => return Err(()),
        };
        Ok(choice)
    }
}

/// The interactive shell over a store.
#[derive(Debug)]
pub struct Shell<'a, R, W> {
    store: &'a mut Store,
    input: R,
    output: W,
    extra_processing_steps: u32,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    /// Create a shell reading from `input` and writing to `output`.
    pub fn new(store: &'a mut Store, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
            extra_processing_steps: 5,
        }
    }

    /// Set how many steps the processing demo prints.
    #[must_use]
    pub fn with_extra_processing_steps(mut self, steps: u32) -> Self {
        self.extra_processing_steps = steps;
        self
    }

    /// Give back the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu loop until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let line = match self.read_line("Enter your choice: ") {
                Ok(line) => line,
                Err(Error::InputClosed) => return Ok(()),
                Err(e) => return Err(e),
            };

            let Ok(choice) = line.parse::<MenuChoice>() else {
                writeln!(self.output, "Invalid choice! Please try again.")?;
                continue;
            };

            debug!("Menu choice {:?}", choice);
            match self.dispatch(choice) {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) | Err(Error::InputClosed) => return Ok(()),
                Err(e) if e.is_recoverable() => {
                    writeln!(self.output, "{}", failure_message(&e))?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<ControlFlow<()>> {
        match choice {
            MenuChoice::AddCar => self.add_car()?,
            MenuChoice::RemoveCar => self.remove_car()?,
            MenuChoice::ListCars => self.list(RecordKind::Cars)?,
            MenuChoice::AddCustomer => self.add_customer()?,
            MenuChoice::ListCustomers => self.list(RecordKind::Customers)?,
            MenuChoice::RentCar => self.rent_car()?,
            MenuChoice::ReturnCar => self.return_car()?,
            MenuChoice::ProcessPayment => self.process_payment()?,
            MenuChoice::GenerateReport => self.list(RecordKind::Rentals)?,
            MenuChoice::SystemStatus => writeln!(self.output, "{}", self.store.stats())?,
            MenuChoice::ExtraProcessing => self.extra_processing()?,
            MenuChoice::Exit => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    fn add_car(&mut self) -> Result<()> {
        let license = self.prompt_key("Enter License Plate: ")?;
        let brand = self.prompt_text("Enter Brand: ")?;
        let model = self.prompt_text("Enter Model: ")?;
        let year: i32 = self.prompt_number("Enter Year: ")?;
        let price = self.prompt_amount("Enter Rental Price Per Day: ")?;

        self.store
            .add_car(Car::new(license, brand, model, year, price))?;
        writeln!(self.output, "Car added successfully!")?;
        Ok(())
    }

    fn remove_car(&mut self) -> Result<()> {
        let license = self.prompt_key("Enter License Plate of the car to remove: ")?;
        self.store.remove_car(&license)?;
        writeln!(self.output, "Car removed successfully!")?;
        Ok(())
    }

    fn list(&mut self, kind: RecordKind) -> Result<()> {
        write_listing(self.store, kind, &mut self.output)?;
        Ok(())
    }

    fn add_customer(&mut self) -> Result<()> {
        let name = self.prompt_text("Enter Customer Name: ")?;
        let driver_license = self.prompt_text("Enter Driver License Number: ")?;
        let contact_info = self.prompt_text("Enter Contact Info: ")?;

        let id = self.store.add_customer(name, driver_license, contact_info)?;
        writeln!(self.output, "Customer added successfully! (ID: {id})")?;
        Ok(())
    }

    fn rent_car(&mut self) -> Result<()> {
        let customer_id: CustomerId = self.prompt_number("Enter Customer ID: ")?;
        if self.store.find_customer(customer_id).is_none() {
            return Err(Error::CustomerNotFound { id: customer_id });
        }

        let license = self.prompt_key("Enter Car License Plate: ")?;
        match self.store.find_car(&license) {
            None => return Err(Error::car_not_found(license)),
            Some(car) if !car.available => return Err(Error::car_unavailable(license)),
            Some(_) => {}
        }

        let days: i32 = self.prompt_number("Enter Number of Rental Days: ")?;
        let receipt = operations::rent_car(self.store, customer_id, &license, days)?;
        writeln!(self.output, "Car rented successfully!")?;
        writeln!(self.output, "Rental ID: {}", receipt.rental_id)?;
        writeln!(self.output, "Total Cost: ${}", receipt.total_cost)?;
        Ok(())
    }

    fn return_car(&mut self) -> Result<()> {
        let rental_id: RentalId = self.prompt_number("Enter Rental ID for return: ")?;
        operations::return_car(self.store, rental_id)?;
        writeln!(self.output, "Car returned successfully!")?;
        Ok(())
    }

    fn process_payment(&mut self) -> Result<()> {
        let rental_id: RentalId = self.prompt_number("Enter Rental ID for Payment: ")?;
        if self.store.find_rental(rental_id).is_none() {
            return Err(Error::RentalNotFound { id: rental_id });
        }

        let amount = self.prompt_amount("Enter Payment Amount: ")?;
        let method = self.prompt_key("Enter Payment Method (CreditCard/Cash): ")?;
        let payment_id = operations::process_payment(self.store, rental_id, amount, &method)?;
        writeln!(
            self.output,
            "Payment processed successfully! (Payment ID: {payment_id})"
        )?;
        Ok(())
    }

    fn extra_processing(&mut self) -> Result<()> {
        writeln!(self.output, "Extra processing started.")?;
        for step in 1..=self.extra_processing_steps {
            writeln!(self.output, "Processing step {step}...")?;
        }
        writeln!(self.output, "Extra processing completed.")?;
        Ok(())
    }

    /// Read one line, without its line ending.
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Prompt for free text that can be stored as a field.
    fn prompt_text(&mut self, prompt: &str) -> Result<String> {
        loop {
            let value = self.read_line(prompt)?.trim().to_string();
            if is_storable_text(&value) {
                return Ok(value);
            }
            writeln!(self.output, "Commas are not allowed here, please try again.")?;
        }
    }

    /// Prompt for a non-empty single-word value such as a license plate.
    fn prompt_key(&mut self, prompt: &str) -> Result<String> {
        loop {
            let value = self.prompt_text(prompt)?;
            if !value.is_empty() && !value.contains(char::is_whitespace) {
                return Ok(value);
            }
            writeln!(self.output, "Please enter a single word without spaces.")?;
        }
    }

    /// Prompt until the input parses as `T`.
    fn prompt_number<T: FromStr>(&mut self, prompt: &str) -> Result<T> {
        loop {
            let line = self.read_line(prompt)?;
            match line.trim().parse() {
                Ok(value) => return Ok(value),
                Err(_) => {
                    writeln!(
                        self.output,
                        "Invalid number '{}', please try again.",
                        line.trim()
                    )?;
                }
            }
        }
    }

    /// Prompt until the input is a finite decimal number.
    fn prompt_amount(&mut self, prompt: &str) -> Result<f64> {
        loop {
            let value: f64 = self.prompt_number(prompt)?;
            if value.is_finite() {
                return Ok(value);
            }
            writeln!(self.output, "Invalid number '{value}', please try again.")?;
        }
    }
}

/// The message shown to the user for a rejected operation.
#[must_use]
pub fn failure_message(err: &Error) -> String {
    match err {
        Error::CustomerNotFound { .. } => "Customer not found!".to_string(),
        Error::CarNotFound { .. } => "Car not found!".to_string(),
        Error::CarUnavailable { .. } => "Car is not available for rent!".to_string(),
        Error::RentalNotFound { .. } => "Rental record not found!".to_string(),
        Error::AlreadyReturned { .. } => "Rental has already been returned!".to_string(),
        Error::DuplicateCar { .. } => {
            "A car with that license plate already exists!".to_string()
        }
        other => format!("Error: {other}"),
    }
}

/// Load the store, run the shell over it, and save on the way out.
///
/// The store is saved even when the console fails mid-session, before that
/// failure is returned.
///
/// # Errors
///
/// Returns an error if loading fails, if the console fails, or if saving
/// fails. A load failure means nothing is saved.
pub fn run_session<R: BufRead, W: Write>(config: &Config, input: R, output: W) -> Result<()> {
    let files = config.data_files();
    let mut store = Store::load(&files)?;

    let mut shell = Shell::new(&mut store, input, output)
        .with_extra_processing_steps(config.shell.extra_processing_steps);
    let outcome = shell.run();
    let mut output = shell.into_output();

    store.save(&files)?;
    if let Err(e) = outcome {
        warn!("Session aborted after saving: {}", e);
        return Err(e);
    }
    info!("Session ended");
    writeln!(output, "Exiting system. Goodbye!")?;
    Ok(())
}
