//! Booking form validation
//!
//! Checks every rule in one pass so a form can show all of its errors at
//! once:
//! - listing id present
//! - check-in not before today, check-out after check-in
//! - phone number length within the configured bounds
//! - at least one guest, and no more than the listing's maximum
//! - a total price that fits in [`Money`](crate::types::Money)
//! - payment screenshot attached
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use libroomstay::{BookingForm, Config, FeeSchedule, Listing, Money};
//! use libroomstay::service::validation::BookingValidator;
//!
//! let validator = BookingValidator::new(Arc::new(Config::default()));
//! let listing = Listing::new("lakeside-cabin", FeeSchedule::nightly(Money(12_000)), 4);
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//!
//! match validator.validate(&BookingForm::new("lakeside-cabin"), &listing, today) {
//!     Ok(request) => println!("ready: {}", request.request_id),
//!     Err(violations) => {
//!         for v in violations {
//!             println!("{}: {}", v.field(), v);
//!         }
//!     }
//! }
//! ```

use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::booking::BookingRequest;
use crate::form::{BookingField, BookingForm};
use crate::pricing::{StayPricer, StayQuote};
use crate::types::Listing;
use crate::Config;

/// A single reason the form can't be submitted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("Listing id is missing")]
    MissingListingId,

    #[error("Select check-in and check-out dates")]
    MissingDates,

    #[error("Check-in {check_in} is before today ({today})")]
    CheckInInPast { check_in: NaiveDate, today: NaiveDate },

    #[error("Check-out {check_out} must be after check-in {check_in}")]
    CheckOutNotAfterCheckIn {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Phone number must be {min} to {max} characters long (got {len})")]
    PhoneNumberLength { len: usize, min: usize, max: usize },

    #[error("At least one guest is required")]
    NoGuests,

    #[error("This listing can accommodate up to {max} guests (got {total})")]
    TooManyGuests { total: u64, max: u32 },

    #[error("The price of this stay is out of range")]
    PriceOutOfRange,

    #[error("Upload a payment screenshot")]
    MissingPaymentProof,
}

impl Violation {
    pub fn field(&self) -> BookingField {
        match self {
            Violation::MissingListingId => BookingField::ListingId,
            Violation::MissingDates | Violation::CheckInInPast { .. } => BookingField::CheckIn,
            Violation::CheckOutNotAfterCheckIn { .. } | Violation::PriceOutOfRange => {
                BookingField::CheckOut
            }
            Violation::PhoneNumberLength { .. } => BookingField::PhoneNumber,
            Violation::NoGuests | Violation::TooManyGuests { .. } => BookingField::Guests,
            Violation::MissingPaymentProof => BookingField::PaymentProof,
        }
    }
}

/// Gate between the booking form and submission
#[derive(Clone)]
pub struct BookingValidator {
    config: Arc<Config>,
}

impl BookingValidator {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Validate the form and build a fresh [`BookingRequest`]
    ///
    /// # Errors
    ///
    /// Every violation found, in field order.
    pub fn validate(
        &self,
        form: &BookingForm,
        listing: &Listing,
        today: NaiveDate,
    ) -> Result<BookingRequest, Vec<Violation>> {
        let violations = self.violations(form, listing, today);
        if !violations.is_empty() {
            info!(
                listing = %form.listing_id,
                count = violations.len(),
                "Booking form failed validation"
            );
            return Err(violations);
        }

        let (check_in, check_out) = match (form.check_in, form.check_out) {
            (Some(check_in), Some(check_out)) => (check_in, check_out),
            _ => return Err(vec![Violation::MissingDates]),
        };
        let quote =
            price(listing, check_in, check_out).ok_or_else(|| vec![Violation::PriceOutOfRange])?;

        Ok(BookingRequest::new(
            form.listing_id.trim().to_string(),
            listing.title.clone(),
            check_in,
            check_out,
            form.guests,
            form.phone_number.clone(),
            form.special_requests.clone(),
            &quote,
        ))
    }

    /// All rule violations for the form; empty when it can be submitted
    pub fn violations(
        &self,
        form: &BookingForm,
        listing: &Listing,
        today: NaiveDate,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();

        if form.listing_id.trim().is_empty() {
            violations.push(Violation::MissingListingId);
        }

        match (form.check_in, form.check_out) {
            (Some(check_in), Some(check_out)) => {
                if check_in < today {
                    violations.push(Violation::CheckInInPast { check_in, today });
                }
                let ordered = check_out > check_in
                    || (listing.same_day_stays && check_out == check_in);
                if !ordered {
                    violations.push(Violation::CheckOutNotAfterCheckIn {
                        check_in,
                        check_out,
                    });
                } else if price(listing, check_in, check_out).is_none() {
                    violations.push(Violation::PriceOutOfRange);
                }
            }
            _ => violations.push(Violation::MissingDates),
        }

        let len = form.phone_number.chars().count();
        let (min, max) = (
            self.config.booking.phone_min_len,
            self.config.booking.phone_max_len,
        );
        if len < min || len > max {
            violations.push(Violation::PhoneNumberLength { len, min, max });
        }

        let total = form.guests.total();
        if total == 0 {
            violations.push(Violation::NoGuests);
        } else if total > u64::from(listing.max_guests) {
            violations.push(Violation::TooManyGuests {
                total,
                max: listing.max_guests,
            });
        }

        if form.payment_proof.is_none() {
            violations.push(Violation::MissingPaymentProof);
        }

        violations
    }
}

fn price(listing: &Listing, check_in: NaiveDate, check_out: NaiveDate) -> Option<StayQuote> {
    StayPricer::try_quote(check_in, check_out, &listing.fees, listing.same_day_stays)
}
