//! Roomstay - availability and date-range booking for room listings
//!
//! This library turns a listing's sparse availability records into a
//! calendar, drives the two-tap check-in/check-out selection over it, prices
//! the stay, validates the booking form and hands the result to a booking
//! backend.

pub mod availability;
pub mod booking;
pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod highlight;
pub mod listing;
pub mod logging;
pub mod pricing;
pub mod selection;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use availability::{AvailabilityTable, DayRecord, DayStatus, RecordStatus};
pub use booking::{BookingId, BookingRequest, BookingStatus, BookingSummary};
pub use config::Config;
pub use error::{Result, RoomstayError};
pub use form::{BookingField, BookingForm, FieldEdit};
pub use pricing::{StayPricer, StayQuote};
pub use selection::{RangeSelector, Selection};
pub use types::{FeeSchedule, GuestCounts, GuestKind, Listing, Money, PaymentProof};
