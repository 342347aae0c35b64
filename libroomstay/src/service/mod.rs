//! Service layer for Roomstay
//!
//! The pure booking core (availability, selection, pricing) lives at the
//! crate root. This layer wires it to configuration, a [`SubmissionGateway`]
//! and the event bus.
//!
//! # Architecture
//!
//! `RoomstayService` is the entry point and hands out the sub-services:
//!
//! - `BookingValidator`: form rules, builds `BookingRequest`s
//! - `SubmissionService`: single in-flight submission, no retries
//! - `BookingsService`: the guest's bookings, optimistic cancellation
//! - `EventBus`: booking lifecycle events
//!
//! Per-listing state lives in a [`BookingSession`] opened with
//! [`RoomstayService::open_listing`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use libroomstay::gateway::mock::MockGateway;
//! use libroomstay::listing::ListingDetail;
//! use libroomstay::service::RoomstayService;
//!
//! # async fn example(json: &str) -> libroomstay::Result<()> {
//! let service = RoomstayService::new(Arc::new(MockGateway::success("staging")))?;
//! let detail = ListingDetail::from_json(json)?;
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//!
//! let mut session = service.open_listing(detail, today);
//! let _ = session.tap(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
//! let _ = session.tap(NaiveDate::from_ymd_opt(2024, 6, 8).unwrap());
//!
//! let outcome = session.submit(service.submission()).await;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod bookings;
pub mod events;
pub mod session;
pub mod submission;
pub mod validation;

pub use events::BookingEvent;
pub use session::BookingSession;
pub use submission::{SubmissionFailure, SubmitOutcome};
pub use validation::Violation;

use chrono::NaiveDate;
use std::sync::Arc;

use self::bookings::BookingsService;
use self::events::EventBus;
use self::submission::SubmissionService;
use self::validation::BookingValidator;
use crate::gateway::SubmissionGateway;
use crate::listing::ListingDetail;
use crate::{Config, Result};

/// Main service facade
///
/// Sub-services share the same `Arc<Config>`, gateway and event bus.
pub struct RoomstayService {
    config: Arc<Config>,
    validator: BookingValidator,
    submission: SubmissionService,
    bookings: BookingsService,
    event_bus: EventBus,
}

impl RoomstayService {
    /// Create a service with configuration from the default location
    ///
    /// A missing config file means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed or
    /// validated.
    pub fn new(gateway: Arc<dyn SubmissionGateway>) -> Result<Self> {
        let config = Config::load_or_default()?;
        Self::from_config(config, gateway)
    }

    /// Create a service with a pre-built configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(config: Config, gateway: Arc<dyn SubmissionGateway>) -> Result<Self> {
        config.validate()?;

        let config = Arc::new(config);
        let event_bus = EventBus::new(config.booking.event_capacity);

        let validator = BookingValidator::new(Arc::clone(&config));
        let submission = SubmissionService::new(Arc::clone(&gateway), event_bus.clone());
        let bookings = BookingsService::new(gateway, event_bus.clone());

        Ok(Self {
            config,
            validator,
            submission,
            bookings,
            event_bus,
        })
    }

    /// Start a booking flow for a freshly loaded listing
    ///
    /// The availability table covers `booking.horizon_days` days from `today`.
    pub fn open_listing(&self, detail: ListingDetail, today: NaiveDate) -> BookingSession {
        BookingSession::new(
            detail,
            today,
            self.config.booking.horizon_days,
            self.validator.clone(),
        )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn validator(&self) -> &BookingValidator {
        &self.validator
    }

    pub fn submission(&self) -> &SubmissionService {
        &self.submission
    }

    pub fn bookings(&self) -> &BookingsService {
        &self.bookings
    }

    /// Subscribe to booking events
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use libroomstay::gateway::mock::MockGateway;
    /// use libroomstay::service::RoomstayService;
    ///
    /// # async fn example() -> libroomstay::Result<()> {
    /// let service = RoomstayService::new(Arc::new(MockGateway::success("staging")))?;
    /// let mut events = service.subscribe();
    ///
    /// tokio::spawn(async move {
    ///     while let Ok(event) = events.recv().await {
    ///         println!("Event: {:?}", event);
    ///     }
    /// });
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe(&self) -> events::EventReceiver {
        self.event_bus.subscribe()
    }
}
