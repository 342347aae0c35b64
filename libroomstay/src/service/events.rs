//! Booking lifecycle events
//!
//! An in-process broadcast bus. Services emit events at submission and
//! cancellation milestones; any number of subscribers (a UI, a logger, a
//! test) can listen. Emitting with no subscribers drops the event.
//!
//! # Example
//!
//! ```no_run
//! use libroomstay::service::events::{BookingEvent, EventBus};
//!
//! # async fn example() {
//! let event_bus = EventBus::new(100);
//! let mut receiver = event_bus.subscribe();
//!
//! event_bus.emit(BookingEvent::SubmissionStarted {
//!     request_id: "abc123".to_string(),
//!     listing_id: "lakeside-cabin".to_string(),
//! });
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::booking::BookingId;

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<BookingEvent>;

/// Event bus for booking events
///
/// Cloning shares the underlying channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BookingEvent>,
}

impl EventBus {
    /// Create a new event bus buffering up to `capacity` events per subscriber
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Never blocks. Lagging subscribers lose the oldest events first.
    pub fn emit(&self, event: BookingEvent) {
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Events emitted by the booking services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEvent {
    /// A validated request was handed to the gateway
    SubmissionStarted {
        request_id: String,
        listing_id: String,
    },

    /// The gateway accepted the booking
    SubmissionConfirmed {
        request_id: String,
        booking_id: BookingId,
    },

    /// The submission did not produce a booking
    SubmissionFailed { request_id: String, reason: String },

    /// A booking was marked cancelled locally
    BookingCancelled { booking_id: BookingId },

    /// The gateway refused a cancellation, so the booking was restored
    CancellationReverted { booking_id: BookingId, reason: String },
}
