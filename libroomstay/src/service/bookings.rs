//! The guest's existing bookings
//!
//! Cancellation is optimistic: the local list shows the booking as cancelled
//! before the gateway answers, and is put back exactly as it was if the
//! gateway refuses.

use std::sync::Arc;
use tracing::{info, warn};

use super::events::{BookingEvent, EventBus};
use crate::booking::{BookingId, BookingStatus, BookingSummary};
use crate::error::{Result, RoomstayError};
use crate::gateway::SubmissionGateway;

#[derive(Clone)]
pub struct BookingsService {
    gateway: Arc<dyn SubmissionGateway>,
    event_bus: EventBus,
}

impl BookingsService {
    pub fn new(gateway: Arc<dyn SubmissionGateway>, event_bus: EventBus) -> Self {
        Self { gateway, event_bus }
    }

    /// Fetch the guest's bookings
    ///
    /// # Errors
    ///
    /// Returns `RoomstayError::Gateway` if the gateway call fails.
    pub async fn load(&self) -> Result<Vec<BookingSummary>> {
        let bookings = self.gateway.my_bookings().await?;
        info!(count = bookings.len(), "Loaded bookings");
        Ok(bookings)
    }

    /// Cancel a booking in `bookings`, restoring the list if the gateway fails
    ///
    /// # Errors
    ///
    /// - `RoomstayError::InvalidInput` if the booking is not in the list or is
    ///   already cancelled; the gateway is not contacted
    /// - `RoomstayError::Gateway` if the gateway refused or could not be reached
    pub async fn cancel(&self, bookings: &mut Vec<BookingSummary>, id: &BookingId) -> Result<()> {
        let index = bookings
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| RoomstayError::InvalidInput(format!("Unknown booking: {}", id)))?;

        if bookings[index].status == BookingStatus::Cancelled {
            return Err(RoomstayError::InvalidInput(format!(
                "Booking {} is already cancelled",
                id
            )));
        }

        let previous = bookings.clone();
        bookings[index].status = BookingStatus::Cancelled;
        self.event_bus.emit(BookingEvent::BookingCancelled {
            booking_id: id.clone(),
        });

        if let Err(e) = self.gateway.cancel(id).await {
            warn!(booking_id = %id, error = %e, "Cancellation failed, restoring booking");
            *bookings = previous;
            self.event_bus.emit(BookingEvent::CancellationReverted {
                booking_id: id.clone(),
                reason: e.to_string(),
            });
            return Err(e.into());
        }

        info!(booking_id = %id, "Booking cancelled");
        Ok(())
    }
}
