//! Booking backend abstraction
//!
//! The booking core never talks to the network itself. Everything that leaves
//! the process goes through a [`SubmissionGateway`]: a validated
//! [`BookingRequest`] plus its payment screenshot on the way out, and a
//! booking id or a [`GatewayError`] on the way back.
//!
//! Implementations own their transport concerns (timeouts, auth headers,
//! multipart encoding). They must not retry on their own; retry decisions
//! belong to whoever called `submit()`.
//!
//! # Examples
//!
//! ```no_run
//! use libroomstay::gateway::{mock::MockGateway, SubmissionGateway};
//!
//! # async fn example() -> Result<(), libroomstay::error::GatewayError> {
//! let gateway = MockGateway::success("staging");
//! for booking in gateway.my_bookings().await? {
//!     println!("{} {} -> {}", booking.id, booking.check_in, booking.check_out);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::booking::{BookingId, BookingRequest, BookingSummary};
use crate::error::GatewayError;
use crate::types::PaymentProof;

// Available for all builds so integration tests and downstream crates can use it
pub mod mock;

/// Remote side of the booking flow
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    /// Send a booking and its payment proof
    ///
    /// # Returns
    ///
    /// The server-assigned booking id.
    ///
    /// # Errors
    ///
    /// - `GatewayError::Rejected` if the server refused the booking
    /// - `GatewayError::Transport` if no usable response came back
    async fn submit(
        &self,
        request: &BookingRequest,
        proof: &PaymentProof,
    ) -> Result<BookingId, GatewayError>;

    /// Cancel an existing booking
    async fn cancel(&self, booking_id: &BookingId) -> Result<(), GatewayError>;

    /// Bookings belonging to the current guest
    async fn my_bookings(&self) -> Result<Vec<BookingSummary>, GatewayError>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}
