//! Booking submission
//!
//! Hands validated requests to the gateway, one at a time. A second submit
//! while one is outstanding is refused immediately instead of queued, and
//! failed submissions are never retried here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::events::{BookingEvent, EventBus};
use super::validation::Violation;
use crate::booking::{BookingId, BookingRequest};
use crate::error::GatewayError;
use crate::gateway::SubmissionGateway;
use crate::types::PaymentProof;

/// Result of pressing "confirm"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    BookingConfirmed(BookingId),
    ValidationFailed(Vec<Violation>),
    SubmissionFailed(SubmissionFailure),
}

impl SubmitOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmitOutcome::BookingConfirmed(_))
    }
}

/// Why a validated request did not become a booking
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionFailure {
    #[error("Rejected by server: {0}")]
    Rejected(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("A submission is already in progress")]
    AlreadyInFlight,
}

impl SubmissionFailure {
    /// Whether submitting again (with a freshly built request) might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmissionFailure::Transport(_))
    }
}

impl From<GatewayError> for SubmissionFailure {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Rejected(message) => SubmissionFailure::Rejected(message),
            GatewayError::Transport(message) => SubmissionFailure::Transport(message),
        }
    }
}

/// Clears the in-flight flag when the submission ends, including when the
/// submitting future is dropped mid-call.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Submission service
///
/// Clones share the gateway and the in-flight flag.
#[derive(Clone)]
pub struct SubmissionService {
    gateway: Arc<dyn SubmissionGateway>,
    in_flight: Arc<AtomicBool>,
    event_bus: EventBus,
}

impl SubmissionService {
    pub fn new(gateway: Arc<dyn SubmissionGateway>, event_bus: EventBus) -> Self {
        Self {
            gateway,
            in_flight: Arc::new(AtomicBool::new(false)),
            event_bus,
        }
    }

    /// Whether a submission is currently outstanding
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn gateway(&self) -> &Arc<dyn SubmissionGateway> {
        &self.gateway
    }

    /// Submit a validated request
    ///
    /// The request is consumed: a retry after any response must go through
    /// validation again and gets a new `request_id`.
    pub async fn submit(&self, request: BookingRequest, proof: &PaymentProof) -> SubmitOutcome {
        let _guard = match InFlightGuard::acquire(&self.in_flight) {
            Some(guard) => guard,
            None => {
                warn!(
                    request_id = %request.request_id,
                    "Submission refused, another one is in flight"
                );
                return SubmitOutcome::SubmissionFailed(SubmissionFailure::AlreadyInFlight);
            }
        };

        info!(
            request_id = %request.request_id,
            listing = %request.listing_id,
            nights = request.nights,
            total = %request.total_price,
            gateway = self.gateway.name(),
            "Submitting booking"
        );
        self.event_bus.emit(BookingEvent::SubmissionStarted {
            request_id: request.request_id.clone(),
            listing_id: request.listing_id.clone(),
        });

        match self.gateway.submit(&request, proof).await {
            Ok(booking_id) => {
                info!(
                    request_id = %request.request_id,
                    booking_id = %booking_id,
                    "Booking confirmed"
                );
                self.event_bus.emit(BookingEvent::SubmissionConfirmed {
                    request_id: request.request_id,
                    booking_id: booking_id.clone(),
                });
                SubmitOutcome::BookingConfirmed(booking_id)
            }
            Err(e) => {
                warn!(request_id = %request.request_id, error = %e, "Booking submission failed");
                self.event_bus.emit(BookingEvent::SubmissionFailed {
                    request_id: request.request_id,
                    reason: e.to_string(),
                });
                SubmitOutcome::SubmissionFailed(e.into())
            }
        }
    }
}
