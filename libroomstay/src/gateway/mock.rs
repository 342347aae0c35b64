//! Mock gateway for testing
//!
//! A configurable in-memory [`SubmissionGateway`] that can simulate accepted
//! bookings, server rejections, transport failures and network latency. It
//! records every call so tests can assert on what reached the backend.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::booking::{BookingId, BookingRequest, BookingStatus, BookingSummary};
use crate::error::GatewayError;
use crate::gateway::SubmissionGateway;
use crate::types::PaymentProof;

/// Configuration for mock gateway behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Gateway name used in logs
    pub name: String,

    /// Outcomes consumed in order by `submit`; once empty, `submit_error` applies
    pub scripted_submits: Arc<Mutex<VecDeque<Result<(), GatewayError>>>>,

    /// Error returned by `submit` when nothing is scripted (`None` accepts)
    pub submit_error: Option<GatewayError>,

    /// Error returned by `cancel` (`None` accepts)
    pub cancel_error: Option<GatewayError>,

    /// Error returned by `my_bookings` (`None` returns `bookings`)
    pub list_error: Option<GatewayError>,

    /// Delay before completing any call (simulates network latency)
    pub delay: Duration,

    /// The guest's bookings; accepted submissions are appended as pending
    pub bookings: Arc<Mutex<Vec<BookingSummary>>>,

    pub submit_call_count: Arc<Mutex<usize>>,
    pub cancel_call_count: Arc<Mutex<usize>>,

    /// Requests that reached `submit`, in call order
    pub submitted: Arc<Mutex<Vec<BookingRequest>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            scripted_submits: Arc::new(Mutex::new(VecDeque::new())),
            submit_error: None,
            cancel_error: None,
            list_error: None,
            delay: Duration::from_millis(0),
            bookings: Arc::new(Mutex::new(Vec::new())),
            submit_call_count: Arc::new(Mutex::new(0)),
            cancel_call_count: Arc::new(Mutex::new(0)),
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock gateway for testing
pub struct MockGateway {
    config: MockConfig,
}

impl MockGateway {
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// A gateway that accepts everything
    pub fn success(name: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            ..Default::default()
        })
    }

    /// A gateway whose server refuses every submission
    pub fn rejecting(name: &str, message: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            submit_error: Some(GatewayError::Rejected(message.to_string())),
            ..Default::default()
        })
    }

    /// A gateway that never gets a usable response
    pub fn unreachable(name: &str, message: &str) -> Self {
        let error = GatewayError::Transport(message.to_string());
        Self::new(MockConfig {
            name: name.to_string(),
            submit_error: Some(error.clone()),
            cancel_error: Some(error.clone()),
            list_error: Some(error),
            ..Default::default()
        })
    }

    /// A gateway that accepts everything after `delay`
    pub fn with_delay(name: &str, delay: Duration) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            delay,
            ..Default::default()
        })
    }

    /// A gateway that already knows some of the guest's bookings
    pub fn with_bookings(name: &str, bookings: Vec<BookingSummary>) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            bookings: Arc::new(Mutex::new(bookings)),
            ..Default::default()
        })
    }

    /// Queue an outcome for the next unscripted `submit`
    pub fn script_submit(&self, outcome: Result<(), GatewayError>) {
        lock(&self.config.scripted_submits).push_back(outcome);
    }

    pub fn submit_call_count(&self) -> usize {
        *lock(&self.config.submit_call_count)
    }

    pub fn cancel_call_count(&self) -> usize {
        *lock(&self.config.cancel_call_count)
    }

    pub fn submitted(&self) -> Vec<BookingRequest> {
        lock(&self.config.submitted).clone()
    }

    pub fn bookings(&self) -> Vec<BookingSummary> {
        lock(&self.config.bookings).clone()
    }

    async fn simulate_latency(&self) {
        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }
    }
}

#[async_trait]
impl SubmissionGateway for MockGateway {
    async fn submit(
        &self,
        request: &BookingRequest,
        _proof: &PaymentProof,
    ) -> Result<BookingId, GatewayError> {
        *lock(&self.config.submit_call_count) += 1;
        lock(&self.config.submitted).push(request.clone());

        self.simulate_latency().await;

        let scripted = lock(&self.config.scripted_submits).pop_front();
        let outcome = match scripted {
            Some(outcome) => outcome,
            None => match &self.config.submit_error {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            },
        };
        outcome?;

        let booking_id = BookingId::new(format!(
            "{}:bk-{}",
            self.config.name,
            uuid::Uuid::new_v4()
        ));
        lock(&self.config.bookings).push(BookingSummary {
            id: booking_id.clone(),
            listing_title: request.title.clone(),
            check_in: request.check_in,
            check_out: request.check_out,
            guests: request.guests(),
            total_price: request.total_price,
            status: BookingStatus::Pending,
        });
        Ok(booking_id)
    }

    async fn cancel(&self, booking_id: &BookingId) -> Result<(), GatewayError> {
        *lock(&self.config.cancel_call_count) += 1;

        self.simulate_latency().await;

        if let Some(error) = &self.config.cancel_error {
            return Err(error.clone());
        }

        let mut bookings = lock(&self.config.bookings);
        match bookings.iter_mut().find(|b| &b.id == booking_id) {
            Some(booking) => {
                booking.status = BookingStatus::Cancelled;
                Ok(())
            }
            None => Err(GatewayError::Rejected(format!("No booking {}", booking_id))),
        }
    }

    async fn my_bookings(&self) -> Result<Vec<BookingSummary>, GatewayError> {
        self.simulate_latency().await;

        if let Some(error) = &self.config.list_error {
            return Err(error.clone());
        }
        Ok(self.bookings())
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}
