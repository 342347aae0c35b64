//! Submission and cancellation through the service facade
//!
//! These tests use the mock gateway to check what actually reaches the
//! backend: one request per submit, never more than one in flight, no
//! automatic retries, and cancellation rollback.

use anyhow::Result;
use chrono::NaiveDate;
use libroomstay::error::GatewayError;
use libroomstay::gateway::mock::{MockConfig, MockGateway};
use libroomstay::listing::ListingDetail;
use libroomstay::service::events::BookingEvent;
use libroomstay::service::{BookingSession, RoomstayService, SubmissionFailure, SubmitOutcome};
use libroomstay::{BookingStatus, Config, FeeSchedule, FieldEdit, Listing, Money, PaymentProof};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Session with dates 2024-06-05..08 selected and a complete form
fn ready_session(service: &RoomstayService, dir: &TempDir) -> Result<BookingSession> {
    let listing = Listing::new(
        "lakeside-cabin",
        FeeSchedule::nightly(Money(100))
            .with_cleaning_fee(Money(20))
            .with_service_fee(Money(10)),
        4,
    )
    .with_title("Lakeside Cabin");
    let mut session = service.open_listing(ListingDetail::new(listing, vec![]), date(2024, 6, 1));

    session.tap(date(2024, 6, 5))?;
    session.tap(date(2024, 6, 8))?;

    let receipt = dir.path().join("receipt.jpg");
    fs::write(&receipt, b"\xff\xd8\xff\xe0 jpeg bytes")?;
    session.edit(FieldEdit::PhoneNumber("9800000000".to_string()));
    session.edit(FieldEdit::AttachPaymentProof(PaymentProof::from_path(&receipt)?));
    Ok(session)
}

fn service_with(gateway: &Arc<MockGateway>) -> Result<RoomstayService> {
    Ok(RoomstayService::from_config(Config::default(), gateway.clone())?)
}

#[tokio::test]
async fn test_double_submit_reaches_gateway_once() -> Result<()> {
    let dir = TempDir::new()?;
    let gateway = Arc::new(MockGateway::with_delay("test", Duration::from_millis(100)));
    let service = service_with(&gateway)?;
    let session = ready_session(&service, &dir)?;

    let (first, second) = tokio::join!(session.submit(service.submission()), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.submit(service.submission()).await
    });

    assert!(first.is_confirmed());
    assert_eq!(
        second,
        SubmitOutcome::SubmissionFailed(SubmissionFailure::AlreadyInFlight)
    );
    assert_eq!(gateway.submit_call_count(), 1);
    assert!(!service.submission().is_in_flight());
    Ok(())
}

#[tokio::test]
async fn test_rejected_submission_is_reported_not_retried() -> Result<()> {
    let dir = TempDir::new()?;
    let gateway = Arc::new(MockGateway::rejecting("test", "Dates are no longer available"));
    let service = service_with(&gateway)?;
    let session = ready_session(&service, &dir)?;
    let mut events = service.subscribe();

    let outcome = session.submit(service.submission()).await;
    assert_eq!(
        outcome,
        SubmitOutcome::SubmissionFailed(SubmissionFailure::Rejected(
            "Dates are no longer available".to_string()
        ))
    );
    assert_eq!(gateway.submit_call_count(), 1);

    assert!(matches!(
        events.recv().await?,
        BookingEvent::SubmissionStarted { .. }
    ));
    match events.recv().await? {
        BookingEvent::SubmissionFailed { reason, .. } => {
            assert!(reason.contains("Dates are no longer available"));
        }
        other => panic!("unexpected event: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_resubmit_after_transport_failure_uses_fresh_request() -> Result<()> {
    let dir = TempDir::new()?;
    let gateway = Arc::new(MockGateway::success("test"));
    gateway.script_submit(Err(GatewayError::Transport("connection reset".to_string())));
    let service = service_with(&gateway)?;
    let session = ready_session(&service, &dir)?;

    match session.submit(service.submission()).await {
        SubmitOutcome::SubmissionFailed(failure) => assert!(failure.is_retryable()),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(gateway.submit_call_count(), 1);

    assert!(session.submit(service.submission()).await.is_confirmed());

    let sent = gateway.submitted();
    assert_eq!(sent.len(), 2);
    assert_ne!(sent[0].request_id, sent[1].request_id);
    assert_eq!(sent[0].total_price, sent[1].total_price);
    Ok(())
}

#[tokio::test]
async fn test_invalid_form_never_reaches_gateway() -> Result<()> {
    let gateway = Arc::new(MockGateway::success("test"));
    let service = service_with(&gateway)?;
    let listing = Listing::new("lakeside-cabin", FeeSchedule::nightly(Money(100)), 4);
    let mut session = service.open_listing(ListingDetail::new(listing, vec![]), date(2024, 6, 1));

    session.tap(date(2024, 6, 5))?;
    session.tap(date(2024, 6, 8))?;
    session.edit(FieldEdit::PhoneNumber("123".to_string()));

    match session.submit(service.submission()).await {
        SubmitOutcome::ValidationFailed(violations) => assert_eq!(violations.len(), 2),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(gateway.submit_call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_cancel_confirmed_booking() -> Result<()> {
    let dir = TempDir::new()?;
    let gateway = Arc::new(MockGateway::success("test"));
    let service = service_with(&gateway)?;
    let session = ready_session(&service, &dir)?;

    let booking_id = match session.submit(service.submission()).await {
        SubmitOutcome::BookingConfirmed(id) => id,
        other => panic!("unexpected outcome: {:?}", other),
    };

    let mut bookings = service.bookings().load().await?;
    service.bookings().cancel(&mut bookings, &booking_id).await?;

    assert_eq!(bookings[0].status, BookingStatus::Cancelled);
    assert_eq!(service.bookings().load().await?[0].status, BookingStatus::Cancelled);
    Ok(())
}

#[tokio::test]
async fn test_failed_cancel_rolls_back() -> Result<()> {
    let dir = TempDir::new()?;
    let config = MockConfig {
        cancel_error: Some(GatewayError::Transport("timeout".to_string())),
        ..Default::default()
    };
    let gateway = Arc::new(MockGateway::new(config));
    let service = service_with(&gateway)?;
    let session = ready_session(&service, &dir)?;

    let booking_id = match session.submit(service.submission()).await {
        SubmitOutcome::BookingConfirmed(id) => id,
        other => panic!("unexpected outcome: {:?}", other),
    };

    let mut events = service.subscribe();
    let mut bookings = service.bookings().load().await?;
    let before = bookings.clone();

    assert!(service.bookings().cancel(&mut bookings, &booking_id).await.is_err());
    assert_eq!(bookings, before);
    assert_eq!(bookings[0].status, BookingStatus::Pending);

    assert_eq!(
        events.recv().await?,
        BookingEvent::BookingCancelled {
            booking_id: booking_id.clone()
        }
    );
    assert!(matches!(
        events.recv().await?,
        BookingEvent::CancellationReverted { .. }
    ));
    Ok(())
}
