//! End-to-end booking flow tests
//!
//! Drive the public API the way a booking screen does: load a listing,
//! tap dates, edit the form, price and validate.

use anyhow::Result;
use chrono::NaiveDate;
use libroomstay::availability::AvailabilityTable;
use libroomstay::error::TapRejection;
use libroomstay::gateway::mock::MockGateway;
use libroomstay::highlight::DayHighlight;
use libroomstay::listing::ListingDetail;
use libroomstay::service::validation::BookingValidator;
use libroomstay::service::{RoomstayService, Violation};
use libroomstay::{
    BookingForm, Config, DayRecord, DayStatus, FeeSchedule, FieldEdit, GuestKind, Listing, Money,
    PaymentProof, RangeSelector, RecordStatus, Selection, StayPricer,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 6, 1)
}

fn selector() -> RangeSelector {
    let table = AvailabilityTable::with_default_horizon(
        today(),
        &[DayRecord::new(date(2024, 6, 10), RecordStatus::Booked)],
    );
    RangeSelector::new(table, false)
}

fn write_receipt(dir: &TempDir) -> Result<PaymentProof> {
    let path = dir.path().join("receipt.png");
    fs::write(&path, b"\x89PNG\r\n\x1a\nnot really a png")?;
    Ok(PaymentProof::from_path(&path)?)
}

#[test]
fn test_scenario_a_booked_day_inside_range_is_rejected() {
    let mut selector = selector();

    assert_eq!(
        selector.tap(date(2024, 6, 5)),
        Ok(Selection::PendingCheckout {
            check_in: date(2024, 6, 5)
        })
    );

    assert_eq!(
        selector.tap(date(2024, 6, 12)),
        Err(TapRejection::InvalidRangeTap {
            check_in: date(2024, 6, 5),
            date: date(2024, 6, 12)
        })
    );
    assert_eq!(
        selector.selection(),
        Selection::PendingCheckout {
            check_in: date(2024, 6, 5)
        }
    );
}

#[test]
fn test_scenario_b_complete_range_and_price() {
    let mut selector = selector();
    selector.tap(date(2024, 6, 5)).unwrap();
    let selection = selector.tap(date(2024, 6, 8)).unwrap();

    assert_eq!(
        selection,
        Selection::Complete {
            check_in: date(2024, 6, 5),
            check_out: date(2024, 6, 8)
        }
    );

    let fees = FeeSchedule::nightly(Money(100))
        .with_cleaning_fee(Money(20))
        .with_service_fee(Money(10));
    let quote = StayPricer::quote(date(2024, 6, 5), date(2024, 6, 8), &fees, false);
    assert_eq!(quote.nights, 3);
    assert_eq!(quote.base_price, Money(300));
    assert_eq!(quote.total, Money(330));

    let highlights = selector.highlights();
    assert_eq!(highlights.get(date(2024, 6, 5)), DayHighlight::CheckIn);
    assert_eq!(highlights.get(date(2024, 6, 6)), DayHighlight::InRange);
    assert_eq!(highlights.get(date(2024, 6, 7)), DayHighlight::InRange);
    assert_eq!(highlights.get(date(2024, 6, 8)), DayHighlight::CheckOut);
    assert_eq!(highlights.get(date(2024, 6, 9)), DayHighlight::Unselected);
}

#[test]
fn test_scenario_c_third_tap_starts_over() {
    let mut selector = selector();
    selector.tap(date(2024, 6, 5)).unwrap();
    selector.tap(date(2024, 6, 8)).unwrap();

    let selection = selector.tap(date(2024, 6, 20)).unwrap();
    assert_eq!(
        selection,
        Selection::PendingCheckout {
            check_in: date(2024, 6, 20)
        }
    );
    assert_eq!(
        selector.highlights().get(date(2024, 6, 6)),
        DayHighlight::Unselected
    );
}

#[test]
fn test_scenario_d_check_in_yesterday() -> Result<()> {
    let dir = TempDir::new()?;
    let listing = Listing::new("lakeside-cabin", FeeSchedule::nightly(Money(100)), 4);

    let mut form =
        BookingForm::new("lakeside-cabin").with_dates(date(2024, 5, 31), date(2024, 6, 3));
    form.apply(FieldEdit::PhoneNumber("9800000000".to_string()));
    form.apply(FieldEdit::AttachPaymentProof(write_receipt(&dir)?));

    let validator = BookingValidator::new(Arc::new(Config::default()));
    let violations = validator.validate(&form, &listing, today()).unwrap_err();

    assert_eq!(violations.len(), 1);
    assert!(matches!(violations[0], Violation::CheckInInPast { .. }));
    Ok(())
}

#[test]
fn test_past_days_cannot_be_tapped() {
    let mut selector = selector();
    let rejection = selector.tap(date(2024, 5, 20)).unwrap_err();
    assert_eq!(
        rejection,
        TapRejection::UnselectableDate {
            date: date(2024, 5, 20),
            status: DayStatus::Past
        }
    );
    assert_eq!(selector.selection(), Selection::Empty);
}

#[tokio::test]
async fn test_listing_json_to_confirmed_booking() -> Result<()> {
    let dir = TempDir::new()?;
    let json = r#"{
        "status": true,
        "datas": {
            "listing": {
                "slug": "lakeside-cabin",
                "title": "Lakeside Cabin",
                "price": 100,
                "cleaning_fee": 20,
                "service_fee": 10,
                "max_guests": 4
            },
            "availability": [
                {"date": "2024-06-10T00:00:00.000000Z", "status": "booked"},
                {"date": "2024-06-15", "status": "blocked"}
            ]
        }
    }"#;

    let gateway = Arc::new(MockGateway::success("test"));
    let service = RoomstayService::from_config(Config::default(), gateway.clone())?;
    let mut session = service.open_listing(ListingDetail::from_json(json)?, today());

    assert_eq!(session.table().status_of(date(2024, 6, 15)), DayStatus::Blocked);
    assert!(session.tap(date(2024, 6, 15)).is_err());

    session.tap(date(2024, 6, 11)).unwrap();
    session.tap(date(2024, 6, 14)).unwrap();
    assert_eq!(session.quote().map(|q| q.total), Some(Money(330)));

    session.edit(FieldEdit::PhoneNumber(" 9800000000 ".to_string()));
    session.edit(FieldEdit::IncrementGuest(GuestKind::Children));
    session.edit(FieldEdit::AttachPaymentProof(write_receipt(&dir)?));

    let outcome = session.submit(service.submission()).await;
    assert!(outcome.is_confirmed());

    let sent = gateway.submitted();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "Lakeside Cabin");
    assert_eq!(sent[0].adults, 1);
    assert_eq!(sent[0].children, 1);
    assert_eq!(sent[0].phone_number, "9800000000");
    assert_eq!(sent[0].nights, 3);

    let bookings = service.bookings().load().await?;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].check_in, date(2024, 6, 11));
    Ok(())
}

#[test]
fn test_same_day_listing_allows_single_day_stay() {
    let listing =
        Listing::new("day-room", FeeSchedule::nightly(Money(80)), 2).allowing_same_day_stays();
    let table = AvailabilityTable::with_default_horizon(today(), &[]);
    let mut selector = RangeSelector::new(table, listing.same_day_stays);

    selector.tap(date(2024, 6, 3)).unwrap();
    let selection = selector.tap(date(2024, 6, 3)).unwrap();
    let quote = StayPricer::quote_selection(&selection, &listing).unwrap();
    assert_eq!(quote.nights, 1);
    assert_eq!(quote.total, Money(80));
}
