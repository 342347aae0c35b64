//! Editable booking form fields

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{GuestCounts, GuestKind, PaymentProof};

/// Form fields a violation can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingField {
    ListingId,
    CheckIn,
    CheckOut,
    PhoneNumber,
    Guests,
    PaymentProof,
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingField::ListingId => "listing_id",
            BookingField::CheckIn => "check_in",
            BookingField::CheckOut => "check_out",
            BookingField::PhoneNumber => "phone_number",
            BookingField::Guests => "guests",
            BookingField::PaymentProof => "payment_proof",
        };
        write!(f, "{}", name)
    }
}

/// A single user edit to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    PhoneNumber(String),
    SpecialRequests(String),
    SetGuests(GuestKind, u32),
    IncrementGuest(GuestKind),
    DecrementGuest(GuestKind),
    AttachPaymentProof(PaymentProof),
    ClearPaymentProof,
}

/// Everything the guest fills in before confirming
///
/// Dates are copied in from the selection when the form is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub listing_id: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: GuestCounts,
    pub phone_number: String,
    pub special_requests: String,
    pub payment_proof: Option<PaymentProof>,
}

impl BookingForm {
    pub fn new(listing_id: impl Into<String>) -> Self {
        Self {
            listing_id: listing_id.into(),
            ..Default::default()
        }
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::PhoneNumber(phone) => self.phone_number = phone.trim().to_string(),
            FieldEdit::SpecialRequests(text) => self.special_requests = text,
            FieldEdit::SetGuests(kind, count) => self.guests.set(kind, count),
            FieldEdit::IncrementGuest(kind) => self.guests.increment(kind),
            FieldEdit::DecrementGuest(kind) => self.guests.decrement(kind),
            FieldEdit::AttachPaymentProof(proof) => self.payment_proof = Some(proof),
            FieldEdit::ClearPaymentProof => self.payment_proof = None,
        }
    }

    pub fn with_dates(mut self, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        self.check_in = Some(check_in);
        self.check_out = Some(check_out);
        self
    }
}
