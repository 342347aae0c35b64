//! Booking payloads exchanged with the backend

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pricing::StayQuote;
use crate::types::{GuestCounts, Money};

/// Server-assigned booking identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub String);

impl BookingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated booking, ready for the gateway
///
/// Only the validator builds these. Each submit attempt gets a fresh request
/// (new `request_id`); a request is never resent after a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct BookingRequest {
    pub request_id: String,
    pub listing_id: String,
    pub title: String,
    #[serde(rename = "checkInDate")]
    pub check_in: NaiveDate,
    #[serde(rename = "checkOutDate")]
    pub check_out: NaiveDate,
    pub nights: u32,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub pets: u32,
    pub phone_number: String,
    #[serde(rename = "quote")]
    pub special_requests: String,
    pub attachment_present: bool,
    #[serde(rename = "price")]
    pub total_price: Money,
    pub created_at: i64,
}

impl BookingRequest {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        listing_id: String,
        title: String,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: GuestCounts,
        phone_number: String,
        special_requests: String,
        quote: &StayQuote,
    ) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            listing_id,
            title,
            check_in,
            check_out,
            nights: quote.nights,
            adults: guests.adults,
            children: guests.children,
            infants: guests.infants,
            pets: guests.pets,
            phone_number,
            special_requests,
            attachment_present: true,
            total_price: quote.total,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn guests(&self) -> GuestCounts {
        GuestCounts {
            adults: self.adults,
            children: self.children,
            infants: self.infants,
            pets: self.pets,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One of the guest's existing bookings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    pub id: BookingId,
    pub listing_title: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: GuestCounts,
    pub total_price: Money,
    pub status: BookingStatus,
}
