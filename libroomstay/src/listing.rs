//! Listing detail as delivered by the backend
//!
//! Responses come in three shapes depending on the endpoint: wrapped in
//! `{"datas": …}`, wrapped in `{"data": …}`, or bare. [`ListingDetail::from_json`]
//! accepts all three.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::availability::{DayRecord, RecordStatus};
use crate::error::ListingError;
use crate::types::Listing;

/// A listing plus its sparse availability overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDetail {
    pub listing: Listing,
    pub availability: Vec<DayRecord>,
}

#[derive(Deserialize)]
struct RawDetail {
    listing: Option<Listing>,
    #[serde(default)]
    availability: Vec<RawDayRecord>,
}

#[derive(Deserialize)]
struct RawDayRecord {
    date: String,
    status: String,
}

impl ListingDetail {
    pub fn new(listing: Listing, availability: Vec<DayRecord>) -> Self {
        Self {
            listing,
            availability,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ListingError> {
        let value: Value = serde_json::from_str(json)?;
        let raw: RawDetail = serde_json::from_value(unwrap_envelope(value))?;

        let listing = raw
            .listing
            .ok_or_else(|| ListingError::MissingField("listing".to_string()))?;

        let availability = raw
            .availability
            .into_iter()
            .map(|record| {
                let status = RecordStatus::parse(&record.status)
                    .ok_or_else(|| ListingError::UnknownStatus(record.status.clone()))?;
                Ok(DayRecord::new(parse_day(&record.date)?, status))
            })
            .collect::<Result<Vec<_>, ListingError>>()?;

        Ok(Self {
            listing,
            availability,
        })
    }
}

fn unwrap_envelope(mut value: Value) -> Value {
    for key in ["datas", "data"] {
        if let Some(inner) = value.get_mut(key).map(Value::take) {
            if !inner.is_null() {
                return inner;
            }
        }
    }
    value
}

/// Parse `YYYY-MM-DD`, dropping any `T…` time suffix
pub fn parse_day(s: &str) -> Result<NaiveDate, ListingError> {
    let day = s.split('T').next().unwrap_or(s).trim();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| ListingError::InvalidDate(s.to_string()))
}
