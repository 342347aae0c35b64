//! Calendar highlighting derived from a selection
//!
//! Presentation-only projection; nothing in the booking flow reads it back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayHighlight {
    Unselected,
    CheckIn,
    InRange,
    CheckOut,
}

/// Highlighted days only; anything absent is [`DayHighlight::Unselected`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightMap {
    days: BTreeMap<NaiveDate, DayHighlight>,
}

impl HighlightMap {
    pub fn get(&self, date: NaiveDate) -> DayHighlight {
        self.days
            .get(&date)
            .copied()
            .unwrap_or(DayHighlight::Unselected)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, DayHighlight)> + '_ {
        self.days.iter().map(|(d, h)| (*d, *h))
    }
}

pub fn project(selection: &Selection) -> HighlightMap {
    let mut days = BTreeMap::new();
    match *selection {
        Selection::Empty => {}
        Selection::PendingCheckout { check_in } => {
            days.insert(check_in, DayHighlight::CheckIn);
        }
        Selection::Complete {
            check_in,
            check_out,
        } => {
            for day in check_in.iter_days().skip(1).take_while(|d| *d < check_out) {
                days.insert(day, DayHighlight::InRange);
            }
            days.insert(check_out, DayHighlight::CheckOut);
            // A same-day stay shows as its check-in.
            days.insert(check_in, DayHighlight::CheckIn);
        }
    }
    HighlightMap { days }
}
