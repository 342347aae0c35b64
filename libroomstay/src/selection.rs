//! Two-tap check-in/check-out selection
//!
//! The selection is a small state machine driven by calendar taps:
//!
//! ```text
//! Empty --tap selectable--> PendingCheckout(check_in)
//! PendingCheckout --tap valid check-out--> Complete(check_in, check_out)
//! PendingCheckout --tap on/before check-in, or across a blocked day--> PendingCheckout (rejected)
//! PendingCheckout --tap unselectable--> Empty (rejected)
//! Complete --any tap--> treated as a tap on Empty
//! ```
//!
//! [`reduce`] is pure: `(Selection, tap) -> TapResult`. [`RangeSelector`]
//! wraps it with the current state and the derived highlight map.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::availability::AvailabilityTable;
use crate::error::TapRejection;
use crate::highlight::{project, HighlightMap};

/// The user's in-progress or completed stay dates
///
/// When complete, `check_out > check_in` (or equal for listings that allow
/// same-day stays) and every day strictly between them was selectable when
/// the range was formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    Empty,
    PendingCheckout {
        check_in: NaiveDate,
    },
    Complete {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
}

impl Selection {
    pub fn check_in(&self) -> Option<NaiveDate> {
        match self {
            Selection::Empty => None,
            Selection::PendingCheckout { check_in } | Selection::Complete { check_in, .. } => {
                Some(*check_in)
            }
        }
    }

    pub fn check_out(&self) -> Option<NaiveDate> {
        match self {
            Selection::Complete { check_out, .. } => Some(*check_out),
            _ => None,
        }
    }

    /// Both dates, once the selection is complete
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Selection::Complete {
                check_in,
                check_out,
            } => Some((*check_in, *check_out)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Selection::Complete { .. })
    }
}

/// Outcome of one tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapResult {
    pub selection: Selection,
    pub rejection: Option<TapRejection>,
}

impl TapResult {
    fn accepted(selection: Selection) -> Self {
        Self {
            selection,
            rejection: None,
        }
    }

    fn rejected(selection: Selection, rejection: TapRejection) -> Self {
        Self {
            selection,
            rejection: Some(rejection),
        }
    }
}

/// Pure transition function
///
/// `same_day_stays` lets a tap on the check-in date itself complete the
/// range for listings that allow it.
pub fn reduce(
    selection: Selection,
    tap: NaiveDate,
    table: &AvailabilityTable,
    same_day_stays: bool,
) -> TapResult {
    match selection {
        Selection::Empty | Selection::Complete { .. } => start(tap, table),
        Selection::PendingCheckout { check_in } => {
            let status = table.status_of(tap);
            if !status.is_selectable() {
                return TapResult::rejected(
                    Selection::Empty,
                    TapRejection::UnselectableDate { date: tap, status },
                );
            }

            let ordered = tap > check_in || (same_day_stays && tap == check_in);
            if !ordered || table.first_blocked_between(check_in, tap).is_some() {
                return TapResult::rejected(
                    selection,
                    TapRejection::InvalidRangeTap {
                        check_in,
                        date: tap,
                    },
                );
            }

            TapResult::accepted(Selection::Complete {
                check_in,
                check_out: tap,
            })
        }
    }
}

fn start(tap: NaiveDate, table: &AvailabilityTable) -> TapResult {
    let status = table.status_of(tap);
    if status.is_selectable() {
        TapResult::accepted(Selection::PendingCheckout { check_in: tap })
    } else {
        TapResult::rejected(
            Selection::Empty,
            TapRejection::UnselectableDate { date: tap, status },
        )
    }
}

/// Stateful wrapper owning the current selection for one listing
#[derive(Debug, Clone)]
pub struct RangeSelector {
    table: AvailabilityTable,
    same_day_stays: bool,
    selection: Selection,
    highlights: HighlightMap,
}

impl RangeSelector {
    pub fn new(table: AvailabilityTable, same_day_stays: bool) -> Self {
        Self {
            table,
            same_day_stays,
            selection: Selection::Empty,
            highlights: HighlightMap::default(),
        }
    }

    /// Apply a tap
    ///
    /// # Errors
    ///
    /// Returns the rejection when the tap did not advance the selection. The
    /// selection is still updated as the state machine dictates (an
    /// unselectable tap resets to `Empty`).
    pub fn tap(&mut self, date: NaiveDate) -> Result<Selection, TapRejection> {
        let result = reduce(self.selection, date, &self.table, self.same_day_stays);
        let changed = result.selection != self.selection;
        self.selection = result.selection;
        if changed {
            self.highlights = project(&self.selection);
        }

        match result.rejection {
            Some(rejection) => {
                debug!("Tap rejected: {}", rejection);
                Err(rejection)
            }
            None => Ok(self.selection),
        }
    }

    pub fn reset(&mut self) {
        self.selection = Selection::Empty;
        self.highlights = HighlightMap::default();
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn highlights(&self) -> &HighlightMap {
        &self.highlights
    }

    pub fn table(&self) -> &AvailabilityTable {
        &self.table
    }
}
