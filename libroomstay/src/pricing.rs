//! Stay pricing
//!
//! `total = nightly_price * nights + cleaning_fee + service_fee`, all in minor
//! units. Inverted ranges, and same-day ranges on listings that don't allow
//! them, are programming errors: the selector never produces them, so the
//! pricer panics instead of inventing a price.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::selection::Selection;
use crate::types::{FeeSchedule, Listing, Money};

/// Derived price breakdown for a stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayQuote {
    pub nights: u32,
    pub base_price: Money,
    pub cleaning_fee: Money,
    pub service_fee: Money,
    pub total: Money,
}

pub struct StayPricer;

impl StayPricer {
    /// Nights between two dates
    ///
    /// # Panics
    ///
    /// If `check_out` is before `check_in`, or equal to it without
    /// `same_day_allowed`.
    pub fn nights(check_in: NaiveDate, check_out: NaiveDate, same_day_allowed: bool) -> u32 {
        let days = (check_out - check_in).num_days();
        assert!(
            days > 0 || (days == 0 && same_day_allowed),
            "stay from {} to {} has no nights",
            check_in,
            check_out
        );
        let days = u32::try_from(days).unwrap_or(u32::MAX);
        days.max(1)
    }

    /// # Panics
    ///
    /// On an empty range (see [`StayPricer::nights`]) or if the total does
    /// not fit in [`Money`].
    pub fn quote(
        check_in: NaiveDate,
        check_out: NaiveDate,
        fees: &FeeSchedule,
        same_day_allowed: bool,
    ) -> StayQuote {
        Self::try_quote(check_in, check_out, fees, same_day_allowed).unwrap_or_else(|| {
            panic!("price of stay from {} to {} overflows", check_in, check_out)
        })
    }

    /// Like [`StayPricer::quote`], but `None` when the total overflows
    ///
    /// Listing prices come from the backend, so callers pricing untrusted
    /// fees go through here.
    pub fn try_quote(
        check_in: NaiveDate,
        check_out: NaiveDate,
        fees: &FeeSchedule,
        same_day_allowed: bool,
    ) -> Option<StayQuote> {
        let nights = Self::nights(check_in, check_out, same_day_allowed);
        let base_price = fees.nightly_price.checked_mul(nights)?;
        let cleaning_fee = fees.cleaning_fee.unwrap_or(Money::ZERO);
        let service_fee = fees.service_fee.unwrap_or(Money::ZERO);
        let total = base_price
            .checked_add(cleaning_fee)?
            .checked_add(service_fee)?;

        Some(StayQuote {
            nights,
            base_price,
            cleaning_fee,
            service_fee,
            total,
        })
    }

    /// Quote a selection against a listing
    ///
    /// `None` until the selection is complete, or when the listing's prices
    /// overflow.
    pub fn quote_selection(selection: &Selection, listing: &Listing) -> Option<StayQuote> {
        let (check_in, check_out) = selection.range()?;
        Self::try_quote(check_in, check_out, &listing.fees, listing.same_day_stays)
    }
}
