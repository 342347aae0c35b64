//! One guest's booking flow for one listing
//!
//! A [`BookingSession`] lives from the moment a listing's detail is loaded
//! until the guest navigates away. It owns the availability table, the date
//! selection and the form, and turns a "confirm" press into a
//! [`SubmitOutcome`].

use chrono::NaiveDate;
use tracing::debug;

use super::submission::{SubmissionService, SubmitOutcome};
use super::validation::{BookingValidator, Violation};
use crate::availability::AvailabilityTable;
use crate::booking::BookingRequest;
use crate::error::TapRejection;
use crate::form::{BookingForm, FieldEdit};
use crate::highlight::HighlightMap;
use crate::listing::ListingDetail;
use crate::pricing::{StayPricer, StayQuote};
use crate::selection::{RangeSelector, Selection};
use crate::types::Listing;

pub struct BookingSession {
    listing: Listing,
    selector: RangeSelector,
    form: BookingForm,
    validator: BookingValidator,
}

impl BookingSession {
    pub fn new(
        detail: ListingDetail,
        today: NaiveDate,
        horizon_days: u32,
        validator: BookingValidator,
    ) -> Self {
        let table = AvailabilityTable::build(today, horizon_days, &detail.availability);
        let selector = RangeSelector::new(table, detail.listing.same_day_stays);
        let form = BookingForm::new(detail.listing.id.clone());
        debug!(listing = %detail.listing.id, %today, "Opened booking session");

        Self {
            listing: detail.listing,
            selector,
            form,
            validator,
        }
    }

    /// Tap a calendar day
    ///
    /// # Errors
    ///
    /// The tap rejection, if any; see [`RangeSelector::tap`].
    pub fn tap(&mut self, date: NaiveDate) -> Result<Selection, TapRejection> {
        self.selector.tap(date)
    }

    pub fn edit(&mut self, edit: FieldEdit) {
        self.form.apply(edit);
    }

    /// Price of the current selection, once both dates are chosen
    pub fn quote(&self) -> Option<StayQuote> {
        StayPricer::quote_selection(&self.selector.selection(), &self.listing)
    }

    /// Validate the form against the current selection
    ///
    /// Each call builds a new request with its own `request_id`.
    ///
    /// # Errors
    ///
    /// Every violation found.
    pub fn prepare(&self) -> Result<BookingRequest, Vec<Violation>> {
        let selection = self.selector.selection();
        let form = BookingForm {
            check_in: selection.check_in(),
            check_out: selection.check_out(),
            ..self.form.clone()
        };
        self.validator.validate(&form, &self.listing, self.today())
    }

    /// Validate and submit
    pub async fn submit(&self, submission: &SubmissionService) -> SubmitOutcome {
        let request = match self.prepare() {
            Ok(request) => request,
            Err(violations) => return SubmitOutcome::ValidationFailed(violations),
        };
        let Some(proof) = self.form.payment_proof.as_ref() else {
            return SubmitOutcome::ValidationFailed(vec![Violation::MissingPaymentProof]);
        };
        submission.submit(request, proof).await
    }

    pub fn selection(&self) -> Selection {
        self.selector.selection()
    }

    pub fn highlights(&self) -> &HighlightMap {
        self.selector.highlights()
    }

    pub fn table(&self) -> &AvailabilityTable {
        self.selector.table()
    }

    pub fn today(&self) -> NaiveDate {
        self.selector.table().today()
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    /// Clear the date selection, keeping the rest of the form
    pub fn clear_dates(&mut self) {
        self.selector.reset();
    }
}
