//! The live order form: field edits, derived pricing, persistence and the
//! submit/reset lifecycle wired together.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::clock::Clock;
use super::field_store::{FieldName, FieldStore};
use super::submission::{
    SUBMIT_FAILURE_MESSAGE, SUBMIT_SUCCESS_MESSAGE, SubmissionState, SubmitRejected,
};
use crate::calculations::{CurrencyFormat, PricingEngine};
use crate::db::DraftStore;
use crate::models::{
    KitCatalog, KitId, Notification, OrderDraft, PricingSummary, SubmissionPayload, SummaryText,
};
use crate::sink::{Delivery, OrderSink, SinkError};
use crate::validation::{FieldState, Validator};

/// One browser-tab's worth of order form state.
///
/// Every edit recomputes the summary (for quantity fields) and mirrors the
/// draft to the [`DraftStore`]. Persistence is best-effort: failures are
/// logged and the edit still applies.
pub struct OrderForm {
    catalog: Arc<KitCatalog>,
    currency: CurrencyFormat,
    store: Arc<dyn DraftStore>,
    clock: Arc<dyn Clock>,
    validator: Validator,
    draft: OrderDraft,
    summary: PricingSummary,
    field_states: BTreeMap<FieldName, FieldState>,
    notification: Notification,
    submission: SubmissionState,
}

impl OrderForm {
    /// A blank form dated today. Call [`OrderForm::restore`] afterwards to
    /// pick up a saved draft.
    pub fn new(
        catalog: Arc<KitCatalog>,
        store: Arc<dyn DraftStore>,
        clock: Arc<dyn Clock>,
        currency: CurrencyFormat,
    ) -> Self {
        let draft = OrderDraft::blank(&catalog, clock.today());
        let summary = PricingEngine::new(&catalog).calculate(&draft);

        Self {
            catalog,
            currency,
            store,
            clock,
            validator: Validator::new(),
            draft,
            summary,
            field_states: BTreeMap::new(),
            notification: Notification::None,
            submission: SubmissionState::Idle,
        }
    }

    /// Replaces the draft with the saved one, if any. Returns whether a
    /// saved draft was found.
    pub async fn restore(&mut self) -> bool {
        let Some(draft) = self.store.load().await else {
            return false;
        };

        self.draft = draft;
        self.recalculate();
        info!(units = self.summary.total_units, "restored saved order form");
        true
    }

    pub fn catalog(&self) -> &KitCatalog {
        &self.catalog
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn summary(&self) -> &PricingSummary {
        &self.summary
    }

    pub fn summary_text(&self) -> SummaryText {
        self.summary.to_text(&self.currency)
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission
    }

    pub fn field_state(
        &self,
        field: &FieldName,
    ) -> FieldState {
        self.field_states.get(field).copied().unwrap_or_default()
    }

    /// Direct edit of any field.
    pub async fn edit(
        &mut self,
        field: &FieldName,
        value: &str,
    ) {
        self.draft.set(field, value);
        debug!(field = field.key(), "field edited");
        if field.is_quantity() {
            self.recalculate();
        }
        self.persist().await;
    }

    /// The `+` stepper of a kit.
    pub async fn increment(
        &mut self,
        kit: &KitId,
    ) -> u32 {
        let quantity = self.draft.increment(kit);
        self.recalculate();
        self.persist().await;
        quantity
    }

    /// The `−` stepper of a kit; stays at zero.
    pub async fn decrement(
        &mut self,
        kit: &KitId,
    ) -> u32 {
        let quantity = self.draft.decrement(kit);
        self.recalculate();
        self.persist().await;
        quantity
    }

    /// Sets or clears the payment proof filename.
    pub async fn attach(
        &mut self,
        filename: Option<&str>,
    ) {
        self.edit(&FieldName::Attachment, filename.unwrap_or_default())
            .await;
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = Notification::None;
    }

    /// Validates the form and, when it passes, moves to `Submitting` and
    /// returns the payload to send.
    ///
    /// A previous error banner is cleared first. On validation failure the
    /// banner shows the single failing rule and the state is unchanged.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, SubmitRejected> {
        match self.submission {
            SubmissionState::Submitting => return Err(SubmitRejected::AlreadySubmitting),
            SubmissionState::Succeeded => return Err(SubmitRejected::AwaitingReset),
            SubmissionState::Idle | SubmissionState::Failed => {}
        }

        if self.notification.is_error() {
            self.notification = Notification::None;
        }

        let report = self.validator.validate(&self.draft, self.clock.today());
        self.field_states = report.field_states;
        if let Err(error) = report.outcome {
            self.notification = Notification::Error(error.to_string());
            return Err(SubmitRejected::Invalid(error));
        }

        let payload = SubmissionPayload::build(&self.draft, &self.catalog, &self.summary_text());
        self.submission = SubmissionState::Submitting;
        info!(
            company = %payload.company_name,
            grand_total = %payload.grand_total,
            "submitting order"
        );
        Ok(payload)
    }

    /// Records the outcome of the send started by [`OrderForm::begin_submit`].
    ///
    /// Success shows the success banner and waits for
    /// [`OrderForm::complete_success_reset`]. Failure shows the generic
    /// error banner and leaves the draft and its saved copy alone so the
    /// user can retry.
    pub async fn finish_submit(
        &mut self,
        result: Result<Delivery, SinkError>,
    ) -> SubmissionState {
        if self.submission != SubmissionState::Submitting {
            warn!(state = ?self.submission, "ignoring submission result with no send in flight");
            return self.submission;
        }

        match result {
            Ok(delivery) => {
                info!(?delivery, "order submitted");
                self.notification = Notification::Success(SUBMIT_SUCCESS_MESSAGE.to_string());
                self.submission = SubmissionState::Succeeded;
            }
            Err(error) => {
                error!(%error, "order submission failed");
                self.notification = Notification::Error(SUBMIT_FAILURE_MESSAGE.to_string());
                self.submission = SubmissionState::Failed;
            }
        }
        self.submission
    }

    /// Clears the form once the success banner has been shown long enough.
    /// Does nothing unless the last submission succeeded and no reset has
    /// happened since.
    pub async fn complete_success_reset(&mut self) -> bool {
        if self.submission != SubmissionState::Succeeded {
            return false;
        }

        self.clear_to_defaults().await;
        if matches!(self.notification, Notification::Success(_)) {
            self.notification = Notification::None;
        }
        self.submission = SubmissionState::Idle;
        info!("order form cleared after submission");
        true
    }

    /// Explicit reset: blank fields, today's date, zero quantities, no
    /// saved draft and no banner.
    ///
    /// A send already in flight is not cancelled; its result still arrives
    /// through [`OrderForm::finish_submit`].
    pub async fn reset(&mut self) {
        self.clear_to_defaults().await;
        self.notification = Notification::None;
        if self.submission != SubmissionState::Submitting {
            self.submission = SubmissionState::Idle;
        }
        info!("order form reset");
    }

    /// Validate, send once and record the outcome.
    pub async fn submit(
        &mut self,
        sink: &dyn OrderSink,
    ) -> Result<SubmissionState, SubmitRejected> {
        let payload = self.begin_submit()?;
        let result = sink.send(&payload).await;
        Ok(self.finish_submit(result).await)
    }

    fn recalculate(&mut self) {
        self.summary = PricingEngine::new(&self.catalog).calculate(&self.draft);
    }

    async fn persist(&self) {
        if let Err(error) = self.store.save(&self.draft).await {
            warn!(%error, "could not save order form");
        }
    }

    async fn clear_to_defaults(&mut self) {
        self.draft = OrderDraft::blank(&self.catalog, self.clock.today());
        self.field_states.clear();
        self.recalculate();
        if let Err(error) = self.store.clear().await {
            warn!(%error, "could not remove saved order form");
        }
    }
}
