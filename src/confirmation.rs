//! Payment confirmation handshake between the embedded widget, the checkout
//! backend and the parent component.
//!
//! One submission attempt walks
//! `Idle → AwaitingWidget → Confirming → {Redirected | Errored}` and ends in
//! exactly one outcome: a redirect or one `on_error` call.

use std::cell::Cell;
use std::rc::Rc;

use yew::Callback;

use crate::client::{NavigatorHandle, SubmitPayment};
use crate::config::SuccessReporting;
use crate::error::{FormError, GatewayError, PaymentFlowError};
use crate::types::{CheckoutOrder, PaymentActionData, PaymentSubmissionResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationState {
    Idle,
    AwaitingWidget,
    Confirming,
    Redirected,
    Errored,
}

/// Confirmation state shared across re-renders of the owning component.
#[derive(Clone, Debug)]
pub struct ConfirmationTracker(Rc<Cell<ConfirmationState>>);

impl ConfirmationTracker {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(ConfirmationState::Idle)))
    }

    pub fn get(&self) -> ConfirmationState {
        self.0.get()
    }

    fn set(&self, state: ConfirmationState) {
        let previous = self.0.replace(state);
        if previous != state {
            log::debug!("payment confirmation: {previous:?} -> {state:?}");
        }
    }

    /// Claim the single in-flight slot. Fails while confirming or after a redirect.
    fn try_start(&self) -> bool {
        match self.get() {
            ConfirmationState::Confirming | ConfirmationState::Redirected => false,
            _ => {
                self.set(ConfirmationState::Confirming);
                true
            }
        }
    }
}

impl Default for ConfirmationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ConfirmationTracker {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A confirmation payload that passed every check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmedPayment {
    pub url: String,
    pub order: Option<CheckoutOrder>,
}

/// How one completion signal was handled.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfirmOutcome {
    /// Another confirmation was in flight, or the page is already leaving.
    Skipped,
    /// Success was reported without leaving the page.
    Reported(ConfirmedPayment),
    /// Navigation to the url was performed.
    Redirected(String),
    Failed(PaymentFlowError),
}

/// Decide what a backend submission result asks for, without side effects.
pub fn resolve_submission(
    result: PaymentSubmissionResult,
) -> Result<ConfirmedPayment, PaymentFlowError> {
    if let Some(errors) = result.rejection() {
        return Err(PaymentFlowError::BackendRejected(errors.to_vec()));
    }
    let payload = result
        .confirmation_data
        .as_deref()
        .ok_or(PaymentFlowError::MalformedConfirmationPayload)?;
    let decoded: serde_json::Value = serde_json::from_str(payload).map_err(|err| {
        log::warn!("confirmation data is not JSON: {err}");
        PaymentFlowError::MalformedConfirmationPayload
    })?;
    let action = PaymentActionData::from_json(&decoded);
    let url = action
        .redirect_url()
        .ok_or(PaymentFlowError::InvalidRedirectTarget)?;
    Ok(ConfirmedPayment {
        url: url.to_owned(),
        order: result.order,
    })
}

/// Bridges the widget's signals, the checkout backend and the parent callbacks.
#[derive(Clone)]
pub struct PaymentConfirmation {
    submit_payment: SubmitPayment,
    navigator: NavigatorHandle,
    on_error: Callback<Vec<FormError>>,
    on_success: Callback<Option<CheckoutOrder>>,
    success_reporting: SuccessReporting,
    tracker: ConfirmationTracker,
}

impl PaymentConfirmation {
    pub fn new(
        submit_payment: SubmitPayment,
        navigator: NavigatorHandle,
        on_error: Callback<Vec<FormError>>,
    ) -> Self {
        Self {
            submit_payment,
            navigator,
            on_error,
            on_success: Callback::noop(),
            success_reporting: SuccessReporting::default(),
            tracker: ConfirmationTracker::new(),
        }
    }

    pub fn with_success(
        mut self,
        on_success: Callback<Option<CheckoutOrder>>,
        success_reporting: SuccessReporting,
    ) -> Self {
        self.on_success = on_success;
        self.success_reporting = success_reporting;
        self
    }

    /// Share state with an existing tracker (e.g. one kept by a component hook).
    pub fn with_tracker(mut self, tracker: ConfirmationTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn state(&self) -> ConfirmationState {
        self.tracker.get()
    }

    /// The user submitted the form: hand control to the widget.
    pub fn begin(&self, process_payment: &Callback<()>) {
        match self.state() {
            ConfirmationState::Confirming | ConfirmationState::Redirected => {
                log::warn!("form submitted while a payment is being confirmed; ignoring");
            }
            _ => {
                self.tracker.set(ConfirmationState::AwaitingWidget);
                process_payment.emit(());
            }
        }
    }

    /// The widget finished collecting input: confirm in the background.
    pub fn spawn_confirm(&self) {
        let handler = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            handler.confirm().await;
        });
    }

    /// Run the confirmation sequence for one completion signal.
    pub async fn confirm(&self) -> ConfirmOutcome {
        if !self.tracker.try_start() {
            log::warn!("duplicate payment completion signal ignored");
            return ConfirmOutcome::Skipped;
        }

        let result = self.submit_payment.submit().await;
        let confirmed = match resolve_submission(result) {
            Ok(confirmed) => confirmed,
            Err(err) => return self.fail(err),
        };

        if self.success_reporting.reports_callback() {
            self.on_success.emit(confirmed.order.clone());
        }
        if !self.success_reporting.navigates() {
            self.tracker.set(ConfirmationState::Idle);
            return ConfirmOutcome::Reported(confirmed);
        }

        match self.navigator.go_to(&confirmed.url) {
            Ok(()) => {
                self.tracker.set(ConfirmationState::Redirected);
                ConfirmOutcome::Redirected(confirmed.url)
            }
            Err(err) => self.fail(PaymentFlowError::RedirectExecutionFailure(err.to_string())),
        }
    }

    /// The widget reported a failure on its own channel.
    ///
    /// Ignored while a confirmation is in flight: the pending confirmation owns
    /// the attempt's outcome.
    pub fn report_widget_error(&self, error: Option<GatewayError>) {
        match self.state() {
            ConfirmationState::Redirected => return,
            ConfirmationState::Confirming => {
                log::warn!("widget error during confirmation ignored: {error:?}");
                return;
            }
            _ => {}
        }
        self.fail(PaymentFlowError::from_gateway_error(error));
    }

    fn fail(&self, err: PaymentFlowError) -> ConfirmOutcome {
        log::error!("payment confirmation failed: {err}");
        self.tracker.set(ConfirmationState::Errored);
        self.on_error.emit(err.to_form_errors());
        ConfirmOutcome::Failed(err)
    }
}
