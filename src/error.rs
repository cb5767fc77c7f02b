//! Error types shared by the payment gateway component.
//!
//! Every failure the component can observe ends up as a list of [`FormError`]
//! handed to the parent's `on_error` callback. [`PaymentFlowError`] is the
//! closed set of reasons a confirmation attempt can fail.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// Message reported when the backend's confirmation payload is not valid JSON.
pub const MALFORMED_CONFIRMATION_MESSAGE: &str =
    "Payment needs confirmation but data required for confirmation received from the server is malformed.";

/// Message reported when the confirmation payload carries no redirect url.
pub const INVALID_PAYMENT_URL_MESSAGE: &str = "Invalid payment url. Please try again.";

/// Message reported when the widget signals a failure without a message.
pub const WIDGET_ERROR_MESSAGE: &str = "Error in TapPay payment widget.";

/// A user-displayable error, as rendered by [`ErrorMessage`](crate::ErrorMessage).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FormError {
    pub message: String,
}

impl FormError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&str> for FormError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Payload of the widget's error event.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct GatewayError {
    #[serde(default)]
    pub error: Option<String>,
}

/// Why a confirmation attempt ended in an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaymentFlowError {
    /// The checkout backend rejected the payment with its own error list.
    #[error("payment rejected by checkout backend ({} error(s))", .0.len())]
    BackendRejected(Vec<FormError>),

    /// `confirmationData` was missing or not valid JSON.
    #[error("{}", MALFORMED_CONFIRMATION_MESSAGE)]
    MalformedConfirmationPayload,

    /// The decoded payload had no usable redirect url.
    #[error("{}", INVALID_PAYMENT_URL_MESSAGE)]
    InvalidRedirectTarget,

    /// The embedded widget reported a failure, optionally with a message.
    #[error("{}", .0.as_deref().unwrap_or(WIDGET_ERROR_MESSAGE))]
    WidgetReported(Option<String>),

    /// Acting on a valid-looking payload failed.
    #[error("{0}")]
    RedirectExecutionFailure(String),
}

impl PaymentFlowError {
    /// Normalize into the list handed to `on_error`. Never empty.
    pub fn to_form_errors(&self) -> Vec<FormError> {
        match self {
            PaymentFlowError::BackendRejected(errors) if !errors.is_empty() => errors.clone(),
            other => vec![FormError::new(other.to_string())],
        }
    }

    /// Map a widget error event payload.
    pub fn from_gateway_error(error: Option<GatewayError>) -> Self {
        let message = error
            .and_then(|e| e.error)
            .filter(|message| !message.is_empty());
        PaymentFlowError::WidgetReported(message)
    }
}

/// Failure to perform the browser redirect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NavigationError {
    #[error("no browser window available for redirect")]
    NoWindow,
    #[error("redirect to {url} failed: {message}")]
    Rejected { url: String, message: String },
}

/// Failure to load a [`GatewayConfig`](crate::GatewayConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid gateway config: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("gateway config field `{0}` must not be empty")]
    Empty(&'static str),
}

/// Best-effort text of a caught `JsValue`.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    web_sys::js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
