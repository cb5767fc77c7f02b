//! Values exchanged with the checkout backend during one confirmation attempt.

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// TapPay transaction statuses that count as a confirmed payment.
pub const CONFIRMATION_STATUSES: [&str; 2] = ["AUTHORIZED", "CHARGED"];

/// Whether a gateway transaction status means the payment went through.
pub fn is_confirmation_status(status: &str) -> bool {
    CONFIRMATION_STATUSES.contains(&status)
}

/// Summary of the order created by the checkout backend.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

/// What the backend's submit call resolves with.
///
/// On success `confirmation_data` holds a JSON *string* (not an object) that
/// decodes into [`PaymentActionData`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSubmissionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FormError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<CheckoutOrder>,
}

impl PaymentSubmissionResult {
    pub fn rejected(errors: Vec<FormError>) -> Self {
        Self {
            errors: Some(errors),
            ..Default::default()
        }
    }

    pub fn confirmed(confirmation_data: impl Into<String>) -> Self {
        Self {
            confirmation_data: Some(confirmation_data.into()),
            ..Default::default()
        }
    }

    pub fn with_order(mut self, order: CheckoutOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// The backend's error list, if it has any entries.
    pub fn rejection(&self) -> Option<&[FormError]> {
        self.errors.as_deref().filter(|errors| !errors.is_empty())
    }
}

/// Decoded `confirmationData`. Only the redirect url is recognized.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentActionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl PaymentActionData {
    /// Decode from any JSON value. Non-objects and non-string urls carry no url.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let url = value
            .get("url")
            .and_then(|url| url.as_str())
            .map(str::to_owned);
        Self { url }
    }

    /// The redirect target, when present and non-empty.
    pub fn redirect_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}
