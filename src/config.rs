//! Integration settings for [`TapPayPaymentGateway`](crate::TapPayPaymentGateway).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a successful confirmation is reported to the parent.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuccessReporting {
    /// Navigate to the payment url; `submit_payment_success` is not called.
    #[default]
    Navigate,
    /// Call `submit_payment_success` and stay on the page.
    Callback,
    /// Call `submit_payment_success`, then navigate.
    CallbackThenNavigate,
}

impl SuccessReporting {
    pub fn reports_callback(self) -> bool {
        matches!(self, Self::Callback | Self::CallbackThenNavigate)
    }

    pub fn navigates(self) -> bool {
        matches!(self, Self::Navigate | Self::CallbackThenNavigate)
    }
}

/// Event names, mount point and SDK loading for the embedded widget.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GatewayConfig {
    /// DOM event the widget dispatches on the form when input is complete.
    pub completion_event: String,
    /// DOM event the widget dispatches on the form when it fails.
    pub error_event: String,
    /// Id of the `<div>` the widget inserts itself into.
    pub mount_id: String,
    /// Script to inject for the widget SDK. `None` when the page already loads it.
    pub sdk_url: Option<String>,
    /// Global the SDK defines once loaded.
    pub sdk_global: String,
    pub success_reporting: SuccessReporting,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            completion_event: "submitComplete".into(),
            error_event: "submitError".into(),
            mount_id: "tappay-gateway".into(),
            sdk_url: None,
            sdk_global: "TPDirect".into(),
            success_reporting: SuccessReporting::default(),
        }
    }
}

impl GatewayConfig {
    /// Decode from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GatewayConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.completion_event.is_empty() {
            return Err(ConfigError::Empty("completion_event"));
        }
        if self.error_event.is_empty() {
            return Err(ConfigError::Empty("error_event"));
        }
        if self.mount_id.is_empty() {
            return Err(ConfigError::Empty("mount_id"));
        }
        if self.sdk_url.is_some() && self.sdk_global.is_empty() {
            return Err(ConfigError::Empty("sdk_global"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(GatewayConfig::from_json("{}").unwrap(), GatewayConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = GatewayConfig::from_json(
            r#"{"sdk_url":"https://sdk.example/tpdirect.js","success_reporting":"callback_then_navigate"}"#,
        )
        .unwrap();
        assert_eq!(config.completion_event, "submitComplete");
        assert_eq!(config.success_reporting, SuccessReporting::CallbackThenNavigate);
        assert!(config.sdk_url.is_some());
    }

    #[test]
    fn empty_event_names_are_rejected() {
        let err = GatewayConfig::from_json(r#"{"completion_event":""}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Empty("completion_event")));
        let err = GatewayConfig::from_json(r#"{"mount_id":""}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Empty("mount_id")));
    }

    #[test]
    fn bad_json_is_a_decode_error() {
        assert!(matches!(
            GatewayConfig::from_json("{not json"),
            Err(ConfigError::Decode(_))
        ));
    }

    #[test]
    fn success_reporting_modes() {
        assert!(SuccessReporting::Navigate.navigates());
        assert!(!SuccessReporting::Navigate.reports_callback());
        assert!(!SuccessReporting::Callback.navigates());
        assert!(SuccessReporting::CallbackThenNavigate.navigates());
        assert!(SuccessReporting::CallbackThenNavigate.reports_callback());
    }
}
