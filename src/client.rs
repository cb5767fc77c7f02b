//! yew_tappay/src/client.rs
//!
//! Capabilities injected into the payment gateway component.
//!
//! This module provides:
//! - `SubmitPayment` to call the checkout backend once the widget has collected payment input.
//! - `SubmitPayment::from_js_function()` to adapt a JS function returning a `Promise` (e.g. a
//!   storefront SDK's `completeCheckout`).
//! - `Navigator` to perform the redirect the backend asks for, with `BrowserNavigator` setting
//!   `window.location.href`.
//!
//! # Example Usage
//! ```rust,ignore
//! use yew_tappay::{SubmitPayment, PaymentSubmissionResult, NavigatorHandle};
//!
//! let submit = SubmitPayment::new(|| async {
//!     // call your checkout backend here
//!     PaymentSubmissionResult::confirmed(r#"{"url":"https://pay.example/confirm"}"#)
//! });
//! let navigator = NavigatorHandle::browser();
//! ```

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use gloo_utils::format::JsValueSerdeExt;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Function, Promise};

use crate::error::{js_error_message, FormError, NavigationError};
use crate::types::PaymentSubmissionResult;

/// Future returned by a [`SubmitPayment`] call.
pub type SubmitFuture = LocalBoxFuture<'static, PaymentSubmissionResult>;

/// The checkout backend's "submit payment" operation.
///
/// Compares by identity so it can be passed as a Yew prop.
#[derive(Clone)]
pub struct SubmitPayment(Rc<dyn Fn() -> SubmitFuture>);

impl SubmitPayment {
    pub fn new<F, Fut>(submit: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = PaymentSubmissionResult> + 'static,
    {
        Self(Rc::new(move || submit().boxed_local()))
    }

    /// Wrap a JS function that returns a `Promise` (or a plain value) shaped like
    /// [`PaymentSubmissionResult`].
    ///
    /// A throw, a rejection, or an undecodable value becomes a single backend error.
    pub fn from_js_function(function: Function) -> Self {
        Self::new(move || {
            let function = function.clone();
            async move { submit_via_js(&function).await }
        })
    }

    pub fn submit(&self) -> SubmitFuture {
        (self.0)()
    }
}

impl PartialEq for SubmitPayment {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SubmitPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SubmitPayment").field(&"<fn>").finish()
    }
}

async fn submit_via_js(function: &Function) -> PaymentSubmissionResult {
    let returned = match function.call0(&JsValue::NULL) {
        Ok(value) => value,
        Err(err) => return js_rejection(&err),
    };
    let resolved = if returned.is_instance_of::<Promise>() {
        JsFuture::from(returned.unchecked_into::<Promise>()).await
    } else {
        Ok(returned)
    };
    match resolved {
        Ok(value) => value.into_serde::<PaymentSubmissionResult>().unwrap_or_else(|err| {
            log::warn!("unreadable checkout response: {err}");
            PaymentSubmissionResult::rejected(vec![FormError::new(format!(
                "Unreadable response from checkout: {err}"
            ))])
        }),
        Err(err) => js_rejection(&err),
    }
}

fn js_rejection(err: &JsValue) -> PaymentSubmissionResult {
    let message = js_error_message(err);
    log::error!("checkout submission failed: {message}");
    PaymentSubmissionResult::rejected(vec![FormError::new(message)])
}

/// Performs the page-leaving redirect at the end of a successful confirmation.
pub trait Navigator {
    fn go_to(&self, url: &str) -> Result<(), NavigationError>;
}

/// Sets `window.location.href`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn go_to(&self, url: &str) -> Result<(), NavigationError> {
        let window = web_sys::window().ok_or(NavigationError::NoWindow)?;
        window
            .location()
            .set_href(url)
            .map_err(|err| NavigationError::Rejected {
                url: url.to_owned(),
                message: js_error_message(&err),
            })
    }
}

/// Shared [`Navigator`] usable as a Yew prop.
#[derive(Clone)]
pub struct NavigatorHandle(Rc<dyn Navigator>);

impl NavigatorHandle {
    pub fn new<N: Navigator + 'static>(navigator: N) -> Self {
        Self(Rc::new(navigator))
    }

    pub fn browser() -> Self {
        Self::new(BrowserNavigator)
    }

    pub fn go_to(&self, url: &str) -> Result<(), NavigationError> {
        self.0.go_to(url)
    }
}

impl Default for NavigatorHandle {
    fn default() -> Self {
        Self::browser()
    }
}

impl PartialEq for NavigatorHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NavigatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NavigatorHandle").field(&"<navigator>").finish()
    }
}
