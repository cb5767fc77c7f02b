//! Typed access to the DOM events the embedded widget dispatches on its form.

use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::{CustomEvent, Event, EventTarget, HtmlFormElement};
use yew::Callback;

use crate::error::{js_error_message, FormError, GatewayError};

/// Source of the widget's completion and error signals.
pub trait CompletionSource {
    /// Subscribe to "payment input complete".
    fn on_completion(&self, callback: Callback<()>) -> Result<EventSubscription, FormError>;

    /// Subscribe to widget-side failures.
    fn on_widget_error(
        &self,
        callback: Callback<Option<GatewayError>>,
    ) -> Result<EventSubscription, FormError>;
}

/// A DOM listener that is removed when dropped.
pub struct EventSubscription {
    target: EventTarget,
    event: String,
    listener: Closure<dyn FnMut(Event)>,
}

impl EventSubscription {
    pub fn listen(
        target: &EventTarget,
        event: &str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, FormError> {
        let listener = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            .map_err(|err| FormError::new(js_error_message(&err)))?;
        Ok(Self {
            target: target.clone(),
            event: event.to_owned(),
            listener,
        })
    }

    pub fn event(&self) -> &str {
        &self.event
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        let removed = self.target.remove_event_listener_with_callback(
            &self.event,
            self.listener.as_ref().unchecked_ref(),
        );
        if let Err(err) = removed {
            log::warn!("could not remove `{}` listener: {}", self.event, js_error_message(&err));
        }
    }
}

/// Widget events dispatched on the checkout `<form>`.
#[derive(Clone, Debug)]
pub struct FormEventSource {
    form: HtmlFormElement,
    completion_event: String,
    error_event: String,
}

impl FormEventSource {
    pub fn new(
        form: HtmlFormElement,
        completion_event: impl Into<String>,
        error_event: impl Into<String>,
    ) -> Self {
        Self {
            form,
            completion_event: completion_event.into(),
            error_event: error_event.into(),
        }
    }
}

impl CompletionSource for FormEventSource {
    fn on_completion(&self, callback: Callback<()>) -> Result<EventSubscription, FormError> {
        EventSubscription::listen(&self.form, &self.completion_event, move |_| callback.emit(()))
    }

    fn on_widget_error(
        &self,
        callback: Callback<Option<GatewayError>>,
    ) -> Result<EventSubscription, FormError> {
        EventSubscription::listen(&self.form, &self.error_event, move |event| {
            callback.emit(gateway_error_from_event(&event))
        })
    }
}

/// Read a [`GatewayError`] out of a `CustomEvent`'s `detail`.
///
/// A string detail is taken as the message; anything undecodable yields `None`.
pub fn gateway_error_from_event(event: &Event) -> Option<GatewayError> {
    let detail = event.dyn_ref::<CustomEvent>()?.detail();
    gateway_error_from_detail(detail)
}

fn gateway_error_from_detail(detail: JsValue) -> Option<GatewayError> {
    if detail.is_null() || detail.is_undefined() {
        return None;
    }
    if let Some(message) = detail.as_string() {
        return Some(GatewayError {
            error: Some(message),
        });
    }
    match serde_wasm_bindgen::from_value::<GatewayError>(detail) {
        Ok(error) => Some(error),
        Err(err) => {
            log::warn!("unsupported widget error payload: {err}");
            None
        }
    }
}
