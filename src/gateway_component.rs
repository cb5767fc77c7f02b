//! A Yew TapPay payment gateway component for a checkout page to drop in.
//!
//! The component renders the checkout `<form>` the widget mounts into, hands
//! control to the widget on submit, and confirms the payment with the checkout
//! backend once the widget dispatches its completion event.

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::HtmlFormElement;
use yew::prelude::*;

use crate::client::{NavigatorHandle, SubmitPayment};
use crate::components::ErrorMessage;
use crate::config::GatewayConfig;
use crate::confirmation::{ConfirmationTracker, PaymentConfirmation};
use crate::error::{FormError, GatewayError, PaymentFlowError};
use crate::interop::use_gateway_sdk;
use crate::types::CheckoutOrder;
use crate::widget::{CompletionSource, EventSubscription, FormEventSource};

/// Properties for the [`TapPayPaymentGateway`] component.
///
/// # Fields
///
/// * `form_ref` – Reference to the rendered `<form>`; share it to dispatch events from outside.
///   Without one the component keeps its own.
/// * `process_payment` – Called on form submit to let the widget collect payment details.
/// * `submit_payment` – Checkout backend call run when the widget reports completion.
/// * `submit_payment_success` – Called with the backend's order, per `config.success_reporting`.
/// * `errors` – Errors to render inline below the widget.
/// * `on_error` – Receives every failure as a non-empty list of [`FormError`].
/// * `navigator` – Redirect capability (default: `window.location.href`).
/// * `config` – Event names, mount id and SDK loading.
/// * `children` – Extra nodes (e.g. an order summary) rendered inside the form.
#[derive(Properties, PartialEq, Clone)]
pub struct TapPayPaymentGatewayProps {
    #[prop_or_default]
    pub form_ref: Option<NodeRef>,
    pub process_payment: Callback<()>,
    pub submit_payment: SubmitPayment,
    #[prop_or_default]
    pub submit_payment_success: Callback<Option<CheckoutOrder>>,
    #[prop_or_default]
    pub errors: Vec<FormError>,
    pub on_error: Callback<Vec<FormError>>,
    #[prop_or_default]
    pub navigator: Option<NavigatorHandle>,
    #[prop_or_default]
    pub config: GatewayConfig,
    #[prop_or_default]
    pub children: Children,
}

/// Yew function component embedding the TapPay widget in a checkout form.
///
/// # Example
///
/// ```rust,ignore
/// use yew::prelude::*;
/// use yew_tappay::{PaymentSubmissionResult, SubmitPayment, TapPayPaymentGateway};
///
/// #[function_component(Checkout)]
/// fn checkout() -> Html {
///     let errors = use_state(Vec::new);
///     let submit = use_memo((), |_| SubmitPayment::new(|| async {
///         PaymentSubmissionResult::confirmed(r#"{"url":"https://pay.example/confirm"}"#)
///     }));
///     let on_error = {
///         let errors = errors.clone();
///         Callback::from(move |list| errors.set(list))
///     };
///     html! {
///         <TapPayPaymentGateway
///             process_payment={Callback::from(|_| log::info!("widget takes over"))}
///             submit_payment={(*submit).clone()}
///             errors={(*errors).clone()}
///             {on_error}
///         />
///     }
/// }
/// ```
///
/// The widget mount `<div>` carries `data-ready="true"` once the SDK from
/// `config.sdk_url` has loaded (always, when no `sdk_url` is set), so page
/// styles and end-to-end checks can wait on it.
///
/// # Errors
///
/// Backend rejections, malformed confirmation data, a missing redirect url,
/// widget failures and failed redirects all reach `on_error`; none escape as
/// panics.
#[function_component(TapPayPaymentGateway)]
pub fn tappay_payment_gateway(props: &TapPayPaymentGatewayProps) -> Html {
    let sdk_ready = use_gateway_sdk(
        props.config.sdk_url.clone().map(AttrValue::from),
        AttrValue::from(props.config.sdk_global.clone()),
    );
    let tracker = use_memo((), |_| ConfirmationTracker::new());
    let own_form_ref = use_node_ref();
    let form_ref = props.form_ref.clone().unwrap_or(own_form_ref);

    let handler = PaymentConfirmation::new(
        props.submit_payment.clone(),
        props.navigator.clone().unwrap_or_default(),
        props.on_error.clone(),
    )
    .with_success(
        props.submit_payment_success.clone(),
        props.config.success_reporting,
    )
    .with_tracker((*tracker).clone());

    // Listeners outlive a render; they always use the latest props.
    let latest = use_mut_ref(|| handler.clone());
    *latest.borrow_mut() = handler.clone();

    {
        let latest = latest.clone();
        let on_error = props.on_error.clone();
        let deps = (
            form_ref.clone(),
            props.config.completion_event.clone(),
            props.config.error_event.clone(),
        );
        use_effect_with(deps, move |(form_ref, completion_event, error_event)| {
            let subscriptions = match form_ref.cast::<HtmlFormElement>() {
                Some(form) => {
                    let source =
                        FormEventSource::new(form, completion_event.as_str(), error_event.as_str());
                    subscribe(&source, latest, &on_error)
                }
                None => {
                    log::warn!("payment form is not mounted; widget events are not wired");
                    Vec::new()
                }
            };
            move || drop(subscriptions)
        });
    }

    let onsubmit = {
        let process_payment = props.process_payment.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            handler.begin(&process_payment);
        })
    };

    html! {
        <form ref={form_ref} {onsubmit} class="tappay-payment-gateway">
            { for props.children.iter() }
            <div id={props.config.mount_id.clone()} data-ready={sdk_ready.to_string()} />
            <ErrorMessage errors={props.errors.clone()} />
        </form>
    }
}

fn subscribe(
    source: &impl CompletionSource,
    latest: Rc<RefCell<PaymentConfirmation>>,
    on_error: &Callback<Vec<FormError>>,
) -> Vec<EventSubscription> {
    let on_completion = {
        let latest = latest.clone();
        Callback::from(move |()| {
            let handler = latest.borrow().clone();
            handler.spawn_confirm();
        })
    };
    // Clone out first: `on_error` may re-render and replace the handler.
    let on_widget_error = Callback::from(move |error: Option<GatewayError>| {
        let handler = latest.borrow().clone();
        handler.report_widget_error(error);
    });

    let mut subscriptions = Vec::with_capacity(2);
    for subscribed in [
        source.on_completion(on_completion),
        source.on_widget_error(on_widget_error),
    ] {
        match subscribed {
            Ok(subscription) => subscriptions.push(subscription),
            Err(err) => {
                log::error!("could not subscribe to widget events: {}", err.message);
                on_error.emit(PaymentFlowError::WidgetReported(Some(err.message)).to_form_errors())
            }
        }
    }
    subscriptions
}
