// src/lib.rs
//
// Isolated stories for `TapPayPaymentGateway`. Each story wires the component to
// an in-page mock checkout backend and logs every callback, so the component can
// be exercised without the real widget or backend.
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlFormElement};
use yew::prelude::*;
use yew_tappay::{
    CheckoutOrder, FormError, NavigationError, Navigator, NavigatorHandle, PaymentSubmissionResult,
    SubmitPayment, TapPayPaymentGateway,
};

#[wasm_bindgen(start)]
pub fn start() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    yew::Renderer::<Stories>::new().render();
}

/// Logs the redirect instead of leaving the story page.
struct ActionNavigator;

impl Navigator for ActionNavigator {
    fn go_to(&self, url: &str) -> Result<(), NavigationError> {
        log::info!("action(navigate): {url}");
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Story {
    Default,
    Redirect,
    Declined,
    MalformedPayload,
    MissingUrl,
}

impl Story {
    const ALL: [Story; 5] = [
        Story::Default,
        Story::Redirect,
        Story::Declined,
        Story::MalformedPayload,
        Story::MissingUrl,
    ];

    fn title(self) -> &'static str {
        match self {
            Story::Default => "default",
            Story::Redirect => "redirect",
            Story::Declined => "card declined",
            Story::MalformedPayload => "malformed confirmation",
            Story::MissingUrl => "missing url",
        }
    }

    fn backend_response(self) -> PaymentSubmissionResult {
        match self {
            Story::Default => PaymentSubmissionResult::default(),
            Story::Redirect => {
                PaymentSubmissionResult::confirmed(r#"{"url":"https://pay.example/confirm"}"#)
            }
            Story::Declined => {
                PaymentSubmissionResult::rejected(vec![FormError::new("card declined")])
            }
            Story::MalformedPayload => PaymentSubmissionResult::confirmed("<html>"),
            Story::MissingUrl => PaymentSubmissionResult::confirmed("{}"),
        }
    }
}

#[function_component(Stories)]
fn stories() -> Html {
    let story = use_state(|| Story::Default);
    html! {
        <div>
            <nav>
                { for Story::ALL.iter().map(|&s| {
                    let story = story.clone();
                    let onclick = Callback::from(move |_| story.set(s));
                    html! { <button {onclick}>{ s.title() }</button> }
                }) }
            </nav>
            <GatewayStory key={story.title()} story={*story} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct GatewayStoryProps {
    story: Story,
}

#[function_component(GatewayStory)]
fn gateway_story(props: &GatewayStoryProps) -> Html {
    let form_ref = use_node_ref();
    let errors = use_state(Vec::<FormError>::new);
    let story = props.story;

    let submit_payment = use_memo(story, |story| {
        let story = *story;
        SubmitPayment::new(move || async move {
            log::info!("action(submitPayment)");
            story.backend_response()
        })
    });
    let navigator = use_memo((), |_| NavigatorHandle::new(ActionNavigator));

    let process_payment = Callback::from(|()| log::info!("action(processPayment)"));
    let submit_payment_success = Callback::from(|order: Option<CheckoutOrder>| {
        log::info!("action(submitPaymentSuccess): {order:?}")
    });
    let on_error = {
        let errors = errors.clone();
        Callback::from(move |list: Vec<FormError>| {
            log::info!("action(onError): {list:?}");
            errors.set(list);
        })
    };

    let dispatch = |event_name: &'static str| {
        let form_ref = form_ref.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(form) = form_ref.cast::<HtmlFormElement>() else {
                return;
            };
            let dispatched = Event::new(event_name).and_then(|event| form.dispatch_event(&event));
            if let Err(err) = dispatched {
                log::error!("could not dispatch {event_name}: {err:?}");
            }
        })
    };

    html! {
        <section>
            <h2>{ story.title() }</h2>
            <TapPayPaymentGateway
                form_ref={Some(form_ref.clone())}
                {process_payment}
                submit_payment={(*submit_payment).clone()}
                {submit_payment_success}
                errors={(*errors).clone()}
                {on_error}
                navigator={Some((*navigator).clone())}
            >
                <button type="submit">{ "Pay" }</button>
            </TapPayPaymentGateway>
            <button onclick={dispatch("submitComplete")}>{ "Simulate widget completion" }</button>
            <button onclick={dispatch("submitError")}>{ "Simulate widget error" }</button>
        </section>
    }
}
