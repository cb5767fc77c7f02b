#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, Event, EventInit, HtmlFormElement};
use yew::platform::time::sleep;
use yew::prelude::*;
use yew_tappay::{
    FormError, GatewayConfig, NavigationError, Navigator, NavigatorHandle,
    PaymentSubmissionResult, SubmitPayment, TapPayPaymentGateway, TapPayPaymentGatewayProps,
    WIDGET_ERROR_MESSAGE,
};

wasm_bindgen_test_configure!(run_in_browser);

struct RecordingNavigator(Rc<RefCell<Vec<String>>>);

impl Navigator for RecordingNavigator {
    fn go_to(&self, url: &str) -> Result<(), NavigationError> {
        self.0.borrow_mut().push(url.to_owned());
        Ok(())
    }
}

struct Fixture {
    form_ref: NodeRef,
    begun: Rc<Cell<usize>>,
    submissions: Rc<Cell<usize>>,
    visits: Rc<RefCell<Vec<String>>>,
    errors: Rc<RefCell<Vec<Vec<FormError>>>>,
    props: TapPayPaymentGatewayProps,
}

impl Fixture {
    fn new(result: PaymentSubmissionResult) -> Self {
        let form_ref = NodeRef::default();
        let begun = Rc::new(Cell::new(0));
        let submissions = Rc::new(Cell::new(0));
        let visits = Rc::new(RefCell::new(Vec::new()));
        let errors = Rc::new(RefCell::new(Vec::new()));
        let props = TapPayPaymentGatewayProps {
            form_ref: Some(form_ref.clone()),
            process_payment: {
                let begun = begun.clone();
                Callback::from(move |()| begun.set(begun.get() + 1))
            },
            submit_payment: {
                let submissions = submissions.clone();
                SubmitPayment::new(move || {
                    submissions.set(submissions.get() + 1);
                    let result = result.clone();
                    async move { result }
                })
            },
            submit_payment_success: Callback::noop(),
            errors: Vec::new(),
            on_error: {
                let errors = errors.clone();
                Callback::from(move |list| errors.borrow_mut().push(list))
            },
            navigator: Some(NavigatorHandle::new(RecordingNavigator(visits.clone()))),
            config: GatewayConfig::default(),
            children: Children::default(),
        };
        Self {
            form_ref,
            begun,
            submissions,
            visits,
            errors,
            props,
        }
    }

    fn form(&self) -> HtmlFormElement {
        self.form_ref.cast::<HtmlFormElement>().unwrap()
    }
}

fn root() -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let root = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&root).unwrap();
    root
}

/// Let Yew render, run effects and finish spawned confirmations.
async fn settle() {
    sleep(Duration::from_millis(10)).await;
}

fn submit_event() -> Event {
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    Event::new_with_event_init_dict("submit", &init).unwrap()
}

#[wasm_bindgen_test]
async fn submit_then_completion_navigates_once() {
    let fixture = Fixture::new(PaymentSubmissionResult::confirmed(
        r#"{"url":"https://pay.example/confirm"}"#,
    ));
    let _app = yew::Renderer::<TapPayPaymentGateway>::with_root_and_props(
        root(),
        fixture.props.clone(),
    )
    .render();
    settle().await;
    let form = fixture.form();

    let not_cancelled = form.dispatch_event(&submit_event()).unwrap();
    assert!(!not_cancelled, "native form submission must be prevented");
    assert_eq!(fixture.begun.get(), 1);
    assert_eq!(fixture.submissions.get(), 0);

    form.dispatch_event(&Event::new("submitComplete").unwrap()).unwrap();
    settle().await;

    assert_eq!(fixture.submissions.get(), 1);
    assert_eq!(*fixture.visits.borrow(), vec!["https://pay.example/confirm".to_string()]);
    assert!(fixture.errors.borrow().is_empty());
}

#[wasm_bindgen_test]
async fn backend_rejection_reaches_on_error() {
    let declined = vec![FormError::new("card declined")];
    let fixture = Fixture::new(PaymentSubmissionResult::rejected(declined.clone()));
    let _app = yew::Renderer::<TapPayPaymentGateway>::with_root_and_props(
        root(),
        fixture.props.clone(),
    )
    .render();
    settle().await;

    fixture.form().dispatch_event(&Event::new("submitComplete").unwrap()).unwrap();
    settle().await;

    assert_eq!(*fixture.errors.borrow(), vec![declined]);
    assert!(fixture.visits.borrow().is_empty());
}

#[wasm_bindgen_test]
async fn listeners_use_latest_props() {
    let fixture = Fixture::new(PaymentSubmissionResult::default());
    let mut app = yew::Renderer::<TapPayPaymentGateway>::with_root_and_props(
        root(),
        fixture.props.clone(),
    )
    .render();
    settle().await;

    let replaced = Rc::new(RefCell::new(Vec::new()));
    let mut props = fixture.props.clone();
    props.on_error = {
        let replaced = replaced.clone();
        Callback::from(move |list| replaced.borrow_mut().push(list))
    };
    app.update(props);
    settle().await;

    fixture.form().dispatch_event(&Event::new("submitError").unwrap()).unwrap();

    assert!(fixture.errors.borrow().is_empty());
    assert_eq!(*replaced.borrow(), vec![vec![FormError::new(WIDGET_ERROR_MESSAGE)]]);
}

#[wasm_bindgen_test]
async fn unmount_removes_widget_listeners() {
    let fixture = Fixture::new(PaymentSubmissionResult::rejected(vec![FormError::new(
        "card declined",
    )]));
    let app = yew::Renderer::<TapPayPaymentGateway>::with_root_and_props(
        root(),
        fixture.props.clone(),
    )
    .render();
    settle().await;
    let form = fixture.form();

    form.dispatch_event(&Event::new("submitComplete").unwrap()).unwrap();
    settle().await;
    assert_eq!(fixture.submissions.get(), 1);

    app.destroy();
    settle().await;

    form.dispatch_event(&Event::new("submitComplete").unwrap()).unwrap();
    form.dispatch_event(&Event::new("submitError").unwrap()).unwrap();
    settle().await;
    assert_eq!(fixture.submissions.get(), 1);
    assert_eq!(fixture.errors.borrow().len(), 1);
}

#[wasm_bindgen_test]
async fn component_keeps_its_own_form_ref() {
    let fixture = Fixture::new(PaymentSubmissionResult::default());
    let mut props = fixture.props.clone();
    props.form_ref = None;
    let root = root();
    let _app =
        yew::Renderer::<TapPayPaymentGateway>::with_root_and_props(root.clone(), props).render();
    settle().await;

    let form: HtmlFormElement = root.query_selector("form").unwrap().unwrap().unchecked_into();
    form.dispatch_event(&Event::new("submitError").unwrap()).unwrap();

    assert_eq!(*fixture.errors.borrow(), vec![vec![FormError::new(WIDGET_ERROR_MESSAGE)]]);
}
