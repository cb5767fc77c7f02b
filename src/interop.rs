//! interop.rs
//!
//! Custom Yew hook to load the payment widget SDK at runtime (no inline JS).
//!
//! # Overview
//! `use_gateway_sdk(src, global)` injects a single
//! `<script id="tappay-sdk" src=… defer>` into `<head>` on first use, returns
//! `false` until the script's `load` event fires, then `true` on every
//! subsequent call. With no `src` the page is assumed to load the SDK itself
//! and the hook reports ready.
//!
//! # Usage
//! ```rust,ignore
//! use yew::prelude::*;
//! use yew_tappay::use_gateway_sdk;
//!
//! #[function_component(App)]
//! fn app() -> Html {
//!     let ready = use_gateway_sdk(Some("https://sdk.example/tpdirect.js".into()), "TPDirect".into());
//!     html! { if ready { <p>{"SDK loaded"}</p> } else { <p>{"Loading SDK..."}</p> } }
//! }
//! ```

use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::js_sys::Reflect;
use web_sys::{Document, HtmlScriptElement};
use yew::functional::hook;
use yew::prelude::*;

const SCRIPT_ID: &str = "tappay-sdk";

fn global_defined(global: &str) -> bool {
    web_sys::window()
        .and_then(|win| Reflect::has(&win, &JsValue::from_str(global)).ok())
        .unwrap_or(false)
}

/// Load the widget SDK exactly once and track readiness.
#[hook]
pub fn use_gateway_sdk(src: Option<AttrValue>, global: AttrValue) -> bool {
    let loaded = {
        let no_script = src.is_none();
        let global = global.clone();
        use_state(move || no_script || global_defined(&global))
    };

    {
        let loaded = loaded.clone();
        use_effect_with(src, move |src| {
            if let Some(src) = src.as_ref().filter(|_| !*loaded) {
                let document = web_sys::window().and_then(|win| win.document());
                match document {
                    Some(document) => {
                        let onload =
                            Closure::wrap(Box::new(move || loaded.set(true)) as Box<dyn Fn()>);
                        match inject_script(&document, src, &onload) {
                            Ok(()) => onload.forget(),
                            Err(err) => log::error!("could not load payment SDK {src}: {err:?}"),
                        }
                    }
                    None => log::error!("no document to load payment SDK {src} into"),
                }
            }
            || ()
        });
    }

    *loaded
}

/// Append the SDK `<script>` unless an earlier render already did.
fn inject_script(
    document: &Document,
    src: &str,
    onload: &Closure<dyn Fn()>,
) -> Result<(), JsValue> {
    if let Some(existing) = document.get_element_by_id(SCRIPT_ID) {
        // Another gateway on the page inserted it; wait for the same load event.
        existing.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
        return Ok(());
    }
    let script: HtmlScriptElement = document.create_element("script")?.dyn_into()?;
    script.set_id(SCRIPT_ID);
    script.set_src(src);
    script.set_defer(true);
    script.set_onload(Some(onload.as_ref().unchecked_ref()));
    document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no <head>"))?
        .append_child(&script)?;
    Ok(())
}
