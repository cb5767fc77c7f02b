use yew::prelude::*;

use crate::error::FormError;

/// Inline list of form errors.
#[derive(Properties, PartialEq)]
pub struct ErrorMessageProps {
    /// Errors to display; nothing is rendered when empty
    #[prop_or_default]
    pub errors: Vec<FormError>,
}

#[function_component(ErrorMessage)]
pub fn error_message(props: &ErrorMessageProps) -> Html {
    if props.errors.is_empty() {
        return Html::default();
    }
    html! {
        <div class="tappay-error-message" role="alert">
            { for props.errors.iter().map(|error| html! {
                <p class="tappay-error-message__item">{ &error.message }</p>
            }) }
        </div>
    }
}
