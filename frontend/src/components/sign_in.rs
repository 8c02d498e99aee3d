use shared::Session;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::config::AppConfig;
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct SignInProps {
    pub config: AppConfig,
    pub on_signed_in: Callback<Session>,
}

#[function_component(SignIn)]
pub fn sign_in(props: &SignInProps) -> Html {
    let token_input = use_state(String::new);
    let validating = use_state(|| false);
    let error_message = use_state(|| Option::<String>::None);

    let on_input_change = {
        let token_input = token_input.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            token_input.set(input.value());
        })
    };

    let on_submit = {
        let token_input = token_input.clone();
        let validating = validating.clone();
        let error_message = error_message.clone();
        let config = props.config.clone();
        let on_signed_in = props.on_signed_in.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let token = token_input.trim().to_string();
            if token.is_empty() {
                error_message.set(Some("Paste your access token".to_string()));
                return;
            }

            validating.set(true);
            error_message.set(None);

            let validating = validating.clone();
            let error_message = error_message.clone();
            let config = config.clone();
            let on_signed_in = on_signed_in.clone();

            spawn_local(async move {
                match ApiClient::fetch_session(&config, &token).await {
                    Ok(session) => {
                        Logger::info_with_component(
                            "sign-in",
                            &format!("Signed in as {} ({})", session.user.name, session.user.role),
                        );
                        on_signed_in.emit(session);
                    }
                    Err(e) => {
                        Logger::warn_with_component("sign-in", &format!("Sign-in failed: {}", e));
                        error_message.set(Some(e.to_string()));
                    }
                }
                validating.set(false);
            });
        })
    };

    html! {
        <section class="sign-in">
            <h2>{"Sign in"}</h2>
            {if let Some(error) = (*error_message).clone() {
                html! { <div class="form-message error">{error}</div> }
            } else {
                html! {}
            }}
            <form class="sign-in-form" onsubmit={on_submit}>
                <div class="form-group">
                    <label for="token">{"Access token"}</label>
                    <input
                        type="password"
                        id="token"
                        value={(*token_input).clone()}
                        onchange={on_input_change}
                        disabled={*validating}
                        autofocus=true
                    />
                </div>
                <button type="submit" class="btn btn-primary" disabled={*validating}>
                    {if *validating { "Checking..." } else { "Sign in" }}
                </button>
            </form>
        </section>
    }
}
