use shared::Notice;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NoticeBannerProps {
    pub notice: Option<Notice>,
    pub on_dismiss: Callback<u64>,
}

/// Renders the current notice, one paragraph per line of its message
#[function_component(NoticeBanner)]
pub fn notice_banner(props: &NoticeBannerProps) -> Html {
    let Some(notice) = props.notice.clone() else {
        return html! {};
    };

    let on_close = {
        let on_dismiss = props.on_dismiss.clone();
        let id = notice.id;
        Callback::from(move |_: MouseEvent| on_dismiss.emit(id))
    };

    html! {
        <div class={notice.kind.css_class()} role="status">
            {for notice.message.lines().map(|line| html! { <p>{line}</p> })}
            <button type="button" class="notice-close" onclick={on_close}>{"×"}</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: Option<String>,
    #[prop_or_default]
    pub on_dismiss: Option<Callback<()>>,
}

/// Sticky error for failed fetches and rejected drops
#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    let Some(message) = props.message.clone() else {
        return html! {};
    };

    html! {
        <div class="form-message error" role="alert">
            <span>{message}</span>
            {if let Some(on_dismiss) = props.on_dismiss.clone() {
                let onclick = Callback::from(move |_: MouseEvent| on_dismiss.emit(()));
                html! { <button type="button" class="notice-close" {onclick}>{"×"}</button> }
            } else {
                html! {}
            }}
        </div>
    }
}
