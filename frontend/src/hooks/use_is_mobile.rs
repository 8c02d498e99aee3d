use gloo::events::EventListener;
use yew::prelude::*;

fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|window| window.inner_width().ok())
        .and_then(|width| width.as_f64())
        .unwrap_or(f64::MAX)
}

/// True while the viewport is narrower than `breakpoint_px`; follows window resizes
#[hook]
pub fn use_is_mobile(breakpoint_px: f64) -> bool {
    let is_mobile = use_state(|| viewport_width() < breakpoint_px);

    {
        let is_mobile = is_mobile.clone();
        use_effect_with(breakpoint_px.to_bits(), move |_| {
            let listener = web_sys::window().map(|window| {
                EventListener::new(&window, "resize", move |_| {
                    is_mobile.set(viewport_width() < breakpoint_px);
                })
            });
            move || drop(listener)
        });
    }

    *is_mobile
}
