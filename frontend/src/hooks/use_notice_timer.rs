use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Clears a notice after `duration_ms`.
///
/// Emits the id of the notice the timer was started for. Boards only clear
/// on a matching id, so a timer outliving its notice cannot hide a newer one.
#[hook]
pub fn use_notice_timer(notice_id: Option<u64>, duration_ms: u32, on_expire: Callback<u64>) {
    let is_mounted = use_mut_ref(|| true);

    {
        let is_mounted = is_mounted.clone();
        use_effect_with((), move |_| move || *is_mounted.borrow_mut() = false);
    }

    use_effect_with(notice_id, move |notice_id| {
        if let Some(id) = *notice_id {
            spawn_local(async move {
                TimeoutFuture::new(duration_ms).await;
                if *is_mounted.borrow() {
                    on_expire.emit(id);
                }
            });
        }
        || ()
    });
}
