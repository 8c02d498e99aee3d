use chrono::NaiveDate;
use shared::{DayCarousel, LogIndex, SchoolDay, WeekWindow};
use yew::prelude::*;

use super::class_log_week::render_log_cell;
use crate::services::date_utils::format_date_for_display;

#[derive(Properties, PartialEq)]
pub struct DayCarouselViewProps {
    pub window: WeekWindow,
    pub today: NaiveDate,
    pub index: LogIndex,
    pub swipe_threshold_px: f64,
    pub on_select_cell: Callback<(NaiveDate, u8)>,
}

/// Narrow-screen class-log view: one day at a time, changed by swiping
#[function_component(DayCarouselView)]
pub fn day_carousel_view(props: &DayCarouselViewProps) -> Html {
    let carousel = use_state(|| DayCarousel::new(&props.window, props.today));
    let touch_start_x = use_mut_ref(|| Option::<f64>::None);

    // Re-focus when the displayed week changes
    {
        let carousel = carousel.clone();
        let today = props.today;
        use_effect_with(props.window, move |window| {
            carousel.set(DayCarousel::new(window, today));
            || ()
        });
    }

    let ontouchstart = {
        let touch_start_x = touch_start_x.clone();
        Callback::from(move |e: TouchEvent| {
            *touch_start_x.borrow_mut() = e.touches().get(0).map(|touch| f64::from(touch.client_x()));
        })
    };

    let ontouchend = {
        let carousel = carousel.clone();
        let threshold = props.swipe_threshold_px;
        Callback::from(move |e: TouchEvent| {
            let Some(start) = touch_start_x.borrow_mut().take() else {
                return;
            };
            let Some(end) = e.changed_touches().get(0).map(|touch| f64::from(touch.client_x())) else {
                return;
            };
            let mut next = *carousel;
            if next.swipe_from_delta(end - start, threshold) {
                carousel.set(next);
            }
        })
    };

    let step = |delta: f64| {
        let carousel = carousel.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = *carousel;
            next.swipe_from_delta(delta, 0.0);
            carousel.set(next);
        })
    };

    let days = props.window.days();
    let Some(day) = days.get(carousel.index()) else {
        return html! {};
    };
    let date = day.date;
    let period_count = SchoolDay::ALL.get(carousel.index()).map_or(0, |d| d.period_count());

    html! {
        <div class="day-carousel" {ontouchstart} {ontouchend}>
            <div class="carousel-header">
                <button type="button" class="btn btn-secondary" onclick={step(1.0)} disabled={!carousel.can_go_back()}>
                    {"‹"}
                </button>
                <span class="carousel-day">{format_date_for_display(date)}</span>
                <button type="button" class="btn btn-secondary" onclick={step(-1.0)} disabled={!carousel.can_go_forward()}>
                    {"›"}
                </button>
            </div>
            <table class="class-log-grid single-day">
                <tbody>
                    {for (1..=period_count).map(|period| html! {
                        <tr>
                            <th>{period}</th>
                            {render_log_cell(&props.index, date, period, &props.on_select_cell)}
                        </tr>
                    })}
                </tbody>
            </table>
            <div class="carousel-dots">
                {for (0..days.len()).map(|i| {
                    let class = if i == carousel.index() { "dot active" } else { "dot" };
                    html! { <span {class}></span> }
                })}
            </div>
        </div>
    }
}
