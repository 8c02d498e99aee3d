use shared::{CellState, DropOutcome, DropPolicy, SchoolDay, SlotKey, Timetable};
use web_sys::DataTransfer;
use yew::prelude::*;

use super::notice_banner::ErrorBanner;
use crate::hooks::use_timetable::{use_timetable, UseTimetableActions};
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

const COMPONENT: &str = "timetable";
const DRAG_FORMAT: &str = "text/plain";

/// Put the dragged cell's key on the transfer. Returns false, after logging,
/// when the browser gave no transfer or refused the write.
fn write_drag_payload(transfer: Option<DataTransfer>, key: &str) -> bool {
    let Some(transfer) = transfer else {
        Logger::warn_with_component(COMPONENT, &format!("No drag data for {}", key));
        return false;
    };
    match transfer.set_data(DRAG_FORMAT, key) {
        Ok(()) => true,
        Err(err) => {
            Logger::warn_with_component(COMPONENT, &format!("Could not start dragging {}: {:?}", key, err));
            false
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct TimetableGridProps {
    pub api_client: ApiClient,
    pub drop_policy: DropPolicy,
}

#[function_component(TimetableGrid)]
pub fn timetable_grid(props: &TimetableGridProps) -> Html {
    let timetable = use_timetable(&props.api_client, props.drop_policy);
    let state = &timetable.state;
    let actions = &timetable.actions;

    let on_reload = {
        let reload = actions.reload.clone();
        Callback::from(move |_: MouseEvent| reload.emit(()))
    };

    let status = match &state.last_outcome {
        Some(DropOutcome::Moved { to }) => format!("Moved lesson to {}", to),
        Some(DropOutcome::Swapped { first, second }) => format!("Swapped {} and {}", first, second),
        _ => String::new(),
    };

    html! {
        <section class="timetable-section">
            <div class="section-toolbar">
                <h2>{"Timetable"}</h2>
                <span class="drop-status">{status}</span>
                <button type="button" class="btn btn-secondary" onclick={on_reload} disabled={state.loading}>
                    {if state.loading { "Loading..." } else { "Reload" }}
                </button>
            </div>
            <ErrorBanner message={state.error.clone()} on_dismiss={actions.dismiss_error.clone()} />
            {if state.timetable.is_empty() && !state.loading {
                html! { <p class="empty-state">{"No lessons in the timetable yet."}</p> }
            } else {
                html! {
                    <div class="timetable-blocks">
                        {for state.timetable.teachers().into_iter().map(|teacher| {
                            render_teacher_block(&state.timetable, state.hover.as_ref(), &teacher, actions)
                        })}
                    </div>
                }
            }}
        </section>
    }
}

/// One table per teacher: periods down, days across
fn render_teacher_block(
    timetable: &Timetable,
    hover: Option<&SlotKey>,
    teacher: &str,
    actions: &UseTimetableActions,
) -> Html {
    html! {
        <table class="timetable-grid" key={teacher.to_string()}>
            <caption>{teacher}</caption>
            <thead>
                <tr>
                    <th></th>
                    {for SchoolDay::ALL.iter().map(|day| html! { <th>{day.full_name()}</th> })}
                </tr>
            </thead>
            <tbody>
                {for (1..=SchoolDay::max_period_count()).map(|period| html! {
                    <tr>
                        <th>{period}</th>
                        {for SchoolDay::ALL.iter().map(|day| {
                            let slot = SlotKey::new(*day, period, teacher);
                            render_cell(timetable, hover, slot, actions)
                        })}
                    </tr>
                })}
            </tbody>
        </table>
    }
}

fn render_cell(timetable: &Timetable, hover: Option<&SlotKey>, slot: SlotKey, actions: &UseTimetableActions) -> Html {
    if !slot.day.has_period(slot.period) {
        return html! { <td class="tt-cell no-class"></td> };
    }

    let key = slot.to_string();

    let ondragover = {
        let hover = actions.hover.clone();
        let slot = slot.clone();
        Callback::from(move |e: DragEvent| {
            // Required for the element to accept a drop
            e.prevent_default();
            hover.emit(Some(slot.clone()));
        })
    };

    let ondrop = {
        let drop = actions.drop.clone();
        let slot = slot.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            let source = e
                .data_transfer()
                .and_then(|transfer| transfer.get_data(DRAG_FORMAT).ok())
                .unwrap_or_default();
            drop.emit((source, slot.clone()));
        })
    };

    let ondragend = {
        let hover = actions.hover.clone();
        Callback::from(move |_: DragEvent| hover.emit(None))
    };

    let (class, body, draggable) = match timetable.cell_state(&slot, hover) {
        CellState::Empty => ("tt-cell empty", html! {}, false),
        CellState::Filled(entry) => ("tt-cell filled", render_lesson(&entry.subject, &entry.grade), true),
        CellState::DragHover(Some(entry)) => ("tt-cell filled drag-hover", render_lesson(&entry.subject, &entry.grade), true),
        CellState::DragHover(None) => ("tt-cell empty drag-hover", html! {}, false),
    };

    let ondragstart = {
        let key = key.clone();
        Callback::from(move |e: DragEvent| {
            write_drag_payload(e.data_transfer(), &key);
        })
    };

    html! {
        <td
            {class}
            key={key}
            draggable={draggable.to_string()}
            ondragstart={draggable.then_some(ondragstart)}
            {ondragover}
            {ondrop}
            {ondragend}
        >
            {body}
        </td>
    }
}

fn render_lesson(subject: &str, grade: &str) -> Html {
    html! {
        <>
            <span class="lesson-subject">{subject}</span>
            <span class="lesson-grade">{grade}</span>
        </>
    }
}
