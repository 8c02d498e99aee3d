use chrono::{Datelike, NaiveDate};
use shared::class_log::duplicate_tooltip;
use shared::week::WORK_WEEK_LEN;
use shared::{LogCell, LogIndex, SchoolDay};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use super::class_log_form::ClassLogForm;
use super::day_carousel::DayCarouselView;
use super::notice_banner::ErrorBanner;
use crate::config::AppConfig;
use crate::hooks::use_class_logs::use_class_logs;
use crate::hooks::use_departments::UseDepartmentsResult;
use crate::hooks::use_is_mobile::use_is_mobile;
use crate::services::api::ApiClient;
use crate::services::date_utils::format_column_header;

#[derive(Properties, PartialEq)]
pub struct ClassLogWeekProps {
    pub api_client: ApiClient,
    pub config: AppConfig,
    pub today: NaiveDate,
    /// Departments visible to the signed-in user, loaded once per session
    pub departments: UseDepartmentsResult,
}

#[function_component(ClassLogWeek)]
pub fn class_log_week(props: &ClassLogWeekProps) -> Html {
    let departments = &props.departments;
    let logs = use_class_logs(&props.api_client, props.today);
    let is_mobile = use_is_mobile(props.config.mobile_breakpoint_px);
    let composing = use_state(|| Option::<(NaiveDate, u8)>::None);

    // Pick the first visible department once they arrive
    {
        let select_department = logs.actions.select_department.clone();
        let first = departments.departments.first().map(|d| d.id.clone());
        let has_selection = logs.state.department_id.is_some();
        use_effect_with(first, move |first| {
            if let (Some(id), false) = (first.clone(), has_selection) {
                select_department.emit(id);
            }
            || ()
        });
    }

    let on_department_change = {
        let select_department = logs.actions.select_department.clone();
        let composing = composing.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            composing.set(None);
            select_department.emit(select.value());
        })
    };

    let on_select_cell = {
        let composing = composing.clone();
        Callback::from(move |slot: (NaiveDate, u8)| composing.set(Some(slot)))
    };

    let on_close_form = {
        let composing = composing.clone();
        Callback::from(move |_: ()| composing.set(None))
    };

    let state = &logs.state;
    let window = state.window;
    let selected_department = state.department_id.clone().unwrap_or_default();

    let form = match (*composing, state.department_id.clone()) {
        (Some((date, period)), Some(department_id)) if window.contains(date) => {
            let subjects = departments.subjects_in(&department_id);
            html! {
                <ClassLogForm
                    api_client={props.api_client.clone()}
                    {subjects}
                    {department_id}
                    {date}
                    period={Some(period)}
                    index={state.index.clone()}
                    notice_duration_ms={props.config.notice_duration_ms}
                    on_created={logs.actions.log_created.clone()}
                    on_close={on_close_form}
                />
            }
        }
        _ => html! {},
    };

    html! {
        <section class="class-log-section">
            <div class="section-toolbar">
                <h2>{"Class logs"}</h2>
                <select class="department-select" onchange={on_department_change} disabled={departments.loading}>
                    {if departments.departments.is_empty() {
                        html! { <option value="">{if departments.loading { "Loading..." } else { "No departments" }}</option> }
                    } else {
                        html! {
                            {for departments.departments.iter().map(|department| html! {
                                <option
                                    value={department.id.clone()}
                                    selected={department.id == selected_department}
                                >
                                    {&department.name}
                                </option>
                            })}
                        }
                    }}
                </select>
            </div>

            <div class="week-nav">
                <button type="button" class="btn btn-secondary" onclick={logs.actions.prev_week.clone()}>
                    {"‹ Previous week"}
                </button>
                <span class="week-label">
                    {window.label()}
                    {if window.is_current_week() {
                        format!(
                            " (this week, {} of {} school days so far)",
                            window.elapsed_days(props.today).len(),
                            WORK_WEEK_LEN
                        )
                    } else {
                        String::new()
                    }}
                </span>
                <button
                    type="button"
                    class="btn btn-secondary"
                    onclick={logs.actions.next_week.clone()}
                    disabled={window.is_next_disabled()}
                >
                    {"Next week ›"}
                </button>
                <button
                    type="button"
                    class="btn btn-secondary"
                    onclick={{
                        let refresh = logs.actions.refresh.clone();
                        Callback::from(move |_: MouseEvent| refresh.emit(()))
                    }}
                    disabled={state.loading || state.department_id.is_none()}
                >
                    {"Refresh"}
                </button>
            </div>

            <ErrorBanner message={departments.error.clone()} />
            <ErrorBanner message={state.error.clone()} on_dismiss={logs.actions.dismiss_error.clone()} />

            {if state.loading {
                html! { <div class="loading">{"Loading class logs..."}</div> }
            } else {
                html! {}
            }}

            {if is_mobile {
                html! {
                    <DayCarouselView
                        {window}
                        today={props.today}
                        index={state.index.clone()}
                        swipe_threshold_px={props.config.swipe_threshold_px}
                        on_select_cell={on_select_cell.clone()}
                    />
                }
            } else {
                render_week_grid(&window.days().iter().map(|d| d.date).collect::<Vec<_>>(), &state.index, &on_select_cell)
            }}

            {form}
        </section>
    }
}

fn render_week_grid(days: &[NaiveDate], index: &LogIndex, on_select: &Callback<(NaiveDate, u8)>) -> Html {
    html! {
        <table class="class-log-grid">
            <thead>
                <tr>
                    <th></th>
                    {for days.iter().map(|date| html! { <th>{format_column_header(*date)}</th> })}
                </tr>
            </thead>
            <tbody>
                {for (1..=SchoolDay::max_period_count()).map(|period| html! {
                    <tr>
                        <th>{period}</th>
                        {for days.iter().map(|date| render_log_cell(index, *date, period, on_select))}
                    </tr>
                })}
            </tbody>
        </table>
    }
}

/// One class hour: Missing, the single log, or the first of several tagged DUPLICATE
pub(super) fn render_log_cell(
    index: &LogIndex,
    date: NaiveDate,
    period: u8,
    on_select: &Callback<(NaiveDate, u8)>,
) -> Html {
    let scheduled = SchoolDay::from_weekday(date.weekday()).is_some_and(|day| day.has_period(period));
    if !scheduled {
        return html! { <td class="log-cell no-class"></td> };
    }

    let onclick = {
        let on_select = on_select.clone();
        Callback::from(move |_: MouseEvent| on_select.emit((date, period)))
    };

    match index.cell(date, period) {
        LogCell::Missing => html! {
            <td class="log-cell missing" {onclick}>{"Missing"}</td>
        },
        LogCell::Single(entry) => html! {
            <td class="log-cell logged" {onclick}>
                <span class="lecture-title">{&entry.lecture_title}</span>
                <span class="lecture-sequence">{format!("#{}", entry.sequence)}</span>
                <span class="lecture-teacher">{entry.teacher_label()}</span>
            </td>
        },
        LogCell::Duplicate { shown, all } => html! {
            <td class="log-cell logged duplicate" title={duplicate_tooltip(all)} {onclick}>
                <span class="duplicate-badge">{format!("DUPLICATE ×{}", all.len())}</span>
                <span class="lecture-title">{&shown.lecture_title}</span>
                <span class="lecture-sequence">{format!("#{}", shown.sequence)}</span>
                <span class="lecture-teacher">{shown.teacher_label()}</span>
            </td>
        },
    }
}
