use chrono::{Datelike, NaiveDate};
use shared::{AssignedSubject, ClassLogEntry, LogIndex, Person, SchoolDay};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::absence_picker::AbsencePicker;
use super::notice_banner::NoticeBanner;
use crate::hooks::use_class_log_form::{use_class_log_form, ClassLogFormAction, FormField};
use crate::hooks::use_notice_timer::use_notice_timer;
use crate::services::api::ApiClient;
use crate::services::date_utils::format_date_for_display;

#[derive(Properties, PartialEq)]
pub struct ClassLogFormProps {
    pub api_client: ApiClient,
    pub department_id: String,
    pub date: NaiveDate,
    pub period: Option<u8>,
    /// Logs loaded for the displayed week, for the duplicate check
    pub index: LogIndex,
    /// Subjects offered as choices; empty means free text
    pub subjects: Vec<AssignedSubject>,
    pub notice_duration_ms: u32,
    pub on_created: Callback<ClassLogEntry>,
    pub on_close: Callback<()>,
}

#[function_component(ClassLogForm)]
pub fn class_log_form(props: &ClassLogFormProps) -> Html {
    let form = use_class_log_form(
        &props.api_client,
        &props.department_id,
        props.date,
        props.period,
        props.on_created.clone(),
    );

    let dismiss_notice = {
        let dispatcher = form.dispatcher();
        Callback::from(move |id: u64| dispatcher.dispatch(ClassLogFormAction::DismissNotice(id)))
    };
    use_notice_timer(
        form.draft.notices().current().map(|notice| notice.id),
        props.notice_duration_ms,
        dismiss_notice.clone(),
    );

    let edit_input = |field: FormField| {
        let dispatcher = form.dispatcher();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatcher.dispatch(ClassLogFormAction::Edit(field, input.value()));
        })
    };
    let edit_select = |field: FormField| {
        let dispatcher = form.dispatcher();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            dispatcher.dispatch(ClassLogFormAction::Edit(field, select.value()));
        })
    };

    let on_submit = {
        let dispatcher = form.dispatcher();
        let index = props.index.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            dispatcher.dispatch(ClassLogFormAction::Submit(index.clone()));
        })
    };

    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let submitting = form.is_submitting();
    let draft = &form.draft;
    let existing = draft.existing_logs(&props.index, form.date);
    let period_count = SchoolDay::from_weekday(form.date.weekday())
        .map(SchoolDay::period_count)
        .unwrap_or(0);
    let selected_period = draft.period.map(|p| p.to_string()).unwrap_or_default();
    let suggestions: Vec<String> = draft
        .suggestions(&form.roster)
        .into_iter()
        .map(|student| student.display_name())
        .collect();

    html! {
        <section class="class-log-form">
            <div class="section-toolbar">
                <h3>{format!("New class log · {}", format_date_for_display(form.date))}</h3>
                <button type="button" class="btn btn-secondary" onclick={on_close}>{"Close"}</button>
            </div>

            <NoticeBanner notice={draft.notices().current().cloned()} on_dismiss={dismiss_notice} />

            {if !existing.is_empty() {
                html! {
                    <div class="form-message info">
                        <strong>{format!("Already logged for this class hour ({})", existing.len())}</strong>
                        <ul>
                            {for existing.iter().map(|entry| html! {
                                <li>{format!("{} (#{}) by {}", entry.lecture_title, entry.sequence, entry.teacher_label())}</li>
                            })}
                        </ul>
                    </div>
                }
            } else {
                html! {}
            }}

            <form onsubmit={on_submit}>
                <div class="form-group">
                    <label for="subject">{"Subject"}</label>
                    {if props.subjects.is_empty() {
                        html! {
                            <input
                                type="text"
                                id="subject"
                                placeholder="Subject id"
                                value={draft.subject_id.clone()}
                                oninput={edit_input(FormField::Subject)}
                                disabled={submitting}
                            />
                        }
                    } else {
                        html! {
                            <select id="subject" onchange={edit_select(FormField::Subject)} disabled={submitting}>
                                <option value="" selected={draft.subject_id.is_empty()}>{"Choose..."}</option>
                                {for props.subjects.iter().map(|subject| html! {
                                    <option
                                        value={subject.subject_id.clone()}
                                        selected={subject.subject_id == draft.subject_id}
                                    >
                                        {&subject.subject_name}
                                    </option>
                                })}
                            </select>
                        }
                    }}
                </div>

                <div class="form-group">
                    <label for="class-hour">{"Class hour"}</label>
                    <select id="class-hour" onchange={edit_select(FormField::Period)} disabled={submitting}>
                        <option value="" selected={selected_period.is_empty()}>{"Choose..."}</option>
                        {for (1..=period_count).map(|period| html! {
                            <option value={period.to_string()} selected={selected_period == period.to_string()}>
                                {period}
                            </option>
                        })}
                    </select>
                </div>

                <div class="form-group">
                    <label for="lecture-title">{"Lecture title"}</label>
                    <input
                        type="text"
                        id="lecture-title"
                        value={draft.lecture_title.clone()}
                        oninput={edit_input(FormField::LectureTitle)}
                        disabled={submitting}
                    />
                </div>

                <div class="form-group">
                    <label for="class-sequence">{"Class number"}</label>
                    <input
                        type="number"
                        id="class-sequence"
                        min="1"
                        value={draft.class_sequence.clone()}
                        oninput={edit_input(FormField::Sequence)}
                        disabled={submitting}
                    />
                </div>

                <AbsencePicker
                    input={draft.student_input.clone()}
                    absent={draft.absent_students().as_slice().to_vec()}
                    {suggestions}
                    disabled={submitting}
                    on_input={{
                        let dispatcher = form.dispatcher();
                        Callback::from(move |value: String| {
                            dispatcher.dispatch(ClassLogFormAction::Edit(FormField::StudentInput, value))
                        })
                    }}
                    on_add={{
                        let dispatcher = form.dispatcher();
                        Callback::from(move |_: ()| dispatcher.dispatch(ClassLogFormAction::AddStudent))
                    }}
                    on_pick={{
                        let dispatcher = form.dispatcher();
                        Callback::from(move |name: String| dispatcher.dispatch(ClassLogFormAction::AddSuggested(name)))
                    }}
                    on_remove={{
                        let dispatcher = form.dispatcher();
                        Callback::from(move |index: usize| dispatcher.dispatch(ClassLogFormAction::RemoveStudent(index)))
                    }}
                />

                <button type="submit" class="btn btn-primary" disabled={submitting}>
                    {if submitting { "Saving..." } else { "Save class log" }}
                </button>
            </form>
        </section>
    }
}
