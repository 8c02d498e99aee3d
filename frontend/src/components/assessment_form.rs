use chrono::NaiveDate;
use shared::week::parse_calendar_day;
use shared::{
    Assessment, AssessmentDraft, AssessmentPart, CreateAssessmentRequest, Department, NoticeKind, MAX_ASSESSMENT_POINTS,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::notice_banner::NoticeBanner;
use crate::hooks::use_notice_board::use_notice_board;
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct AssessmentFormProps {
    pub api_client: ApiClient,
    pub departments: Vec<Department>,
    pub today: NaiveDate,
    pub notice_duration_ms: u32,
}

#[function_component(AssessmentForm)]
pub fn assessment_form(props: &AssessmentFormProps) -> Html {
    let draft = use_state(|| AssessmentDraft {
        parts: vec![AssessmentPart {
            label: "Part 1".to_string(),
            points: 0,
        }],
        ..AssessmentDraft::default()
    });
    let date = use_state(|| props.today);
    let saving = use_state(|| false);
    let saved = use_state(Vec::<Assessment>::new);
    let notices = use_notice_board(props.notice_duration_ms);

    let raise = {
        let raise = notices.raise.clone();
        move |kind: NoticeKind, message: String| raise.emit((kind, message))
    };

    let update = |apply: fn(&mut AssessmentDraft, String)| {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            apply(&mut next, input.value());
            draft.set(next);
        })
    };

    let on_department_change = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.department_id = select.value();
            draft.set(next);
        })
    };

    let on_date_change = {
        let date = date.clone();
        let raise = raise.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match parse_calendar_day(&input.value()) {
                Ok(parsed) => date.set(parsed),
                Err(err) => raise(NoticeKind::Warning, err.to_string()),
            }
        })
    };

    let on_add_part = {
        let draft = draft.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*draft).clone();
            let label = format!("Part {}", next.parts.len() + 1);
            next.parts.push(AssessmentPart { label, points: 0 });
            draft.set(next);
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let date = date.clone();
        let saving = saving.clone();
        let saved = saved.clone();
        let raise = raise.clone();
        let api_client = props.api_client.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }
            let request = match draft.to_request(*date) {
                Ok(request) => request,
                Err(err) => {
                    raise(NoticeKind::Warning, err.to_string());
                    return;
                }
            };

            saving.set(true);
            let draft = draft.clone();
            let saving = saving.clone();
            let saved = saved.clone();
            let raise = raise.clone();
            let api_client = api_client.clone();

            spawn_local(async move {
                match api_client.create::<Assessment, CreateAssessmentRequest>(&request).await {
                    Ok(assessment) => {
                        Logger::info_with_component("assessments", &format!("Created assessment {}", assessment.id));
                        raise(NoticeKind::Success, format!("Saved \"{}\"", assessment.title));
                        let mut list = (*saved).clone();
                        list.insert(0, assessment);
                        saved.set(list);
                        draft.set(AssessmentDraft {
                            department_id: draft.department_id.clone(),
                            subject_id: draft.subject_id.clone(),
                            ..AssessmentDraft::default()
                        });
                    }
                    Err(e) => {
                        Logger::error_with_component("assessments", &format!("Failed to create assessment: {}", e));
                        raise(NoticeKind::Error, format!("Could not save the assessment: {}", e));
                    }
                }
                saving.set(false);
            });
        })
    };

    let remaining = draft.remaining_points();
    let total_class = if remaining < 0 { "points-total over" } else { "points-total" };

    html! {
        <section class="assessment-section">
            <h2>{"New assessment"}</h2>
            <NoticeBanner notice={notices.current.clone()} on_dismiss={notices.dismiss.clone()} />

            <form class="assessment-form" onsubmit={on_submit}>
                <div class="form-group">
                    <label for="assessment-title">{"Title"}</label>
                    <input
                        type="text"
                        id="assessment-title"
                        value={draft.title.clone()}
                        oninput={update(|d, v| d.title = v)}
                        disabled={*saving}
                    />
                </div>
                <div class="form-group">
                    <label for="assessment-department">{"Department"}</label>
                    <select id="assessment-department" onchange={on_department_change} disabled={*saving}>
                        <option value="" selected={draft.department_id.is_empty()}>{"Choose..."}</option>
                        {for props.departments.iter().map(|department| html! {
                            <option value={department.id.clone()} selected={department.id == draft.department_id}>
                                {&department.name}
                            </option>
                        })}
                    </select>
                </div>
                <div class="form-group">
                    <label for="assessment-subject">{"Subject"}</label>
                    <input
                        type="text"
                        id="assessment-subject"
                        value={draft.subject_id.clone()}
                        oninput={update(|d, v| d.subject_id = v)}
                        disabled={*saving}
                    />
                </div>
                <div class="form-group">
                    <label for="assessment-date">{"Date"}</label>
                    <input
                        type="date"
                        id="assessment-date"
                        value={date.format("%Y-%m-%d").to_string()}
                        onchange={on_date_change}
                        disabled={*saving}
                    />
                </div>

                <fieldset class="assessment-parts">
                    <legend>{"Parts"}</legend>
                    {for draft.parts.iter().enumerate().map(|(index, part)| render_part(&draft, index, part, *saving))}
                    <button type="button" class="btn btn-secondary" onclick={on_add_part} disabled={*saving}>
                        {"+ Add part"}
                    </button>
                </fieldset>

                <div class={total_class}>
                    {format!("{} / {} points", draft.total_points(), MAX_ASSESSMENT_POINTS)}
                    {if remaining < 0 {
                        format!(" ({} over)", -remaining)
                    } else {
                        format!(" ({} left)", remaining)
                    }}
                </div>

                <button type="submit" class="btn btn-primary" disabled={*saving}>
                    {if *saving { "Saving..." } else { "Save assessment" }}
                </button>
            </form>

            {if !saved.is_empty() {
                html! {
                    <ul class="saved-assessments">
                        {for saved.iter().map(|assessment| html! {
                            <li key={assessment.id.clone()}>
                                {format!("{} · {} · {} points", assessment.title, assessment.date, assessment.total_points)}
                            </li>
                        })}
                    </ul>
                }
            } else {
                html! {}
            }}
        </section>
    }
}

fn render_part(draft: &UseStateHandle<AssessmentDraft>, index: usize, part: &AssessmentPart, disabled: bool) -> Html {
    let on_label = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            if let Some(part) = next.parts.get_mut(index) {
                part.label = input.value();
            }
            draft.set(next);
        })
    };
    let on_points = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            if let Some(part) = next.parts.get_mut(index) {
                part.points = input.value().trim().parse().unwrap_or(0);
            }
            draft.set(next);
        })
    };
    let on_remove = {
        let draft = draft.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*draft).clone();
            if index < next.parts.len() {
                next.parts.remove(index);
            }
            draft.set(next);
        })
    };

    html! {
        <div class="assessment-part">
            <input type="text" value={part.label.clone()} oninput={on_label} {disabled} />
            <input type="number" min="0" value={part.points.to_string()} oninput={on_points} {disabled} />
            <button type="button" class="chip-remove" onclick={on_remove} {disabled}>{"×"}</button>
        </div>
    }
}
