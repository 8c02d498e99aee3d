use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use shared::{ClassLogDraft, ClassLogEntry, CreateClassLogRequest, LogIndex, RequestLedger, RequestTicket, Student};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

const COMPONENT: &str = "class-log-form";

#[derive(Clone, PartialEq)]
pub struct ClassLogFormState {
    pub draft: ClassLogDraft,
    /// Day the log is being written for
    pub date: NaiveDate,
    /// Students of the draft's department, for suggestions
    pub roster: Vec<Student>,
    /// Request handed to the network; `Some` while submitting
    pub pending: Option<CreateClassLogRequest>,
    ledger: Rc<RefCell<RequestLedger>>,
}

impl ClassLogFormState {
    pub fn new(department_id: &str, date: NaiveDate, period: Option<u8>) -> Self {
        let mut draft = ClassLogDraft::new(department_id);
        draft.period = period;
        Self {
            draft,
            date,
            roster: Vec::new(),
            pending: None,
            ledger: Rc::default(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum FormField {
    Subject,
    Period,
    LectureTitle,
    Sequence,
    StudentInput,
}

pub enum ClassLogFormAction {
    /// Point the form at another cell; typed fields are kept
    Open {
        department_id: String,
        date: NaiveDate,
        period: Option<u8>,
    },
    Edit(FormField, String),
    AddStudent,
    AddSuggested(String),
    RemoveStudent(usize),
    RosterLoaded {
        ticket: RequestTicket,
        students: Vec<Student>,
    },
    DismissNotice(u64),
    Submit(LogIndex),
    Succeeded,
    Failed(String),
}

impl Reducible for ClassLogFormState {
    type Action = ClassLogFormAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ClassLogFormAction::Open {
                department_id,
                date,
                period,
            } => {
                if next.draft.department_id != department_id {
                    // A roster still loading belongs to the old department
                    next.ledger.borrow_mut().note_local_mutation();
                    next.draft = ClassLogDraft::new(department_id);
                    next.roster.clear();
                }
                next.draft.period = period;
                next.date = date;
            }
            ClassLogFormAction::Edit(field, value) => match field {
                FormField::Subject => next.draft.subject_id = value,
                FormField::Period => next.draft.period = value.trim().parse().ok(),
                FormField::LectureTitle => next.draft.lecture_title = value,
                FormField::Sequence => next.draft.class_sequence = value,
                FormField::StudentInput => next.draft.student_input = value,
            },
            ClassLogFormAction::AddStudent => {
                next.draft.add_absent_student();
            }
            ClassLogFormAction::AddSuggested(name) => {
                next.draft.add_suggested_student(&name);
            }
            ClassLogFormAction::RemoveStudent(index) => {
                next.draft.remove_absent_student(index);
            }
            ClassLogFormAction::RosterLoaded { ticket, students } => {
                if !self.ledger.borrow_mut().accept(ticket) {
                    Logger::debug_with_component(COMPONENT, "Discarding stale roster response");
                    return self;
                }
                next.roster = students;
            }
            ClassLogFormAction::DismissNotice(id) => {
                if !next.draft.dismiss_notice(id) {
                    return self;
                }
            }
            ClassLogFormAction::Submit(index) => {
                if self.is_submitting() {
                    return self;
                }
                let date = next.date;
                let Some(request) = next.draft.prepare_submission(date) else {
                    return Rc::new(next);
                };
                if !next.draft.confirm_duplicates(&index, date) {
                    return Rc::new(next);
                }
                next.pending = Some(request);
            }
            ClassLogFormAction::Succeeded => {
                next.pending = None;
                next.draft.submit_succeeded();
            }
            ClassLogFormAction::Failed(reason) => {
                next.pending = None;
                next.draft.submit_failed(&reason);
            }
        }
        Rc::new(next)
    }
}

#[hook]
pub fn use_class_log_form(
    api_client: &ApiClient,
    department_id: &str,
    date: NaiveDate,
    period: Option<u8>,
    on_created: Callback<ClassLogEntry>,
) -> UseReducerHandle<ClassLogFormState> {
    let state = {
        let department_id = department_id.to_string();
        use_reducer(move || ClassLogFormState::new(&department_id, date, period))
    };

    // Follow the cell the form was opened for
    {
        let dispatcher = state.dispatcher();
        use_effect_with((department_id.to_string(), date, period), move |(department_id, date, period)| {
            dispatcher.dispatch(ClassLogFormAction::Open {
                department_id: department_id.clone(),
                date: *date,
                period: *period,
            });
            || ()
        });
    }

    {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();
        let ledger = state.ledger.clone();
        use_effect_with(state.draft.department_id.clone(), move |department_id| {
            let department_id = department_id.clone();
            let ticket = ledger.borrow_mut().issue();
            spawn_local(async move {
                match api_client.list_students_in(&department_id).await {
                    Ok(students) => dispatcher.dispatch(ClassLogFormAction::RosterLoaded { ticket, students }),
                    Err(e) => Logger::warn_with_component(
                        COMPONENT,
                        &format!("No student suggestions for department {}: {}", department_id, e),
                    ),
                }
            });
            || ()
        });
    }

    {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();
        let ledger = state.ledger.clone();
        use_effect_with(state.pending.clone(), move |pending| {
            if let Some(request) = pending.clone() {
                Logger::info_with_component(
                    COMPONENT,
                    &format!("Saving class log {} for {} period {}", request.request_id, request.date, request.class_hour),
                );
                spawn_local(async move {
                    let result = api_client.create_class_log(&request).await;
                    let closed = ledger.borrow().is_cancelled();
                    match result {
                        Ok(entry) => {
                            // The log exists on the server either way; the week view still wants it
                            on_created.emit(entry);
                            if !closed {
                                dispatcher.dispatch(ClassLogFormAction::Succeeded);
                            }
                        }
                        Err(e) => {
                            Logger::error_with_component(COMPONENT, &format!("Failed to save class log: {}", e));
                            if !closed {
                                dispatcher.dispatch(ClassLogFormAction::Failed(e.to_string()));
                            }
                        }
                    }
                });
            }
            || ()
        });
    }

    {
        let ledger = state.ledger.clone();
        use_effect_with((), move |_| move || ledger.borrow_mut().cancel_all());
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn student(id: &str, first: &str, last: &str) -> Student {
        Student {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            department_id: None,
            parent_ids: Vec::new(),
        }
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_late_roster_for_previous_department_is_dropped() {
        let state = Rc::new(ClassLogFormState::new("dept-a", wednesday(), Some(1)));
        let ticket_a = state.ledger.borrow_mut().issue();

        let state = state.reduce(ClassLogFormAction::Open {
            department_id: "dept-b".to_string(),
            date: wednesday(),
            period: Some(1),
        });
        let ticket_b = state.ledger.borrow_mut().issue();

        let state = state.reduce(ClassLogFormAction::RosterLoaded {
            ticket: ticket_b,
            students: vec![student("2", "Bea", "Brown")],
        });
        let state = state.reduce(ClassLogFormAction::RosterLoaded {
            ticket: ticket_a,
            students: vec![student("1", "Ada", "Adams")],
        });

        assert_eq!(state.draft.department_id, "dept-b");
        assert_eq!(state.roster.len(), 1);
        assert_eq!(state.roster[0].id, "2");
    }

    #[wasm_bindgen_test]
    fn test_roster_from_before_switch_is_dropped_even_if_first() {
        let state = Rc::new(ClassLogFormState::new("dept-a", wednesday(), None));
        let ticket_a = state.ledger.borrow_mut().issue();
        let state = state.reduce(ClassLogFormAction::Open {
            department_id: "dept-b".to_string(),
            date: wednesday(),
            period: None,
        });
        let state = state.reduce(ClassLogFormAction::RosterLoaded {
            ticket: ticket_a,
            students: vec![student("1", "Ada", "Adams")],
        });
        assert!(state.roster.is_empty());
    }
}
