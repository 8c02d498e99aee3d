use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use shared::{ClassLogEntry, LogIndex, RequestLedger, RequestTicket, WeekWindow};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

const COMPONENT: &str = "class-logs";

#[derive(Clone)]
pub struct ClassLogsState {
    pub window: WeekWindow,
    pub department_id: Option<String>,
    pub index: LogIndex,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped to force a refetch of the current week
    refresh_nonce: u32,
    ledger: Rc<RefCell<RequestLedger>>,
}

impl ClassLogsState {
    fn new(today: NaiveDate) -> Self {
        Self {
            window: WeekWindow::current(today),
            department_id: None,
            index: LogIndex::default(),
            loading: false,
            error: None,
            refresh_nonce: 0,
            ledger: Rc::default(),
        }
    }

    /// The view now shows different data; responses in flight are for the old view
    fn navigated(mut self) -> Self {
        self.ledger.borrow_mut().note_local_mutation();
        self.index = LogIndex::default();
        self
    }
}

pub enum ClassLogsAction {
    PrevWeek,
    NextWeek,
    SelectDepartment(String),
    Refresh,
    Loading,
    Loaded {
        ticket: RequestTicket,
        entries: Vec<ClassLogEntry>,
    },
    LoadFailed {
        ticket: RequestTicket,
        message: String,
    },
    LogCreated(ClassLogEntry),
    DismissError,
}

impl Reducible for ClassLogsState {
    type Action = ClassLogsAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ClassLogsAction::PrevWeek => {
                let mut next = (*self).clone().navigated();
                next.window.prev_week();
                Rc::new(next)
            }
            ClassLogsAction::NextWeek => {
                if self.window.is_next_disabled() {
                    return self;
                }
                let mut next = (*self).clone().navigated();
                next.window.next_week();
                Rc::new(next)
            }
            ClassLogsAction::SelectDepartment(department_id) => {
                if self.department_id.as_deref() == Some(department_id.as_str()) {
                    return self;
                }
                let mut next = (*self).clone().navigated();
                next.department_id = Some(department_id);
                Rc::new(next)
            }
            ClassLogsAction::Refresh => Rc::new(Self {
                refresh_nonce: self.refresh_nonce.wrapping_add(1),
                ..(*self).clone()
            }),
            ClassLogsAction::Loading => Rc::new(Self {
                loading: true,
                error: None,
                ..(*self).clone()
            }),
            ClassLogsAction::Loaded { ticket, entries } => {
                if !self.ledger.borrow_mut().accept(ticket) {
                    Logger::debug_with_component(COMPONENT, "Discarding stale class-log response");
                    return self;
                }
                let index = LogIndex::from_entries(entries);
                let duplicates = index.duplicate_slots().len();
                if duplicates > 0 {
                    Logger::warn_with_component(
                        COMPONENT,
                        &format!("{} class hour(s) this week have more than one log", duplicates),
                    );
                }
                Rc::new(Self {
                    index,
                    loading: false,
                    ..(*self).clone()
                })
            }
            ClassLogsAction::LoadFailed { ticket, message } => {
                if !self.ledger.borrow_mut().accept(ticket) {
                    return self;
                }
                Rc::new(Self {
                    loading: false,
                    error: Some(message),
                    ..(*self).clone()
                })
            }
            ClassLogsAction::LogCreated(entry) => {
                let belongs_here = self.window.contains(entry.date)
                    && (entry.department_id.is_none() || entry.department_id == self.department_id);
                if !belongs_here {
                    return self;
                }
                let mut next = (*self).clone();
                next.ledger.borrow_mut().note_local_mutation();
                next.index.insert(entry);
                // The in-flight fetch was just invalidated; ask for a fresh one
                if next.loading {
                    next.refresh_nonce = next.refresh_nonce.wrapping_add(1);
                }
                Rc::new(next)
            }
            ClassLogsAction::DismissError => Rc::new(Self {
                error: None,
                ..(*self).clone()
            }),
        }
    }
}

pub struct UseClassLogsResult {
    pub state: UseReducerHandle<ClassLogsState>,
    pub actions: UseClassLogsActions,
}

#[derive(Clone, PartialEq)]
pub struct UseClassLogsActions {
    pub prev_week: Callback<MouseEvent>,
    pub next_week: Callback<MouseEvent>,
    pub select_department: Callback<String>,
    pub refresh: Callback<()>,
    pub log_created: Callback<ClassLogEntry>,
    pub dismiss_error: Callback<()>,
}

#[hook]
pub fn use_class_logs(api_client: &ApiClient, today: NaiveDate) -> UseClassLogsResult {
    let state = use_reducer(move || ClassLogsState::new(today));

    // Fetch whenever the week, department or refresh nonce changes
    {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();
        let ledger = state.ledger.clone();
        let deps = (state.window, state.department_id.clone(), state.refresh_nonce);

        use_effect_with(deps, move |(window, department_id, _)| {
            if let Some(department_id) = department_id.clone() {
                let range = window.date_range();
                let ticket = ledger.borrow_mut().issue();
                dispatcher.dispatch(ClassLogsAction::Loading);
                Logger::debug_with_component(
                    COMPONENT,
                    &format!("Fetching logs for department {} {}..{}", department_id, range.start, range.end),
                );

                spawn_local(async move {
                    match api_client.get_logs(&department_id, &range).await {
                        Ok(entries) => dispatcher.dispatch(ClassLogsAction::Loaded { ticket, entries }),
                        Err(e) => {
                            Logger::error_with_component(COMPONENT, &format!("Failed to fetch class logs: {}", e));
                            dispatcher.dispatch(ClassLogsAction::LoadFailed {
                                ticket,
                                message: e.to_string(),
                            });
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

    let dispatcher = state.dispatcher();
    let actions = UseClassLogsActions {
        prev_week: {
            let dispatcher = dispatcher.clone();
            Callback::from(move |_: MouseEvent| dispatcher.dispatch(ClassLogsAction::PrevWeek))
        },
        next_week: {
            let dispatcher = dispatcher.clone();
            Callback::from(move |_: MouseEvent| dispatcher.dispatch(ClassLogsAction::NextWeek))
        },
        select_department: {
            let dispatcher = dispatcher.clone();
            Callback::from(move |id: String| dispatcher.dispatch(ClassLogsAction::SelectDepartment(id)))
        },
        refresh: {
            let dispatcher = dispatcher.clone();
            Callback::from(move |_| dispatcher.dispatch(ClassLogsAction::Refresh))
        },
        log_created: {
            let dispatcher = dispatcher.clone();
            Callback::from(move |entry: ClassLogEntry| dispatcher.dispatch(ClassLogsAction::LogCreated(entry)))
        },
        dismiss_error: Callback::from(move |_| dispatcher.dispatch(ClassLogsAction::DismissError)),
    };

    UseClassLogsResult { state, actions }
}
