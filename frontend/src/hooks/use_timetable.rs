use std::cell::RefCell;
use std::rc::Rc;

use shared::{
    DropOutcome, DropPolicy, RequestLedger, RequestTicket, ScheduleEntry, SeedRejection, SlotKey, Timetable,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

const COMPONENT: &str = "timetable";

#[derive(Clone, Default)]
pub struct TimetableState {
    pub timetable: Timetable,
    /// Cell currently under the dragged lesson
    pub hover: Option<SlotKey>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_outcome: Option<DropOutcome>,
    ledger: Rc<RefCell<RequestLedger>>,
}

pub enum TimetableAction {
    Loading,
    Loaded {
        ticket: RequestTicket,
        entries: Vec<ScheduleEntry>,
    },
    LoadFailed {
        ticket: RequestTicket,
        message: String,
    },
    Hover(Option<SlotKey>),
    Drop {
        source: String,
        target: SlotKey,
        policy: DropPolicy,
    },
    DismissError,
}

impl TimetableState {
    /// Clear the loading flag without touching anything else
    fn settled(self: Rc<Self>) -> Rc<Self> {
        if !self.loading {
            return self;
        }
        Rc::new(Self {
            loading: false,
            ..(*self).clone()
        })
    }
}

impl Reducible for TimetableState {
    type Action = TimetableAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            TimetableAction::Loading => Rc::new(Self {
                loading: true,
                ..(*self).clone()
            }),
            TimetableAction::Loaded { ticket, entries } => {
                if !self.ledger.borrow_mut().accept(ticket) {
                    Logger::debug_with_component(COMPONENT, "Discarding stale timetable response");
                    return self.settled();
                }
                let mut next = (*self).clone();
                let rejected = next.timetable.replace_all(entries);
                next.loading = false;
                next.error = skipped_lessons_message(&rejected);
                Logger::info_with_component(COMPONENT, &format!("Loaded {} lessons", next.timetable.len()));
                Rc::new(next)
            }
            TimetableAction::LoadFailed { ticket, message } => {
                if !self.ledger.borrow_mut().accept(ticket) {
                    return self.settled();
                }
                Rc::new(Self {
                    loading: false,
                    error: Some(message),
                    ..(*self).clone()
                })
            }
            TimetableAction::Hover(hover) => {
                if self.hover == hover {
                    return self;
                }
                Rc::new(Self {
                    hover,
                    ..(*self).clone()
                })
            }
            TimetableAction::Drop { source, target, policy } => {
                let mut next = (*self).clone();
                next.hover = None;

                let source = match source.parse::<SlotKey>() {
                    Ok(source) => source,
                    Err(e) => {
                        next.error = Some(format!("Could not read the dragged lesson: {}", e));
                        return Rc::new(next);
                    }
                };

                match next.timetable.drop_entry(&source, &target, policy) {
                    Ok(DropOutcome::Unchanged) => {}
                    Ok(outcome) => {
                        next.ledger.borrow_mut().note_local_mutation();
                        next.error = None;
                        next.last_outcome = Some(outcome);
                    }
                    Err(rejection) => {
                        Logger::warn_with_component(COMPONENT, &format!("Drop rejected: {}", rejection));
                        next.error = Some(rejection.to_string());
                    }
                }
                Rc::new(next)
            }
            TimetableAction::DismissError => Rc::new(Self {
                error: None,
                ..(*self).clone()
            }),
        }
    }
}

/// Banner text for seed rows that were left off the grid
pub fn skipped_lessons_message(rejected: &[SeedRejection]) -> Option<String> {
    if rejected.is_empty() {
        return None;
    }
    for rejection in rejected {
        Logger::warn_with_component(COMPONENT, &format!("Skipped seed lesson: {}", rejection));
    }
    let reasons: Vec<String> = rejected.iter().map(ToString::to_string).collect();
    Some(format!(
        "{} lesson(s) in the timetable data were skipped: {}",
        rejected.len(),
        reasons.join("; ")
    ))
}

pub struct UseTimetableResult {
    pub state: UseReducerHandle<TimetableState>,
    pub actions: UseTimetableActions,
}

#[derive(Clone, PartialEq)]
pub struct UseTimetableActions {
    pub reload: Callback<()>,
    pub hover: Callback<Option<SlotKey>>,
    /// Raw dragged key and the cell it was dropped on
    pub drop: Callback<(String, SlotKey)>,
    pub dismiss_error: Callback<()>,
}

#[hook]
pub fn use_timetable(api_client: &ApiClient, policy: DropPolicy) -> UseTimetableResult {
    let state = use_reducer(TimetableState::default);

    let reload = {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();
        let ledger = state.ledger.clone();

        use_callback((), move |_: (), _| {
            let api_client = api_client.clone();
            let dispatcher = dispatcher.clone();
            let ticket = ledger.borrow_mut().issue();
            dispatcher.dispatch(TimetableAction::Loading);

            spawn_local(async move {
                match api_client.get_timetable_seed().await {
                    Ok(entries) => dispatcher.dispatch(TimetableAction::Loaded { ticket, entries }),
                    Err(e) => {
                        Logger::error_with_component(COMPONENT, &format!("Failed to fetch timetable: {}", e));
                        dispatcher.dispatch(TimetableAction::LoadFailed {
                            ticket,
                            message: e.to_string(),
                        });
                    }
                }
            });
        })
    };

    let hover = {
        let dispatcher = state.dispatcher();
        use_callback((), move |slot: Option<SlotKey>, _| {
            dispatcher.dispatch(TimetableAction::Hover(slot));
        })
    };

    let drop = {
        let dispatcher = state.dispatcher();
        use_callback(policy, move |(source, target): (String, SlotKey), policy| {
            dispatcher.dispatch(TimetableAction::Drop {
                source,
                target,
                policy: *policy,
            });
        })
    };

    let dismiss_error = {
        let dispatcher = state.dispatcher();
        use_callback((), move |_: (), _| dispatcher.dispatch(TimetableAction::DismissError))
    };

    // Load once on mount; drop any response still in flight on unmount
    {
        let reload = reload.clone();
        let ledger = state.ledger.clone();
        use_effect_with((), move |_| {
            reload.emit(());
            move || ledger.borrow_mut().cancel_all()
        });
    }

    let actions = UseTimetableActions {
        reload,
        hover,
        drop,
        dismiss_error,
    };

    UseTimetableResult { state, actions }
}
