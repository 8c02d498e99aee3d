use std::cell::RefCell;
use std::rc::Rc;

use shared::roster::filter_and_sort;
use shared::{Parent, Person, RequestLedger, RequestTicket, Session, SortOrder, Student, Teacher};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::notice_banner::ErrorBanner;
use crate::services::api::{ApiClient, Resource};
use crate::services::logging::Logger;

const COMPONENT: &str = "directory";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Roster {
    Students,
    Parents,
    Teachers,
}

impl Roster {
    const ALL: [Roster; 3] = [Roster::Students, Roster::Parents, Roster::Teachers];

    fn label(self) -> &'static str {
        match self {
            Roster::Students => "Students",
            Roster::Parents => "Parents",
            Roster::Teachers => "Teachers",
        }
    }
}

/// One roster collection as last loaded, minus anything deleted since
struct RosterList<R> {
    items: Vec<R>,
    error: Option<String>,
    ledger: Rc<RefCell<RequestLedger>>,
}

impl<R> Default for RosterList<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            error: None,
            ledger: Rc::default(),
        }
    }
}

enum RosterAction<R> {
    Loaded { ticket: RequestTicket, items: Vec<R> },
    LoadFailed { ticket: RequestTicket, message: String },
    Deleted(String),
    DeleteFailed(String),
}

impl<R: Resource> Reducible for RosterList<R> {
    type Action = RosterAction<R>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            RosterAction::Loaded { ticket, items } => {
                if !self.ledger.borrow_mut().accept(ticket) {
                    return self;
                }
                Rc::new(Self {
                    items,
                    error: None,
                    ledger: self.ledger.clone(),
                })
            }
            RosterAction::LoadFailed { ticket, message } => {
                if !self.ledger.borrow_mut().accept(ticket) {
                    return self;
                }
                Rc::new(Self {
                    items: self.items.clone(),
                    error: Some(message),
                    ledger: self.ledger.clone(),
                })
            }
            RosterAction::Deleted(id) => {
                // A list fetched before the delete would bring the record back
                self.ledger.borrow_mut().note_local_mutation();
                Rc::new(Self {
                    items: self.items.iter().filter(|item| item.id() != id).cloned().collect(),
                    error: self.error.clone(),
                    ledger: self.ledger.clone(),
                })
            }
            RosterAction::DeleteFailed(message) => Rc::new(Self {
                items: self.items.clone(),
                error: Some(message),
                ledger: self.ledger.clone(),
            }),
        }
    }
}

/// Loads one collection on mount; exposes the list plus a delete callback
#[hook]
fn use_roster<R: Resource>(api_client: &ApiClient) -> (UseReducerHandle<RosterList<R>>, Callback<String>) {
    let roster = use_reducer(RosterList::<R>::default);

    {
        let api_client = api_client.clone();
        let dispatcher = roster.dispatcher();
        let ledger = roster.ledger.clone();
        use_effect_with((), move |_| {
            let ticket = ledger.borrow_mut().issue();
            spawn_local(async move {
                match api_client.list::<R>().await {
                    Ok(items) => dispatcher.dispatch(RosterAction::Loaded { ticket, items }),
                    Err(e) => {
                        Logger::error_with_component(COMPONENT, &format!("Failed to load {}: {}", R::PATH, e));
                        dispatcher.dispatch(RosterAction::LoadFailed {
                            ticket,
                            message: e.to_string(),
                        });
                    }
                }
            });
            move || ledger.borrow_mut().cancel_all()
        });
    }

    let delete = {
        let api_client = api_client.clone();
        let dispatcher = roster.dispatcher();
        let ledger = roster.ledger.clone();
        Callback::from(move |id: String| {
            let api_client = api_client.clone();
            let dispatcher = dispatcher.clone();
            let ledger = ledger.clone();
            spawn_local(async move {
                let result = api_client.delete::<R>(&id).await;
                if ledger.borrow().is_cancelled() {
                    return;
                }
                match result {
                    Ok(()) => {
                        Logger::info_with_component(COMPONENT, &format!("Deleted {}/{}", R::PATH, id));
                        dispatcher.dispatch(RosterAction::Deleted(id));
                    }
                    Err(e) => {
                        Logger::error_with_component(COMPONENT, &format!("Failed to delete {}/{}: {}", R::PATH, id, e));
                        dispatcher.dispatch(RosterAction::DeleteFailed(e.to_string()));
                    }
                }
            });
        })
    };

    (roster, delete)
}

#[derive(Properties, PartialEq)]
pub struct DirectoryProps {
    pub api_client: ApiClient,
    pub session: Session,
}

#[function_component(Directory)]
pub fn directory(props: &DirectoryProps) -> Html {
    let roster = use_state(|| Roster::Students);
    let query = use_state(String::new);
    let order = use_state(SortOrder::default);

    let (students, delete_student) = use_roster::<Student>(&props.api_client);
    let (parents, delete_parent) = use_roster::<Parent>(&props.api_client);
    let (teachers, delete_teacher) = use_roster::<Teacher>(&props.api_client);

    let on_query = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            query.set(input.value());
        })
    };

    let on_order = {
        let order = order.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let chosen = SortOrder::ALL
                .iter()
                .copied()
                .find(|o| o.label() == select.value())
                .unwrap_or_default();
            order.set(chosen);
        })
    };

    // Only administrators may remove records
    let can_delete = props.session.is_administrator();

    let (body, error) = match *roster {
        Roster::Students => (
            render_people(&students.items, &query, *order, can_delete.then_some(&delete_student), |_| html! {}),
            students.error.clone(),
        ),
        Roster::Parents => (
            render_people(&parents.items, &query, *order, can_delete.then_some(&delete_parent), |parent| html! {
                <span class="person-contact">
                    {parent.email.clone().unwrap_or_default()}
                    {" "}
                    {parent.phone.clone().unwrap_or_default()}
                </span>
            }),
            parents.error.clone(),
        ),
        Roster::Teachers => (
            render_people(&teachers.items, &query, *order, can_delete.then_some(&delete_teacher), |teacher| html! {
                <span class="person-subjects">
                    {teacher
                        .assigned_subjects
                        .iter()
                        .map(|subject| subject.subject_name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")}
                </span>
            }),
            teachers.error.clone(),
        ),
    };

    html! {
        <section class="directory-section">
            <div class="section-toolbar">
                <h2>{"Directory"}</h2>
                <nav class="tabs">
                    {for Roster::ALL.iter().map(|r| {
                        let r = *r;
                        let class = if r == *roster { "tab active" } else { "tab" };
                        let onclick = {
                            let roster = roster.clone();
                            Callback::from(move |_: MouseEvent| roster.set(r))
                        };
                        html! { <button type="button" {class} {onclick}>{r.label()}</button> }
                    })}
                </nav>
            </div>
            <div class="directory-filters">
                <input type="search" placeholder="Search..." value={(*query).clone()} oninput={on_query} />
                <select onchange={on_order}>
                    {for SortOrder::ALL.iter().map(|o| html! {
                        <option value={o.label()} selected={*o == *order}>{o.label()}</option>
                    })}
                </select>
            </div>
            <ErrorBanner message={error} />
            {body}
        </section>
    }
}

fn render_people<P: Person + Resource>(
    people: &[P],
    query: &str,
    order: SortOrder,
    on_delete: Option<&Callback<String>>,
    details: impl Fn(&P) -> Html,
) -> Html {
    let matches = filter_and_sort(people, query, order);
    if matches.is_empty() {
        return html! { <p class="empty-state">{"Nobody matches."}</p> };
    }

    html! {
        <ul class="person-list">
            {for matches.into_iter().map(|person| {
                let delete_button = match on_delete {
                    Some(on_delete) => {
                        let onclick = {
                            let on_delete = on_delete.clone();
                            let id = person.id().to_string();
                            Callback::from(move |_: MouseEvent| on_delete.emit(id.clone()))
                        };
                        html! { <button type="button" class="btn btn-danger" {onclick}>{"Delete"}</button> }
                    }
                    None => html! {},
                };
                html! {
                    <li class="person-row" key={person.id().to_string()}>
                        <span class="person-name">{person.display_name()}</span>
                        {details(person)}
                        {delete_button}
                    </li>
                }
            })}
        </ul>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn student(id: &str, last: &str) -> Student {
        Student {
            id: id.to_string(),
            first_name: "Sam".to_string(),
            last_name: last.to_string(),
            department_id: None,
            parent_ids: Vec::new(),
        }
    }

    #[wasm_bindgen_test]
    fn test_deletes_apply_to_the_latest_list() {
        let roster = Rc::new(RosterList::<Student>::default());
        let ticket = roster.ledger.borrow_mut().issue();
        let roster = roster.reduce(RosterAction::Loaded {
            ticket,
            items: vec![student("1", "Adams"), student("2", "Brown"), student("3", "Clark")],
        });

        // Two deletes finishing back to back must both stick
        let roster = roster.reduce(RosterAction::Deleted("1".to_string()));
        let roster = roster.reduce(RosterAction::Deleted("3".to_string()));
        let ids: Vec<&str> = roster.items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[wasm_bindgen_test]
    fn test_list_fetched_before_a_delete_is_ignored() {
        let roster = Rc::new(RosterList::<Student>::default());
        let first = roster.ledger.borrow_mut().issue();
        let roster = roster.reduce(RosterAction::Loaded {
            ticket: first,
            items: vec![student("1", "Adams"), student("2", "Brown")],
        });
        let in_flight = roster.ledger.borrow_mut().issue();
        let roster = roster.reduce(RosterAction::Deleted("1".to_string()));
        let roster = roster.reduce(RosterAction::Loaded {
            ticket: in_flight,
            items: vec![student("1", "Adams"), student("2", "Brown")],
        });
        assert_eq!(roster.items.len(), 1);
    }

    #[wasm_bindgen_test]
    fn test_nothing_applies_after_unmount() {
        let roster = Rc::new(RosterList::<Student>::default());
        let ticket = roster.ledger.borrow_mut().issue();
        roster.ledger.borrow_mut().cancel_all();
        let roster = roster.reduce(RosterAction::Loaded {
            ticket,
            items: vec![student("1", "Adams")],
        });
        assert!(roster.items.is_empty());
    }
}
