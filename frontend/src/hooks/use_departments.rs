use shared::class_log::visible_departments;
use shared::{AssignedSubject, Department, RequestLedger, Session, Teacher};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::{ApiClient, ApiError};
use crate::services::logging::Logger;

const COMPONENT: &str = "departments";

#[derive(Clone, PartialEq)]
pub struct UseDepartmentsResult {
    /// Departments the signed-in user may browse
    pub departments: Vec<Department>,
    /// The signed-in user's teacher record, when they have one
    pub teacher: Option<Teacher>,
    pub loading: bool,
    pub error: Option<String>,
}

impl UseDepartmentsResult {
    /// Subjects the user may log for in `department_id`
    pub fn subjects_in(&self, department_id: &str) -> Vec<AssignedSubject> {
        self.teacher
            .iter()
            .flat_map(|teacher| teacher.assigned_subjects.iter())
            .filter(|subject| subject.department_ids.iter().any(|id| id == department_id))
            .cloned()
            .collect()
    }
}

async fn load(api_client: &ApiClient, session: &Session) -> Result<(Vec<Department>, Option<Teacher>), ApiError> {
    let departments = api_client.list::<Department>().await?;
    let teacher = match &session.user.teacher_id {
        Some(teacher_id) => Some(api_client.get::<Teacher>(teacher_id).await?),
        None => None,
    };
    Ok((departments, teacher))
}

#[hook]
pub fn use_departments(api_client: &ApiClient, session: &Session) -> UseDepartmentsResult {
    let departments = use_state(Vec::<Department>::new);
    let teacher = use_state(|| Option::<Teacher>::None);
    let loading = use_state(|| true);
    let error = use_state(|| Option::<String>::None);
    let ledger = use_mut_ref(RequestLedger::default);

    {
        let api_client = api_client.clone();
        let session = session.clone();
        let departments = departments.clone();
        let teacher = teacher.clone();
        let loading = loading.clone();
        let error = error.clone();
        let ledger = ledger.clone();

        use_effect_with((), move |_| {
            let ticket = ledger.borrow_mut().issue();
            let task_ledger = ledger.clone();

            spawn_local(async move {
                let result = load(&api_client, &session).await;
                if !task_ledger.borrow_mut().accept(ticket) {
                    return;
                }
                match result {
                    Ok((all, teacher_record)) => {
                        let visible = visible_departments(&session, teacher_record.as_ref(), &all);
                        Logger::info_with_component(
                            COMPONENT,
                            &format!("{} of {} departments visible to {}", visible.len(), all.len(), session.user.name),
                        );
                        departments.set(visible);
                        teacher.set(teacher_record);
                    }
                    Err(e) => {
                        Logger::error_with_component(COMPONENT, &format!("Failed to load departments: {}", e));
                        error.set(Some(e.to_string()));
                    }
                }
                loading.set(false);
            });

            move || ledger.borrow_mut().cancel_all()
        });
    }

    UseDepartmentsResult {
        departments: (*departments).clone(),
        teacher: (*teacher).clone(),
        loading: *loading,
        error: (*error).clone(),
    }
}
