use gloo::net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    Assessment, ClassLogEntry, CreateClassLogRequest, DateRange, Department, Parent, ScheduleEntry,
    Session, SessionUser, Student, Teacher,
};
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Not signed in or session expired")]
    Unauthorized,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Server error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Failed to serialize request: {0}")]
    Encode(String),
}

/// A REST collection with the usual get/list/create/update/delete routes
pub trait Resource: Serialize + DeserializeOwned + Clone + 'static {
    /// Collection path below `/api/`
    const PATH: &'static str;

    fn id(&self) -> &str;
}

impl Resource for Student {
    const PATH: &'static str = "students";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Parent {
    const PATH: &'static str = "parents";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Teacher {
    const PATH: &'static str = "teachers";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Department {
    const PATH: &'static str = "departments";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Assessment {
    const PATH: &'static str = "assessments";

    fn id(&self) -> &str {
        &self.id
    }
}

/// API client for the school backend. Built from an explicit [`Session`];
/// every request carries that session's bearer token.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base_url: String,
    timetable_source_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: &Session) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timetable_source_url: config.timetable_source_url.clone(),
            token: session.token.clone(),
        }
    }

    /// Resolve a pasted bearer token into a session
    pub async fn fetch_session(config: &AppConfig, token: &str) -> Result<Session, ApiError> {
        let url = format!("{}/api/auth/me", config.api_base_url);
        let response = Request::get(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let user: SessionUser = read_json(response).await?;
        Ok(Session {
            token: token.to_string(),
            user,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("Authorization", &format!("Bearer {}", self.token))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        self.authorized(builder)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn send_json<B: Serialize>(&self, builder: RequestBuilder, body: &B) -> Result<Response, ApiError> {
        self.authorized(builder)
            .json(body)
            .map_err(|e| ApiError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Static timetable seed, loaded once per view
    pub async fn get_timetable_seed(&self) -> Result<Vec<ScheduleEntry>, ApiError> {
        let response = self.send(Request::get(&self.timetable_source_url)).await?;
        read_json(response).await
    }

    /// Class logs for one department within an inclusive date range
    pub async fn get_logs(&self, department_id: &str, range: &DateRange) -> Result<Vec<ClassLogEntry>, ApiError> {
        let builder = Request::get(&self.url("class-logs")).query([
            ("departmentId", department_id),
            ("start", range.start.as_str()),
            ("end", range.end.as_str()),
        ]);
        let response = self.send(builder).await?;
        read_json(response).await
    }

    /// Create a class log together with its absence list
    pub async fn create_class_log(&self, request: &CreateClassLogRequest) -> Result<ClassLogEntry, ApiError> {
        let response = self.send_json(Request::post(&self.url("class-logs")), request).await?;
        read_json(response).await
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        let response = self.send(Request::get(&self.url(R::PATH))).await?;
        read_json(response).await
    }

    pub async fn get<R: Resource>(&self, id: &str) -> Result<R, ApiError> {
        let response = self
            .send(Request::get(&self.url(&format!("{}/{}", R::PATH, id))))
            .await?;
        read_json(response).await
    }

    /// POST a creation payload; the body type may differ from the stored resource
    pub async fn create<R: Resource, B: Serialize>(&self, body: &B) -> Result<R, ApiError> {
        let response = self.send_json(Request::post(&self.url(R::PATH)), body).await?;
        read_json(response).await
    }

    pub async fn update<R: Resource>(&self, resource: &R) -> Result<R, ApiError> {
        let url = self.url(&format!("{}/{}", R::PATH, resource.id()));
        let response = self.send_json(Request::put(&url), resource).await?;
        read_json(response).await
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("{}/{}", R::PATH, id));
        let response = self.send(Request::delete(&url)).await?;
        if response.ok() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }

    /// Students belonging to one department, for the absence picker
    pub async fn list_students_in(&self, department_id: &str) -> Result<Vec<Student>, ApiError> {
        let builder = Request::get(&self.url(Student::PATH)).query([("departmentId", department_id)]);
        let response = self.send(builder).await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        return Err(status_error(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

async fn status_error(response: Response) -> ApiError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    classify_status(status, body)
}

fn classify_status(status: u16, body: String) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized,
        409 => ApiError::Conflict(body),
        _ => ApiError::Status { status, body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Role, SessionUser};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn session() -> Session {
        Session {
            token: "secret".to_string(),
            user: SessionUser {
                id: "1".to_string(),
                name: "Admin".to_string(),
                role: Role::Administrator,
                teacher_id: None,
            },
        }
    }

    #[wasm_bindgen_test]
    fn test_client_urls() {
        let client = ApiClient::new(&AppConfig::default(), &session());
        assert_eq!(client.url(Teacher::PATH), format!("{}/api/teachers", client.base_url));
        assert_eq!(client.token, "secret");
    }

    #[wasm_bindgen_test]
    fn test_classify_status() {
        assert_eq!(classify_status(401, String::new()), ApiError::Unauthorized);
        assert_eq!(
            classify_status(409, "slot taken".to_string()),
            ApiError::Conflict("slot taken".to_string())
        );
        assert_eq!(
            classify_status(500, "boom".to_string()).to_string(),
            "Server error 500: boom"
        );
    }
}
