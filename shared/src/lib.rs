use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod absence;
pub mod assessment;
pub mod class_log;
pub mod notice;
pub mod roster;
pub mod sync;
pub mod timetable;
pub mod week;

pub use absence::{AbsenceError, AbsentStudentSet, ClassLogDraft, DraftError};
pub use assessment::{
    AssessmentDraft, AssessmentError, AssessmentPart, CreateAssessmentRequest, MAX_ASSESSMENT_POINTS,
};
pub use class_log::{DayCarousel, LogCell, LogIndex, SwipeDirection};
pub use notice::{Notice, NoticeBoard, NoticeKind, NOTICE_DURATION_MS};
pub use roster::{Person, SortOrder};
pub use sync::{RequestLedger, RequestTicket};
pub use timetable::{
    CellState, DropOutcome, DropPolicy, DropRejection, ScheduleEntry, SchoolDay, SeedRejection, SlotKey, Timetable,
};
pub use week::{DateRange, WeekDay, WeekWindow};

/// What the signed-in user is allowed to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "admin")]
    Administrator,
    Teacher,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Administrator => write!(f, "Administrator"),
            Role::Teacher => write!(f, "Teacher"),
        }
    }
}

/// Response of `GET /api/auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Set when the user is also a teacher record; used to scope departments
    #[serde(default)]
    pub teacher_id: Option<String>,
}

/// Credentials for one signed-in user. Passed explicitly to the API client
/// and to every view that needs to know who is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token sent with every request
    pub token: String,
    pub user: SessionUser,
}

impl Session {
    pub fn is_administrator(&self) -> bool {
        self.user.role == Role::Administrator
    }
}

/// Administrative grouping (usually a grade level) that scopes logs and teachers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
}

/// A subject a teacher may log for, and the departments it is taught in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedSubject {
    pub subject_id: String,
    pub subject_name: String,
    #[serde(default)]
    pub department_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub assigned_subjects: Vec<AssignedSubject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub parent_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub student_ids: Vec<String>,
}

/// A record that a lesson took place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLogEntry {
    pub id: String,
    /// Calendar day of the lesson; the API may send a full timestamp
    #[serde(with = "week::calendar_day")]
    pub date: NaiveDate,
    /// Class hour within the day, starting at 1
    pub period: u8,
    pub teacher_id: String,
    #[serde(default)]
    pub teacher_name: String,
    pub lecture_title: String,
    /// Ordinal of this lesson within the subject's sequence
    pub sequence: u32,
    #[serde(default)]
    pub absent_students: Vec<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub subject_id: Option<String>,
}

impl ClassLogEntry {
    /// Teacher name when the API sent one, otherwise the id
    pub fn teacher_label(&self) -> &str {
        if self.teacher_name.is_empty() {
            &self.teacher_id
        } else {
            &self.teacher_name
        }
    }
}

/// Payload for `POST /api/class-logs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassLogRequest {
    /// Client-generated idempotency key; resubmitting the same draft reuses it
    pub request_id: Uuid,
    /// `YYYY-MM-DD`
    pub date: String,
    pub department_id: String,
    pub subject_id: String,
    pub class_hour: u8,
    pub lecture_title: String,
    pub absent_students: Vec<String>,
    pub class_sequence: u32,
}

/// Stored assessment as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub title: String,
    pub department_id: String,
    pub subject_id: String,
    #[serde(with = "week::calendar_day")]
    pub date: NaiveDate,
    #[serde(default)]
    pub parts: Vec<AssessmentPart>,
    pub total_points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_log_entry_accepts_timestamp_dates() {
        let json = r#"{
            "id": "log-1",
            "date": "2026-10-14T00:00:00.000Z",
            "period": 3,
            "teacherId": "t-9",
            "lectureTitle": "Fractions",
            "sequence": 12
        }"#;
        let entry: ClassLogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        assert!(entry.absent_students.is_empty());
        assert_eq!(entry.teacher_label(), "t-9");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["date"], "2026-10-14");
    }

    #[test]
    fn test_class_log_entry_dates_fold_offsets_into_utc() {
        let json = r#"{
            "id": "log-2",
            "date": "2026-10-14T23:30:00-02:00",
            "period": 1,
            "teacherId": "t-9",
            "lectureTitle": "Poetry",
            "sequence": 3
        }"#;
        let entry: ClassLogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
    }

    #[test]
    fn test_class_log_entry_rejects_bad_date() {
        let json = r#"{"id":"x","date":"soon","period":1,"teacherId":"t","lectureTitle":"L","sequence":1}"#;
        assert!(serde_json::from_str::<ClassLogEntry>(json).is_err());
    }

    #[test]
    fn test_role_aliases() {
        let user: SessionUser =
            serde_json::from_str(r#"{"id":"1","name":"Root","role":"admin"}"#).unwrap();
        assert_eq!(user.role, Role::Administrator);
        assert_eq!(user.teacher_id, None);

        let user: SessionUser =
            serde_json::from_str(r#"{"id":"2","name":"Ana","role":"teacher","teacherId":"t-2"}"#).unwrap();
        assert_eq!(user.role, Role::Teacher);
        assert_eq!(user.role.to_string(), "Teacher");
    }

    #[test]
    fn test_create_request_serializes_camel_case() {
        let request = CreateClassLogRequest {
            request_id: Uuid::nil(),
            date: "2026-10-14".to_string(),
            department_id: "7".to_string(),
            subject_id: "maths".to_string(),
            class_hour: 2,
            lecture_title: "Fractions".to_string(),
            absent_students: vec!["Ivo Kos".to_string()],
            class_sequence: 4,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["classHour"], 2);
        assert_eq!(json["classSequence"], 4);
        assert_eq!(json["absentStudents"][0], "Ivo Kos");
        assert_eq!(json["requestId"], "00000000-0000-0000-0000-000000000000");
    }
}
