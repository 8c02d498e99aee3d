//! Absence picker and the class-log compose form it feeds.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use uuid::Uuid;

use crate::class_log::{duplicate_tooltip, LogIndex};
use crate::notice::{NoticeBoard, NoticeKind};
use crate::roster::Person;
use crate::timetable::SchoolDay;
use crate::week::date_key;
use crate::{ClassLogEntry, CreateClassLogRequest, Student};

/// Maximum number of autocomplete suggestions shown under the picker
pub const SUGGESTION_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbsenceError {
    #[error("enter a student name first")]
    Empty,
    #[error("{0} is already marked absent")]
    Duplicate(String),
}

/// Distinct absent-student names in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsentStudentSet {
    names: Vec<String>,
}

impl AbsentStudentSet {
    /// Append `candidate` (trimmed). Exact matches of an existing name are refused.
    pub fn add(&mut self, candidate: &str) -> Result<(), AbsenceError> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(AbsenceError::Empty);
        }
        if self.contains(candidate) {
            return Err(AbsenceError::Duplicate(candidate.to_string()));
        }
        self.names.push(candidate.to_string());
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.names.len()).then(|| self.names.remove(index))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("choose a subject")]
    MissingSubject,
    #[error("choose a class hour")]
    MissingPeriod,
    #[error("{date} is not a school day")]
    NotASchoolDay { date: NaiveDate },
    #[error("{day} has no period {period}")]
    PeriodOutOfRange { day: SchoolDay, period: u8 },
    #[error("enter the lecture title")]
    MissingTitle,
    #[error("class sequence must be a positive number, got {0:?}")]
    InvalidSequence(String),
}

/// State of the "new class log" form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLogDraft {
    pub department_id: String,
    pub subject_id: String,
    pub period: Option<u8>,
    pub lecture_title: String,
    /// Raw text of the sequence field; parsed on submit
    pub class_sequence: String,
    pub student_input: String,
    absent: AbsentStudentSet,
    notices: NoticeBoard,
    request_id: Uuid,
    /// Slot the operator already agreed to log twice
    acknowledged_duplicate: Option<(NaiveDate, u8)>,
}

impl Default for ClassLogDraft {
    fn default() -> Self {
        Self {
            department_id: String::new(),
            subject_id: String::new(),
            period: None,
            lecture_title: String::new(),
            class_sequence: String::new(),
            student_input: String::new(),
            absent: AbsentStudentSet::default(),
            notices: NoticeBoard::default(),
            request_id: Uuid::new_v4(),
            acknowledged_duplicate: None,
        }
    }
}

impl ClassLogDraft {
    pub fn new(department_id: impl Into<String>) -> Self {
        Self {
            department_id: department_id.into(),
            ..Self::default()
        }
    }

    pub fn absent_students(&self) -> &AbsentStudentSet {
        &self.absent
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn dismiss_notice(&mut self, id: u64) -> bool {
        self.notices.dismiss(id)
    }

    /// Idempotency key sent with the create request; renewed after each success
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Move the picker input into the absent set. A rejected name leaves the
    /// set untouched and raises exactly one notice; the input is kept so it
    /// can be corrected.
    pub fn add_absent_student(&mut self) -> bool {
        match self.absent.add(&self.student_input) {
            Ok(()) => {
                self.student_input.clear();
                true
            }
            Err(err) => {
                self.notices.raise(NoticeKind::Warning, err.to_string());
                false
            }
        }
    }

    /// Pick a suggestion directly, bypassing the text field
    pub fn add_suggested_student(&mut self, name: &str) -> bool {
        self.student_input = name.to_string();
        self.add_absent_student()
    }

    pub fn remove_absent_student(&mut self, index: usize) -> Option<String> {
        self.absent.remove(index)
    }

    /// Roster students matching the picker input that are not yet marked absent
    pub fn suggestions<'a>(&self, roster: &'a [Student]) -> Vec<&'a Student> {
        let query = self.student_input.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        roster
            .iter()
            .filter(|student| student.search_text().contains(&query))
            .filter(|student| !self.absent.contains(&student.display_name()))
            .take(SUGGESTION_LIMIT)
            .collect()
    }

    /// Logs already recorded for the slot this draft would fill
    pub fn existing_logs<'a>(&self, index: &'a LogIndex, date: NaiveDate) -> &'a [ClassLogEntry] {
        match self.period {
            Some(period) => index.logs_for(date, period),
            None => &[],
        }
    }

    /// Returns true when the slot is free or the operator has already seen the
    /// warning for it. Otherwise raises one warning listing the existing logs
    /// and remembers the slot, so submitting again goes through.
    pub fn confirm_duplicates(&mut self, index: &LogIndex, date: NaiveDate) -> bool {
        let Some(period) = self.period else {
            return true;
        };
        let existing = index.logs_for(date, period);
        if existing.is_empty() || self.acknowledged_duplicate == Some((date, period)) {
            return true;
        }
        self.acknowledged_duplicate = Some((date, period));
        self.notices.raise(
            NoticeKind::Warning,
            format!(
                "Period {} on {} already has {} log(s):\n{}\nSubmit again to save anyway.",
                period,
                date_key(date),
                existing.len(),
                duplicate_tooltip(existing)
            ),
        );
        false
    }

    pub fn validate(&self, date: NaiveDate) -> Result<(), DraftError> {
        self.to_request(date).map(|_| ())
    }

    pub fn to_request(&self, date: NaiveDate) -> Result<CreateClassLogRequest, DraftError> {
        if self.subject_id.trim().is_empty() {
            return Err(DraftError::MissingSubject);
        }
        let period = self.period.ok_or(DraftError::MissingPeriod)?;
        let day = SchoolDay::from_weekday(date.weekday()).ok_or(DraftError::NotASchoolDay { date })?;
        if !day.has_period(period) {
            return Err(DraftError::PeriodOutOfRange { day, period });
        }
        let lecture_title = self.lecture_title.trim();
        if lecture_title.is_empty() {
            return Err(DraftError::MissingTitle);
        }
        let class_sequence = self
            .class_sequence
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|sequence| *sequence > 0)
            .ok_or_else(|| DraftError::InvalidSequence(self.class_sequence.clone()))?;

        Ok(CreateClassLogRequest {
            request_id: self.request_id,
            date: date_key(date),
            department_id: self.department_id.clone(),
            subject_id: self.subject_id.clone(),
            class_hour: period,
            lecture_title: lecture_title.to_string(),
            absent_students: self.absent.as_slice().to_vec(),
            class_sequence,
        })
    }

    /// Validate and build the request, raising a notice when the form is incomplete
    pub fn prepare_submission(&mut self, date: NaiveDate) -> Option<CreateClassLogRequest> {
        match self.to_request(date) {
            Ok(request) => Some(request),
            Err(err) => {
                self.notices.raise(NoticeKind::Warning, err.to_string());
                None
            }
        }
    }

    /// Reset the per-lesson fields and start a fresh idempotency key.
    /// Department, subject and class hour stay selected for the next entry.
    pub fn submit_succeeded(&mut self) {
        self.lecture_title.clear();
        self.class_sequence.clear();
        self.student_input.clear();
        self.absent.clear();
        self.request_id = Uuid::new_v4();
        self.acknowledged_duplicate = None;
        self.notices.raise(NoticeKind::Success, "Class log saved");
    }

    /// Keep every field so the operator can retry
    pub fn submit_failed(&mut self, reason: &str) {
        self.notices
            .raise(NoticeKind::Error, format!("Could not save the class log: {}", reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, first: &str, last: &str) -> Student {
        Student {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            department_id: Some("7".to_string()),
            parent_ids: Vec::new(),
        }
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn filled_draft() -> ClassLogDraft {
        let mut draft = ClassLogDraft::new("7");
        draft.subject_id = "maths".to_string();
        draft.period = Some(3);
        draft.lecture_title = "  Fractions  ".to_string();
        draft.class_sequence = "12".to_string();
        draft
    }

    #[test]
    fn test_absent_set_rejects_duplicates() {
        let mut set = AbsentStudentSet::default();
        assert_eq!(set.add("Ivo Kos"), Ok(()));
        assert_eq!(set.add("Mia Lah"), Ok(()));
        assert_eq!(set.add(" Ivo Kos "), Err(AbsenceError::Duplicate("Ivo Kos".to_string())));
        assert_eq!(set.add("   "), Err(AbsenceError::Empty));
        assert_eq!(set.as_slice(), &["Ivo Kos".to_string(), "Mia Lah".to_string()]);
    }

    #[test]
    fn test_absent_set_positional_remove() {
        let mut set = AbsentStudentSet::default();
        for name in ["A", "B", "C"] {
            set.add(name).unwrap();
        }
        assert_eq!(set.remove(1), Some("B".to_string()));
        assert_eq!(set.remove(5), None);
        assert_eq!(set.as_slice(), &["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_duplicate_add_raises_exactly_one_notice() {
        let mut draft = ClassLogDraft::new("7");
        draft.student_input = "Ivo Kos".to_string();
        assert!(draft.add_absent_student());
        assert!(draft.student_input.is_empty());
        assert_eq!(draft.notices().raised(), 0);

        for attempt in 1..=3 {
            draft.student_input = "Ivo Kos".to_string();
            let before = draft.absent_students().len();
            assert!(!draft.add_absent_student());
            assert_eq!(draft.absent_students().len(), before);
            assert_eq!(draft.notices().raised(), attempt);
        }
        assert_eq!(draft.student_input, "Ivo Kos");
        assert!(draft.notices().current().unwrap().message.contains("already marked absent"));
    }

    #[test]
    fn test_suggestions_filter_and_exclude_added() {
        let roster = vec![
            student("1", "Ivo", "Kos"),
            student("2", "Iva", "Horvat"),
            student("3", "Mia", "Lah"),
        ];
        let mut draft = ClassLogDraft::new("7");
        draft.student_input = "iv".to_string();
        let names: Vec<String> = draft.suggestions(&roster).iter().map(|s| s.display_name()).collect();
        assert_eq!(names, vec!["Ivo Kos", "Iva Horvat"]);

        assert!(draft.add_suggested_student("Ivo Kos"));
        draft.student_input = "iv".to_string();
        let names: Vec<String> = draft.suggestions(&roster).iter().map(|s| s.display_name()).collect();
        assert_eq!(names, vec!["Iva Horvat"]);

        draft.student_input = " ".to_string();
        assert!(draft.suggestions(&roster).is_empty());
    }

    #[test]
    fn test_to_request_packages_payload() {
        let mut draft = filled_draft();
        draft.student_input = "Ivo Kos".to_string();
        draft.add_absent_student();

        let request = draft.to_request(wednesday()).unwrap();
        assert_eq!(request.date, "2026-10-14");
        assert_eq!(request.class_hour, 3);
        assert_eq!(request.lecture_title, "Fractions");
        assert_eq!(request.class_sequence, 12);
        assert_eq!(request.absent_students, vec!["Ivo Kos".to_string()]);
        assert_eq!(request.request_id, draft.request_id());
    }

    #[test]
    fn test_to_request_validation() {
        let mut draft = filled_draft();
        draft.subject_id.clear();
        assert_eq!(draft.to_request(wednesday()), Err(DraftError::MissingSubject));

        let mut draft = filled_draft();
        draft.period = None;
        assert_eq!(draft.to_request(wednesday()), Err(DraftError::MissingPeriod));

        let mut draft = filled_draft();
        draft.period = Some(6);
        let friday = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(
            draft.to_request(friday),
            Err(DraftError::PeriodOutOfRange {
                day: SchoolDay::Fri,
                period: 6
            })
        );

        let saturday = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(
            filled_draft().to_request(saturday),
            Err(DraftError::NotASchoolDay { date: saturday })
        );

        let mut draft = filled_draft();
        draft.lecture_title = "   ".to_string();
        assert_eq!(draft.to_request(wednesday()), Err(DraftError::MissingTitle));

        let mut draft = filled_draft();
        draft.class_sequence = "0".to_string();
        assert!(matches!(draft.to_request(wednesday()), Err(DraftError::InvalidSequence(_))));
    }

    #[test]
    fn test_prepare_submission_raises_notice_on_error() {
        let mut draft = ClassLogDraft::new("7");
        assert!(draft.prepare_submission(wednesday()).is_none());
        assert_eq!(draft.notices().raised(), 1);
    }

    #[test]
    fn test_duplicate_slot_needs_second_submit() {
        let existing = ClassLogEntry {
            id: "log-1".to_string(),
            date: wednesday(),
            period: 3,
            teacher_id: "t-1".to_string(),
            teacher_name: "Ana Novak".to_string(),
            lecture_title: "Decimals".to_string(),
            sequence: 11,
            absent_students: Vec::new(),
            department_id: Some("7".to_string()),
            subject_id: Some("maths".to_string()),
        };
        let index = LogIndex::from_entries(vec![existing]);
        let mut draft = filled_draft();

        assert!(!draft.confirm_duplicates(&index, wednesday()));
        assert_eq!(draft.notices().raised(), 1);
        assert!(draft.notices().current().unwrap().message.contains("Decimals (#11) by Ana Novak"));
        assert!(draft.confirm_duplicates(&index, wednesday()));
        assert_eq!(draft.notices().raised(), 1);

        // free slots go straight through
        draft.period = Some(3);
        let next_week = wednesday() + chrono::Duration::days(7);
        assert!(draft.confirm_duplicates(&index, next_week));
        draft.period = Some(2);
        assert!(draft.confirm_duplicates(&index, wednesday()));

        draft.period = Some(3);
        draft.submit_succeeded();
        assert!(!draft.confirm_duplicates(&index, wednesday()));
    }

    #[test]
    fn test_success_clears_and_failure_keeps_fields() {
        let mut draft = filled_draft();
        draft.student_input = "Ivo Kos".to_string();
        draft.add_absent_student();
        let first_key = draft.request_id();

        draft.submit_failed("network down");
        assert_eq!(draft.lecture_title, "  Fractions  ");
        assert_eq!(draft.absent_students().len(), 1);
        assert_eq!(draft.request_id(), first_key);
        assert_eq!(draft.notices().current().unwrap().kind, NoticeKind::Error);

        draft.submit_succeeded();
        assert!(draft.lecture_title.is_empty());
        assert!(draft.class_sequence.is_empty());
        assert!(draft.absent_students().is_empty());
        assert_eq!(draft.subject_id, "maths");
        assert_eq!(draft.period, Some(3));
        assert_ne!(draft.request_id(), first_key);
    }
}
