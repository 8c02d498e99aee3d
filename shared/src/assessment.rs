//! Assessment form validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::week::date_key;

/// Points across all parts of one assessment may not exceed this
pub const MAX_ASSESSMENT_POINTS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPart {
    pub label: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    #[error("enter an assessment title")]
    MissingTitle,
    #[error("choose a subject")]
    MissingSubject,
    #[error("add at least one part")]
    NoParts,
    #[error("part {index} needs a label")]
    UnlabelledPart { index: usize },
    #[error("part {index} must be worth at least one point")]
    ZeroPoints { index: usize },
    #[error("points add up to {total}, the maximum is {max}", max = MAX_ASSESSMENT_POINTS)]
    TooManyPoints { total: u64 },
}

/// Payload for `POST /api/assessments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    pub title: String,
    pub department_id: String,
    pub subject_id: String,
    pub date: String,
    pub parts: Vec<AssessmentPart>,
    pub total_points: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssessmentDraft {
    pub title: String,
    pub department_id: String,
    pub subject_id: String,
    pub parts: Vec<AssessmentPart>,
}

impl AssessmentDraft {
    /// Summed as `u64` so typed-in part values cannot wrap past the limit
    pub fn total_points(&self) -> u64 {
        self.parts.iter().map(|part| u64::from(part.points)).sum()
    }

    pub fn remaining_points(&self) -> i64 {
        let total = i64::try_from(self.total_points()).unwrap_or(i64::MAX);
        i64::from(MAX_ASSESSMENT_POINTS) - total
    }

    pub fn validate(&self) -> Result<(), AssessmentError> {
        if self.title.trim().is_empty() {
            return Err(AssessmentError::MissingTitle);
        }
        if self.subject_id.trim().is_empty() {
            return Err(AssessmentError::MissingSubject);
        }
        if self.parts.is_empty() {
            return Err(AssessmentError::NoParts);
        }
        for (i, part) in self.parts.iter().enumerate() {
            if part.label.trim().is_empty() {
                return Err(AssessmentError::UnlabelledPart { index: i + 1 });
            }
            if part.points == 0 {
                return Err(AssessmentError::ZeroPoints { index: i + 1 });
            }
        }
        let total = self.total_points();
        if total > u64::from(MAX_ASSESSMENT_POINTS) {
            return Err(AssessmentError::TooManyPoints { total });
        }
        Ok(())
    }

    pub fn to_request(&self, date: NaiveDate) -> Result<CreateAssessmentRequest, AssessmentError> {
        self.validate()?;
        let total = self.total_points();
        let total_points = u32::try_from(total).map_err(|_| AssessmentError::TooManyPoints { total })?;
        Ok(CreateAssessmentRequest {
            title: self.title.trim().to_string(),
            department_id: self.department_id.clone(),
            subject_id: self.subject_id.clone(),
            date: date_key(date),
            parts: self.parts.clone(),
            total_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(label: &str, points: u32) -> AssessmentPart {
        AssessmentPart {
            label: label.to_string(),
            points,
        }
    }

    fn draft(parts: Vec<AssessmentPart>) -> AssessmentDraft {
        AssessmentDraft {
            title: "Midterm".to_string(),
            department_id: "7".to_string(),
            subject_id: "maths".to_string(),
            parts,
        }
    }

    #[test]
    fn test_total_at_limit_is_valid() {
        let draft = draft(vec![part("Algebra", 60), part("Geometry", 40)]);
        assert_eq!(draft.total_points(), 100);
        assert_eq!(draft.remaining_points(), 0);
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn test_total_over_limit_is_rejected() {
        let draft = draft(vec![part("Algebra", 70), part("Geometry", 40)]);
        assert_eq!(draft.remaining_points(), -10);
        let err = draft.validate().unwrap_err();
        assert_eq!(err, AssessmentError::TooManyPoints { total: 110 });
        assert_eq!(err.to_string(), "points add up to 110, the maximum is 100");
    }

    #[test]
    fn test_huge_part_values_do_not_wrap() {
        let draft = draft(vec![part("Essay", u32::MAX), part("Quiz", 2)]);
        let expected = u64::from(u32::MAX) + 2;
        assert_eq!(draft.total_points(), expected);
        assert!(draft.remaining_points() < 0);
        assert_eq!(draft.validate(), Err(AssessmentError::TooManyPoints { total: expected }));
        assert!(draft.to_request(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()).is_err());
    }

    #[test]
    fn test_required_fields() {
        let mut missing_title = draft(vec![part("A", 10)]);
        missing_title.title = " ".to_string();
        assert_eq!(missing_title.validate(), Err(AssessmentError::MissingTitle));

        assert_eq!(draft(Vec::new()).validate(), Err(AssessmentError::NoParts));
        assert_eq!(
            draft(vec![part("A", 10), part("", 5)]).validate(),
            Err(AssessmentError::UnlabelledPart { index: 2 })
        );
        assert_eq!(
            draft(vec![part("A", 0)]).validate(),
            Err(AssessmentError::ZeroPoints { index: 1 })
        );
    }

    #[test]
    fn test_to_request() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let request = draft(vec![part("A", 30)]).to_request(date).unwrap();
        assert_eq!(request.total_points, 30);
        assert_eq!(request.date, "2026-10-14");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["totalPoints"], 30);
        assert_eq!(json["subjectId"], "maths");
    }
}
