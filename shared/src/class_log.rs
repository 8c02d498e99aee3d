//! Class-log week view: cell lookup, duplicate flagging, department scoping
//! and the single-day carousel used on narrow screens.
//!
//! Duplicates are surfaced, never resolved. Two logs for one `(date, period)`
//! may be team teaching or an entry mistake; the operator decides.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::week::{WeekWindow, WORK_WEEK_LEN};
use crate::{ClassLogEntry, Department, Role, Session, Teacher};

/// What a week-grid cell should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCell<'a> {
    Missing,
    Single(&'a ClassLogEntry),
    /// Render `shown` but tag the cell; `all` lists every conflicting entry
    Duplicate {
        shown: &'a ClassLogEntry,
        all: &'a [ClassLogEntry],
    },
}

impl LogCell<'_> {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, LogCell::Duplicate { .. })
    }
}

/// Logs for one department and week, grouped by `(date, period)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogIndex {
    by_slot: BTreeMap<(NaiveDate, u8), Vec<ClassLogEntry>>,
}

impl LogIndex {
    pub fn from_entries(entries: Vec<ClassLogEntry>) -> Self {
        let mut by_slot: BTreeMap<(NaiveDate, u8), Vec<ClassLogEntry>> = BTreeMap::new();
        for entry in entries {
            by_slot.entry((entry.date, entry.period)).or_default().push(entry);
        }

        let index = Self { by_slot };
        for (date, period) in index.duplicate_slots() {
            log::debug!("duplicate class logs on {} period {}", date, period);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.by_slot.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }

    /// Exact-match lookup; zero, one or many entries
    pub fn logs_for(&self, date: NaiveDate, period: u8) -> &[ClassLogEntry] {
        self.by_slot
            .get(&(date, period))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cell(&self, date: NaiveDate, period: u8) -> LogCell<'_> {
        let entries = self.logs_for(date, period);
        match entries {
            [] => LogCell::Missing,
            [only] => LogCell::Single(only),
            [first, ..] => LogCell::Duplicate {
                shown: first,
                all: entries,
            },
        }
    }

    pub fn duplicate_slots(&self) -> Vec<(NaiveDate, u8)> {
        self.by_slot
            .iter()
            .filter(|(_, entries)| entries.len() > 1)
            .map(|(slot, _)| *slot)
            .collect()
    }

    /// Record a freshly created log without refetching the week
    pub fn insert(&mut self, entry: ClassLogEntry) {
        self.by_slot.entry((entry.date, entry.period)).or_default().push(entry);
    }
}

/// Tooltip body listing each conflicting entry on its own line
pub fn duplicate_tooltip(entries: &[ClassLogEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{} (#{}) by {}",
                entry.lecture_title,
                entry.sequence,
                entry.teacher_label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Departments the signed-in user may browse. Administrators see all of
/// them; a teacher sees the departments named by their assigned subjects.
pub fn visible_departments(
    session: &Session,
    teacher: Option<&Teacher>,
    departments: &[Department],
) -> Vec<Department> {
    if session.user.role == Role::Administrator {
        return departments.to_vec();
    }

    let Some(teacher) = teacher else {
        return Vec::new();
    };
    let assigned: BTreeSet<&str> = teacher
        .assigned_subjects
        .iter()
        .flat_map(|subject| subject.department_ids.iter().map(String::as_str))
        .collect();

    departments
        .iter()
        .filter(|department| assigned.contains(department.id.as_str()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved left; show the following day
    Left,
    /// Finger moved right; show the previous day
    Right,
}

impl SwipeDirection {
    /// Classify a horizontal touch movement, ignoring anything under `threshold` pixels
    pub fn from_delta(delta_x: f64, threshold: f64) -> Option<Self> {
        if delta_x <= -threshold {
            Some(SwipeDirection::Left)
        } else if delta_x >= threshold {
            Some(SwipeDirection::Right)
        } else {
            None
        }
    }
}

/// Focused day index for the narrow-screen view, clamped to the work week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCarousel {
    index: usize,
}

impl DayCarousel {
    /// Starts on `today` when it falls inside the displayed week, otherwise on Monday
    pub fn new(window: &WeekWindow, today: NaiveDate) -> Self {
        let index = window
            .days()
            .iter()
            .position(|day| day.date == today)
            .unwrap_or(0);
        Self { index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn swipe(&mut self, direction: SwipeDirection) {
        self.index = match direction {
            SwipeDirection::Left => (self.index + 1).min(WORK_WEEK_LEN - 1),
            SwipeDirection::Right => self.index.saturating_sub(1),
        };
    }

    /// Apply a raw touch movement; returns true when the focused day changed
    pub fn swipe_from_delta(&mut self, delta_x: f64, threshold: f64) -> bool {
        let before = self.index;
        if let Some(direction) = SwipeDirection::from_delta(delta_x, threshold) {
            self.swipe(direction);
        }
        self.index != before
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index < WORK_WEEK_LEN - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssignedSubject, SessionUser};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn log(id: &str, date: NaiveDate, period: u8, title: &str, sequence: u32, teacher: &str) -> ClassLogEntry {
        ClassLogEntry {
            id: id.to_string(),
            date,
            period,
            teacher_id: teacher.to_lowercase(),
            teacher_name: teacher.to_string(),
            lecture_title: title.to_string(),
            sequence,
            absent_students: Vec::new(),
            department_id: Some("dep-7".to_string()),
            subject_id: None,
        }
    }

    fn seeded() -> LogIndex {
        LogIndex::from_entries(vec![
            log("1", day(12), 1, "Fractions", 4, "Ms Novak"),
            log("2", day(12), 2, "Photosynthesis", 2, "Mr Horvat"),
            log("3", day(12), 2, "Cell walls", 3, "Ms Kovac"),
        ])
    }

    fn session(role: Role) -> Session {
        Session {
            token: "t".to_string(),
            user: SessionUser {
                id: "u1".to_string(),
                name: "User".to_string(),
                role,
                teacher_id: Some("teach-1".to_string()),
            },
        }
    }

    fn department(id: &str) -> Department {
        Department {
            id: id.to_string(),
            name: format!("Grade {}", id),
        }
    }

    #[test]
    fn test_logs_for_classifies_cells() {
        let index = seeded();
        assert_eq!(index.len(), 3);

        assert!(index.logs_for(day(13), 1).is_empty());
        assert_eq!(index.cell(day(13), 1), LogCell::Missing);

        assert_eq!(index.logs_for(day(12), 1).len(), 1);
        assert!(matches!(index.cell(day(12), 1), LogCell::Single(e) if e.lecture_title == "Fractions"));

        assert_eq!(index.logs_for(day(12), 2).len(), 2);
        match index.cell(day(12), 2) {
            LogCell::Duplicate { shown, all } => {
                assert_eq!(shown.id, "2");
                assert_eq!(all.len(), 2);
            }
            other => panic!("expected duplicate, got {:?}", other),
        }
        assert!(index.cell(day(12), 2).is_duplicate());
    }

    #[test]
    fn test_duplicate_slots_and_tooltip() {
        let index = seeded();
        assert_eq!(index.duplicate_slots(), vec![(day(12), 2)]);

        let tooltip = duplicate_tooltip(index.logs_for(day(12), 2));
        assert_eq!(
            tooltip,
            "Photosynthesis (#2) by Mr Horvat\nCell walls (#3) by Ms Kovac"
        );
    }

    #[test]
    fn test_insert_can_create_duplicate() {
        let mut index = seeded();
        index.insert(log("4", day(12), 1, "Decimals", 5, "Ms Novak"));
        assert!(index.cell(day(12), 1).is_duplicate());
    }

    #[test]
    fn test_visible_departments_for_admin() {
        let all = vec![department("1"), department("2")];
        assert_eq!(visible_departments(&session(Role::Administrator), None, &all), all);
    }

    #[test]
    fn test_visible_departments_for_teacher() {
        let all = vec![department("1"), department("2"), department("3")];
        let teacher = Teacher {
            id: "teach-1".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Novak".to_string(),
            email: None,
            assigned_subjects: vec![
                AssignedSubject {
                    subject_id: "maths".to_string(),
                    subject_name: "Maths".to_string(),
                    department_ids: vec!["1".to_string(), "3".to_string()],
                },
                AssignedSubject {
                    subject_id: "physics".to_string(),
                    subject_name: "Physics".to_string(),
                    department_ids: vec!["3".to_string()],
                },
            ],
        };

        let visible = visible_departments(&session(Role::Teacher), Some(&teacher), &all);
        let ids: Vec<&str> = visible.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        assert!(visible_departments(&session(Role::Teacher), None, &all).is_empty());
    }

    #[test]
    fn test_carousel_starts_on_today_within_week() {
        let window = WeekWindow::current(day(14));
        assert_eq!(DayCarousel::new(&window, day(14)).index(), 2);

        let mut previous = window;
        previous.prev_week();
        assert_eq!(DayCarousel::new(&previous, day(14)).index(), 0);

        // Saturday is not a column
        assert_eq!(DayCarousel::new(&window, day(17)).index(), 0);
    }

    #[test]
    fn test_carousel_clamps_without_wrapping() {
        let window = WeekWindow::current(day(16));
        let mut carousel = DayCarousel::new(&window, day(16));
        assert_eq!(carousel.index(), 4);
        assert!(!carousel.can_go_forward());

        carousel.swipe(SwipeDirection::Left);
        assert_eq!(carousel.index(), 4);

        for _ in 0..10 {
            carousel.swipe(SwipeDirection::Right);
        }
        assert_eq!(carousel.index(), 0);
        assert!(!carousel.can_go_back());
    }

    #[test]
    fn test_swipe_direction_threshold() {
        assert_eq!(SwipeDirection::from_delta(-80.0, 50.0), Some(SwipeDirection::Left));
        assert_eq!(SwipeDirection::from_delta(60.0, 50.0), Some(SwipeDirection::Right));
        assert_eq!(SwipeDirection::from_delta(20.0, 50.0), None);
        assert_eq!(SwipeDirection::from_delta(-49.9, 50.0), None);
    }

    #[test]
    fn test_swipe_from_delta_reports_movement() {
        let window = WeekWindow::current(day(14));
        let mut carousel = DayCarousel::new(&window, day(14));
        assert!(carousel.swipe_from_delta(-120.0, 50.0));
        assert_eq!(carousel.index(), 3);
        assert!(!carousel.swipe_from_delta(10.0, 50.0));
        assert_eq!(carousel.index(), 3);
    }
}
