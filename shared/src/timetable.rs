//! Weekly timetable grid and drag-and-drop reassignment.
//!
//! The grid is authoritative over a map keyed by `(day, period, teacher)`,
//! so a cell can never hold two entries. Dropping onto an occupied cell
//! either swaps the two entries or is rejected, depending on [`DropPolicy`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A teaching day. Periods per day: 7 Monday–Thursday, 5 on Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SchoolDay {
    #[serde(alias = "Monday")]
    Mon,
    #[serde(alias = "Tuesday")]
    Tue,
    #[serde(alias = "Wednesday")]
    Wed,
    #[serde(alias = "Thursday")]
    Thu,
    #[serde(alias = "Friday")]
    Fri,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 5] = [
        SchoolDay::Mon,
        SchoolDay::Tue,
        SchoolDay::Wed,
        SchoolDay::Thu,
        SchoolDay::Fri,
    ];

    pub fn period_count(self) -> u8 {
        match self {
            SchoolDay::Fri => 5,
            _ => 7,
        }
    }

    pub fn has_period(self, period: u8) -> bool {
        (1..=self.period_count()).contains(&period)
    }

    pub fn short_name(self) -> &'static str {
        match self {
            SchoolDay::Mon => "Mon",
            SchoolDay::Tue => "Tue",
            SchoolDay::Wed => "Wed",
            SchoolDay::Thu => "Thu",
            SchoolDay::Fri => "Fri",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            SchoolDay::Mon => "Monday",
            SchoolDay::Tue => "Tuesday",
            SchoolDay::Wed => "Wednesday",
            SchoolDay::Thu => "Thursday",
            SchoolDay::Fri => "Friday",
        }
    }

    pub fn from_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Mon => Some(SchoolDay::Mon),
            Weekday::Tue => Some(SchoolDay::Tue),
            Weekday::Wed => Some(SchoolDay::Wed),
            Weekday::Thu => Some(SchoolDay::Thu),
            Weekday::Fri => Some(SchoolDay::Fri),
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    /// Largest period count of any day, i.e. the number of grid rows
    pub fn max_period_count() -> u8 {
        Self::ALL.iter().map(|day| day.period_count()).max().unwrap_or(0)
    }
}

impl fmt::Display for SchoolDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for SchoolDay {
    type Err = SlotKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.short_name().eq_ignore_ascii_case(s) || day.full_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SlotKeyError::UnknownDay(s.to_string()))
    }
}

/// One lesson in the timetable seed. Field names follow the seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(rename = "Day")]
    pub day: SchoolDay,
    #[serde(rename = "Period")]
    pub period: u8,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Teacher")]
    pub teacher: String,
    #[serde(rename = "Grade")]
    pub grade: String,
}

impl ScheduleEntry {
    pub fn slot(&self) -> SlotKey {
        SlotKey::new(self.day, self.period, self.teacher.clone())
    }

    fn place_at(&mut self, slot: &SlotKey) {
        self.day = slot.day;
        self.period = slot.period;
        self.teacher = slot.teacher.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotKeyError {
    #[error("malformed slot key: {0}")]
    Malformed(String),
    #[error("unknown day: {0}")]
    UnknownDay(String),
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
}

/// Composite cell identity, rendered as `"{day}-{period}-{teacher}"`.
/// The teacher part may itself contain dashes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub day: SchoolDay,
    pub period: u8,
    pub teacher: String,
}

impl SlotKey {
    pub fn new(day: SchoolDay, period: u8, teacher: impl Into<String>) -> Self {
        Self {
            day,
            period,
            teacher: teacher.into(),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.day, self.period, self.teacher)
    }
}

impl FromStr for SlotKey {
    type Err = SlotKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let (Some(day), Some(period), Some(teacher)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SlotKeyError::Malformed(s.to_string()));
        };
        if teacher.is_empty() {
            return Err(SlotKeyError::Malformed(s.to_string()));
        }
        let period = period
            .parse::<u8>()
            .map_err(|_| SlotKeyError::InvalidPeriod(period.to_string()))?;
        Ok(SlotKey::new(day.parse()?, period, teacher))
    }
}

/// What to do when a drop lands on a cell that already holds a lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPolicy {
    /// Exchange the positions of the two lessons
    #[default]
    Swap,
    /// Refuse the drop and leave both lessons where they are
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Source and target were the same cell
    Unchanged,
    Moved { to: SlotKey },
    Swapped { first: SlotKey, second: SlotKey },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropRejection {
    #[error("no lesson found at {0}; the timetable may have been refreshed")]
    SourceMissing(SlotKey),
    #[error("{day} has no period {period}")]
    PeriodOutOfRange { day: SchoolDay, period: u8 },
    #[error("{target} is already taken by {subject} ({grade})")]
    TargetOccupied {
        target: SlotKey,
        subject: String,
        grade: String,
    },
}

/// A seed row that could not be placed on the grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedRejection {
    #[error("{subject} ({grade}) shares {slot} with another lesson", subject = .0.subject, grade = .0.grade, slot = .0.slot())]
    Collision(ScheduleEntry),
    #[error("{subject} ({grade}) is in period {period}, which {day} does not have", subject = .0.subject, grade = .0.grade, period = .0.period, day = .0.day)]
    PeriodOutOfRange(ScheduleEntry),
}

impl SeedRejection {
    pub fn entry(&self) -> &ScheduleEntry {
        match self {
            SeedRejection::Collision(entry) | SeedRejection::PeriodOutOfRange(entry) => entry,
        }
    }
}

/// Visual state of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState<'a> {
    Empty,
    Filled(&'a ScheduleEntry),
    /// A drag is currently hovering this cell; carries the lesson already there, if any
    DragHover(Option<&'a ScheduleEntry>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timetable {
    slots: BTreeMap<SlotKey, ScheduleEntry>,
}

impl Timetable {
    /// Build from seed data. Rows in a period their day does not have are
    /// left out, and when two rows claim the same cell the first one wins.
    /// Every row left out is returned so the caller can report it.
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> (Self, Vec<SeedRejection>) {
        let mut slots = BTreeMap::new();
        let mut rejected = Vec::new();

        for entry in entries {
            if !entry.day.has_period(entry.period) {
                log::warn!("timetable seed has a lesson in {} period {}", entry.day, entry.period);
                rejected.push(SeedRejection::PeriodOutOfRange(entry));
                continue;
            }
            let slot = entry.slot();
            if slots.contains_key(&slot) {
                log::warn!("timetable seed has more than one lesson at {}", slot);
                rejected.push(SeedRejection::Collision(entry));
            } else {
                slots.insert(slot, entry);
            }
        }

        (Self { slots }, rejected)
    }

    /// Bulk replace, returning skipped rows as in [`Timetable::from_entries`]
    pub fn replace_all(&mut self, entries: Vec<ScheduleEntry>) -> Vec<SeedRejection> {
        let (fresh, rejected) = Self::from_entries(entries);
        *self = fresh;
        rejected
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.slots.values()
    }

    pub fn entry_at(&self, slot: &SlotKey) -> Option<&ScheduleEntry> {
        self.slots.get(slot)
    }

    /// Distinct teachers in name order; one grid row block per teacher
    pub fn teachers(&self) -> Vec<String> {
        let mut teachers: Vec<String> = self.slots.keys().map(|slot| slot.teacher.clone()).collect();
        teachers.sort();
        teachers.dedup();
        teachers
    }

    pub fn cell_state(&self, slot: &SlotKey, hover: Option<&SlotKey>) -> CellState<'_> {
        let entry = self.slots.get(slot);
        if hover == Some(slot) {
            return CellState::DragHover(entry);
        }
        match entry {
            Some(entry) => CellState::Filled(entry),
            None => CellState::Empty,
        }
    }

    /// Move the lesson at `source` to `target` in one step.
    ///
    /// The map is only touched once every check has passed, so a rejected
    /// drop leaves the timetable exactly as it was.
    pub fn drop_entry(
        &mut self,
        source: &SlotKey,
        target: &SlotKey,
        policy: DropPolicy,
    ) -> Result<DropOutcome, DropRejection> {
        if source == target {
            return Ok(DropOutcome::Unchanged);
        }
        if !self.slots.contains_key(source) {
            log::warn!("drop from {} rejected: no lesson there", source);
            return Err(DropRejection::SourceMissing(source.clone()));
        }
        if !target.day.has_period(target.period) {
            return Err(DropRejection::PeriodOutOfRange {
                day: target.day,
                period: target.period,
            });
        }

        let occupant = self.slots.get(target);
        if let (Some(occupant), DropPolicy::Reject) = (occupant, policy) {
            log::debug!("drop onto {} rejected: occupied by {}", target, occupant.subject);
            return Err(DropRejection::TargetOccupied {
                target: target.clone(),
                subject: occupant.subject.clone(),
                grade: occupant.grade.clone(),
            });
        }
        // Swapping sends the occupant back to the source cell, which must exist
        // for it too
        if occupant.is_some() && !source.day.has_period(source.period) {
            return Err(DropRejection::PeriodOutOfRange {
                day: source.day,
                period: source.period,
            });
        }

        let Some(mut dragged) = self.slots.remove(source) else {
            return Err(DropRejection::SourceMissing(source.clone()));
        };
        dragged.place_at(target);

        let outcome = match self.slots.insert(target.clone(), dragged) {
            Some(mut displaced) => {
                displaced.place_at(source);
                self.slots.insert(source.clone(), displaced);
                log::debug!("swapped lessons at {} and {}", source, target);
                DropOutcome::Swapped {
                    first: source.clone(),
                    second: target.clone(),
                }
            }
            None => {
                log::debug!("moved lesson from {} to {}", source, target);
                DropOutcome::Moved { to: target.clone() }
            }
        };
        Ok(outcome)
    }
}
