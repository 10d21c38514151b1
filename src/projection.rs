use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::task::{Priority, Task};

pub const ACTIVITY_LIMIT: usize = 5;
pub const NO_ACTIVITY_PLACEHOLDER: &str = "No recent activity yet.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Completed => "completed",
            StatusFilter::Pending => "pending",
        }
    }

    fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Pending => !task.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "all" | "" => Ok(StatusFilter::All),
            "completed" | "done" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            _ => Err(ParseFilterError::new(
                "status",
                value,
                &["all", "completed", "pending"],
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            PriorityFilter::All => "all",
            PriorityFilter::Only(priority) => priority.as_str(),
        }
    }

    fn matches(self, task: &Task) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(priority) => task.priority == priority,
        }
    }
}

impl Serialize for PriorityFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for PriorityFilter {
    type Err = ParseFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(value);
        if normalized == "all" || normalized.is_empty() {
            return Ok(PriorityFilter::All);
        }
        normalized
            .parse::<Priority>()
            .map(PriorityFilter::Only)
            .map_err(|_| {
                ParseFilterError::new("priority", value, &["all", "low", "medium", "high"])
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    None,
    Name,
    Date,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::None => "none",
            SortKey::Name => "name",
            SortKey::Date => "date",
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "none" | "" => Ok(SortKey::None),
            "name" => Ok(SortKey::Name),
            "date" | "due" => Ok(SortKey::Date),
            _ => Err(ParseFilterError::new("sort", value, &["none", "name", "date"])),
        }
    }
}

/// The filter and sort selections that drive the table projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableQuery {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub sort: SortKey,
}

impl TableQuery {
    pub fn is_default(&self) -> bool {
        *self == TableQuery::default()
    }
}

/// Filters conjunctively, then sorts a copy. The input slice is left untouched
/// and `SortKey::None` keeps insertion order.
pub fn table_rows(tasks: &[Task], query: &TableQuery) -> Vec<Task> {
    let mut rows: Vec<Task> = tasks
        .iter()
        .filter(|task| query.status.matches(task) && query.priority.matches(task))
        .cloned()
        .collect();

    match query.sort {
        SortKey::None => {}
        SortKey::Name => rows.sort_by(|left, right| compare_names(&left.name, &right.name)),
        SortKey::Date => rows.sort_by(compare_due_dates),
    }
    rows
}

/// Collation in three levels: base letters ignoring case and accents, then
/// accents (unaccented first), then lowercase ahead of uppercase.
pub fn compare_names(left: &str, right: &str) -> Ordering {
    let left_folded = left.to_lowercase();
    let right_folded = right.to_lowercase();
    base_letters(&left_folded)
        .cmp(base_letters(&right_folded))
        .then_with(|| left_folded.nfd().cmp(right_folded.nfd()))
        .then_with(|| right.cmp(left))
}

fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().filter(|c| !is_combining_mark(*c))
}

/// Chronological order; tasks whose due date does not parse go last.
pub fn compare_due_dates(left: &Task, right: &Task) -> Ordering {
    match (left.parsed_due_date(), right.parsed_due_date()) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Summary {
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityFeed {
    /// Newest first, at most [`ACTIVITY_LIMIT`] entries.
    pub entries: Vec<String>,
}

impl ActivityFeed {
    pub fn of(activity: &[String]) -> Self {
        Self {
            entries: activity
                .iter()
                .rev()
                .take(ACTIVITY_LIMIT)
                .cloned()
                .collect(),
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        if self.entries.is_empty() {
            return vec![NO_ACTIVITY_PLACEHOLDER];
        }
        self.entries.iter().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub total: usize,
    /// Whole percent, rounded half up; 0 when there are no tasks.
    pub completion_rate: u32,
    pub high_priority: usize,
    pub fill_percent: u32,
}

impl Analytics {
    pub fn of(tasks: &[Task]) -> Self {
        let summary = Summary::of(tasks);
        let completion_rate = completion_rate(summary.completed, summary.total);
        Self {
            total: summary.total,
            completion_rate,
            high_priority: tasks
                .iter()
                .filter(|task| task.priority == Priority::High)
                .count(),
            fill_percent: completion_rate,
        }
    }
}

fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (completed * 200 + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100)
}

pub const COMPLETED_COLOR: &str = "#2f9e44";
pub const PENDING_COLOR: &str = "#e03131";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    pub label: &'static str,
    pub value: usize,
    pub color: &'static str,
}

/// Completed vs. pending distribution handed to a chart backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub slices: [ChartSlice; 2],
}

impl ChartData {
    pub fn of(tasks: &[Task]) -> Self {
        let summary = Summary::of(tasks);
        Self {
            slices: [
                ChartSlice {
                    label: "Completed",
                    value: summary.completed,
                    color: COMPLETED_COLOR,
                },
                ChartSlice {
                    label: "Pending",
                    value: summary.pending,
                    color: PENDING_COLOR,
                },
            ],
        }
    }

    pub fn total(&self) -> usize {
        self.slices.iter().map(|slice| slice.value).sum()
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFilterError {
    kind: &'static str,
    value: String,
    expected: &'static [&'static str],
}

impl ParseFilterError {
    fn new(kind: &'static str, value: &str, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

impl fmt::Display for ParseFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} '{}': expected one of {}",
            self.kind,
            self.value,
            self.expected.join(", ")
        )
    }
}

impl Error for ParseFilterError {}

#[cfg(test)]
#[path = "projection_tests_ext.rs"]
mod tests_ext;
