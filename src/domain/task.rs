use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;

pub type TaskId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let priority = match normalized.as_str() {
            "low" => Priority::Low,
            "medium" | "med" => Priority::Medium,
            "high" => Priority::High,
            _ => {
                return Err(ParsePriorityError {
                    value: value.to_string(),
                });
            }
        };
        Ok(priority)
    }
}

impl TryFrom<String> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePriorityError {
    value: String,
}

impl fmt::Display for ParsePriorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid priority '{}': expected one of {}",
            self.value,
            Priority::ALL
                .iter()
                .map(|priority| priority.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for ParsePriorityError {}

/// A tracked to-do item. Field names on the wire match the persisted
/// `tasks` layout: `id, name, desc, date, priority, completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    #[serde(rename = "date")]
    pub due_date: String,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "Completed"
        } else {
            "Pending"
        }
    }

    pub fn parsed_due_date(&self) -> Option<Date> {
        parse_due_date(&self.due_date)
    }
}

/// Fields for a task that has passed form validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
}

pub fn parse_due_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}
