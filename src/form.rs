use std::error::Error;
use std::fmt;

use crate::domain::task::{parse_due_date, NewTask, ParsePriorityError, Priority};

/// Raw task-creation input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub name: String,
    pub description: String,
    pub due_date: String,
    pub priority: String,
}

impl TaskForm {
    /// Name, due date and priority are required; description may be blank.
    pub fn validate(&self) -> Result<NewTask, FormError> {
        let name = required(&self.name, "name")?;
        let due_date = required(&self.due_date, "date")?;
        let priority = required(&self.priority, "priority")?.parse::<Priority>()?;
        if parse_due_date(due_date).is_none() {
            return Err(FormError::InvalidDate(due_date.to_string()));
        }

        Ok(NewTask {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            due_date: due_date.to_string(),
            priority,
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    MissingField(&'static str),
    InvalidPriority(ParsePriorityError),
    InvalidDate(String),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::MissingField(field) => write!(f, "task {} is required", field),
            FormError::InvalidPriority(err) => write!(f, "{}", err),
            FormError::InvalidDate(value) => {
                write!(f, "invalid due date '{}': expected YYYY-MM-DD", value)
            }
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FormError::InvalidPriority(err) => Some(err),
            FormError::MissingField(_) | FormError::InvalidDate(_) => None,
        }
    }
}

impl From<ParsePriorityError> for FormError {
    fn from(value: ParsePriorityError) -> Self {
        FormError::InvalidPriority(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{FormError, TaskForm};
    use crate::domain::task::Priority;

    fn filled() -> TaskForm {
        TaskForm {
            name: " Write report ".to_string(),
            description: "Q3 summary".to_string(),
            due_date: "2024-12-01".to_string(),
            priority: "High".to_string(),
        }
    }

    #[test]
    fn valid_form_produces_new_task() {
        let task = filled().validate().expect("form should validate");
        assert_eq!(task.name, "Write report");
        assert_eq!(task.description, "Q3 summary");
        assert_eq!(task.due_date, "2024-12-01");
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn description_is_optional() {
        let form = TaskForm {
            description: String::new(),
            ..filled()
        };
        assert_eq!(form.validate().expect("valid").description, "");
    }

    #[test]
    fn missing_required_fields_are_rejected_in_order() {
        let blank = TaskForm::default();
        assert_eq!(blank.validate(), Err(FormError::MissingField("name")));

        let no_date = TaskForm {
            due_date: "  ".to_string(),
            ..filled()
        };
        assert_eq!(no_date.validate(), Err(FormError::MissingField("date")));

        let no_priority = TaskForm {
            priority: String::new(),
            ..filled()
        };
        assert_eq!(
            no_priority.validate(),
            Err(FormError::MissingField("priority"))
        );
    }

    #[test]
    fn bad_priority_and_date_are_rejected() {
        let bad_priority = TaskForm {
            priority: "urgent".to_string(),
            ..filled()
        };
        assert!(matches!(
            bad_priority.validate(),
            Err(FormError::InvalidPriority(_))
        ));

        let bad_date = TaskForm {
            due_date: "12/01/2024".to_string(),
            ..filled()
        };
        let err = bad_date.validate().expect_err("date should be rejected");
        assert_eq!(
            err.to_string(),
            "invalid due date '12/01/2024': expected YYYY-MM-DD"
        );
    }
}
