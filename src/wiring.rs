use serde::Serialize;

use crate::app::AppError;
use crate::chart::{ChartBackend, ChartSurface};
use crate::domain::task::{Task, TaskId};
use crate::form::TaskForm;
use crate::projection::{
    table_rows, ActivityFeed, Analytics, ChartData, PriorityFilter, SortKey, StatusFilter,
    Summary, TableQuery,
};
use crate::repository::TaskRepository;
use crate::store::KeyValueStore;

pub const RENAME_PROMPT: &str = "Edit Task Name:";

/// Asks the user for replacement text.
pub trait Prompter {
    /// `initial` pre-fills the answer. `None` means the user cancelled.
    fn ask(&mut self, message: &str, initial: &str) -> Option<String>;
}

/// Answers every prompt with the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedAnswer(Option<String>);

impl FixedAnswer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self(Some(answer.into()))
    }

    pub fn cancel() -> Self {
        Self(None)
    }
}

impl Prompter for FixedAnswer {
    fn ask(&mut self, _message: &str, _initial: &str) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Submit(TaskForm),
    ToggleComplete(TaskId),
    Rename(TaskId),
    Delete(TaskId),
    SetStatusFilter(StatusFilter),
    SetPriorityFilter(PriorityFilter),
    SetSort(SortKey),
}

/// Every surface, projected from one repository state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub query: TableQuery,
    pub table: Vec<Task>,
    pub summary: Summary,
    pub activity: ActivityFeed,
    pub analytics: Analytics,
    pub chart: ChartData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// State changed; every surface was re-projected and the chart redrawn.
    Full(Frame),
    /// Only the table selections changed.
    Table(Vec<Task>),
    /// The event was a no-op (unknown id, cancelled or blank rename).
    Unchanged,
}

pub struct Dashboard<S, B: ChartBackend> {
    repository: TaskRepository<S>,
    query: TableQuery,
    chart: ChartSurface<B>,
}

impl<S: KeyValueStore, B: ChartBackend> Dashboard<S, B> {
    pub fn new(repository: TaskRepository<S>, query: TableQuery, backend: B) -> Self {
        Self {
            repository,
            query,
            chart: ChartSurface::new(backend),
        }
    }

    pub fn repository(&self) -> &TaskRepository<S> {
        &self.repository
    }

    pub fn query(&self) -> TableQuery {
        self.query
    }

    pub fn chart(&self) -> Option<&B::Instance> {
        self.chart.current()
    }

    #[cfg(test)]
    pub fn chart_surface(&self) -> &ChartSurface<B> {
        &self.chart
    }

    pub fn table(&self) -> Vec<Task> {
        table_rows(self.repository.tasks(), &self.query)
    }

    pub fn frame(&self) -> Frame {
        let tasks = self.repository.tasks();
        Frame {
            query: self.query,
            table: self.table(),
            summary: Summary::of(tasks),
            activity: ActivityFeed::of(self.repository.activity()),
            analytics: Analytics::of(tasks),
            chart: ChartData::of(tasks),
        }
    }

    /// Projects every surface and replaces the live chart.
    pub fn refresh(&mut self) -> Frame {
        let frame = self.frame();
        self.chart.render(&frame.chart);
        frame
    }

    pub fn handle(
        &mut self,
        event: Event,
        prompter: &mut dyn Prompter,
    ) -> Result<Update, AppError> {
        tracing::debug!(?event, "dispatching event");
        let changed = match event {
            Event::Submit(form) => {
                let new_task = form.validate()?;
                self.repository.add_task(new_task)?;
                true
            }
            Event::ToggleComplete(id) => self.repository.toggle_complete(id)?.is_some(),
            Event::Rename(id) => self.rename(id, prompter)?,
            Event::Delete(id) => self.repository.remove(id)?.is_some(),
            Event::SetStatusFilter(status) => {
                self.query.status = status;
                return Ok(Update::Table(self.table()));
            }
            Event::SetPriorityFilter(priority) => {
                self.query.priority = priority;
                return Ok(Update::Table(self.table()));
            }
            Event::SetSort(sort) => {
                self.query.sort = sort;
                return Ok(Update::Table(self.table()));
            }
        };

        if changed {
            Ok(Update::Full(self.refresh()))
        } else {
            tracing::debug!("event left state unchanged");
            Ok(Update::Unchanged)
        }
    }

    fn rename(&mut self, id: TaskId, prompter: &mut dyn Prompter) -> Result<bool, AppError> {
        let Some(current) = self.repository.get(id) else {
            return Ok(false);
        };
        let initial = current.name.clone();
        let Some(answer) = prompter.ask(RENAME_PROMPT, &initial) else {
            return Ok(false);
        };
        Ok(self.repository.rename(id, &answer)?.is_some())
    }
}
