use time::OffsetDateTime;

use crate::domain::task::{NewTask, Task, TaskId};
use crate::store::{KeyValueStore, PersistentStore, StoreError};

/// Owns the task list and activity log. Every mutation appends exactly one
/// activity entry and writes both sequences through to the store before
/// returning.
pub struct TaskRepository<S> {
    store: PersistentStore<S>,
    tasks: Vec<Task>,
    activity: Vec<String>,
    clock: fn() -> TaskId,
}

impl<S: KeyValueStore> TaskRepository<S> {
    pub fn open(backend: S) -> Self {
        let store = PersistentStore::new(backend);
        let state = store.load();
        tracing::debug!(
            tasks = state.tasks.len(),
            activity = state.activity.len(),
            "loaded task repository"
        );
        Self {
            store,
            tasks: state.tasks,
            activity: state.activity,
            clock: now_millis,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> TaskId) -> Self {
        self.clock = clock;
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn activity(&self) -> &[String] {
        &self.activity
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    #[cfg(test)]
    pub fn store(&self) -> &PersistentStore<S> {
        &self.store
    }

    #[cfg(test)]
    pub fn store_mut(&mut self) -> &mut PersistentStore<S> {
        &mut self.store
    }

    pub fn add_task(&mut self, new_task: NewTask) -> Result<Task, StoreError> {
        let task = Task {
            id: self.next_id(),
            name: new_task.name,
            description: new_task.description,
            due_date: new_task.due_date,
            priority: new_task.priority,
            completed: false,
        };
        tracing::debug!(id = task.id, name = %task.name, "adding task");
        let previous = self.tasks.clone();
        self.tasks.push(task.clone());
        self.record(previous, format!("Task \"{}\" added", task.name))?;
        Ok(task)
    }

    /// Returns `None` without touching state when `id` is unknown.
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let previous = self.tasks.clone();
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            tracing::debug!(id, "toggle ignored for unknown task");
            return Ok(None);
        };
        task.completed = !task.completed;
        let task = task.clone();
        let marked = if task.completed {
            "completed"
        } else {
            "pending"
        };
        tracing::debug!(id, completed = task.completed, "toggled task");
        self.record(previous, format!("Task \"{}\" marked {}", task.name, marked))?;
        Ok(Some(task))
    }

    /// Empty or whitespace-only names and unknown ids are silently ignored.
    pub fn rename(&mut self, id: TaskId, new_name: &str) -> Result<Option<Task>, StoreError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            tracing::debug!(id, "rename ignored for empty name");
            return Ok(None);
        }
        let previous = self.tasks.clone();
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            tracing::debug!(id, "rename ignored for unknown task");
            return Ok(None);
        };
        let old_name = std::mem::replace(&mut task.name, new_name.to_string());
        let task = task.clone();
        tracing::debug!(id, from = %old_name, to = %task.name, "renamed task");
        let entry = format!("Task \"{}\" renamed to \"{}\"", old_name, task.name);
        self.record(previous, entry)?;
        Ok(Some(task))
    }

    pub fn remove(&mut self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            tracing::debug!(id, "remove ignored for unknown task");
            return Ok(None);
        };
        let previous = self.tasks.clone();
        let removed = self.tasks.remove(index);
        tracing::debug!(id, name = %removed.name, "removed task");
        self.record(previous, format!("Task \"{}\" deleted", removed.name))?;
        Ok(Some(removed))
    }

    /// Appends `entry` and saves. A failed save restores `previous` and drops
    /// the entry, so memory never runs ahead of storage.
    fn record(&mut self, previous: Vec<Task>, entry: String) -> Result<(), StoreError> {
        self.activity.push(entry);
        if let Err(err) = self.store.save(&self.tasks, &self.activity) {
            tracing::warn!(error = %err, "save failed; rolling back in-memory change");
            self.activity.pop();
            self.tasks = previous;
            return Err(err);
        }
        Ok(())
    }

    // Creation timestamps collide when tasks are added within the same
    // millisecond, so ids never go below the current maximum plus one.
    fn next_id(&self) -> TaskId {
        let floor = self
            .tasks
            .iter()
            .map(|task| task.id.saturating_add(1))
            .max()
            .unwrap_or(TaskId::MIN);
        (self.clock)().max(floor)
    }
}

fn now_millis() -> TaskId {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    TaskId::try_from(millis).unwrap_or(TaskId::MAX)
}
