use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::{Result, TaskmanError};
use crate::model::{MAX_TITLE_LEN, Priority, Status, Task};
use crate::query::{
    DateField, ListQuery, SearchQuery, SortField, SortOrder, TaskFilter, search, sort,
};
use crate::store::JsonStorage;

/// Enum field given either as a value or as a name still to be checked.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Choice<T> {
    Value(T),
    Name(String),
}

impl<T: FromStr<Err = String>> Choice<T> {
    fn resolve(self) -> Result<T> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Name(name) => name.parse().map_err(TaskmanError::Validation),
        }
    }
}

/// Arguments for [`TaskManager::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    title: String,
    description: String,
    priority: Choice<Priority>,
    status: Choice<Status>,
    due_date: Option<DateTime<Utc>>,
    tags: Vec<String>,
    linear_issue_id: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Choice::Value(Priority::default()),
            status: Choice::Value(Status::default()),
            due_date: None,
            tags: Vec::new(),
            linear_issue_id: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Choice::Value(priority);
        self
    }

    /// Priority by name; an unknown name fails at `create`.
    pub fn priority_str(mut self, priority: impl Into<String>) -> Self {
        self.priority = Choice::Name(priority.into());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Choice::Value(status);
        self
    }

    pub fn status_str(mut self, status: impl Into<String>) -> Self {
        self.status = Choice::Name(status.into());
        self
    }

    pub fn due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn linear_issue_id(mut self, id: impl Into<String>) -> Self {
        self.linear_issue_id = Some(id.into());
        self
    }
}

/// Field changes for [`TaskManager::update`]. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    title: Option<String>,
    description: Option<String>,
    priority: Option<Choice<Priority>>,
    status: Option<Choice<Status>>,
    due_date: Option<Option<DateTime<Utc>>>,
    tags: Option<Vec<String>>,
    linear_issue_id: Option<Option<String>>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(Choice::Value(priority));
        self
    }

    pub fn priority_str(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(Choice::Name(priority.into()));
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(Choice::Value(status));
        self
    }

    pub fn status_str(mut self, status: impl Into<String>) -> Self {
        self.status = Some(Choice::Name(status.into()));
        self
    }

    /// `None` clears the due date.
    pub fn due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn linear_issue_id(mut self, id: Option<String>) -> Self {
        self.linear_issue_id = Some(id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub by_status: BTreeMap<Status, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub overdue: usize,
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskmanError::validation("title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TaskmanError::validation(format!(
            "title cannot exceed {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

/// In-memory owner of the task collection.
///
/// Tasks are kept in creation order. When built with a [`JsonStorage`] and
/// auto-save on, every successful mutation is written through before returning.
#[derive(Debug, Default)]
pub struct TaskManager {
    tasks: Vec<Task>,
    storage: Option<JsonStorage>,
    auto_save: bool,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `storage` and save back after every mutation.
    pub fn open(storage: JsonStorage) -> Result<Self> {
        Self::with_storage(storage, true)
    }

    pub fn with_storage(storage: JsonStorage, auto_save: bool) -> Result<Self> {
        let tasks = storage.load()?;
        let mut manager = Self {
            tasks: Vec::new(),
            storage: Some(storage),
            auto_save,
        };
        manager.replace_all(tasks);
        Ok(manager)
    }

    pub fn storage(&self) -> Option<&JsonStorage> {
        self.storage.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Write the collection through the injected storage, if any.
    pub fn save(&self) -> Result<()> {
        match &self.storage {
            Some(storage) => storage.save(&self.tasks),
            None => Ok(()),
        }
    }

    fn autosave(&self) -> Result<()> {
        if self.auto_save {
            self.save()?;
        }
        Ok(())
    }

    pub fn create(&mut self, new: NewTask) -> Result<Task> {
        let title = validate_title(&new.title)?;
        let priority = new.priority.resolve()?;
        let status = new.status.resolve()?;

        let mut task = Task::new(title);
        task.description = new.description;
        task.priority = priority;
        task.status = status;
        task.due_date = new.due_date;
        task.tags = new.tags;
        task.linear_issue_id = new.linear_issue_id;
        task.normalize();

        self.tasks.push(task.clone());
        if let Err(err) = self.autosave() {
            self.tasks.pop();
            return Err(err);
        }
        tracing::debug!(id = %task.id, title = %task.title, "created task");
        Ok(task)
    }

    /// Exact id, else the lowest id starting with `task_id`, ignoring ASCII case.
    fn position(&self, task_id: &str) -> Result<usize> {
        let wanted = task_id.trim();
        if !wanted.is_empty() {
            if let Some(idx) = self.tasks.iter().position(|t| t.id == wanted) {
                return Ok(idx);
            }
            let prefix = wanted.to_ascii_lowercase();
            if let Some((idx, _)) = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.id.to_ascii_lowercase().starts_with(&prefix))
                .min_by(|(_, a), (_, b)| a.id.cmp(&b.id))
            {
                return Ok(idx);
            }
        }
        Err(TaskmanError::NotFound(task_id.to_string()))
    }

    pub fn get(&self, task_id: &str) -> Result<&Task> {
        let idx = self.position(task_id)?;
        Ok(&self.tasks[idx])
    }

    pub fn update(&mut self, task_id: &str, changes: TaskUpdate) -> Result<Task> {
        let idx = self.position(task_id)?;

        // Validate everything before touching the stored task.
        let title = changes.title.as_deref().map(validate_title).transpose()?;
        let priority = changes.priority.map(Choice::resolve).transpose()?;
        let status = changes.status.map(Choice::resolve).transpose()?;

        let original = self.tasks[idx].clone();
        let task = &mut self.tasks[idx];
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = description;
        }
        if let Some(priority) = priority {
            task.priority = priority;
        }
        if let Some(status) = status {
            task.status = status;
        }
        if let Some(due_date) = changes.due_date {
            task.due_date = due_date;
        }
        if let Some(tags) = changes.tags {
            task.tags = tags;
        }
        if let Some(linear_issue_id) = changes.linear_issue_id {
            task.linear_issue_id = linear_issue_id;
        }
        task.normalize();
        task.touch();

        let updated = task.clone();
        if let Err(err) = self.autosave() {
            self.tasks[idx] = original;
            return Err(err);
        }
        tracing::debug!(id = %updated.id, "updated task");
        Ok(updated)
    }

    pub fn mark_done(&mut self, task_id: &str) -> Result<Task> {
        self.update(task_id, TaskUpdate::new().status(Status::Done))
    }

    pub fn mark_todo(&mut self, task_id: &str) -> Result<Task> {
        self.update(task_id, TaskUpdate::new().status(Status::Todo))
    }

    pub fn delete(&mut self, task_id: &str) -> Result<Task> {
        let idx = self.position(task_id)?;
        let removed = self.tasks.remove(idx);
        if let Err(err) = self.autosave() {
            self.tasks.insert(idx, removed);
            return Err(err);
        }
        tracing::debug!(id = %removed.id, "deleted task");
        Ok(removed)
    }

    /// Remove every done task, returning them in creation order.
    pub fn clear_completed(&mut self) -> Result<Vec<Task>> {
        let previous = std::mem::take(&mut self.tasks);
        let (done, keep): (Vec<Task>, Vec<Task>) = previous
            .iter()
            .cloned()
            .partition(|t| t.status == Status::Done);
        self.tasks = keep;
        if !done.is_empty() {
            if let Err(err) = self.autosave() {
                self.tasks = previous;
                return Err(err);
            }
            tracing::debug!(count = done.len(), "cleared completed tasks");
        }
        Ok(done)
    }

    /// Filter only, creation order.
    pub fn filter(&self, filter: &TaskFilter) -> Vec<Task> {
        filter.apply(&self.tasks)
    }

    pub fn list(&self, query: &ListQuery) -> Vec<Task> {
        self.list_at(query, Utc::now())
    }

    pub fn list_at(&self, query: &ListQuery, now: DateTime<Utc>) -> Vec<Task> {
        let mut tasks = query.filter.apply_at(&self.tasks, now);
        sort::sort_tasks(&mut tasks, query.sort_by, query.order);
        tasks
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<Task> {
        let mut tasks = search::search(&self.tasks, &query.query, query.mode);
        sort::sort_tasks(&mut tasks, query.sort_by, query.order);
        tasks
    }

    pub fn overdue(&self) -> Vec<Task> {
        self.list(&ListQuery::new(TaskFilter::new().overdue()).sorted(SortField::DueDate, SortOrder::Asc))
    }

    pub fn due_between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<Task> {
        let filter = TaskFilter::new().date_range(DateField::DueDate, start, end);
        self.list(&ListQuery::new(filter).sorted(SortField::DueDate, SortOrder::Asc))
    }

    /// Unfinished tasks due on or before `today`, soonest first.
    pub fn agenda(&self, today: NaiveDate) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| {
                t.status != Status::Done && t.due_date.is_some_and(|d| d.date_naive() <= today)
            })
            .cloned()
            .collect();
        sort::sort_tasks(&mut tasks, SortField::DueDate, SortOrder::Asc);
        tasks
    }

    pub fn stats(&self) -> TaskStats {
        self.stats_on(Utc::now().date_naive())
    }

    pub fn stats_on(&self, today: NaiveDate) -> TaskStats {
        let mut by_status: BTreeMap<Status, usize> = Status::ALL.iter().map(|s| (*s, 0)).collect();
        let mut by_priority: BTreeMap<Priority, usize> =
            Priority::ALL.iter().map(|p| (*p, 0)).collect();
        let mut overdue = 0;
        for task in &self.tasks {
            *by_status.entry(task.status).or_default() += 1;
            *by_priority.entry(task.priority).or_default() += 1;
            if task.is_overdue_on(today) {
                overdue += 1;
            }
        }
        TaskStats {
            total: self.tasks.len(),
            by_status,
            by_priority,
            overdue,
        }
    }

    /// Swap in a new collection. Only the first task with a given id is kept.
    pub(crate) fn replace_all(&mut self, tasks: Vec<Task>) -> usize {
        self.tasks.clear();
        for task in tasks {
            if self.tasks.iter().any(|t| t.id == task.id) {
                tracing::debug!(id = %task.id, "skipping duplicate task id");
                continue;
            }
            self.tasks.push(task);
        }
        self.tasks.len()
    }

    pub(crate) fn insert_if_absent(&mut self, task: Task) -> bool {
        if self.tasks.iter().any(|t| t.id == task.id) {
            return false;
        }
        self.tasks.push(task);
        true
    }
}
