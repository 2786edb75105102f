use crate::commands::create::clean_tags;
use crate::dates;
use crate::error::{Result, TaskmanError};
use crate::manager::{TaskManager, TaskUpdate};
use crate::model::{Priority, Status};
use crate::output::{self, Format};

#[allow(clippy::too_many_arguments)]
pub fn run(
    manager: &mut TaskManager,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    due: Option<String>,
    clear_due: bool,
    tags: Option<Vec<String>>,
    format: Format,
) -> Result<()> {
    let mut changes = TaskUpdate::new();
    if let Some(t) = title {
        changes = changes.title(t);
    }
    if let Some(d) = description {
        changes = changes.description(d);
    }
    if let Some(p) = priority {
        changes = changes.priority(p);
    }
    if let Some(s) = status {
        changes = changes.status(s);
    }
    if clear_due {
        changes = changes.due_date(None);
    } else if let Some(raw) = due {
        changes = changes.due_date(Some(dates::parse_due_date(&raw)?));
    }
    if let Some(t) = tags {
        changes = changes.tags(clean_tags(t));
    }

    if changes.is_empty() {
        return Err(TaskmanError::Validation("no updates provided".into()));
    }

    let task = manager.update(id, changes)?;
    output::print_task(&task, format)
}
