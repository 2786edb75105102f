use crate::error::Result;
use crate::manager::TaskManager;
use crate::output::{self, Format};

pub fn done(manager: &mut TaskManager, id: &str, format: Format) -> Result<()> {
    let task = manager.mark_done(id)?;
    output::print_task(&task, format)
}

pub fn reopen(manager: &mut TaskManager, id: &str, format: Format) -> Result<()> {
    let task = manager.mark_todo(id)?;
    output::print_task(&task, format)
}

/// Drop every done task.
pub fn clear(manager: &mut TaskManager, format: Format) -> Result<()> {
    let cleared = manager.clear_completed()?;
    output::print_message(
        &format!("Cleared {} completed tasks", cleared.len()),
        serde_json::json!({
            "cleared": cleared.len(),
            "ids": cleared.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
        }),
        format,
    )
}
