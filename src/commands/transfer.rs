use std::path::Path;

use crate::error::Result;
use crate::manager::TaskManager;
use crate::output::{self, Format};
use crate::store::{ImportMode, JsonStorage};

pub fn export(
    manager: &TaskManager,
    storage: &JsonStorage,
    target: &Path,
    format: Format,
) -> Result<()> {
    storage.export(manager.tasks(), target)?;
    output::print_message(
        &format!("Exported {} tasks to {}", manager.len(), target.display()),
        serde_json::json!({ "exported": manager.len(), "path": target.display().to_string() }),
        format,
    )
}

/// Import then persist; merge keeps existing tasks on id collisions.
pub fn import(
    manager: &mut TaskManager,
    storage: &JsonStorage,
    source: &Path,
    merge: bool,
    format: Format,
) -> Result<()> {
    let mode = if merge { ImportMode::Merge } else { ImportMode::Replace };
    let count = storage.import_into(manager, source, mode)?;
    manager.save()?;
    output::print_message(
        &format!("Imported {count} tasks from {}", source.display()),
        serde_json::json!({ "imported": count, "total": manager.len() }),
        format,
    )
}
