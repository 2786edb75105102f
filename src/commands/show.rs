use crate::error::Result;
use crate::manager::TaskManager;
use crate::output::{self, Format};

pub fn run(manager: &TaskManager, id: &str, format: Format) -> Result<()> {
    let task = manager.get(id)?;
    output::print_task(task, format)
}
