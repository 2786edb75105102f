use crate::error::Result;
use crate::manager::TaskManager;
use crate::output::{self, Format};

pub fn run(manager: &mut TaskManager, id: &str, format: Format) -> Result<()> {
    let task = manager.delete(id)?;
    output::print_task(&task, format)
}
