use crate::error::Result;
use crate::manager::TaskManager;
use crate::output::{self, Format};

pub fn run(manager: &TaskManager, format: Format) -> Result<()> {
    output::print_stats(&manager.stats(), format)
}
