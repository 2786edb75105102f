use crate::error::Result;
use crate::output::{self, Format};
use crate::store::JsonStorage;

pub fn run(storage: &JsonStorage, format: Format) -> Result<()> {
    output::print_info(&storage.info()?, format)
}
