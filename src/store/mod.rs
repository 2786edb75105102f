pub mod document;
pub mod json;

pub use json::{ImportMode, JsonStorage, StorageInfo};
