pub mod commands;
pub mod config;
pub mod dates;
pub mod error;
pub mod manager;
pub mod model;
pub mod output;
pub mod query;
pub mod store;
