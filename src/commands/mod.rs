pub mod create;
pub mod delete;
pub mod edit;
pub mod info;
pub mod lifecycle;
pub mod list;
pub mod search;
pub mod show;
pub mod stats;
pub mod transfer;
