//! On-disk document shapes for the tasks file and exports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Task, timestamp};

/// Format tag written into every document. Read back but not used for migration.
pub const FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize)]
pub struct TaskDocument<'a> {
    pub version: &'a str,
    pub tasks: &'a [Task],
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    #[serde(with = "timestamp")]
    pub last_modified: DateTime<Utc>,
    pub task_count: usize,
}

impl<'a> TaskDocument<'a> {
    pub fn new(tasks: &'a [Task], now: DateTime<Utc>) -> Self {
        Self {
            version: FORMAT_VERSION,
            tasks,
            metadata: Metadata {
                last_modified: now,
                task_count: tasks.len(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub version: &'a str,
    #[serde(with = "timestamp")]
    pub exported_at: DateTime<Utc>,
    pub tasks: &'a [Task],
    pub metadata: ExportMetadata,
}

#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    pub task_count: usize,
    pub export_source: String,
}

impl<'a> ExportDocument<'a> {
    pub fn new(tasks: &'a [Task], source: String, now: DateTime<Utc>) -> Self {
        Self {
            version: FORMAT_VERSION,
            exported_at: now,
            tasks,
            metadata: ExportMetadata {
                task_count: tasks.len(),
                export_source: source,
            },
        }
    }
}

/// Reader side, shared by the tasks file and imports. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
pub struct IncomingDocument {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}
