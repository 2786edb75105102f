use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Result, TaskmanError};
use crate::manager::TaskManager;
use crate::model::{Task, timestamp};
use crate::store::document::{ExportDocument, FORMAT_VERSION, IncomingDocument, TaskDocument};

pub const TASKS_FILE: &str = "tasks.json";
pub const BACKUP_SUFFIX: &str = ".backup";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Drop the current collection first.
    Replace,
    /// Keep existing tasks; skip incoming ids that are already present.
    Merge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    pub data_directory: PathBuf,
    pub tasks_file: PathBuf,
    pub file_exists: bool,
    pub backup_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<DateTime<Utc>>,
}

/// JSON file backend: `tasks.json` plus a `tasks.json.backup` snapshot taken
/// before every save.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    data_dir: PathBuf,
    tasks_file: PathBuf,
    backup_file: PathBuf,
}

impl JsonStorage {
    /// Use `data_dir`, creating it if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .map_err(|e| TaskmanError::storage("failed to create data directory", &data_dir, e))?;
        let tasks_file = data_dir.join(TASKS_FILE);
        let backup_file = data_dir.join(format!("{TASKS_FILE}{BACKUP_SUFFIX}"));
        Ok(Self {
            data_dir,
            tasks_file,
            backup_file,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(&config.data_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tasks_file(&self) -> &Path {
        &self.tasks_file
    }

    pub fn backup_file(&self) -> &Path {
        &self.backup_file
    }

    pub fn temp_file(&self) -> PathBuf {
        self.tasks_file.with_extension("tmp")
    }

    pub fn save_tasks(&self, manager: &TaskManager) -> Result<()> {
        self.save(manager.tasks())
    }

    /// Back up the live file, write a temp file, then rename it into place.
    ///
    /// If writing or renaming fails the temp file is removed and the live file
    /// is restored from the backup taken by this call.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        self.save_with(tasks, write_synced)
    }

    /// `save` with the temp-file writer swapped out, for fault injection.
    pub(crate) fn save_with<F>(&self, tasks: &[Task], write: F) -> Result<()>
    where
        F: FnOnce(&Path, &[u8]) -> io::Result<()>,
    {
        let backed_up = self.create_backup()?;
        let temp = self.temp_file();

        let result = serde_json::to_vec_pretty(&TaskDocument::new(tasks, Utc::now()))
            .map_err(io::Error::from)
            .and_then(|bytes| write(&temp, &bytes))
            .and_then(|()| fs::rename(&temp, &self.tasks_file));

        match result {
            Ok(()) => {
                tracing::debug!(path = %self.tasks_file.display(), count = tasks.len(), "saved tasks");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(path = %self.tasks_file.display(), error = %err, "save failed, rolling back");
                match self.rollback(&temp, backed_up) {
                    Ok(()) => Err(TaskmanError::storage("failed to save", &self.tasks_file, err)),
                    Err(restore_err) => Err(TaskmanError::storage(
                        "failed to save",
                        &self.tasks_file,
                        format!("{err}; restoring backup also failed: {restore_err}"),
                    )),
                }
            }
        }
    }

    /// Copy the live file over the backup. Returns whether a backup was taken.
    fn create_backup(&self) -> Result<bool> {
        if !self.tasks_file.exists() {
            return Ok(false);
        }
        fs::copy(&self.tasks_file, &self.backup_file)
            .map_err(|e| TaskmanError::storage("failed to back up", &self.tasks_file, e))?;
        Ok(true)
    }

    fn rollback(&self, temp: &Path, backed_up: bool) -> io::Result<()> {
        if temp.exists()
            && let Err(err) = fs::remove_file(temp)
        {
            tracing::warn!(path = %temp.display(), error = %err, "could not remove temp file");
        }
        if backed_up {
            fs::copy(&self.backup_file, &self.tasks_file)?;
        }
        Ok(())
    }

    /// Read the tasks file. A missing file is an empty collection.
    pub fn load(&self) -> Result<Vec<Task>> {
        if !self.tasks_file.exists() {
            tracing::debug!(path = %self.tasks_file.display(), "no tasks file yet");
            return Ok(Vec::new());
        }
        let doc = read_document(&self.tasks_file, "invalid JSON in tasks file")?;
        match doc.version.as_deref() {
            Some(FORMAT_VERSION) => {}
            other => tracing::warn!(
                found = other.unwrap_or("<none>"),
                expected = FORMAT_VERSION,
                "tasks file has a different format version"
            ),
        }
        tracing::debug!(path = %self.tasks_file.display(), count = doc.tasks.len(), "loaded tasks");
        Ok(doc.tasks)
    }

    /// Replace the manager's collection with the file contents.
    pub fn load_into(&self, manager: &mut TaskManager) -> Result<usize> {
        let tasks = self.load()?;
        Ok(manager.replace_all(tasks))
    }

    pub fn export(&self, tasks: &[Task], target: &Path) -> Result<()> {
        let doc = ExportDocument::new(tasks, self.tasks_file.display().to_string(), Utc::now());
        let bytes = serde_json::to_vec_pretty(&doc)
            .map_err(|e| TaskmanError::storage("failed to export to", target, e))?;
        write_atomic(target, &bytes)
            .map_err(|e| TaskmanError::storage("failed to export to", target, e))?;
        tracing::debug!(path = %target.display(), count = tasks.len(), "exported tasks");
        Ok(())
    }

    /// Load tasks from an export (or tasks) file into `manager`, returning how many
    /// were inserted. Does not save; the caller decides when to persist.
    pub fn import_into(
        &self,
        manager: &mut TaskManager,
        source: &Path,
        mode: ImportMode,
    ) -> Result<usize> {
        let doc = read_document(source, "invalid JSON in import file")?;
        let inserted = match mode {
            ImportMode::Replace => manager.replace_all(doc.tasks),
            ImportMode::Merge => doc
                .tasks
                .into_iter()
                .map(|task| manager.insert_if_absent(task))
                .filter(|inserted| *inserted)
                .count(),
        };
        tracing::debug!(path = %source.display(), ?mode, inserted, "imported tasks");
        Ok(inserted)
    }

    pub fn info(&self) -> Result<StorageInfo> {
        let mut info = StorageInfo {
            data_directory: self.data_dir.clone(),
            tasks_file: self.tasks_file.clone(),
            file_exists: self.tasks_file.exists(),
            backup_exists: self.backup_file.exists(),
            file_size: None,
            last_modified: None,
        };
        if info.file_exists {
            let meta = fs::metadata(&self.tasks_file)
                .map_err(|e| TaskmanError::storage("failed to stat", &self.tasks_file, e))?;
            info.file_size = Some(meta.len());
            info.last_modified = meta.modified().ok().map(DateTime::<Utc>::from);
        }
        Ok(info)
    }
}

fn read_document(path: &Path, invalid: &str) -> Result<IncomingDocument> {
    let data = fs::read_to_string(path)
        .map_err(|e| TaskmanError::storage("failed to read", path, e))?;
    serde_json::from_str(&data).map_err(|e| TaskmanError::storage(invalid, path, e))
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

/// Write via a sibling temp file and rename, so readers never see a partial file.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let temp = path.with_extension("tmp");
    if let Err(err) = write_synced(&temp, data).and_then(|()| fs::rename(&temp, path)) {
        let _ = fs::remove_file(&temp);
        return Err(err);
    }
    Ok(())
}
