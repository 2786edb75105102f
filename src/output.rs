use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

use crate::error::{Result, TaskmanError};
use crate::manager::TaskStats;
use crate::model::{Priority, Status, Task};
use crate::store::StorageInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
    Minimal,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| TaskmanError::Storage(format!("failed to encode output: {e}")))
}

fn status_label(status: Status) -> String {
    match status {
        Status::Todo => "todo".yellow().to_string(),
        Status::InProgress => "in_progress".blue().to_string(),
        Status::Done => "done".green().to_string(),
    }
}

fn priority_label(priority: Priority) -> String {
    match priority {
        Priority::Low => "low".green().to_string(),
        Priority::Medium => "medium".yellow().to_string(),
        Priority::High => "high".magenta().to_string(),
        Priority::Urgent => "urgent".red().bold().to_string(),
    }
}

pub fn format_date(task: &Task) -> String {
    task.due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into())
}

pub fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() > max_len {
        let truncated: String = title.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        title.to_string()
    }
}

fn minimal_row(task: &Task) -> String {
    format!(
        "{:6} {:30} {:11} {:7} {:10} {}",
        task.short_id(),
        truncate_title(&task.title, 30),
        task.status,
        task.priority,
        format_date(task),
        if task.tags.is_empty() { "-".to_string() } else { task.tags.join(",") }
    )
}

pub fn print_task(task: &Task, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", to_json(task)?),
        Format::Pretty => {
            println!("[{}] {}", task.short_id().cyan(), task.title.bold());
            if !task.description.is_empty() {
                println!("  {}", task.description);
            }
            println!(
                "  status: {} | priority: {}",
                status_label(task.status),
                priority_label(task.priority)
            );
            if let Some(due) = task.due_date {
                println!("  due: {}", due.format("%Y-%m-%d %H:%M"));
            }
            if !task.tags.is_empty() {
                println!("  tags: {}", task.tags.join(", "));
            }
            if let Some(ref issue) = task.linear_issue_id {
                println!("  linear: {}", issue);
            }
            println!("  id: {}", task.id.dimmed());
        }
        Format::Minimal => println!("{}", minimal_row(task)),
    }
    Ok(())
}

pub fn print_tasks(tasks: &[Task], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", to_json(tasks)?),
        Format::Pretty => {
            if tasks.is_empty() {
                println!("{}", "No tasks found".yellow());
            }
            for task in tasks {
                print_task(task, Format::Pretty)?;
                println!();
            }
        }
        Format::Minimal => {
            println!(
                "{:6} {:30} {:11} {:7} {:10} TAGS",
                "ID", "TITLE", "STATUS", "PRIORITY", "DUE"
            );
            println!("{}", "-".repeat(78));
            for task in tasks {
                println!("{}", minimal_row(task));
            }
        }
    }
    Ok(())
}

pub fn print_stats(stats: &TaskStats, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", to_json(stats)?),
        Format::Pretty | Format::Minimal => {
            println!("{}", "Task Statistics".bold());
            println!("Total: {}", stats.total);
            println!("Overdue: {}", stats.overdue);
            println!("By Status:");
            for (status, count) in &stats.by_status {
                println!("  {:12} {}", status_label(*status), count);
            }
            println!("By Priority:");
            for (priority, count) in &stats.by_priority {
                println!("  {:12} {}", priority_label(*priority), count);
            }
        }
    }
    Ok(())
}

pub fn print_info(info: &StorageInfo, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", to_json(info)?),
        Format::Pretty | Format::Minimal => {
            println!("data directory: {}", info.data_directory.display());
            println!("tasks file:     {}", info.tasks_file.display());
            println!("file exists:    {}", info.file_exists);
            println!("backup exists:  {}", info.backup_exists);
            if let Some(size) = info.file_size {
                println!("file size:      {size} bytes");
            }
            if let Some(modified) = info.last_modified {
                println!("last modified:  {}", modified.format("%Y-%m-%d %H:%M:%S"));
            }
        }
    }
    Ok(())
}

/// One-line confirmation for commands whose result is a count or a message.
pub fn print_message(message: &str, value: serde_json::Value, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", to_json(&value)?),
        Format::Pretty => println!("{}", message.green()),
        Format::Minimal => println!("{message}"),
    }
    Ok(())
}
