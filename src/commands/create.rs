use crate::dates;
use crate::error::Result;
use crate::manager::{NewTask, TaskManager};
use crate::model::{Priority, Status, is_valid_tag};
use crate::output::{self, Format};

/// Keep well-formed tags, warning about the rest.
pub(crate) fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| {
            let ok = is_valid_tag(t);
            if !ok {
                eprintln!("warning: invalid tag '{t}' ignored (use letters, numbers, '-' and '_')");
            }
            ok
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    manager: &mut TaskManager,
    title: String,
    description: Option<String>,
    priority: Priority,
    status: Status,
    due: Option<String>,
    tags: Vec<String>,
    format: Format,
) -> Result<()> {
    let due_date = due.as_deref().map(dates::parse_due_date).transpose()?;
    let task = manager.create(
        NewTask::new(title)
            .description(description.unwrap_or_default())
            .priority(priority)
            .status(status)
            .due_date(due_date)
            .tags(clean_tags(tags)),
    )?;
    output::print_task(&task, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_tags_drops_invalid_and_blank() {
        let tags = vec![" ok ".into(), "".into(), "bad tag".into(), "also_ok-2".into()];
        assert_eq!(clean_tags(tags), vec!["ok", "also_ok-2"]);
    }
}
