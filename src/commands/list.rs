use chrono::Utc;

use crate::dates;
use crate::error::Result;
use crate::manager::TaskManager;
use crate::output::{self, Format};
use crate::query::{DateField, ListQuery, SortField, SortOrder, TagMatch, TaskFilter, TextField};

/// Raw `list` flags as typed on the command line.
#[derive(Debug, Default, Clone)]
pub struct ListArgs {
    pub statuses: Vec<String>,
    pub priorities: Vec<String>,
    pub tags: Vec<String>,
    pub all_tags: bool,
    pub untagged: bool,
    pub presets: Vec<String>,
    pub overdue: bool,
    pub due_after: Option<String>,
    pub due_before: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListArgs {
    /// Build the query. Unknown status, priority, preset and sort names are
    /// skipped; only malformed dates are rejected.
    pub fn into_query(self) -> Result<ListQuery> {
        let mode = if self.all_tags { TagMatch::All } else { TagMatch::Any };
        let mut filter = TaskFilter::new()
            .status_names(&self.statuses)
            .priority_names(&self.priorities)
            .tags(self.tags, mode);
        if self.untagged {
            filter = filter.untagged();
        }
        if self.overdue {
            filter = filter.overdue();
        }
        for preset in &self.presets {
            filter = filter.preset_name(preset);
        }
        let after = self.due_after.as_deref().map(dates::parse_day).transpose()?;
        let before = self.due_before.as_deref().map(dates::parse_day).transpose()?;
        filter = filter.date_range(DateField::DueDate, after, before);
        if let Some(q) = &self.search {
            filter = filter.text(q, &[TextField::Title, TextField::Description, TextField::Tags]);
        }

        let defaults = ListQuery::default();
        let sort_by = self.sort.as_deref().and_then(|s| s.parse::<SortField>().ok());
        let order = match (sort_by, self.order.as_deref()) {
            (_, Some(raw)) => raw.parse().unwrap_or_default(),
            (Some(_), None) => SortOrder::Asc,
            (None, None) => defaults.order,
        };
        let sort_by = sort_by.unwrap_or(defaults.sort_by);
        Ok(ListQuery::new(filter).sorted(sort_by, order))
    }
}

pub fn run(manager: &TaskManager, args: ListArgs, format: Format) -> Result<()> {
    let tasks = manager.list(&args.into_query()?);
    output::print_tasks(&tasks, format)
}

/// Unfinished tasks due today or earlier.
pub fn today(manager: &TaskManager, format: Format) -> Result<()> {
    let tasks = manager.agenda(Utc::now().date_naive());
    output::print_tasks(&tasks, format)
}

pub fn overdue(manager: &TaskManager, format: Format) -> Result<()> {
    output::print_tasks(&manager.overdue(), format)
}
