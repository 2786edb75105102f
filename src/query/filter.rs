use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::model::{Priority, Status, Task};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TagMatch {
    #[default]
    Any,
    All,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    #[default]
    DueDate,
    CreatedAt,
    UpdatedAt,
}

impl DateField {
    fn value(self, task: &Task) -> Option<DateTime<Utc>> {
        match self {
            Self::DueDate => task.due_date,
            Self::CreatedAt => Some(task.created_at),
            Self::UpdatedAt => Some(task.updated_at),
        }
    }
}

/// Fields the free-text criterion looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Description,
    Tags,
}

pub const DEFAULT_TEXT_FIELDS: [TextField; 2] = [TextField::Title, TextField::Description];

/// Named criterion bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "snake_case")]
pub enum Preset {
    Active,
    Overdue,
    HighPriority,
    Today,
    ThisWeek,
    Untagged,
    Recent,
}

pub const RECENT_DAYS: i64 = 7;

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "active" => Ok(Self::Active),
            "overdue" => Ok(Self::Overdue),
            "high_priority" => Ok(Self::HighPriority),
            "today" => Ok(Self::Today),
            "this_week" => Ok(Self::ThisWeek),
            "untagged" => Ok(Self::Untagged),
            "recent" => Ok(Self::Recent),
            other => Err(format!("unknown preset '{other}'")),
        }
    }
}

/// Calendar-day range bound on one of a task's date fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateBound {
    Fixed(Option<NaiveDate>, Option<NaiveDate>),
    Today,
    ThisWeek,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DateRange {
    field: DateField,
    bound: DateBound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TextQuery {
    needle: String,
    fields: Vec<TextField>,
}

/// Composable task criteria. Every criterion is optional and they combine with AND.
///
/// Builders taking raw names (`status_names`, `priority_names`, `preset_name`) skip
/// anything they do not recognise instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    statuses: Option<Vec<Status>>,
    priorities: Option<Vec<Priority>>,
    tags: Option<(Vec<String>, TagMatch)>,
    untagged: bool,
    date_range: Option<DateRange>,
    overdue: bool,
    recent_days: Option<i64>,
    text: Option<TextQuery>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn statuses(mut self, statuses: impl IntoIterator<Item = Status>) -> Self {
        let statuses: Vec<Status> = statuses.into_iter().collect();
        if !statuses.is_empty() {
            self.statuses = Some(statuses);
        }
        self
    }

    pub fn status_names<S: AsRef<str>>(self, names: &[S]) -> Self {
        let parsed: Vec<Status> = names.iter().filter_map(|n| n.as_ref().parse().ok()).collect();
        self.statuses(parsed)
    }

    pub fn priorities(mut self, priorities: impl IntoIterator<Item = Priority>) -> Self {
        let priorities: Vec<Priority> = priorities.into_iter().collect();
        if !priorities.is_empty() {
            self.priorities = Some(priorities);
        }
        self
    }

    pub fn priority_names<S: AsRef<str>>(self, names: &[S]) -> Self {
        let parsed: Vec<Priority> = names.iter().filter_map(|n| n.as_ref().parse().ok()).collect();
        self.priorities(parsed)
    }

    pub fn tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>, mode: TagMatch) -> Self {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        if !tags.is_empty() {
            self.tags = Some((tags, mode));
        }
        self
    }

    pub fn untagged(mut self) -> Self {
        self.untagged = true;
        self
    }

    pub fn date_range(
        mut self,
        field: DateField,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        if start.is_some() || end.is_some() {
            self.date_range = Some(DateRange {
                field,
                bound: DateBound::Fixed(start, end),
            });
        }
        self
    }

    pub fn overdue(mut self) -> Self {
        self.overdue = true;
        self
    }

    pub fn recent(mut self, days: i64) -> Self {
        self.recent_days = Some(days);
        self
    }

    /// Case-insensitive substring search over `fields` (title and description when empty).
    pub fn text(mut self, query: &str, fields: &[TextField]) -> Self {
        if !query.is_empty() {
            let fields = if fields.is_empty() {
                DEFAULT_TEXT_FIELDS.to_vec()
            } else {
                fields.to_vec()
            };
            self.text = Some(TextQuery {
                needle: query.to_lowercase(),
                fields,
            });
        }
        self
    }

    pub fn preset(mut self, preset: Preset) -> Self {
        match preset {
            Preset::Active => self.statuses([Status::Todo, Status::InProgress]),
            Preset::Overdue => self.overdue(),
            Preset::HighPriority => self.priorities([Priority::High, Priority::Urgent]),
            Preset::Today => {
                self.date_range = Some(DateRange {
                    field: DateField::DueDate,
                    bound: DateBound::Today,
                });
                self
            }
            Preset::ThisWeek => {
                self.date_range = Some(DateRange {
                    field: DateField::DueDate,
                    bound: DateBound::ThisWeek,
                });
                self
            }
            Preset::Untagged => self.untagged(),
            Preset::Recent => self.recent(RECENT_DAYS),
        }
    }

    pub fn preset_name(self, name: &str) -> Self {
        match name.parse::<Preset>() {
            Ok(preset) => self.preset(preset),
            Err(_) => {
                tracing::debug!(preset = name, "ignoring unknown filter preset");
                self
            }
        }
    }

    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        self.apply_at(tasks, Utc::now())
    }

    /// Filter against an explicit "now", preserving input order.
    pub fn apply_at(&self, tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
        tasks
            .iter()
            .filter(|t| self.matches_at(t, now))
            .cloned()
            .collect()
    }

    pub fn matches_at(&self, task: &Task, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();

        if let Some(statuses) = &self.statuses
            && !statuses.contains(&task.status)
        {
            return false;
        }
        if let Some(priorities) = &self.priorities
            && !priorities.contains(&task.priority)
        {
            return false;
        }
        if let Some((tags, mode)) = &self.tags {
            let hit = |tag: &String| task.tags.contains(tag);
            let ok = match mode {
                TagMatch::Any => tags.iter().any(hit),
                TagMatch::All => tags.iter().all(hit),
            };
            if !ok {
                return false;
            }
        }
        if self.untagged && !task.tags.is_empty() {
            return false;
        }
        if let Some(range) = &self.date_range
            && !range.contains(task, today)
        {
            return false;
        }
        if self.overdue && !task.is_overdue_on(today) {
            return false;
        }
        if let Some(days) = self.recent_days
            && (now - task.created_at).num_days() > days
        {
            return false;
        }
        if let Some(text) = &self.text
            && !text.matches(task)
        {
            return false;
        }
        true
    }
}

impl DateRange {
    fn contains(&self, task: &Task, today: NaiveDate) -> bool {
        let Some(value) = self.field.value(task) else {
            return false;
        };
        let day = value.date_naive();
        let (start, end) = match self.bound {
            DateBound::Fixed(start, end) => (start, end),
            DateBound::Today => (Some(today), Some(today)),
            DateBound::ThisWeek => (Some(today), Some(end_of_week(today))),
        };
        start.is_none_or(|s| day >= s) && end.is_none_or(|e| day <= e)
    }
}

impl TextQuery {
    fn matches(&self, task: &Task) -> bool {
        self.fields.iter().any(|field| match field {
            TextField::Title => task.title.to_lowercase().contains(&self.needle),
            TextField::Description => task.description.to_lowercase().contains(&self.needle),
            TextField::Tags => task
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&self.needle)),
        })
    }
}

/// Sunday of the ISO week containing `day`.
pub fn end_of_week(day: NaiveDate) -> NaiveDate {
    let remaining = 6 - i64::from(day.weekday().num_days_from_monday());
    day + Duration::days(remaining)
}
