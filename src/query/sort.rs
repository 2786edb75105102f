use std::cmp::Ordering;
use std::str::FromStr;

use crate::model::Task;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    DueDate,
    Priority,
    Status,
    Title,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created_at" | "created" => Ok(Self::CreatedAt),
            "updated_at" | "updated" => Ok(Self::UpdatedAt),
            "due_date" | "due" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "title" => Ok(Self::Title),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// Compare two tasks on `field`, with creation time as the secondary key
/// for every field except the timestamps themselves.
pub fn compare(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        // Missing due dates behave as +infinity.
        SortField::DueDate => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| a.created_at.cmp(&b.created_at)),
        SortField::Priority => a
            .priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| a.created_at.cmp(&b.created_at)),
        SortField::Status => a
            .status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| a.created_at.cmp(&b.created_at)),
        SortField::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.created_at.cmp(&b.created_at)),
    }
}

/// Stable in-place sort. `Desc` inverts the comparison, so equal keys keep input order.
pub fn sort_tasks(tasks: &mut [Task], field: SortField, order: SortOrder) {
    match order {
        SortOrder::Asc => tasks.sort_by(|a, b| compare(a, b, field)),
        SortOrder::Desc => tasks.sort_by(|a, b| compare(b, a, field)),
    }
}

/// Sort by raw names. An unknown field leaves the order untouched; an unknown
/// order falls back to ascending.
pub fn sort_by_name(tasks: &mut [Task], field: &str, order: &str) {
    let Ok(field) = field.parse::<SortField>() else {
        tracing::debug!(field, "ignoring unknown sort field");
        return;
    };
    let order = order.parse().unwrap_or_default();
    sort_tasks(tasks, field, order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 3, 1, 9, 0, 0).unwrap()
    }

    /// Tasks created one minute apart, in the order given.
    fn tasks(specs: &[(&str, Priority)]) -> Vec<Task> {
        specs
            .iter()
            .enumerate()
            .map(|(i, (title, priority))| {
                let mut t = Task::new(*title);
                t.priority = *priority;
                t.created_at = base() + Duration::minutes(i as i64);
                t.updated_at = t.created_at;
                t
            })
            .collect()
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn priority_ascending_and_descending() {
        let mut list = tasks(&[
            ("urgent", Priority::Urgent),
            ("low", Priority::Low),
            ("medium", Priority::Medium),
        ]);
        sort_tasks(&mut list, SortField::Priority, SortOrder::Asc);
        assert_eq!(titles(&list), vec!["low", "medium", "urgent"]);
        sort_tasks(&mut list, SortField::Priority, SortOrder::Desc);
        assert_eq!(titles(&list), vec!["urgent", "medium", "low"]);
    }

    #[test]
    fn due_date_puts_missing_last_and_ties_by_creation() {
        let mut list = tasks(&[
            ("none-a", Priority::Medium),
            ("later", Priority::Medium),
            ("same-1", Priority::Medium),
            ("none-b", Priority::Medium),
            ("same-2", Priority::Medium),
        ]);
        let due = base() + Duration::days(3);
        list[1].due_date = Some(due + Duration::days(1));
        list[2].due_date = Some(due);
        list[4].due_date = Some(due);

        sort_tasks(&mut list, SortField::DueDate, SortOrder::Asc);
        assert_eq!(
            titles(&list),
            vec!["same-1", "same-2", "later", "none-a", "none-b"]
        );
    }

    #[test]
    fn status_rank_orders_todo_first() {
        let mut list = tasks(&[
            ("done", Priority::Low),
            ("todo", Priority::Low),
            ("doing", Priority::Low),
        ]);
        list[0].status = Status::Done;
        list[2].status = Status::InProgress;
        sort_tasks(&mut list, SortField::Status, SortOrder::Asc);
        assert_eq!(titles(&list), vec!["todo", "doing", "done"]);
    }

    #[test]
    fn title_is_case_insensitive() {
        let mut list = tasks(&[
            ("banana", Priority::Low),
            ("Apple", Priority::Low),
            ("cherry", Priority::Low),
        ]);
        sort_tasks(&mut list, SortField::Title, SortOrder::Asc);
        assert_eq!(titles(&list), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn sorting_sorted_input_is_a_no_op() {
        let mut list = tasks(&[
            ("a", Priority::High),
            ("b", Priority::Low),
            ("c", Priority::High),
            ("d", Priority::Urgent),
        ]);
        for field in [SortField::Priority, SortField::Title, SortField::DueDate] {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                sort_tasks(&mut list, field, order);
                let once = list.clone();
                sort_tasks(&mut list, field, order);
                assert_eq!(list, once);
            }
        }
    }

    #[test]
    fn unknown_field_keeps_input_order() {
        let mut list = tasks(&[
            ("z", Priority::Low),
            ("a", Priority::High),
        ]);
        sort_by_name(&mut list, "colour", "asc");
        assert_eq!(titles(&list), vec!["z", "a"]);
    }

    #[test]
    fn unknown_order_means_ascending() {
        let mut list = tasks(&[
            ("z", Priority::Low),
            ("a", Priority::High),
        ]);
        sort_by_name(&mut list, "TITLE", "sideways");
        assert_eq!(titles(&list), vec!["a", "z"]);
        sort_by_name(&mut list, "created_at", "DESC");
        assert_eq!(titles(&list), vec!["a", "z"]);
    }
}
