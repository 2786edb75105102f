use regex::RegexBuilder;

use crate::model::Task;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchMode {
    pub regex: bool,
    pub case_sensitive: bool,
}

impl SearchMode {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn regex() -> Self {
        Self {
            regex: true,
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }
}

fn searchable_texts(task: &Task) -> impl Iterator<Item = &str> {
    [
        task.title.as_str(),
        task.description.as_str(),
        task.id.as_str(),
        task.short_id(),
    ]
    .into_iter()
    .chain(task.tags.iter().map(String::as_str))
    .filter(|text| !text.is_empty())
}

/// Tasks where any of title, description, id, short id or a tag matches `query`.
///
/// An empty query matches everything. An invalid pattern in regex mode matches nothing.
pub fn search(tasks: &[Task], query: &str, mode: SearchMode) -> Vec<Task> {
    if query.is_empty() {
        return tasks.to_vec();
    }

    if mode.regex {
        let pattern = match RegexBuilder::new(query)
            .case_insensitive(!mode.case_sensitive)
            .build()
        {
            Ok(pattern) => pattern,
            Err(err) => {
                tracing::debug!(query, error = %err, "invalid search pattern");
                return Vec::new();
            }
        };
        return tasks
            .iter()
            .filter(|t| searchable_texts(t).any(|text| pattern.is_match(text)))
            .cloned()
            .collect();
    }

    let needle = if mode.case_sensitive {
        query.to_string()
    } else {
        query.to_lowercase()
    };
    tasks
        .iter()
        .filter(|t| {
            searchable_texts(t).any(|text| {
                if mode.case_sensitive {
                    text.contains(&needle)
                } else {
                    text.to_lowercase().contains(&needle)
                }
            })
        })
        .cloned()
        .collect()
}
