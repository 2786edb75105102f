use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const MAX_TITLE_LEN: usize = 200;
pub const SHORT_ID_LEN: usize = 6;

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Self::Todo => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Urgent => 3,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(format!(
                "invalid status '{other}' (expected one of: todo, in_progress, done)"
            )),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(format!(
                "invalid priority '{other}' (expected one of: low, medium, high, urgent)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(with = "timestamp", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp", default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(with = "timestamp::option", default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub linear_issue_id: Option<String>,
}

impl Task {
    /// Build a task with a fresh random id and both timestamps set to now.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            status: Status::default(),
            priority: Priority::default(),
            created_at: now,
            updated_at: now,
            due_date: None,
            tags: Vec::new(),
            linear_issue_id: None,
        }
    }

    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(SHORT_ID_LEN) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    /// Refresh `updated_at`, never moving it backwards or before `created_at`.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = now.max(self.updated_at).max(self.created_at);
    }

    /// Trim tags and drop the empty ones, keeping the given order.
    pub fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        for tag in &mut self.tags {
            let trimmed = tag.trim();
            if trimmed.len() != tag.len() {
                *tag = trimmed.to_string();
            }
        }
        self.tags.retain(|t| !t.is_empty());
    }

    pub fn is_overdue_on(&self, today: chrono::NaiveDate) -> bool {
        self.status != Status::Done
            && self.due_date.is_some_and(|due| due.date_naive() < today)
    }
}

/// Tags entered by hand are limited to ASCII letters, digits, `-` and `_`.
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Serde codec for task timestamps.
///
/// Writes RFC 3339 with full sub-second precision. Reads RFC 3339, naive
/// ISO-8601 date-times (taken as UTC) and bare dates (midnight UTC).
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_str(&super::format(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn task_round_trips_json() {
        let mut task = Task::new("Test task");
        task.description = "A description".into();
        task.status = Status::InProgress;
        task.priority = Priority::Urgent;
        task.due_date = Some(Utc.with_ymd_and_hms(2030, 5, 6, 7, 8, 9).unwrap());
        task.tags = vec!["backend".into(), "api".into()];
        task.linear_issue_id = Some("ENG-12".into());

        let json = serde_json::to_string_pretty(&task).unwrap();
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(task, parsed);
    }

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            r#""in_progress""#
        );
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), r#""urgent""#);
    }

    #[test]
    fn absent_optionals_serialize_as_null() {
        let task = Task::new("Minimal");
        let value = serde_json::to_value(&task).unwrap();
        assert!(value["due_date"].is_null());
        assert!(value["linear_issue_id"].is_null());
        assert_eq!(value["tags"], serde_json::json!([]));
        assert_eq!(value["description"], "");
    }

    #[test]
    fn reads_naive_timestamps_as_utc() {
        let json = r#"{
            "id": "abc",
            "title": "Legacy",
            "created_at": "2024-01-02T03:04:05.123456",
            "updated_at": "2024-01-02T03:04:05.123456",
            "due_date": "2024-02-01"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(
            task.due_date.unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert_eq!(task.created_at.timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn short_id_is_six_chars() {
        let task = Task::new("x");
        assert_eq!(task.short_id().len(), 6);
        assert!(task.id.starts_with(task.short_id()));
    }

    #[test]
    fn parses_enum_names_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert!("invalid".parse::<Priority>().is_err());
        assert!("blocked".parse::<Status>().is_err());
    }

    #[test]
    fn priority_orders_low_to_urgent() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Urgent);
        assert_eq!(Priority::Urgent.rank(), 3);
    }

    #[test]
    fn normalize_trims_and_drops_empty_tags() {
        let mut task = Task::new("  padded  ");
        task.tags = vec!["".into(), " ".into(), "  valid  ".into(), "keep".into()];
        task.normalize();
        assert_eq!(task.title, "padded");
        assert_eq!(task.tags, vec!["valid", "keep"]);
    }

    #[test]
    fn touch_never_moves_backwards() {
        let mut task = Task::new("x");
        let future = Utc::now() + chrono::Duration::hours(1);
        task.updated_at = future;
        task.touch();
        assert_eq!(task.updated_at, future);
        assert!(task.updated_at >= task.created_at);
    }

    #[test]
    fn overdue_ignores_done_and_time_of_day() {
        let today = NaiveDate::from_ymd_opt(2030, 1, 10).unwrap();
        let mut task = Task::new("x");
        task.due_date = Some(Utc.with_ymd_and_hms(2030, 1, 10, 0, 0, 1).unwrap());
        assert!(!task.is_overdue_on(today));
        task.due_date = Some(Utc.with_ymd_and_hms(2030, 1, 9, 23, 59, 59).unwrap());
        assert!(task.is_overdue_on(today));
        task.status = Status::Done;
        assert!(!task.is_overdue_on(today));
    }

    #[test]
    fn tag_validation() {
        assert!(is_valid_tag("bug-fix_2"));
        assert!(!is_valid_tag("has space"));
        assert!(!is_valid_tag(""));
    }
}
