//! Wire types for the work-log server API

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded work interval. `end` is `None` while the interval
/// is still being recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

/// Category a log belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Task a log belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: i64,
    pub name: String,
}

/// A work log as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub task: Option<Task>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub stopped: bool,
    #[serde(default)]
    pub records: Vec<LogRecord>,
}

impl LogEntry {
    /// A log is active when any of its records is still open
    pub fn is_active(&self) -> bool {
        self.records.iter().any(|r| r.end.is_none())
    }

    /// Total recorded time, counting open records up to `now`
    pub fn total_duration(&self, now: DateTime<Utc>) -> Duration {
        self.records
            .iter()
            .map(|r| r.end.unwrap_or(now) - r.start)
            .filter(|d| *d > Duration::zero())
            .fold(Duration::zero(), |acc, d| acc + d)
    }

    /// Label shown next to the log's ranges in the calendar
    pub fn range_label(&self) -> String {
        match self.description.as_deref() {
            Some(desc) if !desc.is_empty() => format!("{}: {}", self.name, desc),
            _ => format!("{}: ", self.name),
        }
    }

    /// The log's overall span: first record start to last record end,
    /// or to `now` while the last record is open
    pub fn span(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.start, last.end.unwrap_or(now)))
    }

    /// Each record as a fraction of the log's overall span, for the
    /// activity bar. Open records run to the end of the span.
    pub fn activity_ranges(&self, now: DateTime<Utc>) -> Vec<(f64, f64)> {
        let Some((span_start, span_end)) = self.span(now) else {
            return Vec::new();
        };
        let span = (span_end - span_start).num_milliseconds() as f64;
        if span <= 0.0 {
            return Vec::new();
        }
        self.records
            .iter()
            .map(|r| {
                let start = (r.start - span_start).num_milliseconds() as f64 / span;
                let end = match r.end {
                    Some(end) => (end - span_start).num_milliseconds() as f64 / span,
                    None => 1.0,
                };
                (start, end)
            })
            .collect()
    }
}

/// Filter set for paginated log listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogQuery {
    pub offset: usize,
    pub limit: usize,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub stopped: Option<bool>,
    pub category_id: Option<i64>,
    pub task_id: Option<i64>,
    pub search: Option<String>,
    pub flags: Vec<String>,
}

impl LogQuery {
    /// Page query with no filters
    pub fn page(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            ..Self::default()
        }
    }

    /// Serialize into URL query parameters
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(since) = &self.since {
            params.push(("since", since.to_rfc3339()));
        }
        if let Some(until) = &self.until {
            params.push(("until", until.to_rfc3339()));
        }
        if let Some(stopped) = self.stopped {
            params.push(("stopped", stopped.to_string()));
        }
        if let Some(category_id) = self.category_id {
            params.push(("category_id", category_id.to_string()));
        }
        if let Some(task_id) = self.task_id {
            params.push(("task_id", task_id.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        for flag in &self.flags {
            params.push(("flags", flag.clone()));
        }
        params
    }
}
