use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a task. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl Task {
    /// Build a fresh, active task. `title` is trimmed and must not be blank.
    pub fn new(id: i64, title: &str, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            id,
            title: normalize_title(title)?,
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn status(&self) -> TaskStatus {
        if self.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Active
        }
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.touch(now);
    }

    /// Apply the present fields of `patch`, then refresh `updated_at`.
    ///
    /// The title is validated before anything is changed, so a rejected
    /// patch leaves the task untouched.
    pub fn apply(&mut self, patch: &TaskPatch, now: DateTime<Utc>) -> Result<()> {
        let title = patch.title.as_deref().map(normalize_title).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.touch(now);

        Ok(())
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = next_timestamp(self.updated_at, now);
    }
}

impl TaskPatch {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Trim a title, rejecting empty or whitespace-only input.
pub fn normalize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidTitle);
    }
    Ok(trimmed.to_string())
}

/// Next `updated_at` value: `now`, unless the clock has not moved past
/// `previous`, in which case one microsecond after it.
pub fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task::new(1, "Task A", Utc::now()).unwrap()
    }

    #[test]
    fn test_task_creation() {
        let task = Task::new(7, "  Buy milk \n", Utc::now()).unwrap();

        assert_eq!(task.id, 7);
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.status(), TaskStatus::Active);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(matches!(Task::new(1, "   ", Utc::now()), Err(Error::InvalidTitle)));
        assert!(matches!(normalize_title(""), Err(Error::InvalidTitle)));
    }

    #[test]
    fn test_toggle_flips_and_advances() {
        let mut task = sample();
        let created = task.updated_at;

        task.toggle(created);
        assert!(task.completed);
        assert_eq!(task.status(), TaskStatus::Completed);
        assert!(task.updated_at > created);

        let first = task.updated_at;
        task.toggle(first);
        assert!(!task.completed);
        assert!(task.updated_at > first);
    }

    #[test]
    fn test_apply_partial_patch() {
        let mut task = sample();

        task.apply(&TaskPatch::default().with_title(" Task A+ "), Utc::now())
            .unwrap();
        assert_eq!(task.title, "Task A+");
        assert!(!task.completed);

        task.apply(&TaskPatch::default().with_completed(true), Utc::now())
            .unwrap();
        assert_eq!(task.title, "Task A+");
        assert!(task.completed);
    }

    #[test]
    fn test_empty_patch_still_touches() {
        let mut task = sample();
        let before = task.updated_at;

        task.apply(&TaskPatch::default(), before).unwrap();

        assert_eq!(task.title, "Task A");
        assert!(task.updated_at > before);
    }

    #[test]
    fn test_rejected_patch_leaves_task_untouched() {
        let mut task = sample();
        let original = task.clone();

        let patch = TaskPatch::default().with_title("  ").with_completed(true);
        assert!(task.apply(&patch, Utc::now()).is_err());
        assert_eq!(task, original);
    }

    #[test]
    fn test_next_timestamp_never_goes_backwards() {
        let now = Utc::now();
        assert_eq!(next_timestamp(now, now + Duration::seconds(1)), now + Duration::seconds(1));
        assert_eq!(next_timestamp(now, now), now + Duration::microseconds(1));
        assert_eq!(
            next_timestamp(now, now - Duration::seconds(5)),
            now + Duration::microseconds(1)
        );
    }

    #[test]
    fn test_status_display_matches_wire_name() {
        let mut task = sample();
        assert_eq!(task.status().to_string(), "active");

        task.toggle(Utc::now());
        assert_eq!(task.status().to_string(), "completed");
        assert_eq!(
            serde_json::to_value(task.status()).unwrap(),
            serde_json::json!("completed")
        );
    }

    #[test]
    fn test_serialized_shape() {
        let task = sample();
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Task A");
        assert_eq!(json["completed"], false);
        assert!(json["created_at"].is_string());
        assert!(json["updated_at"].is_string());
    }
}
