use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies a task inside a job: the service item id when it has one, otherwise its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Complete,
    Rejected,
    NeedsApproval,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Complete => "complete",
            TaskStatus::Rejected => "rejected",
            TaskStatus::NeedsApproval => "needs_approval",
        }
    }

    /// Accepts the spellings the mobile clients and the backend have used over time.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "" | "pending" => Some(TaskStatus::Pending),
            "complete" | "completed" | "done" => Some(TaskStatus::Complete),
            "rejected" => Some(TaskStatus::Rejected),
            "needs_approval" | "need_approval" => Some(TaskStatus::NeedsApproval),
            _ => None,
        }
    }

    /// Anything but the pending sentinel counts as resolved.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }
}

/// Per-job projection from task key to task status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskChecklist(BTreeMap<TaskKey, TaskStatus>);

impl TaskChecklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing entries read as `Pending`.
    pub fn status_of(&self, key: &TaskKey) -> TaskStatus {
        self.0.get(key).copied().unwrap_or_default()
    }

    pub fn set(&mut self, key: TaskKey, status: TaskStatus) {
        self.0.insert(key, status);
    }

    pub fn remove(&mut self, key: &TaskKey) -> Option<TaskStatus> {
        self.0.remove(key)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&TaskKey) -> bool) {
        self.0.retain(|key, _| keep(key));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskKey, &TaskStatus)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(TaskKey, TaskStatus)> for TaskChecklist {
    fn from_iter<I: IntoIterator<Item = (TaskKey, TaskStatus)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
