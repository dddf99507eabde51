use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single to-do entry.
///
/// The JSON field names match what older builds wrote, so `text` is stored as `userText`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    #[serde(rename = "userText", default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: u64, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
        }
    }

    /// Flip the completion flag
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Parse a stored entry, rejecting anything without a non-negative integer id
pub fn task_from_value(value: Value) -> Option<Task> {
    let has_numeric_id = value
        .as_object()
        .and_then(|obj| obj.get("id"))
        .map(|id| id.is_u64())
        .unwrap_or(false);

    if !has_numeric_id {
        return None;
    }

    serde_json::from_value(value).ok()
}

/// Hands out task ids.
///
/// Ids are millisecond timestamps, bumped past the largest id already in use so that
/// two tasks created within the same millisecond still get distinct ids.
pub fn next_task_id(now_ms: i64, existing: &[Task]) -> u64 {
    let now = u64::try_from(now_ms).unwrap_or(0);
    match existing.iter().map(|t| t.id).max() {
        Some(max_id) => now.max(max_id.saturating_add(1)),
        None => now,
    }
}
