use super::TaskError;
use crate::domain::{next_task_id, task_from_value, Task};
use crate::persistence::KeyValueStorage;
use anyhow::Context;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Storage key holding the JSON array of tasks
pub const TASKS_KEY: &str = "tasks";

/// Owns the task list in storage.
///
/// Every operation reads the whole collection, changes it, and writes the whole
/// collection back, so the stored copy is always the source of truth.
#[derive(Debug, Clone)]
pub struct TaskStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> TaskStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the stored list, dropping malformed entries and writing the cleaned list back
    pub fn load(&self) -> Result<Vec<Task>, TaskError> {
        let tasks = self.read()?;
        self.save(&tasks)?;
        Ok(tasks)
    }

    /// Read without rewriting. Unreadable data reads as an empty list.
    pub fn read(&self) -> Result<Vec<Task>, TaskError> {
        let raw = self.storage.get_item(TASKS_KEY)?;

        let entries = match raw.as_deref().map(serde_json::from_str::<Value>) {
            None => return Ok(Vec::new()),
            Some(Ok(Value::Array(entries))) => entries,
            Some(Ok(other)) => {
                warn!(kind = json_kind(&other), "stored tasks are not a list, treating as empty");
                return Ok(Vec::new());
            }
            Some(Err(e)) => {
                warn!(error = %e, "stored tasks are not valid JSON, treating as empty");
                return Ok(Vec::new());
            }
        };

        let total = entries.len();
        let tasks: Vec<Task> = entries.into_iter().filter_map(task_from_value).collect();
        if tasks.len() < total {
            warn!(dropped = total - tasks.len(), kept = tasks.len(), "dropped malformed task entries");
        }
        Ok(tasks)
    }

    /// Replace the stored list
    pub fn save(&self, tasks: &[Task]) -> Result<(), TaskError> {
        let json = serde_json::to_string(tasks).context("Failed to serialize tasks")?;
        self.storage.set_item(TASKS_KEY, &json)?;
        Ok(())
    }

    pub fn get(&self, id: u64) -> Result<Option<Task>, TaskError> {
        Ok(self.read()?.into_iter().find(|t| t.id == id))
    }

    /// Append a new pending task
    pub fn add(&self, text: &str) -> Result<Task, TaskError> {
        self.add_at(text, chrono::Utc::now().timestamp_millis())
    }

    /// Append a new pending task as if the clock read `now_ms`
    pub fn add_at(&self, text: &str, now_ms: i64) -> Result<Task, TaskError> {
        if text.trim().is_empty() {
            return Err(TaskError::EmptyText);
        }

        let mut tasks = self.read()?;
        let task = Task::new(next_task_id(now_ms, &tasks), text.to_string());
        tasks.push(task.clone());
        self.save(&tasks)?;

        info!(id = task.id, "added task");
        Ok(task)
    }

    /// Flip a task's completion flag. Returns the updated task, `None` if no task has `id`.
    pub fn toggle(&self, id: u64) -> Result<Option<Task>, TaskError> {
        let mut tasks = self.read()?;
        let updated = tasks.iter_mut().find(|t| t.id == id).map(|t| {
            t.toggle();
            t.clone()
        });
        self.save(&tasks)?;

        debug!(id, completed = ?updated.as_ref().map(|t| t.completed), "toggled task");
        Ok(updated)
    }

    /// Replace a task's text with the trimmed `text`
    pub fn update(&self, id: u64, text: &str) -> Result<Option<Task>, TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }

        let mut tasks = self.read()?;
        let updated = tasks.iter_mut().find(|t| t.id == id).map(|t| {
            t.text = text.to_string();
            t.clone()
        });
        self.save(&tasks)?;

        debug!(id, found = updated.is_some(), "updated task text");
        Ok(updated)
    }

    /// Remove a task. Returns whether anything was removed.
    pub fn delete(&self, id: u64) -> Result<bool, TaskError> {
        let mut tasks = self.read()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        self.save(&tasks)?;

        let removed = tasks.len() < before;
        info!(id, removed, "deleted task");
        Ok(removed)
    }

    /// Drop the whole stored list
    pub fn clear_all(&self) -> Result<(), TaskError> {
        self.storage.remove_item(TASKS_KEY)?;
        info!("cleared all tasks");
        Ok(())
    }

    /// Remove every completed task. Returns how many were removed.
    pub fn clear_completed(&self) -> Result<usize, TaskError> {
        let mut tasks = self.read()?;
        let before = tasks.len();
        tasks.retain(|t| !t.completed);
        self.save(&tasks)?;

        let removed = before - tasks.len();
        info!(removed, "cleared completed tasks");
        Ok(removed)
    }

    pub fn has_completed(&self) -> Result<bool, TaskError> {
        Ok(self.read()?.iter().any(|t| t.completed))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FileStorage, MemoryStorage};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn store() -> (TaskStore<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        (TaskStore::new(storage.clone()), storage)
    }

    fn stored_json(storage: &MemoryStorage) -> Option<Value> {
        storage
            .get_item(TASKS_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn test_load_empty_storage() {
        let (store, storage) = store();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(stored_json(&storage), Some(json!([])));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (store, _) = store();
        let tasks = vec![
            Task { id: 3, text: "c".into(), completed: true },
            Task { id: 1, text: "a".into(), completed: false },
            Task { id: 2, text: "  spaced  ".into(), completed: false },
        ];
        store.save(&tasks).unwrap();
        assert_eq!(store.load().unwrap(), tasks);
    }

    #[test]
    fn test_load_drops_malformed_entries_and_heals_storage() {
        let (store, storage) = store();
        storage
            .set_item(TASKS_KEY, r#"[{"id": 1, "userText": "x", "completed": false}, {"foo": "bad"}]"#)
            .unwrap();

        let tasks = store.load().unwrap();
        assert_eq!(tasks, vec![Task { id: 1, text: "x".into(), completed: false }]);
        assert_eq!(
            stored_json(&storage),
            Some(json!([{"id": 1, "userText": "x", "completed": false}]))
        );
    }

    #[test]
    fn test_load_unparsable_storage_is_empty() {
        let (store, storage) = store();
        storage.set_item(TASKS_KEY, "{not json").unwrap();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(stored_json(&storage), Some(json!([])));

        storage.set_item(TASKS_KEY, r#"{"id": 1}"#).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_read_does_not_rewrite() {
        let (store, storage) = store();
        storage.set_item(TASKS_KEY, r#"[{"foo": "bad"}]"#).unwrap();
        assert!(store.read().unwrap().is_empty());
        assert_eq!(stored_json(&storage), Some(json!([{"foo": "bad"}])));
    }

    #[test]
    fn test_add_appends_pending_task() {
        let (store, _) = store();
        let first = store.add_at("buy milk", 1_000).unwrap();
        let second = store.add_at("walk dog", 2_000).unwrap();

        assert_eq!(first, Task { id: 1_000, text: "buy milk".into(), completed: false });
        assert_eq!(store.read().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_add_same_millisecond_gets_distinct_ids() {
        let (store, _) = store();
        let a = store.add_at("a", 5).unwrap();
        let b = store.add_at("b", 5).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_add_keeps_text_as_typed() {
        let (store, _) = store();
        let task = store.add_at("  padded ", 1).unwrap();
        assert_eq!(task.text, "  padded ");
    }

    #[test]
    fn test_validation_gate() {
        let (store, storage) = store();
        let task = store.add_at("keep me", 1).unwrap();
        let before = stored_json(&storage);

        assert!(matches!(store.add(""), Err(TaskError::EmptyText)));
        assert!(matches!(store.add("   "), Err(TaskError::EmptyText)));
        assert!(matches!(store.update(task.id, ""), Err(TaskError::EmptyText)));
        assert!(matches!(store.update(task.id, " \t "), Err(TaskError::EmptyText)));

        assert_eq!(stored_json(&storage), before);
        assert_eq!(TaskError::EmptyText.to_string(), "Please enter a valid task");
    }

    #[test]
    fn test_toggle_twice_restores_flag_and_spares_others() {
        let (store, _) = store();
        let a = store.add_at("a", 1).unwrap();
        let b = store.add_at("b", 2).unwrap();
        let before = store.read().unwrap();

        assert!(store.toggle(a.id).unwrap().unwrap().completed);
        assert_eq!(store.get(b.id).unwrap(), Some(b.clone()));
        assert!(!store.toggle(a.id).unwrap().unwrap().completed);

        assert_eq!(store.read().unwrap(), before);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let (store, _) = store();
        store.add_at("a", 1).unwrap();
        assert_eq!(store.toggle(999).unwrap(), None);
    }

    #[test]
    fn test_update_trims_and_replaces_text() {
        let (store, _) = store();
        let task = store.add_at("old", 1).unwrap();
        let updated = store.update(task.id, "  new  ").unwrap().unwrap();
        assert_eq!(updated.text, "new");
        assert_eq!(store.get(task.id).unwrap().unwrap().text, "new");
        assert_eq!(store.update(404, "x").unwrap(), None);
    }

    #[test]
    fn test_delete() {
        let (store, _) = store();
        let a = store.add_at("a", 1).unwrap();
        let b = store.add_at("b", 2).unwrap();

        assert!(store.delete(a.id).unwrap());
        assert!(!store.delete(a.id).unwrap());
        assert_eq!(store.read().unwrap(), vec![b]);
    }

    #[test]
    fn test_clear_all_is_idempotent() {
        let (store, storage) = store();
        store.add_at("a", 1).unwrap();

        store.clear_all().unwrap();
        assert_eq!(storage.get_item(TASKS_KEY).unwrap(), None);
        assert!(store.read().unwrap().is_empty());

        store.clear_all().unwrap();
        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn test_clear_completed_and_has_completed() {
        let (store, _) = store();
        let a = store.add_at("a", 1).unwrap();
        let b = store.add_at("b", 2).unwrap();
        assert!(!store.has_completed().unwrap());

        store.toggle(a.id).unwrap();
        assert!(store.has_completed().unwrap());

        assert_eq!(store.clear_completed().unwrap(), 1);
        assert!(!store.has_completed().unwrap());
        assert_eq!(store.read().unwrap(), vec![b]);
        assert_eq!(store.clear_completed().unwrap(), 0);
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");

        let task = TaskStore::new(FileStorage::new(&path)).add_at("persist me", 10).unwrap();
        let reopened = TaskStore::new(FileStorage::new(&path));
        assert_eq!(reopened.load().unwrap(), vec![task]);
    }
}
