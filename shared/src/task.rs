use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Server-assigned task identifier.
pub type TaskId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Outer `None` when the server omitted the key, so it is not re-emitted.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_completed: bool,
    /// Fields the client does not interpret (timestamps, owner id) kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().and_then(|d| d.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

impl NewTask {
    /// Blank descriptions are sent as `null`.
    pub fn new(title: impl Into<String>, description: &str) -> Self {
        let description = description.trim();
        Self {
            title: title.into(),
            description: (!description.is_empty()).then(|| description.to_string()),
        }
    }
}

/// Partial update body for `PUT /tasks/{id}`. Absent fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    pub fn edit(title: impl Into<String>, description: &str) -> Self {
        let description = description.trim();
        Self {
            title: Some(title.into()),
            description: Some((!description.is_empty()).then(|| description.to_string())),
            is_completed: None,
        }
    }

    pub fn completion(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
            ..Self::default()
        }
    }
}

/// `GET /tasks` body: either `{"tasks": [...]}` or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaskListing {
    Bare(Vec<Task>),
    Wrapped { tasks: Vec<Task> },
}

impl TaskListing {
    pub fn into_tasks(self) -> Vec<Task> {
        match self {
            TaskListing::Bare(tasks) | TaskListing::Wrapped { tasks } => tasks,
        }
    }
}

/// Create/update body: either `{"task": {...}}` or the task itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaskEnvelope {
    Wrapped { task: Task },
    Bare(Task),
}

impl TaskEnvelope {
    pub fn into_task(self) -> Task {
        match self {
            TaskEnvelope::Wrapped { task } | TaskEnvelope::Bare(task) => task,
        }
    }
}

// Some backends store the flag as a tinyint and send 0/1.
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Ok(flag),
        Value::Number(n) => Ok(n.as_i64().unwrap_or_default() != 0),
        Value::Null => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected boolean, got {other}"
        ))),
    }
}

fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_keeps_unknown_fields() {
        let raw = json!({
            "id": 7,
            "title": "Buy milk",
            "description": null,
            "is_completed": false,
            "created_at": "2025-01-01T00:00:00Z",
        });
        let task: Task = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.description(), None);
        assert_eq!(serde_json::to_value(&task).unwrap(), raw);
    }

    #[test]
    fn missing_description_is_not_synthesized() {
        let raw = json!({"id": 2, "title": "a", "is_completed": true});
        let task: Task = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(task.description(), None);
        assert_eq!(serde_json::to_value(&task).unwrap(), raw);
    }

    #[test]
    fn completion_flag_accepts_integers() {
        let task: Task =
            serde_json::from_value(json!({"id": 1, "title": "a", "is_completed": 1})).unwrap();
        assert!(task.is_completed);
    }

    #[test]
    fn completion_patch_serializes_only_the_flag() {
        let body = serde_json::to_value(TaskPatch::completion(true)).unwrap();
        assert_eq!(body, json!({"is_completed": true}));
    }

    #[test]
    fn edit_patch_sends_null_for_blank_description() {
        let body = serde_json::to_value(TaskPatch::edit("Title", "  ")).unwrap();
        assert_eq!(body, json!({"title": "Title", "description": null}));
    }

    #[test]
    fn new_task_with_blank_description_is_null() {
        let body = serde_json::to_value(NewTask::new("Buy milk", "")).unwrap();
        assert_eq!(body, json!({"title": "Buy milk", "description": null}));
    }

    #[test]
    fn listing_accepts_both_shapes() {
        let task = json!({"id": 3, "title": "x", "description": "d", "is_completed": true});
        let wrapped: TaskListing = serde_json::from_value(json!({"tasks": [task.clone()]})).unwrap();
        let bare: TaskListing = serde_json::from_value(json!([task])).unwrap();
        assert_eq!(wrapped.into_tasks(), bare.into_tasks());
    }

    #[test]
    fn listing_requires_the_tasks_key() {
        assert!(serde_json::from_value::<TaskListing>(json!({})).is_err());
        assert!(serde_json::from_value::<TaskListing>(json!({"message": "ok"})).is_err());
    }

    #[test]
    fn envelope_unwraps_task_key() {
        let task = json!({"id": 9, "title": "x", "description": null, "is_completed": false});
        let wrapped: TaskEnvelope = serde_json::from_value(json!({"task": task.clone()})).unwrap();
        let bare: TaskEnvelope = serde_json::from_value(task).unwrap();
        assert_eq!(wrapped.into_task(), bare.into_task());
    }
}
