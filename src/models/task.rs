use serde::{Deserialize, Serialize};

/// The persisted to-do item. Wire names are camelCase to match what the
/// single-page client sends and expects back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned, immutable for the task's lifetime.
    pub id: i32,
    pub text: String,
    pub details: String,
    pub completed: bool,
    /// "Low", "Medium", "High" or "Urgent". Stored as plain text; the
    /// server does not reject other values.
    pub priority: String,
    pub category: String,
    /// ISO date string, empty when the task has no deadline.
    pub due_date: String,
    pub subtasks: Vec<Subtask>,
    /// Minutes.
    pub time_estimate: i32,
    pub is_archived: bool,
    /// Serialized as explicit null when absent.
    pub recurrence: Option<String>,
}

/// A nested checklist entry. Ids are generated client-side (timestamps),
/// so they are neither unique nor dense and are never validated here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subtask {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

/// Request payload for creating a task. Everything but `text` is optional;
/// `completed` and `isArchived` are not accepted at all, a new task always
/// starts active and unarchived.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub text: String,
    pub details: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub subtasks: Option<Vec<Subtask>>,
    pub time_estimate: Option<i32>,
    pub recurrence: Option<String>,
}

/// A create payload with every default filled in, ready to insert.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub text: String,
    pub details: String,
    pub priority: String,
    pub category: String,
    pub due_date: String,
    pub subtasks: Vec<Subtask>,
    pub time_estimate: i32,
    pub recurrence: Option<String>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            text: req.text,
            details: req.details.unwrap_or_default(),
            priority: req.priority.unwrap_or_else(|| "Low".to_string()),
            category: req.category.unwrap_or_else(|| "Général".to_string()),
            due_date: req.due_date.unwrap_or_default(),
            subtasks: req.subtasks.unwrap_or_default(),
            time_estimate: req.time_estimate.unwrap_or(0),
            recurrence: req.recurrence,
        }
    }
}

/// Request payload for updating a task. Absent fields leave the stored
/// value untouched; the merge happens database-side with COALESCE, so an
/// explicit null is indistinguishable from an absent field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub text: Option<String>,
    pub details: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub subtasks: Option<Vec<Subtask>>,
    pub time_estimate: Option<i32>,
    pub is_archived: Option<bool>,
    pub recurrence: Option<String>,
}
