//! Core data types for the template/todo tree.
//!
//! Serialization uses the remote authority's camelCase wire format; the
//! local snapshot reuses the same representation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to the template bootstrapped for brand-new principals.
pub const DEFAULT_TEMPLATE_NAME: &str = "Main";

/// A single task, tied to one calendar date and one owning template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier: authority-assigned in remote mode,
    /// client-generated in local mode.
    pub id: Uuid,

    /// Free-text task content
    pub content: String,

    /// Completion flag
    #[serde(default)]
    pub completed: bool,

    /// Calendar date this todo belongs to (comparisons are by date, not time)
    pub date: NaiveDate,

    /// When this todo was created
    pub created_at: DateTime<Utc>,

    /// Last modification, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Owning template
    pub template_id: Uuid,

    /// Position index maintained by the authority's bulk reorder; display
    /// order follows the in-memory sequence.
    #[serde(default)]
    pub order: i64,
}

/// A named, ordered collection of todos.
///
/// A template exclusively owns its todos; deleting it deletes them. At most
/// one template is active among a principal's templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,

    pub name: String,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub todos: Vec<Todo>,

    /// Transient per-template input buffer; never sent to the remote
    /// authority.
    #[serde(default)]
    pub new_todo: String,
}

impl Template {
    /// Todos belonging to `date`, in stored order.
    pub fn todos_for_date(&self, date: NaiveDate) -> Vec<&Todo> {
        self.todos.iter().filter(|todo| todo.date == date).collect()
    }

    /// Look up a todo by id.
    pub fn todo(&self, id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }
}

/// Partial update for a todo; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Patch that replaces the content.
    pub fn content(value: impl Into<String>) -> Self {
        Self {
            content: Some(value.into()),
            completed: None,
        }
    }

    /// Patch that sets the completion flag.
    pub fn completed(value: bool) -> Self {
        Self {
            content: None,
            completed: Some(value),
        }
    }
}

/// Enforce the single-active invariant over a template collection.
///
/// If no template is flagged active, the first is promoted; if several are,
/// only the first flagged one survives.
pub(crate) fn ensure_single_active(templates: &mut [Template]) {
    let mut seen_active = false;
    for template in templates.iter_mut() {
        if template.is_active {
            if seen_active {
                template.is_active = false;
            }
            seen_active = true;
        }
    }
    if !seen_active {
        if let Some(first) = templates.first_mut() {
            first.is_active = true;
        }
    }
}
