//! Output formatting for the CLI.
//!
//! Three modes, resolved the same way for every listing command:
//! table (default), plain, and JSON.

use dayplan_core::{Template, Todo};
use uuid::Uuid;

#[derive(Clone, Copy)]
pub enum OutputFormat {
    Table,
    Plain,
}

pub fn parse_output_format(value: Option<&str>) -> anyhow::Result<Option<OutputFormat>> {
    match value {
        None => Ok(None),
        Some("table") => Ok(Some(OutputFormat::Table)),
        Some("plain") => Ok(Some(OutputFormat::Plain)),
        Some(other) => Err(anyhow::anyhow!(
            "Unsupported format: {} (use table or plain)",
            other
        )),
    }
}

pub fn short_id(id: &Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

pub fn marker(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Convert a todo to JSON for output.
pub fn todo_json(todo: &Todo) -> serde_json::Value {
    serde_json::json!({
        "id": todo.id,
        "content": todo.content,
        "completed": todo.completed,
        "date": todo.date,
        "createdAt": todo.created_at,
        "updatedAt": todo.updated_at,
        "templateId": todo.template_id,
    })
}

/// Convert multiple todos to a JSON array for output.
pub fn todos_json(todos: &[Todo]) -> Vec<serde_json::Value> {
    todos.iter().map(todo_json).collect()
}

/// Convert a template (without its todos) to JSON for output.
pub fn template_json(template: &Template) -> serde_json::Value {
    serde_json::json!({
        "id": template.id,
        "name": template.name,
        "isActive": template.is_active,
        "todos": template.todos.len(),
    })
}
