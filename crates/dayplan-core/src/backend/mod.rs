//! Persistence strategies for the synchronization store.
//!
//! The `Backend` trait defines one operation set with two variants: the
//! remote authority client for authenticated sessions and the local
//! snapshot store for anonymous ones. The variant is chosen once, at
//! session-mode detection; the store itself never branches on mode.

mod local;
mod remote;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Template, Todo, TodoPatch};

/// Persistence interface for templates and todos.
///
/// All implementations must ensure:
/// - Returned objects are authoritative (ids and timestamps assigned)
/// - Creating or activating a template deactivates the principal's others
/// - Deleting a template cascades to its todos
///
/// # Errors
///
/// Operations on absent (or not-owned) resources return
/// `DayplanError::NotFound`; remote variants additionally surface
/// `Unauthorized`, `Validation`, and `Transport`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the full template collection, todos nested.
    async fn load_templates(&self) -> Result<Vec<Template>>;

    /// Create a template. The returned template is active and empty.
    async fn create_template(&self, name: &str) -> Result<Template>;

    /// Rename a template, returning the updated record.
    async fn rename_template(&self, id: Uuid, name: &str) -> Result<Template>;

    /// Mark exactly `id` active among the principal's templates.
    async fn activate_template(&self, id: Uuid) -> Result<()>;

    /// Delete a template and, transitively, its todos.
    async fn delete_template(&self, id: Uuid) -> Result<()>;

    /// Create a todo under `template_id` for `date`.
    async fn create_todo(&self, template_id: Uuid, content: &str, date: NaiveDate) -> Result<Todo>;

    /// Apply a partial update, returning the authoritative todo.
    async fn update_todo(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo>;

    /// Delete a todo by id.
    async fn delete_todo(&self, id: Uuid) -> Result<()>;

    /// Rewrite position indices so `ids` becomes the template's todo order.
    async fn reorder_todos(&self, template_id: Uuid, ids: &[Uuid]) -> Result<()>;
}
