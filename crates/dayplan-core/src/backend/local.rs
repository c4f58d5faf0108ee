//! Single-slot JSON snapshot backend for anonymous sessions.
//!
//! The whole template collection lives in one JSON document. It is read
//! once when the backend is opened; every mutation rewrites the full
//! snapshot through a temp file and an atomic rename.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{DayplanError, Result};
use crate::fs::write_atomic;
use crate::model::{Template, Todo, TodoPatch};

use super::Backend;

/// Snapshot-file persistence for anonymous sessions.
#[derive(Debug)]
pub struct LocalBackend {
    path: PathBuf,
    state: Mutex<Vec<Template>>,
}

impl LocalBackend {
    /// Open the snapshot at `path`, starting empty if none exists.
    ///
    /// # Errors
    ///
    /// Returns `DayplanError::Storage` if the file exists but cannot be
    /// read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                DayplanError::Storage(format!("Corrupt snapshot {}: {}", path.display(), e))
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(DayplanError::Storage(format!(
                    "Failed to read snapshot {}: {}",
                    path.display(),
                    err
                )))
            }
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Path of the snapshot document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, Vec<Template>>> {
        self.state
            .lock()
            .map_err(|_| DayplanError::Storage("Snapshot state poisoned".to_string()))
    }

    /// Full-snapshot write; runs after every mutation.
    fn persist(&self, templates: &[Template]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let payload = serde_json::to_vec_pretty(templates)?;
        write_atomic(&self.path, &payload)
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn load_templates(&self) -> Result<Vec<Template>> {
        Ok(self.lock_state()?.clone())
    }

    async fn create_template(&self, name: &str) -> Result<Template> {
        if name.trim().is_empty() {
            return Err(DayplanError::Validation("Name is required".to_string()));
        }
        let mut state = self.lock_state()?;
        for existing in state.iter_mut() {
            existing.is_active = false;
        }
        let template = Template {
            id: Uuid::new_v4(),
            name: name.to_string(),
            is_active: true,
            todos: Vec::new(),
            new_todo: String::new(),
        };
        state.push(template.clone());
        self.persist(&state)?;
        Ok(template)
    }

    async fn rename_template(&self, id: Uuid, name: &str) -> Result<Template> {
        if name.trim().is_empty() {
            return Err(DayplanError::Validation("Name is required".to_string()));
        }
        let mut state = self.lock_state()?;
        let template = state
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DayplanError::NotFound(format!("Template {}", id)))?;
        template.name = name.to_string();
        let updated = template.clone();
        self.persist(&state)?;
        Ok(updated)
    }

    async fn activate_template(&self, id: Uuid) -> Result<()> {
        let mut state = self.lock_state()?;
        if !state.iter().any(|t| t.id == id) {
            return Err(DayplanError::NotFound(format!("Template {}", id)));
        }
        for template in state.iter_mut() {
            template.is_active = template.id == id;
        }
        self.persist(&state)
    }

    async fn delete_template(&self, id: Uuid) -> Result<()> {
        let mut state = self.lock_state()?;
        let position = state
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| DayplanError::NotFound(format!("Template {}", id)))?;
        let removed = state.remove(position);
        // A non-empty snapshot always has exactly one active template.
        if removed.is_active {
            if let Some(first) = state.first_mut() {
                first.is_active = true;
            }
        }
        self.persist(&state)
    }

    async fn create_todo(&self, template_id: Uuid, content: &str, date: NaiveDate) -> Result<Todo> {
        if content.trim().is_empty() {
            return Err(DayplanError::Validation(
                "Missing required fields".to_string(),
            ));
        }
        let mut state = self.lock_state()?;
        let template = state
            .iter_mut()
            .find(|t| t.id == template_id)
            .ok_or_else(|| DayplanError::NotFound(format!("Template {}", template_id)))?;
        let todo = Todo {
            id: Uuid::new_v4(),
            content: content.to_string(),
            completed: false,
            date,
            created_at: Utc::now(),
            updated_at: None,
            template_id,
            order: 0,
        };
        template.todos.push(todo.clone());
        self.persist(&state)?;
        Ok(todo)
    }

    async fn update_todo(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo> {
        let mut state = self.lock_state()?;
        let todo = state
            .iter_mut()
            .flat_map(|t| t.todos.iter_mut())
            .find(|todo| todo.id == id)
            .ok_or_else(|| DayplanError::NotFound(format!("Todo {}", id)))?;
        if let Some(content) = &patch.content {
            todo.content = content.clone();
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        todo.updated_at = Some(Utc::now());
        let updated = todo.clone();
        self.persist(&state)?;
        Ok(updated)
    }

    async fn delete_todo(&self, id: Uuid) -> Result<()> {
        let mut state = self.lock_state()?;
        let mut found = false;
        for template in state.iter_mut() {
            if let Some(position) = template.todos.iter().position(|t| t.id == id) {
                template.todos.remove(position);
                found = true;
                break;
            }
        }
        if !found {
            return Err(DayplanError::NotFound(format!("Todo {}", id)));
        }
        self.persist(&state)
    }

    async fn reorder_todos(&self, template_id: Uuid, ids: &[Uuid]) -> Result<()> {
        let mut state = self.lock_state()?;
        let template = state
            .iter_mut()
            .find(|t| t.id == template_id)
            .ok_or_else(|| DayplanError::NotFound(format!("Template {}", template_id)))?;

        let mut reordered = Vec::with_capacity(template.todos.len());
        for id in ids {
            let position = template
                .todos
                .iter()
                .position(|t| t.id == *id)
                .ok_or_else(|| DayplanError::NotFound(format!("Todo {}", id)))?;
            reordered.push(template.todos.remove(position));
        }
        // Todos not named keep their relative order after the named ones.
        reordered.append(&mut template.todos);
        for (index, todo) in reordered.iter_mut().enumerate() {
            todo.order = index as i64;
        }
        template.todos = reordered;
        self.persist(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn snapshot(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("templates.json")
    }

    #[tokio::test]
    async fn test_open_missing_snapshot_is_empty() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::open(snapshot(&dir)).unwrap();
        assert!(backend.load_templates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::open(snapshot(&dir)).unwrap();
        let template = backend.create_template("Main").await.unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let todo = backend.create_todo(template.id, "buy milk", date).await.unwrap();

        let reopened = LocalBackend::open(snapshot(&dir)).unwrap();
        let templates = reopened.load_templates().await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "Main");
        assert_eq!(templates[0].todos, vec![todo]);
    }

    #[tokio::test]
    async fn test_create_template_deactivates_others() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::open(snapshot(&dir)).unwrap();
        let first = backend.create_template("Main").await.unwrap();
        let second = backend.create_template("Template 2").await.unwrap();

        let templates = backend.load_templates().await.unwrap();
        assert!(!templates.iter().find(|t| t.id == first.id).unwrap().is_active);
        assert!(templates.iter().find(|t| t.id == second.id).unwrap().is_active);
    }

    #[tokio::test]
    async fn test_delete_active_template_promotes_first() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::open(snapshot(&dir)).unwrap();
        let first = backend.create_template("Main").await.unwrap();
        let second = backend.create_template("Template 2").await.unwrap();

        backend.delete_template(second.id).await.unwrap();
        let templates = backend.load_templates().await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, first.id);
        assert!(templates[0].is_active);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let path = snapshot(&dir);
        fs::write(&path, "not json").unwrap();
        let err = LocalBackend::open(&path).unwrap_err();
        assert!(matches!(err, DayplanError::Storage(_)));
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::open(snapshot(&dir)).unwrap();
        backend.create_template("Main").await.unwrap();

        let missing = Uuid::new_v4();
        assert!(matches!(
            backend.delete_todo(missing).await.unwrap_err(),
            DayplanError::NotFound(_)
        ));
        assert!(matches!(
            backend.rename_template(missing, "x").await.unwrap_err(),
            DayplanError::NotFound(_)
        ));
    }
}
