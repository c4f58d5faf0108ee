//! The synchronization store.
//!
//! Holds the in-memory template tree plus view state (selected date,
//! selected todo) and keeps it consistent with the persistence backend.
//!
//! Every mutation is confirm-then-apply: the backend call runs first and
//! in-memory state changes only on success. `reorder_todos` is the one
//! documented exception: order is always reflected locally, and a
//! propagation failure is reported after the local apply.

mod rollover;

pub use rollover::DateRollover;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::backend::Backend;
use crate::error::{DayplanError, Result};
use crate::model::{ensure_single_active, Template, Todo, TodoPatch, DEFAULT_TEMPLATE_NAME};

/// How often the rollover task checks for a calendar-day change.
pub const DATE_ROLLOVER_PERIOD: Duration = Duration::from_secs(120);

/// Synchronization store over a persistence backend.
///
/// Cheap to clone; clones share state. There is one logical writer (the
/// UI event loop plus the rollover tick), so the inner lock is held only
/// for the duration of an in-memory read or apply, never across a
/// backend call.
#[derive(Clone)]
pub struct SyncStore {
    backend: Arc<dyn Backend>,
    state: Arc<Mutex<StoreState>>,
}

impl std::fmt::Debug for SyncStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncStore").finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct StoreState {
    templates: Vec<Template>,
    selected_date: NaiveDate,
    selected_todo: Option<Uuid>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl SyncStore {
    /// Load templates from the backend and build the store.
    ///
    /// A brand-new principal (zero templates) gets one default template
    /// named "Main"; the single-active invariant is enforced on whatever
    /// the backend returns. The selected date starts at today.
    ///
    /// # Errors
    ///
    /// Load failures leave no store behind; the caller decides whether to
    /// retry or surface the error.
    pub async fn open(backend: Arc<dyn Backend>) -> Result<Self> {
        let mut templates = backend.load_templates().await?;
        if templates.is_empty() {
            templates.push(backend.create_template(DEFAULT_TEMPLATE_NAME).await?);
        }
        ensure_single_active(&mut templates);
        debug!(templates = templates.len(), "store loaded");
        Ok(Self {
            backend,
            state: Arc::new(Mutex::new(StoreState {
                templates,
                selected_date: today(),
                selected_todo: None,
            })),
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        // No code panics while holding the lock; recover the guard if a
        // caller ever does.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // --- View state ---

    /// Snapshot of the full template collection.
    pub fn templates(&self) -> Vec<Template> {
        self.lock_state().templates.clone()
    }

    /// The currently active template, if any templates exist.
    pub fn active_template(&self) -> Option<Template> {
        self.lock_state()
            .templates
            .iter()
            .find(|t| t.is_active)
            .cloned()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.lock_state().selected_date
    }

    pub fn set_selected_date(&self, date: NaiveDate) {
        self.lock_state().selected_date = date;
    }

    pub fn selected_todo(&self) -> Option<Uuid> {
        self.lock_state().selected_todo
    }

    pub fn select_todo(&self, todo: Option<Uuid>) {
        self.lock_state().selected_todo = todo;
    }

    /// Todos of `template_id` on `date`, in display order.
    pub fn todos_for_date(&self, template_id: Uuid, date: NaiveDate) -> Result<Vec<Todo>> {
        let state = self.lock_state();
        let template = find_template(&state.templates, template_id)?;
        Ok(template
            .todos_for_date(date)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Todos shown by default: active template, selected date.
    pub fn visible_todos(&self) -> Vec<Todo> {
        let state = self.lock_state();
        state
            .templates
            .iter()
            .find(|t| t.is_active)
            .map(|t| t.todos_for_date(state.selected_date).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    // --- Todo operations ---

    /// Add a todo with `content` to `template_id` on the selected date.
    ///
    /// Blank content (after trimming) is an explicit no-op and returns
    /// `Ok(None)`.
    pub async fn add_todo(&self, content: &str, template_id: Uuid) -> Result<Option<Todo>> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }
        let date = self.selected_date();
        let todo = self.backend.create_todo(template_id, content, date).await?;
        let mut state = self.lock_state();
        let template = find_template_mut(&mut state.templates, template_id)?;
        template.todos.push(todo.clone());
        debug!(todo = %todo.id, template = %template_id, "added todo");
        Ok(Some(todo))
    }

    /// Delete a todo, clearing the selection if it pointed at it.
    pub async fn delete_todo(&self, id: Uuid, template_id: Uuid) -> Result<()> {
        self.backend.delete_todo(id).await?;
        let mut guard = self.lock_state();
        let state = &mut *guard;
        let template = find_template_mut(&mut state.templates, template_id)?;
        template.todos.retain(|t| t.id != id);
        if state.selected_todo == Some(id) {
            state.selected_todo = None;
        }
        debug!(todo = %id, template = %template_id, "deleted todo");
        Ok(())
    }

    /// Replace a todo's content. Edits are persisted through the backend
    /// like every other mutation.
    pub async fn update_todo(&self, id: Uuid, content: &str, template_id: Uuid) -> Result<Todo> {
        let updated = self
            .backend
            .update_todo(id, &TodoPatch::content(content))
            .await?;
        self.replace_todo(template_id, updated)
    }

    /// Flip a todo's completion flag.
    ///
    /// The backend's returned object replaces the local one wholesale;
    /// the round trip is authoritative, not a local flip.
    pub async fn toggle_todo(&self, id: Uuid, template_id: Uuid) -> Result<Todo> {
        let completed = {
            let state = self.lock_state();
            let template = find_template(&state.templates, template_id)?;
            template
                .todo(id)
                .ok_or_else(|| DayplanError::NotFound(format!("Todo {}", id)))?
                .completed
        };
        let updated = self
            .backend
            .update_todo(id, &TodoPatch::completed(!completed))
            .await?;
        self.replace_todo(template_id, updated)
    }

    fn replace_todo(&self, template_id: Uuid, updated: Todo) -> Result<Todo> {
        let mut state = self.lock_state();
        let template = find_template_mut(&mut state.templates, template_id)?;
        let slot = template
            .todos
            .iter_mut()
            .find(|t| t.id == updated.id)
            .ok_or_else(|| DayplanError::NotFound(format!("Todo {}", updated.id)))?;
        *slot = updated.clone();
        Ok(updated)
    }

    /// Reorder the selected date's todos of `template_id` to `new_order`.
    ///
    /// `new_order` must be a permutation of that day's todo ids; todos of
    /// other dates keep their relative order. The new order is applied
    /// locally first and always sticks; backend propagation failure is
    /// returned as an error after the fact.
    pub async fn reorder_todos(&self, new_order: &[Uuid], template_id: Uuid) -> Result<()> {
        let full_order = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            let date = state.selected_date;
            let template = find_template_mut(&mut state.templates, template_id)?;
            apply_reorder(template, date, new_order)?
        };
        if let Err(err) = self.backend.reorder_todos(template_id, &full_order).await {
            warn!(template = %template_id, error = %err, "reorder propagation failed");
            return Err(err);
        }
        Ok(())
    }

    // --- Template operations ---

    /// Create a new template named `Template {N+1}` (count-based, not
    /// collision-checked) and make it active.
    pub async fn add_template(&self) -> Result<Template> {
        let name = format!("Template {}", self.lock_state().templates.len() + 1);
        let mut template = self.backend.create_template(&name).await?;
        template.is_active = true;
        let mut state = self.lock_state();
        for existing in state.templates.iter_mut() {
            existing.is_active = false;
        }
        state.templates.push(template.clone());
        debug!(template = %template.id, name = %template.name, "added template");
        Ok(template)
    }

    /// Delete a template and its todos; if it was active, the first
    /// remaining template is promoted.
    pub async fn remove_template(&self, template_id: Uuid) -> Result<()> {
        self.backend.delete_template(template_id).await?;
        let mut guard = self.lock_state();
        let state = &mut *guard;
        let position = state
            .templates
            .iter()
            .position(|t| t.id == template_id)
            .ok_or_else(|| DayplanError::NotFound(format!("Template {}", template_id)))?;
        let removed = state.templates.remove(position);
        if removed.is_active {
            if let Some(first) = state.templates.first_mut() {
                first.is_active = true;
            }
        }
        if let Some(selected) = state.selected_todo {
            if removed.todos.iter().any(|t| t.id == selected) {
                state.selected_todo = None;
            }
        }
        debug!(template = %template_id, "removed template");
        Ok(())
    }

    /// Set a template's transient input buffer. Never persisted.
    pub fn update_template_input(&self, template_id: Uuid, value: &str) -> Result<()> {
        let mut state = self.lock_state();
        let template = find_template_mut(&mut state.templates, template_id)?;
        template.new_todo = value.to_string();
        Ok(())
    }

    /// Rename a template. Blank names are rejected.
    pub async fn update_template_name(&self, template_id: Uuid, name: &str) -> Result<Template> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DayplanError::Validation(
                "Template name must not be empty".to_string(),
            ));
        }
        let updated = self.backend.rename_template(template_id, name).await?;
        let mut state = self.lock_state();
        let template = find_template_mut(&mut state.templates, template_id)?;
        template.name = updated.name;
        Ok(template.clone())
    }

    /// Make exactly `template_id` the active template.
    pub async fn set_active_template(&self, template_id: Uuid) -> Result<()> {
        {
            let state = self.lock_state();
            find_template(&state.templates, template_id)?;
        }
        self.backend.activate_template(template_id).await?;
        let mut state = self.lock_state();
        for template in state.templates.iter_mut() {
            template.is_active = template.id == template_id;
        }
        Ok(())
    }

    /// Advance the selected date across a day change, preserving manual
    /// navigation: only a selection still on the previous "today" moves.
    fn roll_selected_date(
        &self,
        previous_today: NaiveDate,
        new_today: NaiveDate,
    ) -> bool {
        let mut state = self.lock_state();
        if state.selected_date == previous_today {
            state.selected_date = new_today;
            true
        } else {
            false
        }
    }
}

fn find_template(templates: &[Template], id: Uuid) -> Result<&Template> {
    templates
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| DayplanError::NotFound(format!("Template {}", id)))
}

fn find_template_mut(templates: &mut [Template], id: Uuid) -> Result<&mut Template> {
    templates
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| DayplanError::NotFound(format!("Template {}", id)))
}

/// Splice `new_order` into the template, returning the template-wide id
/// order to hand to the backend's bulk reorder.
fn apply_reorder(
    template: &mut Template,
    date: NaiveDate,
    new_order: &[Uuid],
) -> Result<Vec<Uuid>> {
    use std::collections::{HashMap, HashSet};

    let current: HashSet<Uuid> = template
        .todos_for_date(date)
        .iter()
        .map(|t| t.id)
        .collect();
    let unique: HashSet<Uuid> = new_order.iter().copied().collect();
    if unique.len() != new_order.len()
        || unique.len() != current.len()
        || !unique.is_subset(&current)
    {
        return Err(DayplanError::Validation(
            "Reorder must be a permutation of the day's todos".to_string(),
        ));
    }

    let (day, mut rest): (Vec<Todo>, Vec<Todo>) = template
        .todos
        .drain(..)
        .partition(|t| t.date == date);
    let mut day_todos: HashMap<Uuid, Todo> = day.into_iter().map(|t| (t.id, t)).collect();
    for id in new_order {
        if let Some(todo) = day_todos.remove(id) {
            rest.push(todo);
        }
    }
    for (index, todo) in rest.iter_mut().enumerate() {
        todo.order = index as i64;
    }
    template.todos = rest;
    Ok(template.todos.iter().map(|t| t.id).collect())
}
