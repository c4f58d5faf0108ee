//! Argument resolution for command handlers.

use chrono::NaiveDate;
use dayplan_core::{SyncStore, Template, Todo};

/// Parse a YYYY-MM-DD calendar date.
pub fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Invalid date (expected YYYY-MM-DD): {}", e))
}

/// Resolve a template by exact name, full id, or unique id prefix.
pub fn resolve_template(store: &SyncStore, target: &str) -> anyhow::Result<Template> {
    let templates = store.templates();
    if let Some(template) = templates.iter().find(|t| t.name == target) {
        return Ok(template.clone());
    }

    let needle = target.to_lowercase();
    let matches: Vec<&Template> = templates
        .iter()
        .filter(|t| t.id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [template] => Ok((*template).clone()),
        [] => Err(anyhow::anyhow!(
            "No template matching \"{}\". Run `dayplan template list`.",
            target
        )),
        _ => Err(anyhow::anyhow!(
            "Template \"{}\" is ambiguous; use more of the ID.",
            target
        )),
    }
}

/// The explicitly named template, or the active one.
pub fn select_template(store: &SyncStore, target: Option<&str>) -> anyhow::Result<Template> {
    match target {
        Some(target) => resolve_template(store, target),
        None => store
            .active_template()
            .ok_or_else(|| anyhow::anyhow!("No active template")),
    }
}

/// Resolve a todo by full id or unique prefix, optionally scoped to one
/// template. Returns the owning template together with the todo.
pub fn resolve_todo(
    store: &SyncStore,
    template: Option<&str>,
    target: &str,
) -> anyhow::Result<(Template, Todo)> {
    let scope: Vec<Template> = match template {
        Some(target) => vec![resolve_template(store, target)?],
        None => store.templates(),
    };

    let needle = target.to_lowercase();
    let mut matches: Vec<(&Template, &Todo)> = Vec::new();
    for template in &scope {
        for todo in &template.todos {
            if todo.id.to_string().starts_with(&needle) {
                matches.push((template, todo));
            }
        }
    }
    match matches.as_slice() {
        [(template, todo)] => Ok(((*template).clone(), (*todo).clone())),
        [] => Err(anyhow::anyhow!(
            "No todo matching \"{}\". Run `dayplan list` to find IDs.",
            target
        )),
        _ => Err(anyhow::anyhow!(
            "Todo \"{}\" is ambiguous; use more of the ID.",
            target
        )),
    }
}
