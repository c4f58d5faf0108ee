use uuid::Uuid;

use crate::app::AppContext;
use crate::cli::{AddArgs, EditArgs, ListArgs, MoveArgs, TodoRefArgs};
use crate::helpers::{parse_date, resolve_todo, select_template};
use crate::output::{marker, parse_output_format, short_id, todos_json, OutputFormat};

pub async fn handle_add(ctx: &AppContext<'_>, args: &AddArgs) -> anyhow::Result<()> {
    let store = ctx.open_store().await?;
    if let Some(value) = &args.date {
        store.set_selected_date(parse_date(value)?);
    }
    let template = select_template(&store, args.template.as_deref())?;

    match store.add_todo(&args.content, template.id).await? {
        Some(todo) => {
            if !ctx.quiet() {
                println!(
                    "Added {} to {} for {}",
                    short_id(&todo.id),
                    template.name,
                    todo.date
                );
            }
            Ok(())
        }
        None => Err(anyhow::anyhow!("Nothing to add: content is empty")),
    }
}

pub async fn handle_list(ctx: &AppContext<'_>, args: &ListArgs) -> anyhow::Result<()> {
    let store = ctx.open_store().await?;
    if let Some(value) = &args.date {
        store.set_selected_date(parse_date(value)?);
    }
    let template = select_template(&store, args.template.as_deref())?;

    let todos = if args.all {
        template.todos.clone()
    } else {
        store.todos_for_date(template.id, store.selected_date())?
    };

    let format = parse_output_format(args.format.as_deref())?;
    if args.json {
        if format.is_some() {
            return Err(anyhow::anyhow!("--format cannot be used with --json"));
        }
        let output = serde_json::to_string_pretty(&todos_json(&todos))?;
        println!("{}", output);
        return Ok(());
    }

    match format.unwrap_or(OutputFormat::Table) {
        OutputFormat::Table => {
            if !ctx.quiet() {
                println!(
                    "{} \u{00B7} {}",
                    template.name,
                    if args.all {
                        "all dates".to_string()
                    } else {
                        store.selected_date().to_string()
                    }
                );
                println!("ID | DONE | DATE | CONTENT");
            }
            for todo in &todos {
                println!(
                    "{} | {} | {} | {}",
                    short_id(&todo.id),
                    marker(todo.completed),
                    todo.date,
                    todo.content
                );
            }
        }
        OutputFormat::Plain => {
            for todo in &todos {
                println!(
                    "{} {} {} {}",
                    todo.id,
                    marker(todo.completed),
                    todo.date,
                    todo.content
                );
            }
        }
    }
    Ok(())
}

pub async fn handle_toggle(ctx: &AppContext<'_>, args: &TodoRefArgs) -> anyhow::Result<()> {
    let store = ctx.open_store().await?;
    let (template, todo) = resolve_todo(&store, args.template.as_deref(), &args.id)?;

    let updated = store.toggle_todo(todo.id, template.id).await?;
    if !ctx.quiet() {
        let status = if updated.completed { "done" } else { "not done" };
        println!("Marked {} {}", short_id(&updated.id), status);
    }
    Ok(())
}

pub async fn handle_edit(ctx: &AppContext<'_>, args: &EditArgs) -> anyhow::Result<()> {
    if args.content.trim().is_empty() {
        return Err(anyhow::anyhow!("Content cannot be empty"));
    }
    let store = ctx.open_store().await?;
    let (template, todo) = resolve_todo(&store, args.template.as_deref(), &args.id)?;

    let updated = store.update_todo(todo.id, &args.content, template.id).await?;
    if !ctx.quiet() {
        println!("Updated {}", short_id(&updated.id));
    }
    Ok(())
}

pub async fn handle_delete(ctx: &AppContext<'_>, args: &TodoRefArgs) -> anyhow::Result<()> {
    let store = ctx.open_store().await?;
    let (template, todo) = resolve_todo(&store, args.template.as_deref(), &args.id)?;

    store.delete_todo(todo.id, template.id).await?;
    if !ctx.quiet() {
        println!("Deleted {}", short_id(&todo.id));
    }
    Ok(())
}

pub async fn handle_move(ctx: &AppContext<'_>, args: &MoveArgs) -> anyhow::Result<()> {
    let store = ctx.open_store().await?;
    let (template, todo) = resolve_todo(&store, args.template.as_deref(), &args.id)?;

    // Reordering operates on the day the todo lives on.
    store.set_selected_date(todo.date);
    let mut ids: Vec<Uuid> = store
        .todos_for_date(template.id, todo.date)?
        .iter()
        .map(|t| t.id)
        .collect();

    if args.position == 0 || args.position > ids.len() {
        return Err(anyhow::anyhow!(
            "Invalid position {} (expected 1-{})",
            args.position,
            ids.len()
        ));
    }
    ids.retain(|id| *id != todo.id);
    ids.insert(args.position - 1, todo.id);

    store.reorder_todos(&ids, template.id).await?;
    if !ctx.quiet() {
        println!(
            "Moved {} to position {} on {}",
            short_id(&todo.id),
            args.position,
            todo.date
        );
    }
    Ok(())
}
