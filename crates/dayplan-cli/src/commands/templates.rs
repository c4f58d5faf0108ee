use crate::app::AppContext;
use crate::cli::{TemplateArgs, TemplateSubcommand};
use crate::helpers::resolve_template;
use crate::output::{short_id, template_json};

pub async fn handle_template(ctx: &AppContext<'_>, args: &TemplateArgs) -> anyhow::Result<()> {
    match &args.command {
        TemplateSubcommand::List { json } => handle_list(ctx, *json).await,
        TemplateSubcommand::Create { name } => handle_create(ctx, name.as_deref()).await,
        TemplateSubcommand::Rename { target, name } => handle_rename(ctx, target, name).await,
        TemplateSubcommand::Delete { target } => handle_delete(ctx, target).await,
        TemplateSubcommand::Use { target } => handle_use(ctx, target).await,
    }
}

async fn handle_list(ctx: &AppContext<'_>, json: bool) -> anyhow::Result<()> {
    let store = ctx.open_store().await?;
    let templates = store.templates();

    if json {
        let values: Vec<serde_json::Value> = templates.iter().map(template_json).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if !ctx.quiet() {
        println!("ACTIVE | ID | NAME | TODOS");
    }
    for template in &templates {
        println!(
            "{} | {} | {} | {}",
            if template.is_active { "*" } else { " " },
            short_id(&template.id),
            template.name,
            template.todos.len()
        );
    }
    Ok(())
}

async fn handle_create(ctx: &AppContext<'_>, name: Option<&str>) -> anyhow::Result<()> {
    let store = ctx.open_store().await?;
    let mut template = store.add_template().await?;
    if let Some(name) = name {
        template = store.update_template_name(template.id, name).await?;
    }
    if !ctx.quiet() {
        println!("Created template {} ({})", template.name, short_id(&template.id));
    }
    Ok(())
}

async fn handle_rename(ctx: &AppContext<'_>, target: &str, name: &str) -> anyhow::Result<()> {
    let store = ctx.open_store().await?;
    let template = resolve_template(&store, target)?;
    let updated = store.update_template_name(template.id, name).await?;
    if !ctx.quiet() {
        println!("Renamed {} to {}", template.name, updated.name);
    }
    Ok(())
}

async fn handle_delete(ctx: &AppContext<'_>, target: &str) -> anyhow::Result<()> {
    let store = ctx.open_store().await?;
    let template = resolve_template(&store, target)?;
    store.remove_template(template.id).await?;
    if !ctx.quiet() {
        println!("Deleted template {}", template.name);
    }
    Ok(())
}

async fn handle_use(ctx: &AppContext<'_>, target: &str) -> anyhow::Result<()> {
    let store = ctx.open_store().await?;
    let template = resolve_template(&store, target)?;
    store.set_active_template(template.id).await?;
    if !ctx.quiet() {
        println!("Now using {}", template.name);
    }
    Ok(())
}
