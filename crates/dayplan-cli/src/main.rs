//! Dayplan CLI - daily todos organized into templates.
//!
//! This is the command-line interface for Dayplan. It is a thin
//! presentation layer: all state and synchronization logic lives in
//! `dayplan-core`.

mod app;
mod cli;
mod commands;
mod config;
mod helpers;
mod output;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    match &cli.command {
        Commands::Add(args) => commands::todos::handle_add(&ctx, args).await,
        Commands::List(args) => commands::todos::handle_list(&ctx, args).await,
        Commands::Toggle(args) => commands::todos::handle_toggle(&ctx, args).await,
        Commands::Edit(args) => commands::todos::handle_edit(&ctx, args).await,
        Commands::Delete(args) => commands::todos::handle_delete(&ctx, args).await,
        Commands::Move(args) => commands::todos::handle_move(&ctx, args).await,
        Commands::Template(args) => commands::templates::handle_template(&ctx, args).await,
        Commands::Completions(args) => {
            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "dayplan", &mut std::io::stdout());
            Ok(())
        }
    }
}
