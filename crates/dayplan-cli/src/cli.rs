use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use dayplan_core::VERSION;

/// Dayplan - daily todos organized into templates
#[derive(Parser)]
#[command(name = "dayplan")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the local snapshot file
    #[arg(long, global = true, env = "DAYPLAN_DATA")]
    pub data: Option<String>,

    /// Remote authority base URL (remote mode, together with --token)
    #[arg(long, global = true, env = "DAYPLAN_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Remote authority access token
    #[arg(long, global = true, env = "DAYPLAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Config path override
    #[arg(long, global = true, env = "DAYPLAN_CONFIG")]
    pub config: Option<String>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Todo content
    #[arg(value_name = "CONTENT")]
    pub content: String,

    /// Target template (name or id prefix; defaults to the active one)
    #[arg(long)]
    pub template: Option<String>,

    /// Date to file the todo under (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Template to list (name or id prefix; defaults to the active one)
    #[arg(long)]
    pub template: Option<String>,

    /// Date to list (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// List every date, not just the selected one
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for commands addressing one todo
#[derive(Args)]
pub struct TodoRefArgs {
    /// Todo ID (full UUID or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Template to search (name or id prefix; defaults to all)
    #[arg(long)]
    pub template: Option<String>,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Todo ID (full UUID or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Replacement content
    #[arg(value_name = "CONTENT")]
    pub content: String,

    /// Template to search (name or id prefix; defaults to all)
    #[arg(long)]
    pub template: Option<String>,
}

/// Arguments for the `move` command
#[derive(Args)]
pub struct MoveArgs {
    /// Todo ID (full UUID or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// New 1-based position within the todo's day
    #[arg(value_name = "POSITION")]
    pub position: usize,

    /// Template to search (name or id prefix; defaults to all)
    #[arg(long)]
    pub template: Option<String>,
}

/// Arguments for the `template` command group
#[derive(Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateSubcommand,
}

#[derive(Subcommand)]
pub enum TemplateSubcommand {
    /// List templates
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a template (auto-named "Template N" unless NAME is given)
    Create {
        /// Template name
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// Rename a template
    Rename {
        /// Template (name or id prefix)
        #[arg(value_name = "TEMPLATE")]
        target: String,

        /// New name
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Delete a template and all its todos
    Delete {
        /// Template (name or id prefix)
        #[arg(value_name = "TEMPLATE")]
        target: String,
    },

    /// Switch the active template
    Use {
        /// Template (name or id prefix)
        #[arg(value_name = "TEMPLATE")]
        target: String,
    },
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a todo to a template
    Add(AddArgs),

    /// List todos for a date
    List(ListArgs),

    /// Toggle a todo's completion flag
    Toggle(TodoRefArgs),

    /// Replace a todo's content
    Edit(EditArgs),

    /// Delete a todo
    Delete(TodoRefArgs),

    /// Move a todo to a new position within its day
    Move(MoveArgs),

    /// Manage templates
    Template(TemplateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
