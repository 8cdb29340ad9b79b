use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::commands::{
    LsOptions, cmd_config_get, cmd_config_set, cmd_config_show, cmd_create, cmd_delete,
    cmd_download, cmd_ls, cmd_show, cmd_update,
};
use crate::query::SortOrder;
use crate::record::Resource;

#[derive(Parser)]
#[command(name = "scholardesk")]
#[command(about = "Admin console for schools, scholarship programs and applications")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List records of a resource, one page at a time
    #[command(visible_alias = "l")]
    Ls {
        /// Resource: schools, programs, applications, documents, students
        #[arg(value_parser = parse_resource)]
        resource: Resource,

        /// Case-insensitive search over the screen's text fields
        #[arg(short, long)]
        search: Option<String>,

        /// Only records with this status ('all' for any)
        #[arg(long)]
        status: Option<String>,

        /// Only records in this category ('all' for any)
        #[arg(long)]
        category: Option<String>,

        /// Only records at this level ('all' for any)
        #[arg(long)]
        level: Option<String>,

        /// Sort key (e.g. name, date, gwa)
        #[arg(long)]
        sort: Option<String>,

        /// Sort direction: asc or desc
        #[arg(long, value_parser = parse_sort_order)]
        order: Option<SortOrder>,

        /// Page to show; out-of-range pages are clamped
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        /// Rows per page (default from config, 10)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        page_size: Option<u64>,

        /// Read records from a JSON file instead of the API
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display a single record
    #[command(visible_alias = "s")]
    Show {
        #[arg(value_parser = parse_resource)]
        resource: Resource,

        /// Record ID
        id: String,

        /// Read records from a JSON file instead of the API
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a record
    Create {
        #[arg(value_parser = parse_resource)]
        resource: Resource,

        /// Record fields as a JSON object, or @path to a JSON file
        #[arg(short, long)]
        data: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a record
    Update {
        #[arg(value_parser = parse_resource)]
        resource: Resource,

        /// Record ID
        id: String,

        /// Changed fields as a JSON object, or @path to a JSON file
        #[arg(short, long)]
        data: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a record
    Delete {
        #[arg(value_parser = parse_resource)]
        resource: Resource,

        /// Record ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a document's file
    Download {
        /// Document ID
        id: String,

        /// Where to save the file (default: the document name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a configuration value
    Get {
        /// Key, e.g. api.base_url or list.screens.schools.page_size
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set {
        /// Key, e.g. api.base_url or list.page_size
        key: String,

        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        match self {
            Commands::Ls {
                resource,
                search,
                status,
                category,
                level,
                sort,
                order,
                page,
                page_size,
                from_file,
                json,
            } => {
                let options = LsOptions {
                    resource,
                    search,
                    status,
                    category,
                    level,
                    sort,
                    order,
                    page,
                    page_size: page_size.map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
                    from_file,
                    json,
                };
                cmd_ls(options).await
            }

            Commands::Show {
                resource,
                id,
                from_file,
                json,
            } => cmd_show(resource, &id, from_file.as_deref(), json).await,

            Commands::Create {
                resource,
                data,
                json,
            } => cmd_create(resource, &data, json).await,

            Commands::Update {
                resource,
                id,
                data,
                json,
            } => cmd_update(resource, &id, &data, json).await,

            Commands::Delete { resource, id, json } => cmd_delete(resource, &id, json).await,

            Commands::Download { id, output, json } => {
                cmd_download(&id, output.as_deref(), json).await
            }

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Get { key, json } => cmd_config_get(&key, json),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_resource(s: &str) -> Result<Resource, String> {
    let valid: Vec<&str> = Resource::ALL.iter().map(|r| r.path()).collect();
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "resource",
        &valid,
    )
}

fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "sort order",
        SortOrder::ALL_STRINGS,
    )
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "scholardesk", &mut io::stdout());
}
