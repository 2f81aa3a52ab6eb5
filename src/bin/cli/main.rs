mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use cardbox::cards::{Priority, SortBy, SortOrder};
use cardbox::storage::LocalStore;
use cardbox::AppContext;

#[derive(Parser)]
#[command(name = "cardbox-cli", about = "Cardbox card organizer CLI", version)]
struct Cli {
    /// Use a specific data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
    Critical,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
            PriorityArg::Critical => Priority::Critical,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SortByArg {
    Title,
    Priority,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

impl From<SortByArg> for SortBy {
    fn from(arg: SortByArg) -> Self {
        match arg {
            SortByArg::Title => SortBy::Title,
            SortByArg::Priority => SortBy::Priority,
            SortByArg::DueDate => SortBy::DueDate,
            SortByArg::CreatedAt => SortBy::CreatedAt,
            SortByArg::UpdatedAt => SortBy::UpdatedAt,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Add a new card
    Add(AddArgs),

    /// List cards, filtered and sorted
    List(ListArgs),

    /// Show one card in full
    Show {
        /// Card id
        id: String,
    },

    /// Edit fields of a card
    Edit(EditArgs),

    /// Mark a card completed
    Done {
        /// Card id
        id: String,
        /// Mark as not completed instead
        #[arg(long)]
        undo: bool,
    },

    /// Delete cards by id
    Rm {
        /// Card ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Manage categories
    #[command(subcommand)]
    Categories(CategoriesCommand),

    /// List all tags in use
    Tags,

    /// Export all data to a JSON backup file
    Export {
        /// Output file (default: cards-backup-<date>.json)
        path: Option<PathBuf>,
    },

    /// Import cards and categories from a JSON backup file
    Import {
        /// Backup file to read
        file: PathBuf,
    },

    /// Delete all stored cards, categories and settings
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct AddArgs {
    /// Card title
    pub title: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Category id
    #[arg(long, default_value = "personal")]
    pub category: String,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,

    #[arg(long, value_enum, default_value = "medium")]
    pub priority: PriorityArg,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Free-text search over title, description and tags
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by category id (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Filter by tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Filter by priority (repeatable)
    #[arg(long = "priority", value_enum)]
    pub priorities: Vec<PriorityArg>,

    /// Hide completed cards
    #[arg(long)]
    pub hide_completed: bool,

    /// Only cards due on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub due_from: Option<String>,

    /// Only cards due on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub due_to: Option<String>,

    /// Sort key (default: the persisted preference)
    #[arg(long, value_enum)]
    pub sort_by: Option<SortByArg>,

    /// Sort direction (default: the persisted preference)
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Card id
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Category id
    #[arg(long)]
    pub category: Option<String>,

    /// Comma-separated tags (replaces the existing set)
    #[arg(long)]
    pub tags: Option<String>,

    #[arg(long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Clear the due date
    #[arg(long, conflicts_with = "due")]
    pub clear_due: bool,
}

#[derive(Subcommand)]
enum CategoriesCommand {
    /// List categories
    List,

    /// Add a category
    Add {
        name: String,
        /// Hex color like #3b82f6
        #[arg(long, default_value = "#64748b")]
        color: String,
    },

    /// Delete a category by id
    Rm {
        /// Category id
        id: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => LocalStore::default_data_dir().context("Failed to resolve data directory")?,
    };
    let mut app = AppContext::open(data_dir).context("Failed to open card store")?;

    match cli.command {
        Command::Add(args) => commands::add::run(&mut app, args, &cli.format),
        Command::List(args) => commands::list::run(&mut app, args, &cli.format),
        Command::Show { id } => commands::show::run(&app, &id, &cli.format),
        Command::Edit(args) => commands::edit::run_edit(&mut app, args, &cli.format),
        Command::Done { id, undo } => commands::edit::run_done(&mut app, &id, undo, &cli.format),
        Command::Rm { ids } => commands::edit::run_rm(&mut app, &ids, &cli.format),
        Command::Categories(subcmd) => match subcmd {
            CategoriesCommand::List => commands::categories::run_list(&app, &cli.format),
            CategoriesCommand::Add { name, color } => {
                commands::categories::run_add(&mut app, &name, &color, &cli.format)
            }
            CategoriesCommand::Rm { id } => commands::categories::run_rm(&mut app, &id, &cli.format),
        },
        Command::Tags => commands::tags::run(&app, &cli.format),
        Command::Export { path } => commands::data::run_export(&app, path, &cli.format),
        Command::Import { file } => commands::data::run_import(&mut app, &file, &cli.format),
        Command::Clear { yes } => commands::data::run_clear(&mut app, yes),
    }
}
