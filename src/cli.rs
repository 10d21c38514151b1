use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};

use crate::domain::task::TaskId;

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

#[derive(Debug, Parser)]
#[command(name = "taskboard")]
#[command(bin_name = "taskboard")]
#[command(version)]
#[command(about = "A local task tracker with activity log, analytics and chart")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'd',
        long,
        env = "TASKBOARD_DB_PATH",
        default_value = ".taskboard/state.sqlite",
        help = "Path to the SQLite state database."
    )]
    pub db: String,

    #[arg(
        short = 'c',
        long,
        env = "TASKBOARD_CONFIG",
        default_value = ".taskboard/config.toml",
        help = "Path to the optional TOML config file."
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Create a new task.")]
    Add(AddArgs),
    #[command(about = "Toggle a task between completed and pending.")]
    Done(IdArgs),
    #[command(about = "Rename a task; prompts when no name is given.")]
    Rename(RenameArgs),
    #[command(about = "Delete a task.")]
    Rm(IdArgs),
    #[command(about = "List tasks with filtering and sorting.")]
    Ls(ListArgs),
    #[command(about = "Show total, completed and pending counts.")]
    Summary(OutputArgs),
    #[command(about = "Show the latest activity entries.")]
    Activity(OutputArgs),
    #[command(about = "Show completion analytics.")]
    Stats(OutputArgs),
    #[command(about = "Draw the completed vs pending chart.")]
    Chart(OutputArgs),
    #[command(about = "Show every panel at once.")]
    Dashboard(ListArgs),
    #[command(about = "Start an interactive session.")]
    Shell,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(help = "Task name.")]
    pub name: String,

    #[arg(long = "date", help = "Due date (YYYY-MM-DD).")]
    pub due_date: String,

    #[arg(short = 'p', long, help = "Priority: Low, Medium or High.")]
    pub priority: String,

    #[arg(long = "desc", default_value = "", help = "Optional description text.")]
    pub desc: String,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    #[arg(help = "Task id.")]
    pub id: TaskId,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    #[arg(help = "Task id.")]
    pub id: TaskId,

    #[arg(help = "New name. Prompts on stdin when omitted.")]
    pub name: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct QueryArgs {
    #[arg(short = 's', long, help = "Status filter: all, completed or pending.")]
    pub status: Option<String>,

    #[arg(short = 'p', long, help = "Priority filter: all, low, medium or high.")]
    pub priority: Option<String>,

    #[arg(long, help = "Sort order: none, name or date.")]
    pub sort: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    #[arg(long, help = "Emit JSON output.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    #[arg(long, help = "Emit JSON output.")]
    pub json: bool,
}
