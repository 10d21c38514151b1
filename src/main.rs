mod app;
mod chart;
mod cli;
mod config;
mod db;
mod domain;
mod form;
#[cfg(test)]
mod main_tests;
mod projection;
mod repository;
mod shell;
mod store;
mod ui;
mod wiring;

use std::io::{self, IsTerminal};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::{AppError, TerminalDashboard};
use crate::domain::task::TaskId;
use crate::projection::{PriorityFilter, SortKey, StatusFilter, TableQuery};
use crate::wiring::{Event, FixedAnswer, Prompter, Update};

fn main() {
    init_tracing();
    if let Err(err) = run() {
        let palette = ui::Palette::new(io::stderr().is_terminal());
        eprintln!("{} {}", palette.error("error:"), err);
        std::process::exit(1);
    }
}

// Opt-in via RUST_LOG; invalid or oversized filters fall back to off.
fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization should work")
    );
}

fn run() -> Result<(), AppError> {
    use clap::Parser;
    use cli::Commands;

    let cli = cli::Cli::parse();
    let mut config = config::Config::load(&cli.config)?;
    if let Commands::Ls(args) | Commands::Dashboard(args) = &cli.command {
        config.query = apply_query_overrides(config.query, &args.query)?;
    }
    let palette = ui::Palette::new(config.color.enabled());
    let mut dashboard = app::open_dashboard(&cli.db, &config)?;

    match cli.command {
        Commands::Add(args) => {
            let form = form::TaskForm {
                name: args.name,
                description: args.desc,
                due_date: args.due_date,
                priority: args.priority,
            };
            let update = dashboard.handle(Event::Submit(form), &mut FixedAnswer::cancel())?;
            if let Some(task) = dashboard.repository().tasks().last() {
                println!(
                    "{} {}",
                    palette.id(&task.id.to_string()),
                    latest_entry(&update).unwrap_or(&task.name)
                );
            }
        }
        Commands::Done(args) => {
            let update = mutate(&mut dashboard, args.id, Event::ToggleComplete(args.id), None)?;
            report(&update, &palette);
        }
        Commands::Rename(args) => {
            let update = match args.name {
                Some(name) => mutate(
                    &mut dashboard,
                    args.id,
                    Event::Rename(args.id),
                    Some(&mut FixedAnswer::new(name)),
                )?,
                None => {
                    let mut prompter =
                        shell::Session::new(io::stdin().lock(), io::stdout(), palette);
                    let update = mutate(
                        &mut dashboard,
                        args.id,
                        Event::Rename(args.id),
                        Some(&mut prompter),
                    )?;
                    println!();
                    update
                }
            };
            report(&update, &palette);
        }
        Commands::Rm(args) => {
            let update = mutate(&mut dashboard, args.id, Event::Delete(args.id), None)?;
            report(&update, &palette);
        }
        Commands::Ls(args) => {
            let rows = dashboard.table();
            if args.json {
                print_json(&rows);
            } else {
                print!("{}", ui::render_table(&rows, &dashboard.query(), &palette));
            }
        }
        Commands::Summary(args) => {
            let frame = dashboard.frame();
            if args.json {
                print_json(&frame.summary);
            } else {
                print!("{}", ui::render_summary(&frame.summary, &palette));
            }
        }
        Commands::Activity(args) => {
            let frame = dashboard.frame();
            if args.json {
                print_json(&frame.activity);
            } else {
                print!("{}", ui::render_activity(&frame.activity, &palette));
            }
        }
        Commands::Stats(args) => {
            let frame = dashboard.frame();
            if args.json {
                print_json(&frame.analytics);
            } else {
                print!("{}", ui::render_analytics(&frame.analytics, &palette));
            }
        }
        Commands::Chart(args) => {
            let frame = dashboard.refresh();
            if args.json {
                print_json(&frame.chart);
            } else {
                print!("{}", ui::render_chart(dashboard.chart(), &palette));
            }
        }
        Commands::Dashboard(args) => {
            let frame = dashboard.refresh();
            if args.json {
                print_json(&frame);
            } else {
                print!("{}", ui::render_frame(&frame, dashboard.chart(), &palette));
            }
        }
        Commands::Shell => {
            let stdin = io::stdin();
            shell::Session::new(stdin.lock(), io::stdout(), palette).run(&mut dashboard)?;
        }
    }

    Ok(())
}

fn apply_query_overrides(
    mut query: TableQuery,
    args: &cli::QueryArgs,
) -> Result<TableQuery, AppError> {
    if let Some(status) = args.status.as_deref() {
        query.status = status.parse::<StatusFilter>()?;
    }
    if let Some(priority) = args.priority.as_deref() {
        query.priority = priority.parse::<PriorityFilter>()?;
    }
    if let Some(sort) = args.sort.as_deref() {
        query.sort = sort.parse::<SortKey>()?;
    }
    Ok(query)
}

// The repository treats unknown ids as no-ops; one-shot commands surface them.
fn mutate(
    dashboard: &mut TerminalDashboard,
    id: TaskId,
    event: Event,
    prompter: Option<&mut dyn Prompter>,
) -> Result<Update, AppError> {
    if dashboard.repository().get(id).is_none() {
        return Err(AppError::NotFound(id));
    }
    match prompter {
        Some(prompter) => dashboard.handle(event, prompter),
        None => dashboard.handle(event, &mut FixedAnswer::cancel()),
    }
}

fn latest_entry(update: &Update) -> Option<&str> {
    match update {
        Update::Full(frame) => frame.activity.entries.first().map(String::as_str),
        Update::Table(_) | Update::Unchanged => None,
    }
}

fn report(update: &Update, palette: &ui::Palette) {
    match latest_entry(update) {
        Some(entry) => println!("{entry}"),
        None => println!("{}", palette.dim("nothing changed")),
    }
}
