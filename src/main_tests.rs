use clap::Parser;

use crate::app::AppError;
use crate::cli::{Cli, Commands, QueryArgs};
use crate::domain::task::Priority;
use crate::projection::{PriorityFilter, SortKey, StatusFilter, TableQuery};
use crate::wiring::Update;

use super::{apply_query_overrides, latest_entry};

#[test]
fn query_flags_override_config_selections() {
    let from_config = TableQuery {
        status: StatusFilter::Pending,
        priority: PriorityFilter::All,
        sort: SortKey::Date,
    };
    let args = QueryArgs {
        status: None,
        priority: Some("high".to_string()),
        sort: Some("name".to_string()),
    };
    let query = apply_query_overrides(from_config, &args).expect("flags should parse");
    assert_eq!(query.status, StatusFilter::Pending);
    assert_eq!(query.priority, PriorityFilter::Only(Priority::High));
    assert_eq!(query.sort, SortKey::Name);

    let untouched =
        apply_query_overrides(from_config, &QueryArgs::default()).expect("no flags is fine");
    assert_eq!(untouched, from_config);
}

#[test]
fn invalid_query_flag_is_a_filter_error() {
    let args = QueryArgs {
        status: Some("archived".to_string()),
        ..QueryArgs::default()
    };
    let err = apply_query_overrides(TableQuery::default(), &args).expect_err("bad status");
    assert!(matches!(err, AppError::Filter(_)));
    assert_eq!(
        err.to_string(),
        "invalid status 'archived': expected one of all, completed, pending"
    );
}

#[test]
fn cli_parses_add_and_rename_forms() {
    let cli = Cli::try_parse_from([
        "taskboard",
        "--db",
        "/tmp/x.sqlite",
        "add",
        "Write report",
        "--date",
        "2024-12-01",
        "--priority",
        "High",
    ])
    .expect("add should parse");
    assert_eq!(cli.db, "/tmp/x.sqlite");
    match cli.command {
        Commands::Add(args) => {
            assert_eq!(args.name, "Write report");
            assert_eq!(args.due_date, "2024-12-01");
            assert_eq!(args.priority, "High");
            assert_eq!(args.desc, "");
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = Cli::try_parse_from(["taskboard", "rename", "7"]).expect("rename should parse");
    match cli.command {
        Commands::Rename(args) => {
            assert_eq!(args.id, 7);
            assert!(args.name.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }

    assert!(Cli::try_parse_from(["taskboard", "done", "abc"]).is_err());
}

#[test]
fn latest_entry_only_comes_from_full_updates() {
    assert_eq!(latest_entry(&Update::Unchanged), None);
    assert_eq!(latest_entry(&Update::Table(Vec::new())), None);
}
