use super::{
    filter_summary, priority_color_code, progress_bar, render_activity, render_analytics,
    render_chart, render_frame, render_summary, render_table, Palette,
};
use crate::chart::TerminalChart;
use crate::domain::task::{Priority, Task};
use crate::projection::{
    ActivityFeed, Analytics, ChartData, PriorityFilter, SortKey, StatusFilter, Summary,
    TableQuery,
};
use crate::wiring::Frame;

fn sample_task(id: i64, name: &str, completed: bool) -> Task {
    Task {
        id,
        name: name.to_string(),
        description: "details".to_string(),
        due_date: "2024-12-01".to_string(),
        priority: Priority::High,
        completed,
    }
}

fn plain() -> Palette {
    Palette { enabled: false }
}

#[test]
fn table_lists_rows_with_status_and_toggle_glyph() {
    let rows = vec![sample_task(1, "Write report", false), sample_task(2, "Ship", true)];
    let out = render_table(&rows, &TableQuery::default(), &plain());
    let lines = out.lines().collect::<Vec<_>>();

    assert_eq!(lines[0], "Tasks");
    assert!(lines[1].starts_with("id"));
    assert!(lines[2].contains("Write report"));
    assert!(lines[2].contains("Pending"));
    assert!(lines[2].ends_with('✔'));
    assert!(lines[3].contains("Completed"));
    assert!(lines[3].ends_with('↺'));
    assert_eq!(lines[4], "2 task(s)");
}

#[test]
fn table_columns_line_up_across_rows() {
    let rows = vec![sample_task(1, "a", false), sample_task(22, "longer name", false)];
    let out = render_table(&rows, &TableQuery::default(), &plain());
    let lines = out.lines().collect::<Vec<_>>();
    let due_column = |line: &str| line.find("2024-12-01").expect("due date present");
    assert_eq!(due_column(lines[2]), due_column(lines[3]));
}

#[test]
fn empty_table_reports_no_matches_and_active_filters() {
    let query = TableQuery {
        status: StatusFilter::Completed,
        priority: PriorityFilter::Only(Priority::Low),
        sort: SortKey::Date,
    };
    let out = render_table(&[], &query, &plain());
    assert!(out.contains("filters: status=completed priority=Low sort=date"));
    assert!(out.contains("no tasks matched"));
}

#[test]
fn filter_summary_is_none_for_default_query() {
    assert!(filter_summary(&TableQuery::default()).is_none());
    let sorted = TableQuery {
        sort: SortKey::Name,
        ..TableQuery::default()
    };
    assert_eq!(
        filter_summary(&sorted).expect("summary"),
        "status=all priority=all sort=name"
    );
}

#[test]
fn summary_and_analytics_render_counts() {
    let summary = render_summary(
        &Summary {
            total: 3,
            completed: 1,
            pending: 2,
        },
        &plain(),
    );
    assert!(summary.contains("total 3   completed 1   pending 2"));

    let analytics = render_analytics(
        &Analytics {
            total: 2,
            completion_rate: 50,
            high_priority: 1,
            fill_percent: 50,
        },
        &plain(),
    );
    assert!(analytics.contains("completion 50%"));
    assert!(analytics.contains("high priority 1"));
    assert!(analytics.contains(&format!("[{}{}] 50%", "█".repeat(10), "░".repeat(10))));
}

#[test]
fn progress_bar_clamps_to_full_width() {
    assert_eq!(progress_bar(0, &plain()), format!("[{}] 0%", "░".repeat(20)));
    assert_eq!(progress_bar(250, &plain()), format!("[{}] 100%", "█".repeat(20)));
}

#[test]
fn activity_renders_placeholder_or_entries() {
    let empty = render_activity(&ActivityFeed::of(&[]), &plain());
    assert!(empty.contains("No recent activity yet."));

    let feed = ActivityFeed::of(&["first".to_string(), "second".to_string()]);
    let out = render_activity(&feed, &plain());
    let lines = out.lines().collect::<Vec<_>>();
    assert_eq!(lines[1], "- second");
    assert_eq!(lines[2], "- first");
}

#[test]
fn chart_section_prints_backend_lines() {
    let chart = TerminalChart {
        lines: vec!["[bar]".to_string(), "legend".to_string()],
    };
    let out = render_chart(Some(&chart), &plain());
    assert!(out.contains("[bar]\nlegend"));
    assert!(render_chart(None, &plain()).contains("chart not rendered"));
}

#[test]
fn frame_contains_every_surface() {
    let tasks = vec![sample_task(1, "Only", false)];
    let frame = Frame {
        query: TableQuery::default(),
        table: tasks.clone(),
        summary: Summary::of(&tasks),
        activity: ActivityFeed::of(&["Task \"Only\" added".to_string()]),
        analytics: Analytics::of(&tasks),
        chart: ChartData::of(&tasks),
    };
    let out = render_frame(&frame, None, &plain());
    for heading in [
        "Tasks",
        "Summary",
        "Latest activity",
        "Analytics",
        "Completed vs pending",
    ] {
        assert!(out.contains(heading), "missing {heading}");
    }
}

#[test]
fn palette_paints_only_when_enabled() {
    let enabled = Palette { enabled: true };
    assert!(enabled.paint("36", "x").contains("\u{1b}[36m"));
    assert!(!plain().paint("36", "x").contains("\u{1b}["));
    assert!(enabled.priority(Priority::High, "High").contains("\u{1b}[31m"));
    assert!(enabled.status(true, "Completed").contains("\u{1b}[32m"));
    assert_eq!(priority_color_code(Priority::Medium), "33");
    assert_eq!(priority_color_code(Priority::Low), "34");
}
