use super::{
    compare_names, table_rows, ActivityFeed, Analytics, ChartData, PriorityFilter, SortKey,
    StatusFilter, Summary, TableQuery, NO_ACTIVITY_PLACEHOLDER,
};
use crate::domain::task::{Priority, Task};
use std::cmp::Ordering;

fn task(id: i64, name: &str, date: &str, priority: Priority, completed: bool) -> Task {
    Task {
        id,
        name: name.to_string(),
        description: String::new(),
        due_date: date.to_string(),
        priority,
        completed,
    }
}

fn three_tasks() -> Vec<Task> {
    vec![
        task(1, "Write report", "2024-12-01", Priority::High, true),
        task(2, "buy milk", "2024-10-05", Priority::High, false),
        task(3, "Call plumber", "2024-11-20", Priority::Low, false),
    ]
}

fn ids(rows: &[Task]) -> Vec<i64> {
    rows.iter().map(|task| task.id).collect()
}

#[test]
fn default_query_keeps_insertion_order() {
    let tasks = three_tasks();
    let rows = table_rows(&tasks, &TableQuery::default());
    assert_eq!(rows, tasks);
}

#[test]
fn status_filter_selects_completed_tasks_only() {
    let tasks = three_tasks();
    let query = TableQuery {
        status: StatusFilter::Completed,
        ..TableQuery::default()
    };
    assert_eq!(ids(&table_rows(&tasks, &query)), vec![1]);
}

#[test]
fn status_and_priority_filters_are_conjunctive() {
    let tasks = three_tasks();
    let query = TableQuery {
        status: StatusFilter::Pending,
        priority: PriorityFilter::Only(Priority::High),
        sort: SortKey::None,
    };
    assert_eq!(ids(&table_rows(&tasks, &query)), vec![2]);
}

#[test]
fn name_sort_is_case_insensitive() {
    let tasks = three_tasks();
    let query = TableQuery {
        sort: SortKey::Name,
        ..TableQuery::default()
    };
    assert_eq!(ids(&table_rows(&tasks, &query)), vec![2, 3, 1]);
}

#[test]
fn name_comparison_puts_lowercase_first_on_fold_ties() {
    assert_eq!(compare_names("apple", "Apple"), Ordering::Less);
    assert_eq!(compare_names("Apple", "apple"), Ordering::Greater);
    assert_eq!(compare_names("apple", "apple"), Ordering::Equal);
    assert_eq!(compare_names("Zebra", "apple"), Ordering::Greater);
}

#[test]
fn name_sort_places_accented_names_by_base_letter() {
    let tasks = vec![
        task(1, "Zebra", "2024-01-01", Priority::Low, false),
        task(2, "Éclair", "2024-01-01", Priority::Low, false),
        task(3, "apple", "2024-01-01", Priority::Low, false),
        task(4, "eclair", "2024-01-01", Priority::Low, false),
    ];
    let query = TableQuery {
        sort: SortKey::Name,
        ..TableQuery::default()
    };
    let names = table_rows(&tasks, &query)
        .into_iter()
        .map(|task| task.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["apple", "eclair", "Éclair", "Zebra"]);
    assert_eq!(compare_names("résumé", "resume"), Ordering::Greater);
    assert_eq!(compare_names("Ångström", "zulu"), Ordering::Less);
}

#[test]
fn date_sort_is_chronological_with_unparsable_dates_last() {
    let mut tasks = three_tasks();
    tasks.push(task(4, "Someday", "", Priority::Medium, false));
    tasks.push(task(5, "Early", "2023-01-01", Priority::Medium, false));
    let query = TableQuery {
        sort: SortKey::Date,
        ..TableQuery::default()
    };
    assert_eq!(ids(&table_rows(&tasks, &query)), vec![5, 2, 3, 1, 4]);
}

#[test]
fn sorting_does_not_mutate_the_source_list() {
    let tasks = three_tasks();
    let before = tasks.clone();
    let query = TableQuery {
        sort: SortKey::Name,
        ..TableQuery::default()
    };
    let _ = table_rows(&tasks, &query);
    assert_eq!(tasks, before);
}

#[test]
fn summary_counts_pending_as_total_minus_completed() {
    let summary = Summary::of(&three_tasks());
    assert_eq!(summary.total, 3);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.pending, 2);
}

#[test]
fn activity_feed_shows_placeholder_when_empty() {
    let feed = ActivityFeed::of(&[]);
    assert!(feed.entries.is_empty());
    assert_eq!(feed.lines(), vec![NO_ACTIVITY_PLACEHOLDER]);
}

#[test]
fn activity_feed_keeps_five_newest_first() {
    let log = (1..=6)
        .map(|n| format!("Task \"t{n}\" added"))
        .collect::<Vec<_>>();
    let feed = ActivityFeed::of(&log);
    assert_eq!(
        feed.lines(),
        vec![
            "Task \"t6\" added",
            "Task \"t5\" added",
            "Task \"t4\" added",
            "Task \"t3\" added",
            "Task \"t2\" added",
        ]
    );
}

#[test]
fn analytics_rate_is_zero_without_tasks() {
    let analytics = Analytics::of(&[]);
    assert_eq!(analytics.total, 0);
    assert_eq!(analytics.completion_rate, 0);
    assert_eq!(analytics.fill_percent, 0);
}

#[test]
fn analytics_rate_rounds_to_whole_percent() {
    let half = vec![
        task(1, "a", "2024-01-01", Priority::High, true),
        task(2, "b", "2024-01-01", Priority::Low, false),
    ];
    assert_eq!(Analytics::of(&half).completion_rate, 50);

    let analytics = Analytics::of(&three_tasks());
    assert_eq!(analytics.completion_rate, 33);
    assert_eq!(analytics.high_priority, 2);

    let two_of_three = vec![
        task(1, "a", "2024-01-01", Priority::Low, true),
        task(2, "b", "2024-01-01", Priority::Low, true),
        task(3, "c", "2024-01-01", Priority::Low, false),
    ];
    assert_eq!(Analytics::of(&two_of_three).completion_rate, 67);
}

#[test]
fn chart_data_splits_completed_and_pending() {
    let chart = ChartData::of(&three_tasks());
    assert_eq!(chart.slices[0].label, "Completed");
    assert_eq!(chart.slices[0].value, 1);
    assert_eq!(chart.slices[1].label, "Pending");
    assert_eq!(chart.slices[1].value, 2);
    assert_eq!(chart.total(), 3);
}

#[test]
fn filters_parse_from_user_text() {
    assert_eq!(
        "Completed".parse::<StatusFilter>().expect("status"),
        StatusFilter::Completed
    );
    assert_eq!(
        "high".parse::<PriorityFilter>().expect("priority"),
        PriorityFilter::Only(Priority::High)
    );
    assert_eq!(
        "ALL".parse::<PriorityFilter>().expect("priority"),
        PriorityFilter::All
    );
    assert_eq!("date".parse::<SortKey>().expect("sort"), SortKey::Date);

    let err = "soon".parse::<SortKey>().expect_err("soon is not a sort key");
    assert_eq!(
        err.to_string(),
        "invalid sort 'soon': expected one of none, name, date"
    );
}

#[test]
fn query_serializes_as_plain_strings() {
    let query = TableQuery {
        status: StatusFilter::Pending,
        priority: PriorityFilter::Only(Priority::Medium),
        sort: SortKey::Name,
    };
    let value = serde_json::to_value(query).expect("query should serialize");
    assert_eq!(
        value,
        serde_json::json!({"status": "pending", "priority": "Medium", "sort": "name"})
    );
}
