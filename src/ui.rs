use crate::chart::TerminalChart;
use crate::domain::task::{Priority, Task};
use crate::projection::{ActivityFeed, Analytics, SortKey, Summary, TableQuery};
use crate::wiring::Frame;

const PROGRESS_WIDTH: usize = 20;

pub fn render_frame(frame: &Frame, chart: Option<&TerminalChart>, palette: &Palette) -> String {
    [
        render_table(&frame.table, &frame.query, palette),
        render_summary(&frame.summary, palette),
        render_activity(&frame.activity, palette),
        render_analytics(&frame.analytics, palette),
        render_chart(chart, palette),
    ]
    .join("\n")
}

pub fn render_table(rows: &[Task], query: &TableQuery, palette: &Palette) -> String {
    let mut out = Vec::new();
    out.push(palette.heading("Tasks"));
    if let Some(summary) = filter_summary(query) {
        out.push(palette.dim(&format!("filters: {summary}")));
    }

    if rows.is_empty() {
        out.push(palette.dim("no tasks matched"));
        return finish(out);
    }

    let cells: Vec<[String; 7]> = rows.iter().map(row_cells).collect();
    let header = ["id", "name", "description", "due", "priority", "status", ""].map(String::from);
    let widths = column_widths(&header, &cells);

    out.push(palette.dim(&pad_row(&header, &widths)));
    for (task, cells) in rows.iter().zip(&cells) {
        out.push(format_task_row(task, cells, &widths, palette));
    }
    out.push(palette.dim(&format!("{} task(s)", rows.len())));
    finish(out)
}

fn row_cells(task: &Task) -> [String; 7] {
    [
        task.id.to_string(),
        task.name.clone(),
        task.description.clone(),
        task.due_date.clone(),
        task.priority.to_string(),
        task.status_label().to_string(),
        toggle_glyph(task).to_string(),
    ]
}

/// The action a toggle would take: complete a pending task, reopen a completed one.
fn toggle_glyph(task: &Task) -> &'static str {
    if task.completed {
        "↺"
    } else {
        "✔"
    }
}

fn column_widths(header: &[String; 7], rows: &[[String; 7]]) -> [usize; 7] {
    let mut widths = header.clone().map(|cell| cell.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}

fn pad_row(cells: &[String; 7], widths: &[usize; 7]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn format_task_row(
    task: &Task,
    cells: &[String; 7],
    widths: &[usize; 7],
    palette: &Palette,
) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect();
    let line = [
        palette.id(&padded[0]),
        if task.completed {
            palette.dim(&padded[1])
        } else {
            padded[1].clone()
        },
        palette.dim(&padded[2]),
        padded[3].clone(),
        palette.priority(task.priority, &padded[4]),
        palette.status(task.completed, &padded[5]),
        padded[6].clone(),
    ];
    line.join("  ").trim_end().to_string()
}

fn filter_summary(query: &TableQuery) -> Option<String> {
    if query.is_default() {
        return None;
    }
    let mut parts = vec![
        format!("status={}", query.status.as_str()),
        format!("priority={}", query.priority.as_str()),
    ];
    if query.sort != SortKey::None {
        parts.push(format!("sort={}", query.sort.as_str()));
    }
    Some(parts.join(" "))
}

pub fn render_summary(summary: &Summary, palette: &Palette) -> String {
    finish(vec![
        palette.heading("Summary"),
        format!(
            "{} {}   {} {}   {} {}",
            palette.label("total"),
            summary.total,
            palette.label("completed"),
            summary.completed,
            palette.label("pending"),
            summary.pending
        ),
    ])
}

pub fn render_activity(feed: &ActivityFeed, palette: &Palette) -> String {
    let mut out = vec![palette.heading("Latest activity")];
    if feed.entries.is_empty() {
        out.extend(feed.lines().into_iter().map(|line| palette.dim(line)));
    } else {
        out.extend(feed.lines().into_iter().map(|line| format!("- {line}")));
    }
    finish(out)
}

pub fn render_analytics(analytics: &Analytics, palette: &Palette) -> String {
    finish(vec![
        palette.heading("Analytics"),
        format!(
            "{} {}   {} {}%   {} {}",
            palette.label("total"),
            analytics.total,
            palette.label("completion"),
            analytics.completion_rate,
            palette.label("high priority"),
            analytics.high_priority
        ),
        progress_bar(analytics.fill_percent, palette),
    ])
}

fn progress_bar(percent: u32, palette: &Palette) -> String {
    let percent = usize::try_from(percent.min(100)).unwrap_or(100);
    let filled = percent * PROGRESS_WIDTH / 100;
    format!(
        "[{}{}] {}%",
        palette.paint("32", &"█".repeat(filled)),
        palette.dim(&"░".repeat(PROGRESS_WIDTH - filled)),
        percent
    )
}

pub fn render_chart(chart: Option<&TerminalChart>, palette: &Palette) -> String {
    let mut out = vec![palette.heading("Completed vs pending")];
    match chart {
        Some(chart) => out.extend(chart.lines.iter().cloned()),
        None => out.push(palette.dim("chart not rendered")),
    }
    finish(out)
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    fn label(&self, text: &str) -> String {
        self.paint("1", text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint("31", text)
    }

    pub fn id(&self, text: &str) -> String {
        self.paint("1;94", text)
    }

    fn priority(&self, priority: Priority, text: &str) -> String {
        self.paint(priority_color_code(priority), text)
    }

    fn status(&self, completed: bool, text: &str) -> String {
        self.paint(if completed { "32" } else { "33" }, text)
    }
}

fn priority_color_code(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "31",
        Priority::Medium => "33",
        Priority::Low => "34",
    }
}

#[cfg(test)]
#[path = "ui_tests_ext.rs"]
mod tests_ext;
