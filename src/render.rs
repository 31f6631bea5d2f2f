use std::fmt::Write;
use anyhow::Result;
use crate::grid::TreeGrid;
use crate::grid::cell::{CellStyle, StatusCell};
use crate::model::TaskState;

const PLACEHOLDER: char = '·';

/// One-character indicator per task state.
pub fn glyph(state: Option<&TaskState>) -> char {
    match state {
        None | Some(TaskState::NoStatus) => '□',
        Some(TaskState::Success) => '■',
        Some(TaskState::Failed) => '✕',
        Some(TaskState::Running) => '▶',
        Some(TaskState::Queued) => '◦',
        Some(TaskState::Scheduled) => '◌',
        Some(TaskState::UpForRetry) | Some(TaskState::UpForReschedule) => '↻',
        Some(TaskState::UpstreamFailed) => '!',
        Some(TaskState::Skipped) => '»',
        Some(TaskState::Removed) => '-',
        Some(TaskState::Deferred) => '…',
        Some(TaskState::Other(_)) => '?',
    }
}

fn cell_text(cell: &StatusCell<'_>) -> String {
    let g = if cell.is_placeholder() {
        PLACEHOLDER
    } else {
        glyph(cell.state())
    };
    match cell.style {
        CellStyle::Selected => format!("[{}]", g),
        CellStyle::Hovered => format!("({})", g),
        CellStyle::Default => format!(" {} ", g),
    }
}

/// Plain-text grid: a header of run indexes, then one line per visible row
/// with the name column indented by level and one 3-wide cell per run.
pub fn render_grid(grid: &TreeGrid) -> Result<String> {
    let rows: Vec<_> = grid.visible_rows().collect();
    let name_width = rows
        .iter()
        .map(|r| r.level * 2 + r.label.chars().count() + 3)
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = String::new();
    write!(out, "{:<width$}", "", width = name_width)?;
    for i in 0..grid.axis().len() {
        write!(out, "{:^3}", i + 1)?;
    }
    writeln!(out)?;

    for row in &rows {
        let marker = match (row.is_group, row.is_open) {
            (true, true) => " ▾",
            (true, false) => " ▸",
            (false, _) => "",
        };
        let name = format!("{}{}{}", "  ".repeat(row.level), row.label, marker);
        let pad = name_width.saturating_sub(name.chars().count());
        let selected = if grid.is_row_selected(row.task_id()) { '>' } else { ' ' };

        write!(out, "{}{}{}", selected, name, " ".repeat(pad.saturating_sub(1)))?;
        for cell in grid.status_cells(row.task_id())? {
            out.push_str(&cell_text(&cell));
        }
        writeln!(out)?;
    }

    Ok(out)
}

/// `DAG: id / Run: label / Task: id`, the current crumb marked with `*`.
pub fn render_header(grid: &TreeGrid) -> String {
    grid.breadcrumbs()
        .iter()
        .map(|c| {
            let current = if c.is_current { "*" } else { "" };
            format!("{}{}: {}", current, c.label, c.value)
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Run index legend: `1 run_id`, one per line, in axis order.
pub fn render_legend(grid: &TreeGrid) -> Result<String> {
    let mut out = String::new();
    for (i, run_id) in grid.axis().run_ids().iter().enumerate() {
        writeln!(out, "{:>3} {}", i + 1, run_id)?;
    }
    Ok(out)
}
