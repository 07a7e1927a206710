//! Terminal rendering of the ranked board and the user directory.
use colored::Colorize;
use solvetrack_core::{CycleReport, DirectoryEntry, LeaderboardEntry};

const BOARD_HEADERS: [&str; 8] = ["#", "User", "Easy", "Med", "Hard", "Total", "Today", "Month"];
const DIRECTORY_HEADERS: [&str; 2] = ["Username", "Display name"];
const STALE_NOTE: &str = "* figures cached or missing after a failed fetch";

/// Render the ranked board as an aligned table. Rows whose figures did not
/// come from a fresh fetch carry a `*` marker, explained by a trailing note.
#[must_use]
pub fn render_board(report: &CycleReport) -> String {
    let rows: Vec<[String; 8]> = report
        .entries
        .iter()
        .map(|entry| board_cells(entry, report.is_stale(&entry.username)))
        .collect();
    let widths = column_widths(&BOARD_HEADERS, &rows);

    let mut out = String::new();
    out.push_str(&board_line(&BOARD_HEADERS.map(str::to_string), &widths, false));
    out.push('\n');
    out.push_str(&separator(&widths));
    out.push('\n');
    for row in &rows {
        out.push_str(&board_line(row, &widths, true));
        out.push('\n');
    }
    if !report.degraded().is_empty() {
        out.push_str(STALE_NOTE);
        out.push('\n');
    }
    out
}

/// Render the merged directory as a two-column table.
#[must_use]
pub fn render_directory(entries: &[DirectoryEntry]) -> String {
    let rows: Vec<[String; 2]> = entries
        .iter()
        .map(|entry| [entry.username.clone(), entry.display_name.clone()])
        .collect();
    let widths = column_widths(&DIRECTORY_HEADERS, &rows);

    let mut out = String::new();
    out.push_str(&directory_line(&DIRECTORY_HEADERS.map(str::to_string), &widths));
    out.push('\n');
    out.push_str(&separator(&widths));
    out.push('\n');
    for row in &rows {
        out.push_str(&directory_line(row, &widths));
        out.push('\n');
    }
    out
}

fn board_cells(entry: &LeaderboardEntry, stale: bool) -> [String; 8] {
    let mut user = entry.display_name.clone();
    if stale {
        user.push_str(" *");
    }
    [
        entry.rank.to_string(),
        user,
        entry.easy.to_string(),
        entry.medium.to_string(),
        entry.hard.to_string(),
        entry.total.to_string(),
        entry.daily_increase.to_string(),
        entry.monthly_increase.to_string(),
    ]
}

fn column_widths<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> [usize; N] {
    let mut widths = headers.map(|header| header.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

fn pad(cell: &str, width: usize, left_align: bool) -> String {
    let gap = width.saturating_sub(cell.chars().count());
    if left_align {
        format!("{cell}{}", " ".repeat(gap))
    } else {
        format!("{}{cell}", " ".repeat(gap))
    }
}

fn board_line(cells: &[String; 8], widths: &[usize; 8], paint: bool) -> String {
    let mut parts = Vec::with_capacity(cells.len());
    for (idx, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
        // Only the user column reads left to right; figures right-align.
        let padded = pad(cell, *width, idx == 1);
        parts.push(if paint {
            paint_board_cell(&padded, idx)
        } else {
            padded
        });
    }
    parts.join("  ")
}

fn directory_line(cells: &[String; 2], widths: &[usize; 2]) -> String {
    let mut parts = Vec::with_capacity(cells.len());
    for (cell, width) in cells.iter().zip(widths.iter()) {
        parts.push(pad(cell, *width, true));
    }
    parts.join("  ")
}

// Difficulty columns use the platform's green/yellow/red convention.
fn paint_board_cell(padded: &str, idx: usize) -> String {
    match idx {
        2 => padded.green().to_string(),
        3 => padded.yellow().to_string(),
        4 => padded.red().to_string(),
        5 => padded.cyan().bold().to_string(),
        6 => padded.blue().to_string(),
        7 => padded.magenta().to_string(),
        _ => padded.to_string(),
    }
}

fn separator(widths: &[usize]) -> String {
    widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join("  ")
}
