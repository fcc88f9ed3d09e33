//! Display functions for query results.

use crate::config::OutputFormat;
use sqlplay_core::{QueryError, QueryResult, Value};

/// Shown instead of a table when a query returns no rows.
pub const NO_RESULTS: &str = "No results found.";

pub fn render(result: &QueryResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => render_table(result),
        OutputFormat::Json => render_json(result),
    }
}

pub fn render_error(err: &QueryError) -> String {
    format!("Error: {}", err)
}

pub fn render_json(result: &QueryResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| format!("Error: {}", e))
}

/// Box-drawn text table with a row-count footer.
///
/// Numbers are right-aligned; text and `NULL` are left-aligned.
pub fn render_table(result: &QueryResult) -> String {
    if result.is_empty() {
        return NO_RESULTS.to_string();
    }

    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(Value::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = result.headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&format_line(
        result.headers.iter().map(|h| (h.as_str(), false)),
        &widths,
    ));
    out.push_str(&border);
    out.push('\n');

    for (row, values) in cells.iter().zip(&result.rows) {
        out.push_str(&format_line(
            row.iter()
                .zip(values)
                .map(|(cell, value)| (cell.as_str(), value.is_number())),
            &widths,
        ));
    }
    out.push_str(&border);
    out.push('\n');

    let count = result.row_count();
    out.push_str(&format!(
        "({} {})",
        count,
        if count == 1 { "row" } else { "rows" }
    ));
    out
}

fn format_line<'a>(cells: impl Iterator<Item = (&'a str, bool)>, widths: &[usize]) -> String {
    let mut line = String::from("|");
    for ((cell, right_align), width) in cells.zip(widths) {
        let padding = " ".repeat(width - cell.chars().count());
        if right_align {
            line.push_str(&format!(" {}{} |", padding, cell));
        } else {
            line.push_str(&format!(" {}{} |", cell, padding));
        }
    }
    line.push('\n');
    line
}
