//! Plain-text tables for `:query` results.

use etshell_db::QueryResult;

/// Cells wider than this are cut with an ellipsis.
const MAX_COLUMN_WIDTH: usize = 40;

fn truncate_value(value: &str, max_width: usize) -> String {
    if value.chars().count() <= max_width {
        value.to_string()
    } else {
        let take = max_width.saturating_sub(3);
        format!("{}...", value.chars().take(take).collect::<String>())
    }
}

fn separator(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn row_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push('|');
    }
    line
}

/// Renders a result set as a boxed table followed by a row count.
///
/// `NULL` values are shown as `NULL`.
pub fn format_table(result: &QueryResult) -> String {
    let row_count = result.rows.len();
    let footer = match row_count {
        1 => "(1 row)".to_string(),
        n => format!("({n} rows)"),
    };
    if result.fields.is_empty() {
        return footer;
    }

    let header: Vec<String> = result
        .fields
        .iter()
        .map(|f| truncate_value(&f.name, MAX_COLUMN_WIDTH))
        .collect();
    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| {
            (0..header.len())
                .map(|i| {
                    let value = row.get(i).cloned().flatten();
                    truncate_value(value.as_deref().unwrap_or("NULL"), MAX_COLUMN_WIDTH)
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = separator(&widths);
    let mut out = vec![rule.clone(), row_line(&header, &widths), rule.clone()];
    out.extend(rows.iter().map(|row| row_line(row, &widths)));
    if !rows.is_empty() {
        out.push(rule);
    }
    out.push(footer);
    out.join("\n")
}
