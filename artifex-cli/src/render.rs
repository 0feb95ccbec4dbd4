//! Plain-text rendering of the table view.

use std::fmt::Write;

use artifex_lib::model::Row;
use artifex_lib::table::LoadState;
use artifex_lib::table::TableView;

pub const BANNER: &str = "Artifex Table";

struct Column {
    header: &'static str,
    width: usize,
    cell: fn(&Row) -> String,
}

const COLUMNS: &[Column] = &[
    Column { header: "Id", width: 8, cell: id_cell },
    Column { header: "Title", width: 32, cell: title_cell },
    Column { header: "Artist", width: 26, cell: artist_cell },
    Column { header: "Place of Origin", width: 16, cell: origin_cell },
    Column { header: "Inscriptions", width: 16, cell: inscriptions_cell },
    Column { header: "Year Start", width: 10, cell: start_cell },
    Column { header: "Year End", width: 10, cell: end_cell },
];

fn id_cell(row: &Row) -> String {
    row.id.to_string()
}

fn title_cell(row: &Row) -> String {
    row.title.clone()
}

fn artist_cell(row: &Row) -> String {
    row.artist_display.clone()
}

fn origin_cell(row: &Row) -> String {
    row.place_of_origin.clone()
}

fn inscriptions_cell(row: &Row) -> String {
    row.inscriptions.clone()
}

fn start_cell(row: &Row) -> String {
    row.date_start.to_string()
}

fn end_cell(row: &Row) -> String {
    row.date_end.to_string()
}

/// Renders the page, its check boxes and the footer.
///
/// `selected_total` is the size of the whole selection, across all pages.
pub fn render_table(view: &TableView, selected_total: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", BANNER);
    out.push_str("    ");
    for column in COLUMNS {
        let _ = write!(out, " {}", fit(column.header, column.width));
    }
    out.push('\n');

    let rule_len = 4 + COLUMNS.iter().map(|c| c.width + 1).sum::<usize>();
    let _ = writeln!(out, "{}", "-".repeat(rule_len));

    if view.rows.is_empty() {
        out.push_str("  (no rows)\n");
    }
    for row in &view.rows {
        let check = if view.is_checked(row) { "[x]" } else { "[ ]" };
        out.push_str(check);
        out.push(' ');
        for column in COLUMNS {
            let _ = write!(out, " {}", fit(&(column.cell)(row), column.width));
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}", "-".repeat(rule_len));
    out.push_str(&footer(view, selected_total));

    match &view.state {
        LoadState::Error { page, message } => {
            let _ = write!(out, "\n! could not load page {}: {}", page, message);
        }
        LoadState::Loading { page } => {
            let _ = write!(out, "\nloading page {}...", page);
        }
        _ => {}
    }

    out
}

/// "Page p of P, rows a-b of T, n selected (k on this page)".
pub fn footer(view: &TableView, selected_total: usize) -> String {
    let range = match view.row_range() {
        Some((first, last)) => format!("rows {}-{} of {}", first, last, view.total_records),
        None => format!("no rows of {}", view.total_records),
    };
    format!(
        "Page {} of {}, {}, {} selected ({} on this page)",
        view.page_number,
        view.total_pages,
        range,
        selected_total,
        view.displayed_selection.len()
    )
}

/// Pads or truncates `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let text = text.replace(['\n', '\r'], " ");
    let count = text.chars().count();
    if count <= width {
        format!("{:<width$}", text, width = width)
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use artifex_lib::model::RowId;
    use artifex_lib::selection::SelectionSet;

    use super::*;

    fn view_with(rows: Vec<Row>, selected: &[&str], page_number: usize) -> TableView {
        let set: SelectionSet = selected.iter().map(|id| RowId::from(*id)).collect();
        TableView {
            displayed_selection: set.displayed(&rows),
            page_size: 7,
            first_offset: (page_number - 1) * 7,
            total_records: 10,
            page_number,
            total_pages: 2,
            state: LoadState::Loaded { page: page_number },
            rows,
        }
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("Å·ÉÎ", 4), "Å·ÉÎ");
        assert_eq!(fit("a\nb", 3), "a b");
    }

    #[test]
    fn test_checked_rows_render_checked() {
        let rows = vec![Row::new(8u64, "Eight"), Row::new(9u64, "Nine")];
        let view = view_with(rows, &["9", "1"], 2);
        let text = render_table(&view, 2);

        let eight = text.lines().find(|l| l.contains("Eight")).unwrap();
        let nine = text.lines().find(|l| l.contains("Nine")).unwrap();
        assert!(eight.starts_with("[ ]"));
        assert!(nine.starts_with("[x]"));
        assert!(text.starts_with(BANNER));
    }

    #[test]
    fn test_footer() {
        let rows = vec![Row::new(8u64, "Eight"), Row::new(9u64, "Nine")];
        let view = view_with(rows, &["9", "1"], 2);
        assert_eq!(
            footer(&view, 2),
            "Page 2 of 2, rows 8-9 of 10, 2 selected (1 on this page)"
        );
    }

    #[test]
    fn test_error_state_is_reported() {
        let mut view = view_with(vec![Row::new(1u64, "One")], &[], 1);
        view.state = LoadState::Error {
            page: 2,
            message: "HTTP 503".into(),
        };
        let text = render_table(&view, 0);
        assert!(text.contains("could not load page 2: HTTP 503"));
        assert!(text.contains("One"));
    }
}
