use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color as TableColor, ContentArrangement, Table};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn count_cell(count: usize) -> Cell {
    Cell::new(count).set_alignment(CellAlignment::Right)
}

/// Dims cells for values GitLab did not report.
pub fn optional_cell(value: Option<String>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => Cell::new("-").fg(TableColor::DarkGrey),
    }
}

/// Highlights projects with no admin, or where admins outnumber everyone else.
pub fn color_coded_admin_cell(admins: usize, total: usize) -> Cell {
    let cell = count_cell(admins);
    if admins == 0 {
        cell.fg(TableColor::Red)
    } else if admins * 2 > total {
        cell.fg(TableColor::Yellow)
    } else {
        cell.fg(TableColor::Green)
    }
}
