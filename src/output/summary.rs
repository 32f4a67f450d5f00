use std::fmt::Write;

use crate::inventory::{format_megabytes, InventoryRecord};

use super::styling::{bright, dim};
use super::tables::{
    color_coded_admin_cell, count_cell, create_cyan_header, create_table, optional_cell,
};

const TABLE_HEADER: [&str; 10] = [
    "Project",
    "Namespace",
    "Size (MB)",
    "Latest MR",
    "Latest Commit",
    "MRs",
    "Pipelines",
    "Commits",
    "Admins",
    "Members",
];

/// Prints the inventory as a table on stdout.
///
/// Clone URLs and the read/write member split are left out to keep rows
/// readable; the CSV and JSON formats carry every column.
pub fn print_inventory_table(records: &[InventoryRecord]) {
    println!("{}", render_inventory_table(records));
}

fn render_inventory_table(records: &[InventoryRecord]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{} {}", bright("📦"), bright("Inventory").underlined());

    if records.is_empty() {
        let _ = writeln!(output, "  {}", dim("No projects found"));
        return output;
    }

    let mut table = create_table();
    table.set_header(create_cyan_header(&TABLE_HEADER));

    for record in records {
        table.add_row(vec![
            comfy_table::Cell::new(&record.full_path),
            comfy_table::Cell::new(record.namespace),
            optional_cell(record.repository_size_mb.map(format_megabytes)),
            optional_cell(record.latest_merge_request_date.clone()),
            optional_cell(record.latest_commit_date.clone()),
            count_cell(record.merge_request_count),
            count_cell(record.pipeline_count),
            count_cell(record.total_commit_count),
            color_coded_admin_cell(record.admin_user_count, record.total_user_count),
            count_cell(record.total_user_count),
        ]);
    }

    let _ = writeln!(output, "{table}");

    let total_size: f64 = records.iter().filter_map(|r| r.repository_size_mb).sum();
    let _ = writeln!(
        output,
        "  {} projects, {} MB of repositories",
        records.len(),
        format_megabytes((total_size * 100.0).round() / 100.0)
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::NamespaceKind;

    fn record(full_path: &str, size: Option<f64>) -> InventoryRecord {
        InventoryRecord {
            id: 1,
            name: "api".to_string(),
            full_path: full_path.to_string(),
            namespace: NamespaceKind::Group,
            repository_size_mb: size,
            clone_url: format!("https://gitlab.com/{full_path}.git"),
            latest_merge_request_date: None,
            latest_commit_date: Some("2024-01-01T00:00:00Z".to_string()),
            merge_request_count: 1,
            pipeline_count: 2,
            total_commit_count: 10,
            read_user_count: 2,
            write_user_count: 1,
            admin_user_count: 1,
            total_user_count: 4,
        }
    }

    #[test]
    fn test_render_inventory_table() {
        let records = vec![record("acme/api", Some(2.0)), record("acme/web", Some(0.5))];
        let rendered = render_inventory_table(&records);

        assert!(rendered.contains("acme/api"));
        assert!(rendered.contains("acme/web"));
        assert!(rendered.contains("2024-01-01T00:00:00Z"));
        assert!(rendered.contains("2 projects, 2.5 MB of repositories"));
    }

    #[test]
    fn test_render_empty_inventory() {
        let rendered = render_inventory_table(&[]);
        assert!(rendered.contains("No projects found"));
    }
}
