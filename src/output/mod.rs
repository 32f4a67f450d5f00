mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use exports::export_inventory;
pub use progress::PhaseProgress;
pub use styling::{dim, magenta_bold};
pub use summary::print_inventory_table;

/// Prints the glinventory banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("📦 glinventory"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("GitLab Project Inventory")
    );
}
