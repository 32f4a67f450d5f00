use std::io::Write;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::inventory::{InventoryRecord, REPORT_HEADER};

/// Exports inventory records to a file-oriented format.
///
/// - CSV: the fixed 13-column inventory report
/// - JSON: one object per record, for programmatic access
pub fn export_inventory(
    records: &[InventoryRecord],
    format: OutputFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            // Table format is printed to stdout in cli.rs
            unreachable!("Table format should be handled in CLI")
        }
        OutputFormat::Json => export_json(records, pretty, output),
        OutputFormat::Csv => export_csv(records, output),
    }
}

fn export_json(records: &[InventoryRecord], pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    writeln!(output, "{}", json)?;
    Ok(())
}

fn export_csv(records: &[InventoryRecord], output: &mut dyn Write) -> Result<()> {
    write_csv_row(output, &REPORT_HEADER)?;

    for record in records {
        write_csv_row(output, &record.to_row())?;
    }

    output.flush()?;
    Ok(())
}

fn write_csv_row<S: AsRef<str>>(output: &mut dyn Write, cells: &[S]) -> Result<()> {
    let line = cells
        .iter()
        .map(|cell| csv_field(cell.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    write!(output, "{line}\r\n")?;
    Ok(())
}

/// Quotes a field only when it holds a delimiter, a quote or a line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
