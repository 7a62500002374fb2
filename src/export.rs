//! Report output: notes CSV, raw asset JSON, console count

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::types::{AssetRecord, FilteredNoteRecord};

/// CSV header, in output order
pub const NOTE_COLUMNS: [&str; 8] = [
    "ticket_id",
    "details",
    "ticketNumber",
    "assigneeName",
    "queueName",
    "accountName",
    "createdByName",
    "createdOn",
];

/// Write the header and one row per note; the header is written even with no rows
pub fn write_notes_csv<W: Write>(writer: W, rows: &[FilteredNoteRecord]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(NOTE_COLUMNS)
        .context("Failed to write CSV header")?;
    for row in rows {
        csv.write_record(row.csv_fields())
            .with_context(|| format!("Failed to write note row for ticket {}", row.ticket_id))?;
    }
    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Create (or overwrite) `path` with the notes CSV
pub fn export_notes_csv(path: &Path, rows: &[FilteredNoteRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_notes_csv(BufWriter::new(file), rows)?;
    info!("Filtered notes exported to {}", path.display());
    Ok(())
}

/// Write the assets as a single JSON array, untransformed
pub fn write_assets_json<W: Write>(mut writer: W, assets: &[AssetRecord]) -> Result<()> {
    serde_json::to_writer(&mut writer, assets).context("Failed to serialize assets")?;
    writer.flush().context("Failed to flush JSON output")?;
    Ok(())
}

/// Create (or overwrite) `path` with the raw asset list
pub fn export_assets_json(path: &Path, assets: &[AssetRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_assets_json(BufWriter::new(file), assets)?;
    info!("Asset list exported to {}", path.display());
    Ok(())
}

/// Print the aggregate count
pub fn report_agent_count<W: Write>(mut out: W, count: usize) -> std::io::Result<()> {
    writeln!(out, "Total computer agents: {count}")
}
