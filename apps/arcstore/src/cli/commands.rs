//! # CLI Command Implementations

use super::CliError;
use crate::input::Input;
use arcstore_core::{EdgeRecord, GraphTable, ReadWalkInput, StoreClient};
use std::io::Read;
use std::path::PathBuf;

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create the graph table, offering to delete and replace an existing one.
pub fn cmd_init<C: StoreClient>(
    table: &GraphTable<C>,
    input: &mut Input,
    force: bool,
) -> Result<(), CliError> {
    if table.exists() {
        let replace = force
            || input.confirm(&format!(
                "Table '{}' already exists, would you like to delete and replace it?",
                table.name()
            ))?;
        if !replace {
            // Creating over an existing table would only surface a
            // conflict error, so stop here.
            println!("Keeping existing table '{}'", table.name());
            return Ok(());
        }
        table.delete()?;
        tracing::info!(table = table.name(), "deleted existing table");
    }

    table.create()?;
    println!("Created table '{}'", table.name());
    Ok(())
}

// =============================================================================
// READ COMMAND
// =============================================================================

/// Page through stored edges, printing each record's canonical form and
/// a running total. Non-final pages wait for Enter before continuing.
pub fn cmd_read<C: StoreClient>(
    table: &GraphTable<C>,
    input: &mut Input,
    limit: u32,
    source: Option<String>,
    destination: Option<String>,
) -> Result<(), CliError> {
    if !table.exists() {
        println!("Could not locate table '{}'", table.name());
        return Ok(());
    }

    let filter = |record: &EdgeRecord| {
        source.as_deref().is_none_or(|s| record.source() == s)
            && destination.as_deref().is_none_or(|d| record.target() == d)
    };

    let mut total: u64 = 0;
    let mut prompt_error: Option<std::io::Error> = None;
    table.read_walk_filtered(ReadWalkInput::new(limit), filter, |page, is_last| {
        for record in &page.records {
            println!("{record}");
        }
        total += page.count;
        println!("Total: {total} rows");
        if is_last {
            return false;
        }
        match input.continue_prompt() {
            Ok(proceed) => proceed,
            Err(e) => {
                prompt_error = Some(e);
                false
            }
        }
    })?;

    if let Some(e) = prompt_error {
        return Err(e.into());
    }
    Ok(())
}

// =============================================================================
// LOAD COMMAND
// =============================================================================

/// Column designated as the origin node identifier in import files.
const SOURCE_COLUMN: &str = "source";

/// Column designated as the destination node identifier in import files.
const TARGET_COLUMN: &str = "target";

/// Import CSV files into the table, one put per row. A failed put
/// aborts the remaining rows; rows already written stay written.
pub fn cmd_load<C: StoreClient>(table: &GraphTable<C>, files: &[PathBuf]) -> Result<(), CliError> {
    if !table.exists() {
        println!("Could not locate table '{}'", table.name());
        return Ok(());
    }

    let mut total: u64 = 0;
    for path in files {
        let reader = csv::Reader::from_path(path)?;
        let loaded = load_rows(table, reader, &path.display().to_string())?;
        tracing::info!(file = %path.display(), rows = loaded, "imported file");
        total += loaded;
    }

    println!("Loaded {total} records");
    Ok(())
}

fn load_rows<C: StoreClient, R: Read>(
    table: &GraphTable<C>,
    mut reader: csv::Reader<R>,
    label: &str,
) -> Result<u64, CliError> {
    let headers = reader.headers()?.clone();
    let source_index = column_index(&headers, SOURCE_COLUMN, label)?;
    let target_index = column_index(&headers, TARGET_COLUMN, label)?;

    let mut count = 0;
    for row in reader.records() {
        let row = row?;
        let record = record_from_row(&headers, &row, source_index, target_index)?;
        table.put(&record)?;
        count += 1;
    }
    Ok(count)
}

fn column_index(
    headers: &csv::StringRecord,
    column: &str,
    label: &str,
) -> Result<usize, CliError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| CliError::Input(format!("{label}: missing required column '{column}'")))
}

/// Build one edge record from a CSV row: the designated columns become
/// the composite key, every other column an extra attribute keyed by
/// its header name.
fn record_from_row(
    headers: &csv::StringRecord,
    row: &csv::StringRecord,
    source_index: usize,
    target_index: usize,
) -> Result<EdgeRecord, CliError> {
    let source = row
        .get(source_index)
        .ok_or_else(|| CliError::Input("row is missing its source field".to_string()))?;
    let target = row
        .get(target_index)
        .ok_or_else(|| CliError::Input("row is missing its target field".to_string()))?;

    let mut record = EdgeRecord::new(source, target);
    for (index, value) in row.iter().enumerate() {
        if index == source_index || index == target_index {
            continue;
        }
        let header = headers
            .get(index)
            .ok_or_else(|| CliError::Input("row has more fields than headers".to_string()))?;
        record.insert_extra(header, value)?;
    }
    Ok(record)
}

// =============================================================================
// DROP COMMAND
// =============================================================================

/// Delete the table and all of its data after confirmation.
pub fn cmd_drop<C: StoreClient>(
    table: &GraphTable<C>,
    input: &mut Input,
    force: bool,
) -> Result<(), CliError> {
    if !table.exists() {
        println!("Could not locate table '{}'", table.name());
        return Ok(());
    }

    let confirmed = force
        || input.confirm(&format!(
            "Delete table '{}' and all of its data?",
            table.name()
        ))?;
    if !confirmed {
        println!("Aborted");
        return Ok(());
    }

    table.delete()?;
    println!("Deleted table '{}'", table.name());
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
