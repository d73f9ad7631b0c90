//! Inner join between the merged score table and a positional dataset.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::table::{KEY_COLUMN, Table};

/// Suffix applied to colliding columns from the merged (left) side.
pub const LEFT_SUFFIX: &str = "_final";

/// Suffix applied to colliding columns from the positional (right) side.
pub const RIGHT_SUFFIX: &str = "_gps";

/// Inner join on `key`: only rows whose key appears on both sides survive.
///
/// The key column appears once, first. Non-key columns keep their names
/// unless both sides carry the same name, in which case each gets its side's
/// suffix. A key duplicated on one side pairs with every match on the other.
pub fn inner_join(
    left: &Table,
    right: &Table,
    key: &str,
    left_suffix: &str,
    right_suffix: &str,
) -> Result<Table> {
    let left_key = left.column_index(key)?;
    let right_key = right.column_index(key)?;

    let right_names: HashSet<&String> = right
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != right_key)
        .map(|(_, name)| name)
        .collect();
    let left_names: HashSet<&String> = left
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != left_key)
        .map(|(_, name)| name)
        .collect();

    let mut columns = vec![key.to_string()];
    for (i, name) in left.columns.iter().enumerate() {
        if i == left_key {
            continue;
        }
        if right_names.contains(name) {
            columns.push(format!("{name}{left_suffix}"));
        } else {
            columns.push(name.clone());
        }
    }
    for (i, name) in right.columns.iter().enumerate() {
        if i == right_key {
            continue;
        }
        if left_names.contains(name) {
            columns.push(format!("{name}{right_suffix}"));
        } else {
            columns.push(name.clone());
        }
    }

    let mut right_rows: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        right_rows.entry(row[right_key].as_str()).or_default().push(i);
    }

    let mut rows = Vec::new();
    for lrow in &left.rows {
        let Some(matches) = right_rows.get(lrow[left_key].as_str()) else {
            continue;
        };
        for &ri in matches {
            let rrow = &right.rows[ri];
            let mut out = Vec::with_capacity(columns.len());
            out.push(lrow[left_key].clone());
            for (i, cell) in lrow.iter().enumerate() {
                if i != left_key {
                    out.push(cell.clone());
                }
            }
            for (i, cell) in rrow.iter().enumerate() {
                if i != right_key {
                    out.push(cell.clone());
                }
            }
            rows.push(out);
        }
    }

    Ok(Table { columns, rows })
}

/// Reads the merged score table and the positional dataset, inner-joins them
/// on the key column, and saves the result. Returns the matching-row count.
pub fn join_with_positions(merged: &Path, positions: &Path, output: &Path) -> Result<usize> {
    let merged_table = Table::read_csv(merged)?;
    let positions_table = Table::read_csv(positions)?;

    let joined = inner_join(
        &merged_table,
        &positions_table,
        KEY_COLUMN,
        LEFT_SUFFIX,
        RIGHT_SUFFIX,
    )
    .with_context(|| {
        format!(
            "joining {} with {}",
            merged.display(),
            positions.display()
        )
    })?;
    joined.write_csv(output)?;

    info!(
        path = %output.display(),
        matching_records = joined.len(),
        "Merged file saved"
    );
    Ok(joined.len())
}
