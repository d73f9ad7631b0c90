//! Score merging: sum per-dataset scores across every key, filter by a
//! minimum score, and sort descending.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::table::{KEY_COLUMN, SCORE_COLUMN, Table, TableError, format_score, parse_score};

/// Sums per-table scores for every key that appears in any input, then
/// filters and sorts.
///
/// A key absent from some table contributes zero from it. Rows with a summed
/// score below `min_score` are dropped; the rest are ordered by score
/// descending, with ties left in first-seen order.
pub fn merge_scores(tables: &[Table], min_score: f64) -> Result<Table> {
    if tables.is_empty() {
        return Err(TableError::EmptyInput.into());
    }

    // Running accumulator instead of chained outer joins: one pass per table,
    // keys recorded in first-seen order so the stable sort below keeps
    // insertion order among equal scores.
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();

    for table in tables {
        let key_idx = table.column_index(KEY_COLUMN)?;
        let score_idx = table.column_index(SCORE_COLUMN)?;

        for row in &table.rows {
            let key = &row[key_idx];
            let score = parse_score(SCORE_COLUMN, &row[score_idx])?;

            if !totals.contains_key(key) {
                order.push(key.clone());
            }
            *totals.entry(key.clone()).or_insert(0.0) += score;
        }
    }

    let mut merged: Vec<(String, f64)> = order
        .into_iter()
        .map(|key| {
            let total = totals[&key];
            (key, total)
        })
        .filter(|(_, total)| *total >= min_score)
        .collect();

    merged.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let rows = merged
        .into_iter()
        .map(|(key, total)| vec![key, format_score(total)])
        .collect();

    Ok(Table {
        columns: vec![KEY_COLUMN.to_string(), SCORE_COLUMN.to_string()],
        rows,
    })
}

/// Reads every annotated file, merges the scores, and saves the result.
/// Returns the number of rows that survived the filter.
pub fn merge_score_files(paths: &[PathBuf], min_score: f64, output: &Path) -> Result<usize> {
    let tables = paths
        .iter()
        .map(|p| Table::read_csv(p))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_scores(&tables, min_score).context("merging annotated tables")?;
    merged.write_csv(output)?;

    info!(path = %output.display(), rows = merged.len(), min_score, "Final merged file saved");
    Ok(merged.len())
}
