//! Score annotation: tag every record of a dataset with a constant score.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::table::{KEY_COLUMN, SCORE_COLUMN, Table, format_score};

/// Keeps only the key column and appends a constant `Score` column.
///
/// The output has the same row count and order as the source. Fails when the
/// source has no key column.
pub fn annotate(source: &Table, score: f64) -> Result<Table> {
    let mut out = source.select(&[KEY_COLUMN])?;
    out.columns.push(SCORE_COLUMN.to_string());

    let rendered = format_score(score);
    for row in &mut out.rows {
        row.push(rendered.clone());
    }

    Ok(out)
}

/// Reads `source`, annotates it with `score`, and saves the result to
/// `output`, overwriting any existing file. Returns the row count.
pub fn add_score_column(source: &Path, score: f64, output: &Path) -> Result<usize> {
    let table = Table::read_csv(source)?;
    let annotated =
        annotate(&table, score).with_context(|| format!("annotating {}", source.display()))?;
    annotated.write_csv(output)?;

    info!(path = %output.display(), rows = annotated.len(), score, "Updated file saved");
    Ok(annotated.len())
}
