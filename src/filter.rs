//! Null-check row filtering. A filter keeps the rows of a sheet whose primary
//! column is non-null and whose operation columns satisfy the selected null
//! check, combined with AND or OR. The result is a new sheet holding only the
//! primary and operation columns, in that order.

use tracing::debug;

use crate::domain::SvError;
use crate::sheet::{Cell, Column, Sheet, NULL_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullMode {
    IsNull,
    IsNotNull,
}

/// Which rows and columns to retain. The row range is 1-based and inclusive
/// and always refers to the original row positions of the input sheet.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    pub primary_column: String,
    pub operation_columns: Vec<String>,
    pub combine: Combine,
    pub null_mode: NullMode,
    pub range_from: usize,
    pub range_to: usize,
}

/// Pure row filter. Never mutates the input; out-of-range bounds are not an
/// error and simply yield a partial or empty result.
pub fn filter(sheet: &Sheet, spec: &FilterSpec) -> Result<Sheet, SvError> {
    if spec.primary_column.trim().is_empty() {
        return Err(SvError::InvalidSpec("primary column is required".into()));
    }
    if spec.operation_columns.is_empty() {
        return Err(SvError::InvalidSpec(
            "at least one operation column is required".into(),
        ));
    }

    // A column name that does not exist resolves to None and behaves exactly
    // like an all-null column.
    let primary = sheet.column(&spec.primary_column);
    let ops: Vec<Option<&Column>> = spec
        .operation_columns
        .iter()
        .map(|name| sheet.column(name))
        .collect();

    let mut retained: Vec<usize> = Vec::new();
    for row in 0..sheet.nrows() {
        // Range check on the pre-filter row position.
        if row + 1 < spec.range_from || row + 1 > spec.range_to {
            continue;
        }
        // A null primary excludes the row no matter the combinator.
        if is_null_at(primary, row) {
            continue;
        }
        let mut checks = ops.iter().map(|col| {
            let null = is_null_at(*col, row);
            match spec.null_mode {
                NullMode::IsNull => null,
                NullMode::IsNotNull => !null,
            }
        });
        let keep = match spec.combine {
            Combine::And => checks.all(|p| p),
            Combine::Or => checks.any(|p| p),
        };
        if keep {
            retained.push(row);
        }
    }
    debug!(
        "Filter on \"{}\" retained {} of {} rows",
        spec.primary_column,
        retained.len(),
        sheet.nrows()
    );

    let mut columns = Vec::with_capacity(1 + spec.operation_columns.len());
    columns.push(output_column(&spec.primary_column, primary, &retained));
    for (name, col) in spec.operation_columns.iter().zip(&ops) {
        columns.push(output_column(name, *col, &retained));
    }
    Ok(Sheet::new(format!("F[{}]", sheet.name), columns))
}

fn is_null_at(column: Option<&Column>, row: usize) -> bool {
    column
        .and_then(|c| c.data.get(row))
        .is_none_or(Cell::is_null)
}

// Retained null/empty values are replaced with the literal NULL marker; this
// is display normalization, not a semantic null.
fn output_column(name: &str, column: Option<&Column>, rows: &[usize]) -> Column {
    let data = rows
        .iter()
        .map(|&row| match column.and_then(|c| c.data.get(row)) {
            Some(cell) if !cell.is_null() => cell.clone(),
            _ => Cell::Text(NULL_MARKER.to_string()),
        })
        .collect();
    Column::new(name, data)
}
