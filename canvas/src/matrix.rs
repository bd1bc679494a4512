//! Persisted pixel-matrix codec.
//!
//! A saved drawing's `pixelData` is a JSON array of rows. Current drawings
//! store `"#rrggbb"` strings and `null`; older ones store `0`/`1` flags.
//! Nothing records which form a row uses, so decoding accepts both cell by
//! cell and reports what it saw. Encoding always writes the color form.

#[cfg(test)]
#[path = "matrix_test.rs"]
mod matrix_test;

use serde_json::Value;

use crate::buffer::{BufferError, Cell, PixelBuffer};
use crate::consts::LEGACY_INK_COLOR;

/// Which cell encoding a decoded matrix used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    /// Hex strings and nulls only.
    Color,
    /// `0`/`1` flags only.
    Legacy,
    /// Both forms in one matrix.
    Mixed,
    /// Every cell is `null`, so the form cannot be told.
    Blank,
}

#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    #[error("pixel data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pixel data is not an array of rows")]
    NotRows,
    #[error("unsupported cell value at ({x}, {y}): {value}")]
    BadCell { x: usize, y: usize, value: String },
    #[error(transparent)]
    Shape(#[from] BufferError),
}

/// A decoded matrix plus the encoding it was stored in.
#[derive(Debug, Clone)]
pub struct DecodedMatrix {
    pub buffer: PixelBuffer,
    pub format: MatrixFormat,
}

/// Serialize a buffer to the persisted string form.
#[must_use]
pub fn encode(buffer: &PixelBuffer) -> String {
    let rows: Vec<Value> = buffer
        .rows()
        .into_iter()
        .map(|row| Value::Array(row.into_iter().map(|cell| cell.map_or(Value::Null, Value::String)).collect()))
        .collect();
    Value::Array(rows).to_string()
}

/// Parse a persisted matrix in either the color or legacy form.
///
/// An empty color string is an empty cell.
///
/// # Errors
///
/// Returns [`MatrixError`] if the string is not JSON, not an array of
/// arrays, not square, or contains a cell that is neither a string, `null`,
/// `0` nor `1`.
pub fn decode(raw: &str) -> Result<DecodedMatrix, MatrixError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(rows) = value else {
        return Err(MatrixError::NotRows);
    };

    let mut saw_color = false;
    let mut saw_legacy = false;
    let mut decoded = Vec::with_capacity(rows.len());

    for (y, row) in rows.into_iter().enumerate() {
        let Value::Array(values) = row else {
            return Err(MatrixError::NotRows);
        };
        let mut cells: Vec<Cell> = Vec::with_capacity(values.len());
        for (x, value) in values.into_iter().enumerate() {
            let cell = match value {
                Value::Null => None,
                Value::String(color) => {
                    saw_color = true;
                    (!color.is_empty()).then_some(color)
                }
                Value::Number(ref n) => {
                    saw_legacy = true;
                    match n.as_u64() {
                        Some(0) => None,
                        Some(1) => Some(LEGACY_INK_COLOR.to_owned()),
                        _ => return Err(MatrixError::BadCell { x, y, value: value.to_string() }),
                    }
                }
                other => return Err(MatrixError::BadCell { x, y, value: other.to_string() }),
            };
            cells.push(cell);
        }
        decoded.push(cells);
    }

    let buffer = PixelBuffer::from_rows(decoded)?;
    let format = match (saw_color, saw_legacy) {
        (true, true) => MatrixFormat::Mixed,
        (true, false) => MatrixFormat::Color,
        (false, true) => MatrixFormat::Legacy,
        (false, false) => MatrixFormat::Blank,
    };
    Ok(DecodedMatrix { buffer, format })
}

/// Grid dimension of a well-formed matrix, `None` if it does not decode.
#[must_use]
pub fn grid_size(raw: &str) -> Option<usize> {
    decode(raw).ok().map(|m| m.buffer.size())
}
