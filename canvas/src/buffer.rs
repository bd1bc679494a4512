//! The square pixel buffer being edited.
//!
//! Cells are stored row-major as `Option<String>`: `None` is an empty
//! (transparent) cell, `Some` holds the hex color string exactly as it was
//! painted. Colors are not normalized here so history matching stays an
//! exact string comparison.

#[cfg(test)]
#[path = "buffer_test.rs"]
mod buffer_test;

/// One grid cell: `None` when empty.
pub type Cell = Option<String>;

/// Errors from building a buffer out of raw rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("pixel matrix has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    NotSquare { row: usize, expected: usize, found: usize },
}

/// A `size × size` grid of nullable colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: usize,
    cells: Vec<Cell>,
}

impl PixelBuffer {
    /// Allocate an all-empty buffer.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self { size, cells: vec![None; size * size] }
    }

    /// Build a buffer from row vectors. Every row must be `rows.len()` long.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError`] if there are no rows or any row length differs
    /// from the row count.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, BufferError> {
        let size = rows.len();
        if size == 0 {
            return Err(BufferError::Empty);
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(BufferError::NotSquare { row, expected: size, found: values.len() });
            }
            cells.extend(values);
        }
        Ok(Self { size, cells })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.size && y < self.size).then(|| y * self.size + x)
    }

    /// Color at `(x, y)`, or `None` when empty or out of bounds.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<&str> {
        self.index(x, y)
            .and_then(|i| self.cells[i].as_deref())
    }

    /// Write a cell. Returns `false` (and does nothing) when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Empty every cell, keeping the size.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Copy out as row vectors, the shape used by the persisted matrix.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        if self.size == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(self.size)
            .map(<[Cell]>::to_vec)
            .collect()
    }

    /// Iterate painted cells as `(x, y, color)`.
    pub fn painted(&self) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_deref().map(|color| (i % self.size, i / self.size, color)))
    }
}
