//! The editing session: one grid, one tool, one active drawing.
//!
//! DESIGN
//! ======
//! `EditingSession` is the single owner of the pixel buffer while a page is
//! open. Every mutation goes through `&mut self`, so there is nothing to
//! lock. The session does not talk to the server; it produces a
//! [`SaveRequest`] and is told about results through [`EditingSession::on_saved`]
//! and [`EditingSession::on_deleted`].
//!
//! Read-only mode is entered by viewing a saved drawing. Paint calls are
//! ignored until the user starts a new drawing, resizes, or explicitly
//! opens a drawing for editing.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use image::RgbaImage;
use serde::Serialize;

use crate::buffer::PixelBuffer;
use crate::color;
use crate::consts::{DEFAULT_COLOR, DEFAULT_GRID_SIZE, MAX_GRID_SIZE};
use crate::history::ColorHistory;
use crate::matrix::{self, MatrixError, MatrixFormat};
use crate::render::{self, RenderError, Surface};

#[derive(Debug, thiserror::Error)]
pub enum SessionEditError {
    #[error("grid size {0} is outside the supported range")]
    InvalidGridSize(usize),
    #[error("drawing cannot be opened: {0}")]
    Matrix(#[from] MatrixError),
    #[error("image cannot be applied: {0}")]
    Render(#[from] RenderError),
}

/// What a paint call writes into a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Brush {
    Color(String),
    Erase,
}

/// Result of a paint call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintOutcome {
    /// The cell was written.
    pub painted: bool,
    /// The color history was reordered (and persisted).
    pub history_changed: bool,
}

/// Body of a save call: `id` is `None` for a drawing never saved before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub id: Option<i64>,
    pub pixel_data: String,
}

/// Text shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub grid: String,
    pub color: String,
    pub eraser: &'static str,
}

pub struct EditingSession {
    buffer: PixelBuffer,
    current_color: String,
    eraser: bool,
    read_only: bool,
    active_drawing_id: Option<i64>,
    picked_from_history: bool,
    history: ColorHistory,
}

impl EditingSession {
    /// Fresh session: empty default-size grid, black brush.
    #[must_use]
    pub fn new(history: ColorHistory) -> Self {
        Self {
            buffer: PixelBuffer::new(DEFAULT_GRID_SIZE),
            current_color: DEFAULT_COLOR.to_owned(),
            eraser: false,
            read_only: false,
            active_drawing_id: None,
            picked_from_history: false,
            history,
        }
    }

    // -------------------------------------------------------------------------
    // accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn grid_size(&self) -> usize {
        self.buffer.size()
    }

    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn current_color(&self) -> &str {
        &self.current_color
    }

    #[must_use]
    pub fn is_eraser(&self) -> bool {
        self.eraser
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub fn active_drawing_id(&self) -> Option<i64> {
        self.active_drawing_id
    }

    #[must_use]
    pub fn history(&self) -> &ColorHistory {
        &self.history
    }

    // -------------------------------------------------------------------------
    // painting
    // -------------------------------------------------------------------------

    /// Paint `(x, y)` with the current tool.
    pub fn paint(&mut self, x: usize, y: usize) -> PaintOutcome {
        let brush = if self.eraser { Brush::Erase } else { Brush::Color(self.current_color.clone()) };
        self.paint_with(x, y, brush)
    }

    /// Paint `(x, y)` with an explicit brush.
    ///
    /// Ignored when read-only or out of bounds. A color brush registers its
    /// color in the history unless the current color was picked from the
    /// history itself.
    pub fn paint_with(&mut self, x: usize, y: usize, brush: Brush) -> PaintOutcome {
        if self.read_only || x >= self.grid_size() || y >= self.grid_size() {
            return PaintOutcome::default();
        }
        match brush {
            Brush::Erase => PaintOutcome { painted: self.buffer.set(x, y, None), history_changed: false },
            Brush::Color(hex) => {
                let history_changed = !self.picked_from_history && self.history.register(&hex);
                let painted = self.buffer.set(x, y, Some(hex));
                PaintOutcome { painted, history_changed }
            }
        }
    }

    /// Redraw the whole grid onto `surface`.
    pub fn render(&self, surface: &mut dyn Surface) {
        render::render(&self.buffer, surface);
    }

    // -------------------------------------------------------------------------
    // grid lifecycle
    // -------------------------------------------------------------------------

    /// Replace the grid with an empty `size × size` one.
    ///
    /// Content is never rescaled. The session detaches from any saved drawing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionEditError::InvalidGridSize`] for 0 or sizes above
    /// [`MAX_GRID_SIZE`]; the session is left unchanged.
    pub fn resize(&mut self, size: usize) -> Result<(), SessionEditError> {
        if size == 0 || size > MAX_GRID_SIZE {
            return Err(SessionEditError::InvalidGridSize(size));
        }
        self.buffer = PixelBuffer::new(size);
        self.active_drawing_id = None;
        self.read_only = false;
        Ok(())
    }

    /// Start over on an empty grid of the current size.
    pub fn new_drawing(&mut self) {
        self.buffer = PixelBuffer::new(self.grid_size());
        self.active_drawing_id = None;
        self.read_only = false;
    }

    /// View a saved drawing without intent to overwrite it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionEditError::Matrix`] if `pixel_data` does not decode;
    /// the session is left unchanged.
    pub fn load_drawing(&mut self, pixel_data: &str, id: i64) -> Result<MatrixFormat, SessionEditError> {
        let format = self.open(pixel_data, Some(id))?;
        self.read_only = true;
        Ok(format)
    }

    /// Open a saved drawing for editing; the next save overwrites it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionEditError::Matrix`] if `pixel_data` does not decode;
    /// the session is left unchanged.
    pub fn edit_drawing(&mut self, pixel_data: &str, id: i64) -> Result<MatrixFormat, SessionEditError> {
        let format = self.open(pixel_data, Some(id))?;
        self.read_only = false;
        Ok(format)
    }

    /// Open a matrix that has no server row yet, e.g. one read from a file.
    ///
    /// # Errors
    ///
    /// Returns [`SessionEditError::Matrix`] if `pixel_data` does not decode;
    /// the session is left unchanged.
    pub fn import_drawing(&mut self, pixel_data: &str) -> Result<MatrixFormat, SessionEditError> {
        let format = self.open(pixel_data, None)?;
        self.read_only = false;
        Ok(format)
    }

    fn open(&mut self, pixel_data: &str, id: Option<i64>) -> Result<MatrixFormat, SessionEditError> {
        let decoded = matrix::decode(pixel_data)?;
        self.buffer = decoded.buffer;
        self.active_drawing_id = id;
        Ok(decoded.format)
    }

    /// Downsample an image onto the current grid as a new, unsaved drawing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionEditError::Render`] if resampling fails.
    pub fn apply_image(&mut self, image: &RgbaImage) -> Result<(), SessionEditError> {
        self.buffer = render::downsample(image, self.grid_size())?;
        self.active_drawing_id = None;
        self.read_only = false;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // tools
    // -------------------------------------------------------------------------

    /// Switch to a color brush.
    ///
    /// `from_history` marks the color as already registered so strokes with
    /// it do not reorder the history.
    pub fn set_color(&mut self, hex: &str, from_history: bool) {
        hex.clone_into(&mut self.current_color);
        self.eraser = false;
        self.picked_from_history = from_history;
    }

    pub fn select_eraser(&mut self) {
        self.eraser = true;
    }

    #[must_use]
    pub fn tints(&self) -> Vec<String> {
        color::tints(&self.current_color).unwrap_or_default()
    }

    #[must_use]
    pub fn shades(&self) -> Vec<String> {
        color::shades(&self.current_color).unwrap_or_default()
    }

    #[must_use]
    pub fn status(&self) -> StatusLine {
        let size = self.grid_size();
        StatusLine {
            grid: format!("{size}×{size}"),
            color: self.current_color.to_uppercase(),
            eraser: if self.eraser { "Active" } else { "Inactive" },
        }
    }

    // -------------------------------------------------------------------------
    // persistence handshake
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn serialize(&self) -> String {
        matrix::encode(&self.buffer)
    }

    #[must_use]
    pub fn save_request(&self) -> SaveRequest {
        SaveRequest { id: self.active_drawing_id, pixel_data: self.serialize() }
    }

    /// Record the id the server assigned so later saves update that row.
    pub fn on_saved(&mut self, id: i64) {
        self.active_drawing_id = Some(id);
    }

    /// React to a deleted drawing. Returns `true` if it was the active one,
    /// in which case the session resets to an empty grid.
    pub fn on_deleted(&mut self, id: i64) -> bool {
        if self.active_drawing_id != Some(id) {
            return false;
        }
        self.new_drawing();
        true
    }
}
