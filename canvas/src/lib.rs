//! Pixel-grid editing model for TinyDots.
//!
//! This crate owns everything that happens on the drawing side of the app:
//! the square grid of colored cells being edited, the color helpers behind
//! the tint/shade swatches, the most-recently-used color history, and the
//! rendering of grids into rasters for the editor surface and thumbnails.
//! Nothing here talks to the network; the server and CLI crates move the
//! serialized pixel matrix around and hand it back to [`session`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`color`] | Hex/RGB conversion and tint/shade mixing |
//! | [`buffer`] | The square [`buffer::PixelBuffer`] |
//! | [`matrix`] | Persisted pixel-matrix codec (color and legacy 0/1 forms) |
//! | [`history`] | Bounded color history and the local key/value store |
//! | [`render`] | Surfaces, thumbnails, PNG export, image downsampling |
//! | [`session`] | The editing session state machine |
//! | [`gallery`] | Saved-drawing thumbnail cache |
//! | [`consts`] | Shared constants (grid sizes, history capacity, etc.) |

pub mod buffer;
pub mod color;
pub mod consts;
pub mod gallery;
pub mod history;
pub mod matrix;
pub mod render;
pub mod session;
