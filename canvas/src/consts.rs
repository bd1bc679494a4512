//! Shared constants for the canvas crate.

// ── Grid ────────────────────────────────────────────────────────

/// Grid dimension a fresh editing session starts with.
pub const DEFAULT_GRID_SIZE: usize = 32;

/// Grid dimensions offered by the size picker.
pub const GRID_SIZES: [usize; 4] = [8, 16, 32, 64];

/// Largest grid dimension `resize` accepts.
pub const MAX_GRID_SIZE: usize = 256;

// ── Color ───────────────────────────────────────────────────────

/// Color selected when a session starts.
pub const DEFAULT_COLOR: &str = "#000000";

/// Ink color used when displaying legacy `1` cells.
pub const LEGACY_INK_COLOR: &str = "#222222";

/// Mix amounts for the tint and shade swatch rows.
pub const SCALE_STEPS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

// ── History ─────────────────────────────────────────────────────

/// Maximum number of colors kept in the history.
pub const HISTORY_CAPACITY: usize = 5;

/// Local storage key holding the history as a JSON array.
pub const COLOR_HISTORY_KEY: &str = "tinydots.colorHistory";

// ── Thumbnails ──────────────────────────────────────────────────

/// Side length in pixels of sidebar and gallery thumbnails.
pub const THUMBNAIL_SIDE: u32 = 64;

/// Number of thumbnails shown in the sidebar before the gallery takes over.
pub const SIDEBAR_THUMB_LIMIT: usize = 4;
