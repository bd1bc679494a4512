//! Grid rendering: editor surface, thumbnails, PNG export, downsampling.
//!
//! The editor draws one device pixel per cell and lets the host scale the
//! surface up with smoothing disabled, so the core renderer only needs to
//! fill or clear single cells. Thumbnails are fixed-size previews where each
//! cell becomes a `side / grid` square.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};

use crate::buffer::PixelBuffer;
use crate::color::{Rgb, parse_hex_rgb};
use crate::consts::THUMBNAIL_SIDE;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("image payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image decode/encode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("grid size must be at least 1")]
    EmptyGrid,
}

// =============================================================================
// SURFACE
// =============================================================================

/// Anything the editor can paint cells onto.
pub trait Surface {
    /// Resize to `size × size` cells and clear everything.
    fn reset(&mut self, size: usize);
    /// Paint one cell.
    fn fill_cell(&mut self, x: usize, y: usize, color: Rgb);
    /// Make one cell transparent.
    fn clear_cell(&mut self, x: usize, y: usize);
}

/// An RGBA raster. As a [`Surface`] it maps one cell to one pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    /// Fully transparent raster.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height) }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel at `(x, y)` as `[r, g, b, a]`, `None` out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width() && y < self.height()).then(|| self.image.get_pixel(x, y).0)
    }

    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Fill the half-open pixel rectangle `[x0, x1) × [y0, y1)`, clipped.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb) {
        let x1 = x1.min(self.width());
        let y1 = y1.min(self.height());
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, Rgba([color.r, color.g, color.b, 255]));
            }
        }
    }
}

impl Surface for Raster {
    fn reset(&mut self, size: usize) {
        let side = u32::try_from(size).unwrap_or(u32::MAX);
        self.image = RgbaImage::new(side, side);
    }

    fn fill_cell(&mut self, x: usize, y: usize, color: Rgb) {
        if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
            self.fill_rect(x, y, x.saturating_add(1), y.saturating_add(1), color);
        }
    }

    fn clear_cell(&mut self, x: usize, y: usize) {
        if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
            if x < self.width() && y < self.height() {
                self.image.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
    }
}

// =============================================================================
// DRAWING
// =============================================================================

/// Redraw the whole buffer onto `surface`.
///
/// Cells holding strings that are not hex colors are left transparent.
pub fn render(buffer: &PixelBuffer, surface: &mut dyn Surface) {
    surface.reset(buffer.size());
    for (x, y, color) in buffer.painted() {
        if let Some(rgb) = parse_hex_rgb(color) {
            surface.fill_cell(x, y, rgb);
        }
    }
}

/// Render the buffer at one pixel per cell.
#[must_use]
pub fn render_to_raster(buffer: &PixelBuffer) -> Raster {
    let mut raster = Raster::new(0, 0);
    render(buffer, &mut raster);
    raster
}

/// Render a `side × side` preview, scaling each cell to `side / grid` pixels.
///
/// Cell edges are floored; a painted cell always keeps at least one pixel,
/// so grids larger than `side` overlap neighbours instead of vanishing.
#[must_use]
pub fn render_thumbnail(buffer: &PixelBuffer, side: u32) -> Raster {
    let mut raster = Raster::new(side, side);
    let size = buffer.size() as u64;
    if size == 0 {
        return raster;
    }
    let edge = |i: usize| -> u32 { u32::try_from(i as u64 * u64::from(side) / size).unwrap_or(side) };
    for (x, y, color) in buffer.painted() {
        if let Some(rgb) = parse_hex_rgb(color) {
            let (x0, y0) = (edge(x), edge(y));
            let x1 = edge(x + 1).max(x0 + 1);
            let y1 = edge(y + 1).max(y0 + 1);
            raster.fill_rect(x0, y0, x1, y1, rgb);
        }
    }
    raster
}

/// Sidebar/gallery sized thumbnail.
#[must_use]
pub fn render_default_thumbnail(buffer: &PixelBuffer) -> Raster {
    render_thumbnail(buffer, THUMBNAIL_SIDE)
}

// =============================================================================
// EXPORT
// =============================================================================

/// Encode the raster as PNG bytes.
///
/// # Errors
///
/// Returns [`RenderError::Image`] if the encoder fails.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(raster.image.clone()).write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

/// Encode the raster as a `data:image/png;base64,...` URL.
///
/// # Errors
///
/// Returns [`RenderError::Image`] if the encoder fails.
pub fn png_data_url(raster: &Raster) -> Result<String, RenderError> {
    let bytes = encode_png(raster)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
}

// =============================================================================
// IMPORT
// =============================================================================

/// Decode a base64 image payload (as returned by the generation endpoint).
///
/// # Errors
///
/// Returns [`RenderError`] if the payload is not base64 or not a decodable image.
pub fn decode_base64_image(payload: &str) -> Result<RgbaImage, RenderError> {
    let bytes = BASE64.decode(payload.trim())?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

/// Resample an image onto a `grid × grid` buffer with nearest-neighbour
/// sampling. Fully transparent pixels become empty cells.
///
/// # Errors
///
/// Returns [`RenderError::EmptyGrid`] when `grid` is zero.
pub fn downsample(image: &RgbaImage, grid: usize) -> Result<PixelBuffer, RenderError> {
    let side = u32::try_from(grid).map_err(|_| RenderError::EmptyGrid)?;
    if side == 0 {
        return Err(RenderError::EmptyGrid);
    }
    let mut buffer = PixelBuffer::new(grid);
    if image.width() == 0 || image.height() == 0 {
        return Ok(buffer);
    }
    let small = imageops::resize(image, side, side, FilterType::Nearest);
    for (x, y, pixel) in small.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue;
        }
        buffer.set(x as usize, y as usize, Some(Rgb::new(r, g, b).to_hex()));
    }
    Ok(buffer)
}
