use super::*;

fn checkerboard(size: usize) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(size);
    for y in 0..size {
        for x in 0..size {
            if (x + y) % 2 == 0 {
                buffer.set(x, y, Some("#ff0000".into()));
            }
        }
    }
    buffer
}

/// Surface that records calls, to check `render` without pixels.
#[derive(Default)]
struct RecordingSurface {
    size: Option<usize>,
    fills: Vec<(usize, usize, Rgb)>,
}

impl Surface for RecordingSurface {
    fn reset(&mut self, size: usize) {
        self.size = Some(size);
        self.fills.clear();
    }

    fn fill_cell(&mut self, x: usize, y: usize, color: Rgb) {
        self.fills.push((x, y, color));
    }

    fn clear_cell(&mut self, _x: usize, _y: usize) {}
}

#[test]
fn render_resets_and_fills_painted_cells_only() {
    let mut buffer = PixelBuffer::new(4);
    buffer.set(1, 2, Some("#00ff00".into()));
    buffer.set(3, 3, Some("not-a-color".into()));

    let mut surface = RecordingSurface::default();
    render(&buffer, &mut surface);

    assert_eq!(surface.size, Some(4));
    assert_eq!(surface.fills, vec![(1, 2, Rgb::new(0, 255, 0))]);
}

#[test]
fn render_to_raster_maps_cells_to_pixels() {
    let raster = render_to_raster(&checkerboard(4));
    assert_eq!((raster.width(), raster.height()), (4, 4));
    assert_eq!(raster.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(raster.pixel(1, 0), Some([0, 0, 0, 0]));
    assert_eq!(raster.pixel(4, 0), None);
}

#[test]
fn clear_cell_makes_pixel_transparent() {
    let mut raster = render_to_raster(&checkerboard(2));
    raster.clear_cell(0, 0);
    assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn thumbnail_scales_cells() {
    let mut buffer = PixelBuffer::new(8);
    buffer.set(0, 0, Some("#0000ff".into()));
    let thumb = render_default_thumbnail(&buffer);

    assert_eq!((thumb.width(), thumb.height()), (THUMBNAIL_SIDE, THUMBNAIL_SIDE));
    // 64 / 8 = 8 pixels per cell.
    assert_eq!(thumb.pixel(7, 7), Some([0, 0, 255, 255]));
    assert_eq!(thumb.pixel(8, 0), Some([0, 0, 0, 0]));
    assert_eq!(thumb.pixel(0, 8), Some([0, 0, 0, 0]));
}

#[test]
fn thumbnail_covers_whole_side_for_full_grid() {
    let mut buffer = PixelBuffer::new(3);
    for y in 0..3 {
        for x in 0..3 {
            buffer.set(x, y, Some("#000000".into()));
        }
    }
    let thumb = render_thumbnail(&buffer, 64);
    for (x, y) in [(0, 0), (63, 63), (21, 42), (42, 21)] {
        assert_eq!(thumb.pixel(x, y), Some([0, 0, 0, 255]), "pixel ({x}, {y})");
    }
}

fn painted_pixels(raster: &Raster) -> usize {
    raster.as_image().pixels().filter(|p| p.0[3] != 0).count()
}

#[test]
fn thumbnail_keeps_single_cell_when_grid_exceeds_side() {
    let mut buffer = PixelBuffer::new(32);
    buffer.set(2, 0, Some("#ff0000".into()));
    let thumb = render_thumbnail(&buffer, 10);

    assert_eq!(painted_pixels(&thumb), 1);
    // 2 * 10 / 32 floors to 0.
    assert_eq!(thumb.pixel(0, 0), Some([255, 0, 0, 255]));
}

#[test]
fn thumbnail_keeps_column_on_large_grid() {
    let mut buffer = PixelBuffer::new(128);
    for y in 0..128 {
        buffer.set(1, y, Some("#00ff00".into()));
    }
    let thumb = render_default_thumbnail(&buffer);

    assert_eq!(painted_pixels(&thumb), 64);
    for y in 0..64 {
        assert_eq!(thumb.pixel(0, y), Some([0, 255, 0, 255]), "row {y}");
    }
}

#[test]
fn png_export_round_trips_through_decoder() {
    let raster = render_to_raster(&checkerboard(4));
    let png = encode_png(&raster).unwrap();
    assert_eq!(&png[1..4], b"PNG");

    let url = png_data_url(&raster).unwrap();
    let payload = url.strip_prefix("data:image/png;base64,").unwrap();
    let decoded = decode_base64_image(payload).unwrap();
    assert_eq!(decoded, *raster.as_image());
}

#[test]
fn decode_base64_image_rejects_bad_payloads() {
    assert!(matches!(decode_base64_image("%%%"), Err(RenderError::Base64(_))));
    let not_png = BASE64.encode(b"hello");
    assert!(matches!(decode_base64_image(&not_png), Err(RenderError::Image(_))));
}

#[test]
fn downsample_maps_colors_and_transparency() {
    let mut image = RgbaImage::new(64, 64);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        *pixel = if x < 32 && y < 32 { Rgba([0x12, 0x34, 0x56, 255]) } else { Rgba([0, 0, 0, 0]) };
    }

    let buffer = downsample(&image, 8).unwrap();
    assert_eq!(buffer.size(), 8);
    assert_eq!(buffer.get(0, 0), Some("#123456"));
    assert_eq!(buffer.get(3, 3), Some("#123456"));
    assert_eq!(buffer.get(7, 7), None);
    assert_eq!(buffer.get(7, 0), None);
}

#[test]
fn downsample_rejects_zero_grid() {
    let image = RgbaImage::new(4, 4);
    assert!(matches!(downsample(&image, 0), Err(RenderError::EmptyGrid)));
}
