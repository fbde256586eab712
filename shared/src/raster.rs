use base64::{engine::general_purpose, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::color::Rgb;
use crate::error::RasterError;
use crate::Point;

pub const LINE_WIDTH: f32 = 3.0;
const BYTES_PER_PIXEL: usize = 4;

/// Region of the raster touched by an operation, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Bounding box of non-transparent pixels.
///
/// An empty raster yields the degenerate box `min = (width, height)`,
/// `max = (0, 0)`; its center is still well defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl PixelBounds {
    pub fn center(&self) -> Point {
        Point {
            x: (self.min_x as f32 + self.max_x as f32) / 2.0,
            y: (self.min_y as f32 + self.max_y as f32) / 2.0,
        }
    }
}

/// RGBA8 pixel buffer backing the drawing surface.
#[derive(Clone, Debug)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn full_rect(&self) -> DirtyRect {
        DirtyRect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    /// Resizes the buffer, keeping whatever overlaps the old area.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        let mut next = Raster::new(width, height);
        let copy_width = self.width.min(width) as usize * BYTES_PER_PIXEL;
        for y in 0..self.height.min(height) as usize {
            let src = y * self.width as usize * BYTES_PER_PIXEL;
            let dst = y * width as usize * BYTES_PER_PIXEL;
            next.pixels[dst..dst + copy_width].copy_from_slice(&self.pixels[src..src + copy_width]);
        }
        *self = next;
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(BYTES_PER_PIXEL).all(|px| px[3] == 0)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Strokes a round-capped segment. Pixels whose centers lie within half
    /// the line width of the segment take the color at full opacity.
    pub fn stroke_segment(
        &mut self,
        from: Point,
        to: Point,
        color: Rgb,
        line_width: f32,
    ) -> Option<DirtyRect> {
        if self.width == 0 || self.height == 0 || !from.is_finite() || !to.is_finite() {
            return None;
        }
        let radius = (line_width / 2.0).max(0.5) as f64;
        let left = (from.x.min(to.x) as f64 - radius).floor().max(0.0);
        let top = (from.y.min(to.y) as f64 - radius).floor().max(0.0);
        let right = (from.x.max(to.x) as f64 + radius).ceil().min(self.width as f64 - 1.0);
        let bottom = (from.y.max(to.y) as f64 + radius).ceil().min(self.height as f64 - 1.0);
        if left > right || top > bottom {
            return None;
        }
        let (left, top, right, bottom) = (left as u32, top as u32, right as u32, bottom as u32);
        let rgba = color.rgba();
        let mut touched = false;
        for y in top..=bottom {
            for x in left..=right {
                let distance = distance_to_segment(
                    x as f64 + 0.5,
                    y as f64 + 0.5,
                    from.x as f64,
                    from.y as f64,
                    to.x as f64,
                    to.y as f64,
                );
                if distance <= radius {
                    let i = self.index(x, y);
                    self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&rgba);
                    touched = true;
                }
            }
        }
        touched.then_some(DirtyRect {
            x: left,
            y: top,
            width: right - left + 1,
            height: bottom - top + 1,
        })
    }

    pub fn opaque_bounds(&self) -> PixelBounds {
        let mut bounds = PixelBounds {
            min_x: self.width,
            min_y: self.height,
            max_x: 0,
            max_y: 0,
        };
        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixels[self.index(x, y) + 3] > 0 {
                    bounds.min_x = bounds.min_x.min(x);
                    bounds.min_y = bounds.min_y.min(y);
                    bounds.max_x = bounds.max_x.max(x);
                    bounds.max_y = bounds.max_y.max(y);
                }
            }
        }
        bounds
    }

    /// Copies a sub-rectangle out as tightly packed RGBA rows.
    pub fn region_rgba(&self, rect: DirtyRect) -> Vec<u8> {
        let right = (rect.x + rect.width).min(self.width);
        let bottom = (rect.y + rect.height).min(self.height);
        if rect.x >= right || rect.y >= bottom {
            return Vec::new();
        }
        let row_len = (right - rect.x) as usize * BYTES_PER_PIXEL;
        let mut out = Vec::with_capacity(row_len * (bottom - rect.y) as usize);
        for y in rect.y..bottom {
            let start = self.index(rect.x, y);
            out.extend_from_slice(&self.pixels[start..start + row_len]);
        }
        out
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(&self.pixels, self.width, self.height, ExtendedColorType::Rgba8)
            .map_err(|error| RasterError::Encode(error.to_string()))?;
        Ok(bytes)
    }

    pub fn to_png_data_url(&self) -> Result<String, RasterError> {
        let bytes = self.encode_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(bytes)
        ))
    }
}

pub fn distance_to_segment(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
        return ((px - x1).powi(2) + (py - y1).powi(2)).sqrt();
    }
    let t = ((px - x1) * dx + (py - y1) * dy) / (dx * dx + dy * dy);
    let t = t.clamp(0.0, 1.0);
    let proj_x = x1 + t * dx;
    let proj_y = y1 + t * dy;
    ((px - proj_x).powi(2) + (py - proj_y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn new_raster_is_transparent() {
        let raster = Raster::new(8, 4);
        assert_eq!(raster.pixels().len(), 8 * 4 * 4);
        assert!(raster.is_blank());
    }

    #[test]
    fn horizontal_segment_paints_its_pixels_only() {
        let mut raster = Raster::new(40, 40);
        let dirty = raster
            .stroke_segment(Point::new(10.0, 10.0), Point::new(30.0, 10.0), RED, LINE_WIDTH)
            .unwrap();
        assert_eq!(raster.pixel(20, 10), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(20, 9), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(20, 20), Some([0, 0, 0, 0]));
        assert_eq!(raster.pixel(5, 10), Some([0, 0, 0, 0]));
        assert!(dirty.x <= 9 && dirty.x + dirty.width >= 31);
        assert!(dirty.y <= 9 && dirty.y + dirty.height >= 11);
    }

    #[test]
    fn segment_outside_surface_is_ignored() {
        let mut raster = Raster::new(10, 10);
        let dirty = raster.stroke_segment(
            Point::new(50.0, 50.0),
            Point::new(60.0, 60.0),
            RED,
            LINE_WIDTH,
        );
        assert_eq!(dirty, None);
        assert!(raster.is_blank());
    }

    #[test]
    fn non_finite_points_are_ignored() {
        let mut raster = Raster::new(10, 10);
        let dirty = raster.stroke_segment(
            Point::new(f32::NAN, 1.0),
            Point::new(5.0, 5.0),
            RED,
            LINE_WIDTH,
        );
        assert_eq!(dirty, None);
    }

    #[test]
    fn bounds_of_empty_raster_are_degenerate() {
        let raster = Raster::new(100, 50);
        let bounds = raster.opaque_bounds();
        assert_eq!(
            bounds,
            PixelBounds {
                min_x: 100,
                min_y: 50,
                max_x: 0,
                max_y: 0
            }
        );
        assert_eq!(bounds.center(), Point::new(50.0, 25.0));
    }

    #[test]
    fn bounds_cover_painted_pixels() {
        let mut raster = Raster::new(100, 100);
        raster.stroke_segment(Point::new(20.0, 30.0), Point::new(60.0, 30.0), RED, LINE_WIDTH);
        let bounds = raster.opaque_bounds();
        assert_eq!(bounds.min_x, 19);
        assert_eq!(bounds.max_x, 60);
        assert_eq!(bounds.min_y, 28);
        assert_eq!(bounds.max_y, 31);
        assert_eq!(bounds.center().y, 29.5);
    }

    #[test]
    fn resize_keeps_overlap() {
        let mut raster = Raster::new(10, 10);
        raster.stroke_segment(Point::new(2.0, 2.0), Point::new(3.0, 2.0), RED, LINE_WIDTH);
        raster.resize(5, 20);
        assert_eq!(raster.width(), 5);
        assert_eq!(raster.height(), 20);
        assert_eq!(raster.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(2, 15), Some([0, 0, 0, 0]));
    }

    #[test]
    fn region_copy_is_row_packed() {
        let mut raster = Raster::new(4, 4);
        raster.stroke_segment(Point::new(1.5, 1.5), Point::new(1.5, 1.5), RED, 1.0);
        let region = raster.region_rgba(DirtyRect {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        });
        assert_eq!(region.len(), 2 * 2 * 4);
        assert_eq!(&region[0..4], &[255, 0, 0, 255]);
        assert_eq!(&region[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn png_data_url_has_prefix() {
        let mut raster = Raster::new(16, 16);
        raster.stroke_segment(Point::new(0.0, 0.0), Point::new(15.0, 15.0), RED, LINE_WIDTH);
        let url = raster.to_png_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn zero_sized_raster_does_not_encode() {
        let raster = Raster::new(0, 10);
        assert_eq!(
            raster.encode_png(),
            Err(RasterError::Empty {
                width: 0,
                height: 10
            })
        );
    }
}
