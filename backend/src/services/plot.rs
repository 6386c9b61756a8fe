//! PNG rendering of light-curve panels.
//!
//! Panels are stacked vertically and share the x range. Each panel draws its
//! series as a polyline inside a frame, optionally with a dashed horizontal
//! reference line.

use std::io::Cursor;

use anyhow::{bail, Result};
use image::{ImageFormat, Rgb, RgbImage};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const FRAME: Rgb<u8> = Rgb([60, 60, 60]);
const SERIES: Rgb<u8> = Rgb([31, 119, 180]);
const REFERENCE: Rgb<u8> = Rgb([128, 128, 128]);

const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_Y: u32 = 20;
const PANEL_GAP: u32 = 24;
const DASH: i32 = 8;

/// Size of the two-panel synthetic plot (9 x 4.2 in at 150 dpi).
pub const SYNTHETIC_PLOT_SIZE: (u32, u32) = (1350, 630);
/// Size of the single-panel archive plot (8 x 3 in at 150 dpi).
pub const ARCHIVE_PLOT_SIZE: (u32, u32) = (1200, 450);

/// One plot panel.
#[derive(Debug, Clone, Copy)]
pub struct Panel<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
    /// y value of a dashed horizontal line
    pub reference: Option<f64>,
}

impl<'a> Panel<'a> {
    pub fn new(x: &'a [f64], y: &'a [f64]) -> Self {
        Self {
            x,
            y,
            reference: None,
        }
    }

    pub fn with_reference(mut self, y: f64) -> Self {
        self.reference = Some(y);
        self
    }

    fn points(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Inclusive data range, padded so that flat series still get some height.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
            None => Some(Range { min: v, max: v }),
            Some(r) => Some(Range {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    fn padded(self, fraction: f64) -> Self {
        let span = self.max - self.min;
        let pad = if span > 0.0 {
            span * fraction
        } else {
            self.min.abs().max(1.0) * 1e-3
        };
        Range {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Map `v` into `[0, 1]`.
    fn unit(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }
}

/// Pixel rectangle of a panel.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Frame {
    fn to_pixel(&self, xr: &Range, yr: &Range, x: f64, y: f64) -> (i32, i32) {
        let px = self.left as f64 + xr.unit(x) * (self.right - self.left) as f64;
        let py = self.bottom as f64 - yr.unit(y) * (self.bottom - self.top) as f64;
        (px.round() as i32, py.round() as i32)
    }
}

/// Render `panels` into a PNG image of `width` x `height` pixels.
pub fn render_panels(panels: &[Panel<'_>], width: u32, height: u32) -> Result<Vec<u8>> {
    if panels.is_empty() {
        bail!("at least one panel is required");
    }
    let n = panels.len() as u32;
    let min_height = 2 * MARGIN_Y + (n - 1) * PANEL_GAP + n * 10;
    if width < MARGIN_LEFT + MARGIN_RIGHT + 10 || height < min_height {
        bail!("plot size {}x{} is too small for {} panel(s)", width, height, n);
    }

    let mut image = RgbImage::from_pixel(width, height, BACKGROUND);
    let x_range = Range::of(panels.iter().flat_map(|p| p.x.iter().copied()))
        .unwrap_or(Range { min: 0.0, max: 1.0 })
        .padded(0.01);

    let panel_height = (height - 2 * MARGIN_Y - (n - 1) * PANEL_GAP) / n;
    for (i, panel) in panels.iter().enumerate() {
        let top = MARGIN_Y + i as u32 * (panel_height + PANEL_GAP);
        let frame = Frame {
            left: MARGIN_LEFT as i32,
            top: top as i32,
            right: (width - MARGIN_RIGHT) as i32,
            bottom: (top + panel_height) as i32,
        };
        draw_panel(&mut image, panel, &frame, &x_range);
    }

    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

fn draw_panel(image: &mut RgbImage, panel: &Panel<'_>, frame: &Frame, x_range: &Range) {
    let y_values = panel.y.iter().copied().chain(panel.reference);
    let y_range = Range::of(y_values)
        .unwrap_or(Range { min: 0.0, max: 1.0 })
        .padded(0.05);

    if let Some(reference) = panel.reference {
        let (_, y) = frame.to_pixel(x_range, &y_range, x_range.min, reference);
        draw_dashed_hline(image, frame.left, frame.right, y, REFERENCE);
    }

    let mut previous: Option<(i32, i32)> = None;
    for (x, y) in panel.points() {
        if !(x.is_finite() && y.is_finite()) {
            previous = None;
            continue;
        }
        let p = frame.to_pixel(x_range, &y_range, x, y);
        match previous {
            Some(q) => draw_line(image, q, p, SERIES),
            None => put_pixel(image, p, SERIES),
        }
        previous = Some(p);
    }

    draw_line(image, (frame.left, frame.top), (frame.right, frame.top), FRAME);
    draw_line(image, (frame.left, frame.bottom), (frame.right, frame.bottom), FRAME);
    draw_line(image, (frame.left, frame.top), (frame.left, frame.bottom), FRAME);
    draw_line(image, (frame.right, frame.top), (frame.right, frame.bottom), FRAME);
}

fn put_pixel(image: &mut RgbImage, (x, y): (i32, i32), color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_dashed_hline(image: &mut RgbImage, x1: i32, x2: i32, y: i32, color: Rgb<u8>) {
    for x in x1..=x2 {
        if (x - x1) % (2 * DASH) < DASH {
            put_pixel(image, (x, y), color);
        }
    }
}

/// Draw a line using Bresenham's algorithm.
fn draw_line(image: &mut RgbImage, (x1, y1): (i32, i32), (x2, y2): (i32, i32), color: Rgb<u8>) {
    let dx = (x2 - x1).abs();
    let dy = -(y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = (x1, y1);
    loop {
        put_pixel(image, (x, y), color);
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_render_two_panels() {
        let x: Vec<f64> = (0..100).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x.iter().map(|v| 1.0 + 0.01 * v.sin()).collect();
        let panels = [Panel::new(&x, &y), Panel::new(&x, &y).with_reference(1.0)];
        let (w, h) = SYNTHETIC_PLOT_SIZE;
        let png = render_panels(&panels, w, h).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);

        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!(decoded.width(), w);
        assert_eq!(decoded.height(), h);
    }

    #[test]
    fn test_render_draws_series_pixels() {
        let x = [0.0, 1.0];
        let y = [0.0, 1.0];
        let png = render_panels(&[Panel::new(&x, &y)], 200, 100).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert!(decoded.pixels().any(|p| *p == SERIES));
        assert!(decoded.pixels().any(|p| *p == FRAME));
    }

    #[test]
    fn test_render_handles_empty_and_constant_series() {
        let empty: [f64; 0] = [];
        let x = [0.0, 1.0, 2.0];
        let flat = [1.0, 1.0, 1.0];
        let panels = [Panel::new(&empty, &empty), Panel::new(&x, &flat).with_reference(1.0)];
        assert!(render_panels(&panels, 300, 200).is_ok());
    }

    #[test]
    fn test_render_rejects_tiny_canvas() {
        let x = [0.0, 1.0];
        assert!(render_panels(&[Panel::new(&x, &x)], 10, 10).is_err());
        assert!(render_panels(&[], 300, 300).is_err());
    }

    #[test]
    fn test_range_padding() {
        let r = Range::of([1.0, 1.0].into_iter()).unwrap().padded(0.05);
        assert!(r.max > r.min);
        assert!(Range::of([f64::NAN].into_iter()).is_none());
    }
}
