use std::io::Write;

use crate::color::{Rgb, Rgba};
use crate::error::{Error, Result};
use crate::surface::Surface;

/// Sentinel that never matches a real color, forcing the first escape of a row.
const NO_COLOR: Rgb = (255, 255, 254);

/// Terminal-backed [`Surface`].
///
/// Keeps an RGB buffer two pixels tall per character cell and presents it
/// with `▄` half-blocks: the background color paints the top pixel, the
/// foreground color the bottom one. Drawing coordinates are surface units,
/// `scale` units per pixel.
pub struct TerminalCanvas {
    cols: usize,
    height: usize,
    scale: f32,
    background: Rgb,
    pixels: Vec<[f32; 3]>,
    alpha: f32,
    saved: Vec<f32>,
    output_buf: Vec<u8>,
}

impl TerminalCanvas {
    pub fn new(cols: u16, rows: u16, scale: f32, background: Rgb) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(Error::SurfaceUnavailable(format!(
                "terminal reports a {cols}x{rows} area"
            )));
        }
        let mut canvas = Self {
            cols: 0,
            height: 0,
            scale,
            background,
            pixels: Vec::new(),
            alpha: 1.0,
            saved: Vec::new(),
            output_buf: Vec::new(),
        };
        canvas.resize(cols, rows);
        Ok(canvas)
    }

    /// Rebuilds the buffer for a new terminal size, cleared to the background.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1) as usize;
        self.height = rows.max(1) as usize * 2;
        self.pixels = vec![to_float(self.background); self.cols * self.height];
        self.output_buf = Vec::with_capacity(self.cols * self.height * 25);
    }

    pub fn pixel_size(&self) -> (usize, usize) {
        (self.cols, self.height)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.cols && y < self.height {
            Some(to_rgb(self.pixels[y * self.cols + x]))
        } else {
            None
        }
    }

    /// Writes the whole buffer to `out`, starting from the home position.
    pub fn present<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        for y in (0..self.height).step_by(2) {
            let mut prev_top = NO_COLOR;
            let mut prev_bot = NO_COLOR;
            for x in 0..self.cols {
                let top = to_rgb(self.pixels[y * self.cols + x]);
                let bot = if y + 1 < self.height {
                    to_rgb(self.pixels[(y + 1) * self.cols + x])
                } else {
                    top
                };

                // Only emit color codes if changed
                if top != prev_top {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = top;
                }
                if bot != prev_bot {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = bot;
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgb, alpha: f32) {
        let src = to_float(color);
        let dst = &mut self.pixels[y * self.cols + x];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = *d * (1.0 - alpha) + s * alpha;
        }
    }

    // [from, to) in pixels, clipped to len
    fn span(from: f32, to: f32, len: usize) -> std::ops::Range<usize> {
        let start = from.floor().max(0.0) as usize;
        let end = (to.ceil().max(0.0) as usize).min(len);
        start.min(end)..end
    }
}

impl Surface for TerminalCanvas {
    fn width(&self) -> f32 {
        self.cols as f32 * self.scale
    }

    fn height(&self) -> f32 {
        self.height as f32 * self.scale
    }

    fn save(&mut self) {
        self.saved.push(self.alpha);
    }

    fn restore(&mut self) {
        if let Some(alpha) = self.saved.pop() {
            self.alpha = alpha;
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_arc(&mut self, x: f32, y: f32, radius: f32, color: Rgb) {
        let alpha = self.alpha;
        if alpha <= 0.0 {
            return;
        }
        let (cx, cy, r) = (x / self.scale, y / self.scale, radius / self.scale);

        let mut hit = false;
        for py in Self::span(cy - r, cy + r, self.height) {
            for px in Self::span(cx - r, cx + r, self.cols) {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.blend(px, py, color, alpha);
                    hit = true;
                }
            }
        }

        // Discs smaller than a pixel still light the pixel they sit in
        if !hit && cx >= 0.0 && cy >= 0.0 {
            let (px, py) = (cx as usize, cy as usize);
            if px < self.cols && py < self.height {
                self.blend(px, py, color, alpha);
            }
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        if color.alpha <= 0.0 {
            return;
        }
        let (x0, y0) = (x / self.scale, y / self.scale);
        let (x1, y1) = (x0 + width / self.scale, y0 + height / self.scale);
        for py in Self::span(y0, y1, self.height) {
            for px in Self::span(x0, x1, self.cols) {
                self.blend(px, py, color.rgb, color.alpha);
            }
        }
    }
}

fn to_float((r, g, b): Rgb) -> [f32; 3] {
    [r as f32, g as f32, b as f32]
}

fn to_rgb([r, g, b]: [f32; 3]) -> Rgb {
    let c = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    (c(r), c(g), c(b))
}
