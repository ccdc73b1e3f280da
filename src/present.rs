//! Terminal output for a canvas.
//!
//! Each terminal cell shows two vertically stacked pixels using the lower
//! half block: the background color paints the top pixel and the foreground
//! color the bottom one. Every pixel is the average of a `scale x scale`
//! block of canvas pixels, added onto the background color.

use std::io::{self, Write};

use crate::canvas::{Canvas, Surface};
use crate::color::Rgba;

/// Canvas dimensions for a terminal of `cols x rows` at `scale`.
pub fn canvas_size(cols: usize, rows: usize, scale: usize) -> (usize, usize) {
    let scale = scale.max(1);
    (cols * scale, rows * 2 * scale)
}

pub struct Presenter {
    cols: usize,
    rows: usize,
    scale: usize,
    bg: (u8, u8, u8),
    output_buf: Vec<u8>,
}

impl Presenter {
    pub fn new(cols: usize, rows: usize, scale: usize, bg: Rgba) -> Self {
        Self {
            cols,
            rows,
            scale: scale.max(1),
            bg: (bg.r, bg.g, bg.b),
            output_buf: Vec::with_capacity(cols * rows * 25),
        }
    }

    /// Color of the terminal pixel at `(px, py)` in half-cell units.
    fn sample(&self, canvas: &Canvas, px: usize, py: usize) -> (u8, u8, u8) {
        let mut sum = [0.0f32; 3];
        let x0 = px * self.scale;
        let y0 = py * self.scale;
        for y in y0..(y0 + self.scale).min(canvas.height()) {
            for x in x0..(x0 + self.scale).min(canvas.width()) {
                if let Some(p) = canvas.pixel(x, y) {
                    sum[0] += p[0];
                    sum[1] += p[1];
                    sum[2] += p[2];
                }
            }
        }

        let n = (self.scale * self.scale) as f32;
        let add = |bg: u8, light: f32| (bg as f32 + light / n * 255.0).round().min(255.0) as u8;
        (
            add(self.bg.0, sum[0]),
            add(self.bg.1, sum[1]),
            add(self.bg.2, sum[2]),
        )
    }

    /// Writes one full frame, homing the cursor first.
    pub fn present<W: Write>(&mut self, canvas: &Canvas, out: &mut W) -> io::Result<()> {
        let mut buf = std::mem::take(&mut self.output_buf);
        buf.clear();
        buf.extend_from_slice(b"\x1b[H");

        // None forces the first cell of each row to emit its colors
        let mut prev_top: Option<(u8, u8, u8)> = None;
        let mut prev_bot: Option<(u8, u8, u8)> = None;

        for row in 0..self.rows {
            for col in 0..self.cols {
                let top = self.sample(canvas, col, row * 2);
                let bot = self.sample(canvas, col, row * 2 + 1);

                if prev_top != Some(top) {
                    write!(buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }
                buf.extend_from_slice("▄".as_bytes());
            }
            buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if row + 1 < self.rows {
                buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&buf)?;
        out.flush()?;
        self.output_buf = buf;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Rect;

    #[test]
    fn canvas_size_doubles_rows_and_scales() {
        assert_eq!(canvas_size(80, 24, 1), (80, 48));
        assert_eq!(canvas_size(80, 24, 4), (320, 192));
        assert_eq!(canvas_size(10, 5, 0), (10, 10));
    }

    #[test]
    fn blank_canvas_shows_background_only() {
        let canvas = Canvas::new(4, 4);
        let mut presenter = Presenter::new(2, 1, 2, Rgba::rgb(0x1a, 0x1b, 0x26));
        let mut out = Vec::new();
        presenter.present(&canvas, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[H"));
        // colors are only emitted once per row while they do not change
        assert_eq!(text.matches("\x1b[48;2;26;27;38m").count(), 1);
        assert_eq!(text.matches("\x1b[38;2;26;27;38m").count(), 1);
        assert_eq!(text.matches('▄').count(), 2);
        assert!(text.ends_with("\x1b[0m"));
    }

    #[test]
    fn lit_pixels_are_averaged_and_added_to_background() {
        let mut canvas = Canvas::new(2, 4);
        // light up one of the four pixels behind the bottom half
        canvas.fill_rect(Rect::new(0.0, 2.0, 1.0, 1.0), Rgba::WHITE);

        let mut presenter = Presenter::new(1, 1, 2, Rgba::BLACK);
        let mut out = Vec::new();
        presenter.present(&canvas, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[48;2;0;0;0m"));
        assert!(text.contains("\x1b[38;2;64;64;64m"));
    }

    #[test]
    fn rows_are_separated() {
        let canvas = Canvas::new(1, 6);
        let mut presenter = Presenter::new(1, 3, 1, Rgba::BLACK);
        let mut out = Vec::new();
        presenter.present(&canvas, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 2);
        assert_eq!(text.matches("\x1b[0m").count(), 3);
    }
}
