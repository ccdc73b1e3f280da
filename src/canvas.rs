//! Software drawing surface.
//!
//! Pixels are stored as premultiplied RGBA `f32` so that source-over and
//! additive compositing stay simple per-channel arithmetic. A pixel is
//! covered by a shape when its center lies inside it.

use crate::color::Rgba;

/// Axis-aligned rectangle in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `size` centered on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, size: f32) -> Self {
        Self::new(cx - size / 2.0, cy - size / 2.0, size, size)
    }
}

/// How a source surface combines with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Standard alpha blending
    SourceOver,
    /// Additive, saturating at full intensity
    Lighter,
}

/// Radial gradient centered on `(cx, cy)` running out to `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    stops: Vec<(f32, Rgba)>,
}

impl RadialGradient {
    pub fn new(cx: f32, cy: f32, radius: f32) -> Self {
        Self {
            cx,
            cy,
            radius,
            stops: Vec::with_capacity(4),
        }
    }

    /// Adds a color stop at `offset` (clamped to `0..=1`), keeping stops ordered.
    pub fn add_color_stop(&mut self, offset: f32, color: Rgba) {
        let offset = offset.clamp(0.0, 1.0);
        let at = self.stops.partition_point(|(o, _)| *o <= offset);
        self.stops.insert(at, (offset, color));
    }

    pub fn stops(&self) -> &[(f32, Rgba)] {
        &self.stops
    }

    /// Color at normalized distance `t` from the center.
    pub fn color_at(&self, t: f32) -> Rgba {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba::TRANSPARENT;
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }

        for pair in self.stops.windows(2) {
            let (o0, c0) = pair[0];
            let (o1, c1) = pair[1];
            if t <= o1 {
                let span = o1 - o0;
                if span <= f32::EPSILON {
                    return c1;
                }
                return c0.mix(c1, (t - o0) / span);
            }
        }
        last.1
    }

    fn sample(&self, x: f32, y: f32) -> Rgba {
        if self.radius <= 0.0 {
            return self.stops.last().map_or(Rgba::TRANSPARENT, |s| s.1);
        }
        let dist = ((x - self.cx).powi(2) + (y - self.cy).powi(2)).sqrt();
        self.color_at(dist / self.radius)
    }
}

/// The 2D drawing capability particles and fireworks render through.
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Paints `rect` with `color` using source-over blending.
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    /// Paints `rect` with `gradient` using source-over blending.
    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &RadialGradient);
    /// Resets `rect` to fully transparent.
    fn clear_rect(&mut self, rect: Rect);

    fn clear(&mut self) {
        let rect = Rect::new(0.0, 0.0, self.width() as f32, self.height() as f32);
        self.clear_rect(rect);
    }
}

/// RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 4]>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width * height],
        }
    }

    /// Sets new dimensions, discarding the current content.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, [0.0; 4]);
    }

    /// Premultiplied RGBA at `(x, y)`, `None` when out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[f32; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == [0.0; 4])
    }

    /// Composites a same-sized canvas on top of this one.
    pub fn draw_canvas(&mut self, src: &Canvas, mode: BlendMode) {
        let width = self.width.min(src.width);
        let height = self.height.min(src.height);

        for y in 0..height {
            let dst_row = &mut self.pixels[y * self.width..y * self.width + width];
            let src_row = &src.pixels[y * src.width..y * src.width + width];
            for (d, s) in dst_row.iter_mut().zip(src_row) {
                match mode {
                    BlendMode::SourceOver => blend_over(d, *s),
                    BlendMode::Lighter => {
                        for i in 0..4 {
                            d[i] = (d[i] + s[i]).min(1.0);
                        }
                    }
                }
            }
        }
    }

    /// Pixel index range covered by `rect` along one axis, clipped to `len`.
    fn span(start: f32, extent: f32, len: usize) -> std::ops::Range<usize> {
        if extent.is_nan() || extent <= 0.0 || !start.is_finite() {
            return 0..0;
        }
        // pixel i is covered when start <= i + 0.5 < start + extent
        let lo = (start - 0.5).ceil().max(0.0);
        let hi = (start + extent - 0.5).ceil().min(len as f32);
        if hi <= lo {
            return 0..0;
        }
        lo as usize..hi as usize
    }

    fn for_each_in<F>(&mut self, rect: Rect, mut f: F)
    where
        F: FnMut(&mut [f32; 4], f32, f32),
    {
        let xs = Self::span(rect.x, rect.width, self.width);
        let ys = Self::span(rect.y, rect.height, self.height);
        for y in ys {
            let row = y * self.width;
            for x in xs.clone() {
                f(&mut self.pixels[row + x], x as f32 + 0.5, y as f32 + 0.5);
            }
        }
    }
}

impl Surface for Canvas {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let src = color.premultiplied();
        self.for_each_in(rect, |d, _, _| blend_over(d, src));
    }

    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &RadialGradient) {
        self.for_each_in(rect, |d, x, y| {
            blend_over(d, gradient.sample(x, y).premultiplied())
        });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.for_each_in(rect, |d, _, _| *d = [0.0; 4]);
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }
}

#[inline]
fn blend_over(dst: &mut [f32; 4], src: [f32; 4]) {
    let inv = 1.0 - src[3];
    for i in 0..4 {
        dst[i] = src[i] + dst[i] * inv;
    }
}
