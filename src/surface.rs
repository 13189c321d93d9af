use crate::color::Rgb;

/// Paint context the engine draws into.
///
/// Width and height are fixed for the lifetime of the surface. Writes outside
/// `0..width` x `0..height` are clipped silently.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Set a single pixel
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb);

    /// Reset a rectangular region to transparent
    fn clear_rect(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Stroke a one-pixel circle outline
    fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb);

    /// Clear the whole surface
    fn clear(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.clear_rect(0, 0, w, h);
    }
}

/// In-memory RGB surface (None = transparent)
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Option<Rgb>>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width as usize * height as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Colour at (x, y), None if transparent or out of bounds
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index(x, y).and_then(|idx| self.pixels[idx])
    }

    /// Number of non-transparent pixels
    pub fn painted_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    /// All painted pixels as (x, y, colour)
    pub fn painted(&self) -> impl Iterator<Item = (i32, i32, Rgb)> + '_ {
        let width = self.width as usize;
        self.pixels.iter().enumerate().filter_map(move |(idx, p)| {
            p.map(|color| ((idx % width) as i32, (idx / width) as i32, color))
        })
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = Some(color);
        }
    }

    fn clear_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + width as i64).min(self.width as i64);
        let y1 = (y as i64 + height as i64).min(self.height as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                let idx = py as usize * self.width as usize + px as usize;
                self.pixels[idx] = None;
            }
        }
    }

    fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb) {
        if radius <= 0.0 {
            return;
        }
        // Midpoint circle, eight-way symmetric
        let (cx, cy) = (cx.round() as i32, cy.round() as i32);
        let mut x = radius.round() as i32;
        let mut y = 0;
        let mut err = 1 - x;
        while x >= y {
            for (dx, dy) in [
                (x, y), (y, x), (-y, x), (-x, y),
                (-x, -y), (-y, -x), (y, -x), (x, -y),
            ] {
                self.set_pixel(cx + dx, cy + dy, color);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }
}
