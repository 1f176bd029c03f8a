//! In-memory monochrome framebuffer in SSD1306 page layout.
//!
//! The panel addresses pixels as eight horizontal "pages" of 128 bytes,
//! each byte a vertical strip of 8 pixels (LSB on top).  Keeping the
//! working frame in the same layout makes the flush a straight memcpy
//! per page and lets host tests inspect exactly what would be sent.

/// Panel width in pixels.
pub const WIDTH: i32 = 128;
/// Panel height in pixels.
pub const HEIGHT: i32 = 64;
/// Number of 8-pixel-tall pages.
pub const PAGES: usize = (HEIGHT as usize) / 8;
/// Total buffer size in bytes.
pub const BUFFER_LEN: usize = (WIDTH as usize) * PAGES;

/// One full frame in panel byte order.
pub struct FrameBuffer {
    data: [u8; BUFFER_LEN],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self { data: [0; BUFFER_LEN] }
    }

    /// Raw page-ordered bytes, ready to flush.
    pub fn data(&self) -> &[u8; BUFFER_LEN] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data = [0; BUFFER_LEN];
    }

    pub fn fill(&mut self) {
        self.data = [0xFF; BUFFER_LEN];
    }

    /// Set a single pixel; out-of-bounds coordinates are clipped.
    pub fn set_pixel(&mut self, x: i32, y: i32) {
        if !(0..WIDTH).contains(&x) || !(0..HEIGHT).contains(&y) {
            return;
        }
        let index = x as usize + (y as usize / 8) * WIDTH as usize;
        self.data[index] |= 1 << (y as usize % 8);
    }

    /// Read a pixel back (false outside the panel).
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        if !(0..WIDTH).contains(&x) || !(0..HEIGHT).contains(&y) {
            return false;
        }
        let index = x as usize + (y as usize / 8) * WIDTH as usize;
        self.data[index] & (1 << (y as usize % 8)) != 0
    }

    /// Horizontal run of pixels, inclusive on both ends.
    pub fn draw_hline(&mut self, x0: i32, x1: i32, y: i32) {
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        for x in lo..=hi {
            self.set_pixel(x, y);
        }
    }

    /// Bresenham line between two points.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x, y);
            if x == x1 && y == y1 {
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

    /// Filled ellipse by horizontal scanlines.
    ///
    /// Each scanline's half-width comes from the ellipse equation; a
    /// non-zero `angle` rotates each scanline's endpoints about the
    /// center instead, which is exact enough at these sizes for the
    /// slight eye tilts it is used for.
    pub fn fill_ellipse(&mut self, cx: i32, cy: i32, width: i32, height: i32, angle: f32) {
        let a = f32::max(width as f32 / 2.0, 1.0);
        let b = f32::max(height as f32 / 2.0, 1.0);

        let mut y = -(b as i32);
        while y <= b as i32 {
            let rel_y = y as f32 / b;
            let half = a * (1.0 - rel_y * rel_y).max(0.0).sqrt();

            if angle == 0.0 {
                self.draw_hline(cx - half as i32, cx + half as i32, cy + y);
            } else {
                let (sin, cos) = angle.sin_cos();
                let rotate = |px: f32, py: f32| {
                    (
                        cx + (px * cos - py * sin) as i32,
                        cy + (px * sin + py * cos) as i32,
                    )
                };
                let (x0, y0) = rotate(-half, y as f32);
                let (x1, y1) = rotate(half, y as f32);
                self.draw_line(x0, y0, x1, y1);
            }
            y += 1;
        }
    }

    /// Filled diamond: a square rotated 45°, drawn as mirrored spans.
    pub fn fill_diamond(&mut self, cx: i32, cy: i32, size: i32) {
        let size = size.max(0);
        for dy in -size..=size {
            let half = size - dy.abs();
            self.draw_hline(cx - half, cx + half, cy + dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_layout_matches_page_format() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(0, 0);
        assert_eq!(fb.data()[0], 0b0000_0001);

        fb.clear();
        fb.set_pixel(0, 7);
        assert_eq!(fb.data()[0], 0b1000_0000);

        fb.clear();
        fb.set_pixel(5, 9); // page 1, bit 1
        assert_eq!(fb.data()[5 + 128], 0b0000_0010);
    }

    #[test]
    fn out_of_bounds_writes_are_clipped() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(-1, 10);
        fb.set_pixel(128, 10);
        fb.set_pixel(10, -1);
        fb.set_pixel(10, 64);
        assert!(fb.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_and_fill_are_total() {
        let mut fb = FrameBuffer::new();
        fb.fill();
        assert!(fb.data().iter().all(|&b| b == 0xFF));
        fb.clear();
        assert!(fb.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn unrotated_ellipse_center_and_extremes() {
        let mut fb = FrameBuffer::new();
        fb.fill_ellipse(64, 32, 30, 44, 0.0);

        assert!(fb.pixel(64, 32));
        // Horizontal extremes on the center scanline.
        assert!(fb.pixel(64 - 15, 32));
        assert!(fb.pixel(64 + 15, 32));
        assert!(!fb.pixel(64 - 17, 32));
        // Vertical extremes.
        assert!(fb.pixel(64, 32 - 22));
        assert!(fb.pixel(64, 32 + 22));
        assert!(!fb.pixel(64, 32 - 24));
        // Corners of the bounding box stay empty.
        assert!(!fb.pixel(64 - 15, 32 - 22));
    }

    #[test]
    fn ellipse_is_filled_not_outlined() {
        let mut fb = FrameBuffer::new();
        fb.fill_ellipse(64, 32, 30, 44, 0.0);
        // Every interior scanline is contiguous.
        for y in 12..=52 {
            let mut inside = false;
            let mut gaps_after_start = false;
            let mut ended = false;
            for x in 0..WIDTH {
                match (fb.pixel(x, y), inside, ended) {
                    (true, false, false) => inside = true,
                    (false, true, _) => {
                        inside = false;
                        ended = true;
                    }
                    (true, false, true) => gaps_after_start = true,
                    _ => {}
                }
            }
            assert!(!gaps_after_start, "gap in scanline y={y}");
        }
    }

    #[test]
    fn rotated_ellipse_covers_the_center_region() {
        let mut fb = FrameBuffer::new();
        fb.fill_ellipse(41, 32, 21, 30, -0.5);
        // Rotated scanlines can leave single-pixel seams, so check a
        // small neighborhood rather than the exact center pixel.
        let mut lit = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                lit += fb.pixel(41 + dx, 32 + dy) as u32;
            }
        }
        assert!(lit >= 5, "only {lit}/9 center pixels lit");
    }

    #[test]
    fn diamond_shape_and_tips() {
        let mut fb = FrameBuffer::new();
        fb.fill_diamond(20, 50, 6);

        assert!(fb.pixel(20, 50));
        assert!(fb.pixel(20, 44)); // top tip
        assert!(fb.pixel(20, 56)); // bottom tip
        assert!(fb.pixel(14, 50)); // left tip
        assert!(fb.pixel(26, 50)); // right tip
        // Just past a tip diagonal.
        assert!(!fb.pixel(26, 49));
        assert!(!fb.pixel(20, 57));
    }

    #[test]
    fn degenerate_diamond_is_a_dot() {
        let mut fb = FrameBuffer::new();
        fb.fill_diamond(10, 10, 0);
        assert!(fb.pixel(10, 10));
        assert!(!fb.pixel(11, 10));
    }
}
