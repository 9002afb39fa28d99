//! Software framebuffer and drawing primitives.
//!
//! Pixels are `0x00RRGGBB`, the format `minifb` expects.  Everything here
//! clips to the canvas, so callers can draw partially off-screen.

use crate::source::Frame;

pub struct Canvas {
    width:  usize,
    height: usize,
    buf:    Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, color: u32) -> Self {
        Canvas { width, height, buf: vec![color; width * height] }
    }

    pub fn width(&self)  -> usize  { self.width }
    pub fn height(&self) -> usize  { self.height }
    pub fn buffer(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.buf[y * self.width + x])
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    /// Stretch `frame` over the whole canvas (nearest neighbour).
    pub fn blit_frame(&mut self, frame: &Frame) {
        if frame.is_empty() { return; }
        for y in 0..self.height {
            let fy = y * frame.height() / self.height;
            for x in 0..self.width {
                let fx = x * frame.width() / self.width;
                self.buf[y * self.width + x] = frame.sample(fx, fy);
            }
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    /// Translucent fill: `alpha` of `color` over `1 - alpha` of what's there.
    pub fn blend_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32, alpha: f32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                let i = row * self.width + col;
                self.buf[i] = blend(self.buf[i], color, alpha);
            }
        }
    }

    /// Rectangle outline `thickness` pixels wide, drawn inside the bounds.
    pub fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, thickness: usize, color: u32) {
        let t = thickness.min(w / 2).min(h / 2).max(1);
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, (y + h).saturating_sub(t), w, t, color);
        self.fill_rect(x, y, t, h, color);
        self.fill_rect((x + w).saturating_sub(t), y, t, h, color);
    }

    /// Thick L-shaped marks on the four corners of a rectangle.
    pub fn draw_corners(&mut self, x: usize, y: usize, w: usize, h: usize, len: usize, thickness: usize, color: u32) {
        let len = len.min(w).min(h);
        let (r, b) = ((x + w).saturating_sub(thickness), (y + h).saturating_sub(thickness));
        let (rl, bl) = ((x + w).saturating_sub(len), (y + h).saturating_sub(len));
        // top-left
        self.fill_rect(x, y, len, thickness, color);
        self.fill_rect(x, y, thickness, len, color);
        // top-right
        self.fill_rect(rl, y, len, thickness, color);
        self.fill_rect(r, y, thickness, len, color);
        // bottom-left
        self.fill_rect(x, b, len, thickness, color);
        self.fill_rect(x, bl, thickness, len, color);
        // bottom-right
        self.fill_rect(rl, b, len, thickness, color);
        self.fill_rect(r, bl, thickness, len, color);
    }

    pub fn fill_circle(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        let r2 = (r * r) as isize;
        for dy in -(r as isize)..=r as isize {
            for dx in -(r as isize)..=r as isize {
                if dx * dx + dy * dy > r2 { continue; }
                let (sx, sy) = (cx as isize + dx, cy as isize + dy);
                if sx >= 0 && sy >= 0 {
                    self.set_pixel(sx as usize, sy as usize, color);
                }
            }
        }
    }

    /// Bresenham line between two points that may lie off-canvas; each
    /// step stamps a `thickness`-wide square.
    pub fn draw_line(&mut self, from: (isize, isize), to: (isize, isize), thickness: usize, color: u32) {
        let t = thickness.max(1) as isize;
        let (mut x, mut y) = from;
        let (dx, dy) = ((to.0 - x).abs(), -(to.1 - y).abs());
        let (step_x, step_y) = (if x < to.0 { 1 } else { -1 }, if y < to.1 { 1 } else { -1 });
        let mut err = dx + dy;
        loop {
            for oy in 0..t {
                for ox in 0..t {
                    let (px, py) = (x + ox - t / 2, y + oy - t / 2);
                    if px >= 0 && py >= 0 {
                        self.set_pixel(px as usize, py as usize, color);
                    }
                }
            }
            if (x, y) == to { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += step_x; }
            if e2 <= dx { err += dx; y += step_y; }
        }
    }

    /// Draw `text` with the 3×5 bitmap font, each font pixel `scale`
    /// screen pixels square.  `(x, y)` is the top-left of the first glyph.
    pub fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            if cx >= self.width { break; }
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += GLYPH_ADVANCE * scale;
        }
    }
}

/// Glyph width plus one column of spacing, in font pixels.
pub const GLYPH_ADVANCE: usize = 4;
pub const GLYPH_HEIGHT:  usize = 5;

/// Rendered width of `text` at `scale`, without trailing spacing.
pub fn text_width(text: &str, scale: usize) -> usize {
    let n = text.chars().count();
    if n == 0 { 0 } else { (n * GLYPH_ADVANCE - 1) * scale.max(1) }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ';' => [0b000, 0b010, 0b000, 0b010, 0b100],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b010, 0b000, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Mix two RGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t).round() as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
