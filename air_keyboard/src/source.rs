//! Hand sources — a real webcam or the mouse-driven simulator.
//!
//! The main loop asks a [`HandSource`] for one [`Capture`] per frame and
//! doesn't care whether the hands came from a pose model or from the
//! pointer.

use crate::error::Result;
use crate::hand::{Hand, Landmark};

// ════════════════════════════════════════════════════════════════════════════
// Frame
// ════════════════════════════════════════════════════════════════════════════

/// A video frame in `0x00RRGGBB` pixels, row-major.
///
/// The pixel buffer always holds exactly `width * height` entries: short
/// input is padded with black, long input is truncated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Frame {
    pub fn new(width: usize, height: usize, mut pixels: Vec<u32>) -> Self {
        pixels.resize(width * height, 0);
        Frame { width, height, pixels }
    }

    /// Pack an RGB24 byte buffer.
    pub fn from_rgb(width: usize, height: usize, rgb: &[u8]) -> Self {
        let pixels = rgb.chunks_exact(3)
            .take(width * height)
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();
        Frame::new(width, height, pixels)
    }

    pub fn width(&self)    -> usize  { self.width }
    pub fn height(&self)   -> usize  { self.height }
    pub fn pixels(&self)   -> &[u32] { &self.pixels }
    pub fn is_empty(&self) -> bool   { self.width == 0 || self.height == 0 }

    /// Flip left/right in place.
    pub fn mirror_horizontal(&mut self) {
        if self.width == 0 { return; }
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.reverse();
        }
    }

    /// Pixel at `(x, y)`, clamped to the frame.
    pub fn sample(&self, x: usize, y: usize) -> u32 {
        if self.is_empty() { return 0; }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[y * self.width + x]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Capture / WindowInput
// ════════════════════════════════════════════════════════════════════════════

/// One iteration's worth of input.
#[derive(Clone, Debug, Default)]
pub struct Capture {
    /// Background image; `None` in simulation mode.
    pub frame: Option<Frame>,
    pub hands: Vec<Hand>,
}

/// Raw input polled from the display window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowInput {
    /// Mouse position in window pixels, when over the window.
    pub pointer: Option<(f32, f32)>,
    /// Left mouse button held.
    pub pressed: bool,
    /// `q` pressed or the window was closed.
    pub quit:    bool,
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver one [`Capture`] per frame.
pub trait HandSource {
    /// Human-readable name for logs and the status line.
    fn name(&self) -> &str;

    /// Produce the next capture.  `Ok(None)` means the source is exhausted
    /// and the main loop should stop.
    fn next_capture(&mut self, input: &WindowInput) -> Result<Option<Capture>>;

    /// True when the hands follow the keyboard window's own pointer.
    fn uses_window_pointer(&self) -> bool { false }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Middle-fingertip offset below the index tip while the button is held.
pub const SIM_PINCHED_GAP: f32 = 20.0;
/// … and while it is released.
pub const SIM_OPEN_GAP:    f32 = 80.0;

/// The pointer is the index fingertip; holding the left button pinches.
#[derive(Debug, Default)]
pub struct SimHandSource;

impl SimHandSource {
    pub fn new() -> Self { SimHandSource }
}

impl HandSource for SimHandSource {
    fn name(&self) -> &str { "mouse simulation" }

    fn uses_window_pointer(&self) -> bool { true }

    fn next_capture(&mut self, input: &WindowInput) -> Result<Option<Capture>> {
        let hands = match input.pointer {
            Some((x, y)) => {
                let gap = if input.pressed { SIM_PINCHED_GAP } else { SIM_OPEN_GAP };
                vec![Hand::from_tips(Landmark::new(x, y), Landmark::new(x, y + gap))]
            }
            None => Vec::new(),
        };
        Ok(Some(Capture { frame: None, hands }))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb_packs_pixels() {
        let f = Frame::from_rgb(2, 1, &[0xFF, 0x00, 0x00, 0x01, 0x02, 0x03]);
        assert_eq!(f.pixels(), &[0x00FF0000, 0x00010203]);
    }

    #[test]
    fn short_rgb_buffer_padded_with_black() {
        // one and a bit pixels for a 2 × 2 frame
        let f = Frame::from_rgb(2, 2, &[0x10, 0x20, 0x30, 0x40]);
        assert_eq!(f.pixels(), &[0x00102030, 0, 0, 0]);
        assert_eq!(f.sample(1, 1), 0);
    }

    #[test]
    fn pixel_count_matches_dimensions() {
        let short = Frame::new(3, 3, vec![7; 4]);
        assert_eq!(short.pixels().len(), 9);
        assert_eq!(short.sample(2, 2), 0);

        let long = Frame::new(1, 2, vec![1, 2, 3, 4]);
        assert_eq!(long.pixels(), &[1, 2]);
    }

    #[test]
    fn mirror_reverses_rows() {
        let mut f = Frame::new(3, 2, vec![1, 2, 3, 4, 5, 6]);
        f.mirror_horizontal();
        assert_eq!(f.pixels(), &[3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn sample_clamps() {
        let f = Frame::new(2, 2, vec![1, 2, 3, 4]);
        assert_eq!(f.sample(5, 5), 4);
        assert_eq!(f.sample(0, 1), 3);
    }

    #[test]
    fn sim_without_pointer_has_no_hand() {
        let mut src = SimHandSource::new();
        let cap = src.next_capture(&WindowInput::default()).unwrap().unwrap();
        assert!(cap.hands.is_empty());
        assert!(cap.frame.is_none());
    }

    #[test]
    fn sim_button_controls_pinch() {
        let mut src = SimHandSource::new();
        let open = WindowInput { pointer: Some((100.0, 100.0)), pressed: false, quit: false };
        let shut = WindowInput { pressed: true, ..open };

        let hand = &src.next_capture(&open).unwrap().unwrap().hands[0];
        assert!(hand.pinch_distance().unwrap() > 40.0);
        assert_eq!(hand.index_tip().unwrap().x, 100.0);

        let hand = &src.next_capture(&shut).unwrap().unwrap().hands[0];
        assert!(hand.pinch_distance().unwrap() < 40.0);
    }
}
