//! Turning raw hand-landmark model output into [`Hand`]s.
//!
//! The model sees a square `size × size` image.  Camera frames are
//! letterboxed into it: scaled uniformly so the longer side fits, centred,
//! and padded with black.  [`Letterbox`] holds that mapping in both
//! directions so landmarks land back on the right frame pixels.

use crate::error::{Error, Result};
use crate::hand::{Hand, Landmark, LANDMARK_COUNT};

/// Uniform scale plus centring offsets from frame pixels to model pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Letterbox {
    pub width:  usize,
    pub height: usize,
    /// Model pixels per frame pixel.
    pub scale:  f32,
    pub pad_x:  f32,
    pub pad_y:  f32,
}

impl Letterbox {
    /// Fit a `width × height` frame into a `size × size` square.
    pub fn fit(width: usize, height: usize, size: usize) -> Self {
        let longest = width.max(height).max(1) as f32;
        let scale = size as f32 / longest;
        Letterbox {
            width,
            height,
            scale,
            pad_x: (size as f32 - width  as f32 * scale) / 2.0,
            pad_y: (size as f32 - height as f32 * scale) / 2.0,
        }
    }

    /// Model-space point → frame-space point.
    pub fn to_frame(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pad_x) / self.scale, (y - self.pad_y) / self.scale)
    }

    /// Frame pixel shown at model pixel `(mx, my)`, or `None` in the padding.
    pub fn source_pixel(&self, mx: usize, my: usize) -> Option<(usize, usize)> {
        let (fx, fy) = self.to_frame(mx as f32 + 0.5, my as f32 + 0.5);
        if fx < 0.0 || fy < 0.0 {
            return None;
        }
        let (fx, fy) = (fx as usize, fy as usize);
        (fx < self.width && fy < self.height).then_some((fx, fy))
    }
}

/// Some exports emit a raw logit for presence, others a probability.
pub fn squash(v: f32) -> f32 {
    if (0.0..=1.0).contains(&v) { v } else { 1.0 / (1.0 + (-v).exp()) }
}

/// Build hands from the model's flattened outputs.
///
/// The first output holding `21 × 3` values is read as `(x, y, z)` per
/// joint in model pixels; the first single-value output is the presence
/// score.  A missing score counts as 1.0.  Hands scoring below `min_score`
/// are dropped and at most `max_hands` are returned.
pub fn hands_from_outputs(
    outputs:   &[Vec<f32>],
    letterbox: &Letterbox,
    min_score: f32,
    max_hands: usize,
) -> Result<Vec<Hand>> {
    if max_hands == 0 {
        return Ok(Vec::new());
    }

    let coords = outputs.iter()
        .find(|o| o.len() == LANDMARK_COUNT * 3)
        .ok_or_else(|| Error::Model("model has no 63-value landmark output".into()))?;
    let score = outputs.iter()
        .find(|o| o.len() == 1)
        .map(|o| squash(o[0]))
        .unwrap_or(1.0);
    if score < min_score {
        return Ok(Vec::new());
    }

    let landmarks = coords.chunks_exact(3)
        .map(|p| {
            let (x, y) = letterbox.to_frame(p[0], p[1]);
            Landmark { x, y, z: p[2] }
        })
        .collect();
    let mut hands = vec![Hand::new(landmarks, score)];
    hands.truncate(max_hands);
    Ok(hands)
}
