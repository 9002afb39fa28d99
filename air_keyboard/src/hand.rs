//! Hand landmarks as produced by a 21-point hand-pose model.
//!
//! Landmark indices follow the usual wrist-first ordering:
//! 0 wrist, 1–4 thumb, 5–8 index, 9–12 middle, 13–16 ring, 17–20 pinky.
//! Only the index (8) and middle (12) fingertips matter for typing.

pub const LANDMARK_COUNT: usize = 21;
pub const INDEX_TIP:      usize = 8;
pub const MIDDLE_TIP:     usize = 12;

/// Bones of the hand skeleton as landmark index pairs.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),   (1, 2),   (2, 3),   (3, 4),
    (0, 5),   (5, 6),   (6, 7),   (7, 8),
    (5, 9),   (9, 10),  (10, 11), (11, 12),
    (9, 13),  (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17),  (17, 18), (18, 19), (19, 20),
];

/// A single hand joint.  `x`/`y` are frame pixels; `z` is relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }
}

/// Planar distance between two landmarks (depth ignored).
pub fn distance(a: Landmark, b: Landmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// One detected hand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
    /// Detector confidence, 0.0–1.0.
    pub score: f32,
}

impl Hand {
    pub fn new(landmarks: Vec<Landmark>, score: f32) -> Self {
        Hand { landmarks, score }
    }

    /// A synthetic hand with only the two fingertips placed; every other
    /// joint sits at the index tip.
    pub fn from_tips(index: Landmark, middle: Landmark) -> Self {
        let mut landmarks = vec![index; LANDMARK_COUNT];
        landmarks[MIDDLE_TIP] = middle;
        Hand { landmarks, score: 1.0 }
    }

    pub fn landmark(&self, i: usize) -> Option<Landmark> {
        self.landmarks.get(i).copied()
    }

    pub fn index_tip(&self)  -> Option<Landmark> { self.landmark(INDEX_TIP) }
    pub fn middle_tip(&self) -> Option<Landmark> { self.landmark(MIDDLE_TIP) }

    /// Distance between index and middle fingertips, if both are present.
    pub fn pinch_distance(&self) -> Option<f32> {
        Some(distance(self.index_tip()?, self.middle_tip()?))
    }

    /// Line segments of the skeleton; bones with a missing joint are skipped.
    pub fn bones(&self) -> impl Iterator<Item = (Landmark, Landmark)> + '_ {
        HAND_CONNECTIONS.iter()
            .filter_map(|&(a, b)| Some((self.landmark(a)?, self.landmark(b)?)))
    }

    /// Rescale x/y, e.g. from camera pixels to window pixels.
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Hand {
            landmarks: self.landmarks.iter()
                .map(|l| Landmark { x: l.x * sx, y: l.y * sy, z: l.z })
                .collect(),
            score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(Landmark::new(0.0, 0.0), Landmark::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn pinch_distance_uses_tips_8_and_12() {
        let hand = Hand::from_tips(Landmark::new(100.0, 100.0), Landmark::new(100.0, 130.0));
        assert_eq!(hand.index_tip(), Some(Landmark::new(100.0, 100.0)));
        assert_eq!(hand.pinch_distance(), Some(30.0));
    }

    #[test]
    fn short_landmark_list_has_no_pinch() {
        let hand = Hand::new(vec![Landmark::default(); 10], 0.9);
        assert_eq!(hand.pinch_distance(), None);
    }

    #[test]
    fn connections_cover_every_joint() {
        let mut seen = [false; LANDMARK_COUNT];
        for &(a, b) in HAND_CONNECTIONS.iter() {
            seen[a] = true;
            seen[b] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn bones_skip_missing_joints() {
        let full = Hand::new(vec![Landmark::default(); LANDMARK_COUNT], 1.0);
        assert_eq!(full.bones().count(), HAND_CONNECTIONS.len());

        // joints 0..=4: wrist and thumb only
        let thumb = Hand::new(vec![Landmark::default(); 5], 1.0);
        assert_eq!(thumb.bones().count(), 4);
    }

    #[test]
    fn scaled_moves_tips() {
        let hand = Hand::from_tips(Landmark::new(10.0, 20.0), Landmark::new(10.0, 40.0));
        let s = hand.scaled(2.0, 0.5);
        assert_eq!(s.index_tip(), Some(Landmark::new(20.0, 10.0)));
        assert_eq!(s.pinch_distance(), Some(10.0));
    }
}
