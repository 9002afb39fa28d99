//! Pinch-click recognition.
//!
//! A click is registered when the index and middle fingertips come closer
//! than `threshold` while the index tip hovers a key.  Two guards keep a
//! held pinch from typing a stream of characters:
//!
//! * **latch** — set by a click, cleared only once the fingertips separate
//!   beyond `threshold` again;
//! * **cooldown** — no click within `cooldown` of the previous one.

use std::time::{Duration, Instant};

pub const DEFAULT_THRESHOLD: f32 = 40.0;
pub const DEFAULT_COOLDOWN:  Duration = Duration::from_millis(500);

/// Result of feeding one frame's fingertip distance to the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinchOutcome {
    /// Fingertips apart; latch released.
    Open,
    /// A new click was registered this frame.
    Click,
    /// Fingertips together, but no click (latched, cooling down, or not
    /// over a key).
    Pinched,
}

#[derive(Clone, Debug)]
pub struct PinchTracker {
    threshold:  f32,
    cooldown:   Duration,
    latched:    bool,
    last_click: Option<Instant>,
}

impl Default for PinchTracker {
    fn default() -> Self {
        PinchTracker::new(DEFAULT_THRESHOLD, DEFAULT_COOLDOWN)
    }
}

impl PinchTracker {
    pub fn new(threshold: f32, cooldown: Duration) -> Self {
        PinchTracker { threshold, cooldown, latched: false, last_click: None }
    }

    pub fn threshold(&self) -> f32       { self.threshold }
    pub fn cooldown(&self)  -> Duration  { self.cooldown }
    pub fn is_latched(&self) -> bool     { self.latched }
    pub fn last_click(&self) -> Option<Instant> { self.last_click }

    fn cooled_down(&self, now: Instant) -> bool {
        match self.last_click {
            Some(t) => now.saturating_duration_since(t) > self.cooldown,
            None    => true,
        }
    }

    /// Advance the state machine by one frame.
    pub fn update(&mut self, distance: f32, over_key: bool, now: Instant) -> PinchOutcome {
        if distance > self.threshold {
            self.latched = false;
            return PinchOutcome::Open;
        }
        if distance < self.threshold && over_key && !self.latched && self.cooled_down(now) {
            self.latched    = true;
            self.last_click = Some(now);
            return PinchOutcome::Click;
        }
        PinchOutcome::Pinched
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    #[test]
    fn first_pinch_over_key_clicks() {
        let mut p = PinchTracker::default();
        assert_eq!(p.update(20.0, true, Instant::now()), PinchOutcome::Click);
        assert!(p.is_latched());
    }

    #[test]
    fn held_pinch_clicks_once() {
        let mut p = PinchTracker::default();
        let t0 = Instant::now();
        let clicks = (0..120)
            .map(|i| p.update(10.0, true, t0 + ms(i * 16)))
            .filter(|o| *o == PinchOutcome::Click)
            .count();
        assert_eq!(clicks, 1);
    }

    #[test]
    fn cooldown_blocks_quick_second_click() {
        let mut p = PinchTracker::default();
        let t0 = Instant::now();
        assert_eq!(p.update(10.0, true, t0), PinchOutcome::Click);
        assert_eq!(p.update(60.0, true, t0 + ms(100)), PinchOutcome::Open);
        assert_eq!(p.update(10.0, true, t0 + ms(200)), PinchOutcome::Pinched);
        assert_eq!(p.update(10.0, true, t0 + ms(500)), PinchOutcome::Pinched);
        assert_eq!(p.update(10.0, true, t0 + ms(501)), PinchOutcome::Click);
    }

    #[test]
    fn release_and_repinch_after_cooldown_clicks_again() {
        let mut p = PinchTracker::default();
        let t0 = Instant::now();
        assert_eq!(p.update(10.0, true, t0), PinchOutcome::Click);
        assert_eq!(p.update(80.0, true, t0 + ms(300)), PinchOutcome::Open);
        assert_eq!(p.update(10.0, true, t0 + ms(700)), PinchOutcome::Click);
    }

    #[test]
    fn pinch_off_key_does_not_click() {
        let mut p = PinchTracker::default();
        assert_eq!(p.update(10.0, false, Instant::now()), PinchOutcome::Pinched);
        assert!(!p.is_latched());
        assert!(p.last_click().is_none());
    }

    #[test]
    fn exactly_threshold_neither_clicks_nor_releases() {
        let mut p = PinchTracker::default();
        let t0 = Instant::now();
        p.update(10.0, true, t0);
        assert_eq!(p.update(40.0, true, t0 + ms(900)), PinchOutcome::Pinched);
        assert!(p.is_latched());
    }

    #[test]
    fn open_fingers_release_latch_anywhere() {
        let mut p = PinchTracker::default();
        let t0 = Instant::now();
        p.update(10.0, true, t0);
        p.update(90.0, false, t0 + ms(50));
        assert!(!p.is_latched());
    }

    #[test]
    fn custom_threshold() {
        let mut p = PinchTracker::new(25.0, ms(100));
        assert_eq!(p.update(30.0, true, Instant::now()), PinchOutcome::Open);
    }
}
