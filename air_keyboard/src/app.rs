//! Top-level application state machine.
//!
//! `AppState` owns the key `Layout`, the `TextBuffer`, the `PinchTracker`
//! and the keystroke sink.  It processes one `Capture` per frame and
//! exposes what the visualizer needs to draw.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use key_layout::{KeyAction, Layout, TextBuffer};

use crate::config::AppConfig;
use crate::error::Result;
use crate::gesture::{PinchOutcome, PinchTracker};
use crate::hand::{Hand, Landmark};
use crate::keystroke::{open_key_sink, KeySink};
use crate::source::{Capture, HandSource, WindowInput};
use crate::visualizer::{Visualizer, WIN_H, WIN_W};

/// Frames a clicked key stays in the click color.
const CLICK_FLASH_FRAMES: u8 = 6;

// ════════════════════════════════════════════════════════════════════════════
// Fingertips
// ════════════════════════════════════════════════════════════════════════════

/// Index and middle fingertips of the tracked hand, in window pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fingertips {
    pub index:    Landmark,
    pub middle:   Landmark,
    pub distance: f32,
}

// ════════════════════════════════════════════════════════════════════════════
// FpsMeter
// ════════════════════════════════════════════════════════════════════════════

/// Exponentially smoothed frame rate.
#[derive(Debug, Default)]
pub struct FpsMeter {
    last: Option<Instant>,
    fps:  f32,
}

impl FpsMeter {
    const SMOOTHING: f32 = 0.1;

    pub fn tick(&mut self, now: Instant) {
        if let Some(prev) = self.last {
            let dt = now.saturating_duration_since(prev).as_secs_f32();
            if dt > 0.0 {
                let inst = 1.0 / dt;
                self.fps = if self.fps == 0.0 {
                    inst
                } else {
                    self.fps + (inst - self.fps) * Self::SMOOTHING
                };
            }
        }
        self.last = Some(now);
    }

    pub fn fps(&self) -> u32 { self.fps.round() as u32 }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    layout: Layout,
    text:   TextBuffer,
    pinch:  PinchTracker,
    sink:   Box<dyn KeySink>,

    // ── per-frame view state ─────────────────────────────────────────────
    hover:      Option<usize>,
    flash:      Option<(usize, u8)>,
    fingertips: Option<Fingertips>,
    skeleton:   Option<Hand>,
    fps:        FpsMeter,

    // ── display options ──────────────────────────────────────────────────
    text_tail: usize,
    show_fps:  bool,

    pub status: String,
}

impl AppState {
    pub fn new(layout: Layout, cfg: &AppConfig, sink: Box<dyn KeySink>) -> Self {
        AppState {
            layout,
            text:       TextBuffer::new(),
            pinch:      PinchTracker::new(cfg.pinch.threshold, cfg.pinch.cooldown()),
            sink,
            hover:      None,
            flash:      None,
            fingertips: None,
            skeleton:   None,
            fps:        FpsMeter::default(),
            text_tail:  cfg.display.text_tail,
            show_fps:   cfg.display.show_fps,
            status:     "Ready - hover a key and pinch to type".to_string(),
        }
    }

    // ── process one Capture ──────────────────────────────────────────────

    /// Hit-test the first hand and update the pinch state.
    ///
    /// Returns the action of a key clicked on this frame.
    pub fn handle_capture(&mut self, capture: &Capture, now: Instant) -> Option<KeyAction> {
        self.hover      = None;
        self.fingertips = None;
        self.skeleton   = None;

        let hand = capture.hands.first()?;
        let hand = match &capture.frame {
            Some(f) if !f.is_empty() => {
                let scaled = hand.scaled(
                    WIN_W as f32 / f.width() as f32,
                    WIN_H as f32 / f.height() as f32,
                );
                // Only a real pose model has joints worth drawing.
                self.skeleton = Some(scaled.clone());
                scaled
            }
            _ => hand.clone(),
        };

        let (index, middle) = (hand.index_tip()?, hand.middle_tip()?);
        let distance = hand.pinch_distance()?;
        self.fingertips = Some(Fingertips { index, middle, distance });

        self.hover = self.layout.hit_index(index.x, index.y);

        match self.pinch.update(distance, self.hover.is_some(), now) {
            PinchOutcome::Click => {
                let i = self.hover?;
                self.flash = Some((i, CLICK_FLASH_FRAMES));
                Some(self.press(i))
            }
            PinchOutcome::Open | PinchOutcome::Pinched => None,
        }
    }

    /// Apply the key at `i` to the buffer and forward it to the OS.
    fn press(&mut self, i: usize) -> KeyAction {
        let key = &self.layout.keys()[i];
        let action = key.action;

        if let Some(forward) = self.text.apply(&action) {
            if let Err(e) = self.sink.send(&forward) {
                warn!(key = %key.label, error = %e, "keystroke not delivered");
            }
        }
        debug!(key = %key.label, text_len = self.text.len(), "key clicked");
        self.status = format!("Typed {}", key.label);
        action
    }

    // ── per-frame tick ───────────────────────────────────────────────────

    pub fn tick(&mut self, now: Instant) {
        self.fps.tick(now);
        if let Some((i, n)) = self.flash {
            self.flash = if n <= 1 { None } else { Some((i, n - 1)) };
        }
    }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn layout(&self)      -> &Layout            { &self.layout }
    pub fn text(&self)        -> &TextBuffer        { &self.text }
    pub fn hover(&self)       -> Option<usize>      { self.hover }
    pub fn clicked(&self)     -> Option<usize>      { self.flash.map(|(i, _)| i) }
    pub fn fingertips(&self)  -> Option<Fingertips> { self.fingertips }
    pub fn skeleton(&self)    -> Option<&Hand>      { self.skeleton.as_ref() }
    pub fn fps(&self)         -> u32                { self.fps.fps() }
    pub fn show_fps(&self)    -> bool               { self.show_fps }
    pub fn status(&self)      -> &str               { &self.status }
    pub fn visible_text(&self) -> &str              { self.text.tail(self.text_tail) }
    pub fn cooldown(&self)    -> Duration           { self.pinch.cooldown() }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Whether clicks should reach the OS for this source.
///
/// A source steered by the keyboard window's own pointer keeps that
/// window focused, so injected keys would come straight back to it (and
/// an injected `q` would quit).  Injection is switched off for it.
pub fn keystroke_injection(cfg: &AppConfig, source: &dyn HandSource) -> bool {
    if cfg.inject_keystrokes && source.uses_window_pointer() {
        warn!(
            source = source.name(),
            "keystroke injection disabled: the keyboard window holds focus in this mode"
        );
        return false;
    }
    cfg.inject_keystrokes
}

/// One loop iteration short of drawing: poll the source, update the state.
///
/// Returns the capture to render, or `None` once the loop should stop.
pub fn step(
    app:    &mut AppState,
    source: &mut dyn HandSource,
    input:  &WindowInput,
    now:    Instant,
) -> Option<Capture> {
    if input.quit {
        info!("quit requested");
        return None;
    }

    let capture = match source.next_capture(input) {
        Ok(Some(c)) => c,
        Ok(None) => {
            info!("hand source exhausted");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "frame read failed; stopping");
            return None;
        }
    };

    app.handle_capture(&capture, now);
    app.tick(now);
    Some(capture)
}

/// Run the keyboard until `q`, window close, or the source runs dry.
///
/// Single-threaded: read → detect → hit-test → draw → display → poll.
pub fn run(cfg: &AppConfig, mut source: Box<dyn HandSource>) -> Result<()> {
    let layout = cfg.layout()?;
    let mut vis = Visualizer::new()?;
    let sink = open_key_sink(keystroke_injection(cfg, source.as_ref()));
    let mut app = AppState::new(layout, cfg, sink);

    info!(source = source.name(), keys = app.layout().len(), "virtual keyboard running");

    while vis.is_open() {
        let input = vis.poll_input();
        let Some(capture) = step(&mut app, source.as_mut(), &input, Instant::now()) else {
            break;
        };
        vis.render(&app, capture.frame.as_ref())?;
    }

    info!(typed = %app.text().as_str(), "shutting down");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
