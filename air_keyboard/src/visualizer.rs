//! Software-rendered overlay window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌─ Virtual Keyboard ─────────────────────────────────── Pinch to type ─┐
//! │ ┌──────────────────────────────────────────────────────────────────┐ │
//! │ │ [Q][W][E][R][T][Y][U][I][O][P]                                   │ │
//! │ │ [A][S][D][F][G][H][J][K][L][;]            keyboard panel (35%)   │ │
//! │ │ [Z][X][C][V][B][N][M][,][.][/]                                   │ │
//! │ │              [ SPACE ][BACKSPACE][ CLEAR ]                       │ │
//! │ └──────────────────────────────────────────────────────────────────┘ │
//! │   ┌────────────────────────────────────────────────────────────┐     │
//! │   │ typed text (last 50 chars)                   text panel    │     │
//! │   └────────────────────────────────────────────────────────────┘     │
//! │ status                                                   [FPS: 30]   │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The camera frame (or a flat background in simulation mode) sits behind
//! everything.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::app::AppState;
use crate::canvas::{text_width, Canvas, GLYPH_HEIGHT};
use crate::error::Result;
use crate::source::{Frame, WindowInput};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 1280;
pub const WIN_H: usize = 720;

const WINDOW_TITLE: &str = "Air Press Virtual Keyboard";

const BG_COLOR:     u32 = 0x1A1A2E;
const KEY_COLOR:    u32 = 0xCCCC66;
const HOVER_COLOR:  u32 = 0xB98029;
const CLICK_COLOR:  u32 = 0xDB9834;
const TEXT_COLOR:   u32 = 0xFFFFFF;
const TEXT_BG:      u32 = 0x503E2C;
const BORDER_COLOR: u32 = 0xC7C3BD;
const INDEX_COLOR:  u32 = 0xFF00FF;
const MIDDLE_COLOR: u32 = 0x00FFFF;
const BONE_COLOR:   u32 = 0xE6E6E6;
const JOINT_COLOR:  u32 = 0xFF0000;

// (x, y, w, h)
const KEYBOARD_PANEL: (usize, usize, usize, usize) = (30, 30, 1220, 420);
const TEXT_PANEL:     (usize, usize, usize, usize) = (50, 500, 1180, 120);
const FPS_BOX:        (usize, usize, usize, usize) = (1140, 680, 90, 30);

const KEYBOARD_ALPHA: f32 = 0.35;
const PANEL_ALPHA:    f32 = 0.5;

const KEY_BORDER:     usize = 2;
const CORNER_LEN:     usize = 20;
const CORNER_WIDTH:   usize = 5;
const LABEL_SCALE:      usize = 8;
const WIDE_LABEL_SCALE: usize = 4;
const TYPED_SCALE:      usize = 5;
const TIP_RADIUS:       usize = 8;
const JOINT_RADIUS:     usize = 4;
const BONE_WIDTH:       usize = 2;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    canvas: Canvas,
}

impl Visualizer {
    pub fn new() -> Result<Self> {
        let mut window = Window::new(
            WINDOW_TITLE,
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            canvas: Canvas::new(WIN_W, WIN_H, BG_COLOR),
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll the pointer and the quit key.
    pub fn poll_input(&self) -> WindowInput {
        WindowInput {
            pointer: self.window.get_mouse_pos(MouseMode::Discard),
            pressed: self.window.get_mouse_down(MouseButton::Left),
            quit:    !self.window.is_open()
                  || self.window.is_key_pressed(Key::Q, KeyRepeat::No),
        }
    }

    /// Compose and present one frame.
    pub fn render(&mut self, app: &AppState, frame: Option<&Frame>) -> Result<()> {
        compose(&mut self.canvas, app, frame);
        self.window.update_with_buffer(self.canvas.buffer(), WIN_W, WIN_H)?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Composition — window-independent so it can be tested
// ════════════════════════════════════════════════════════════════════════════

pub fn compose(canvas: &mut Canvas, app: &AppState, frame: Option<&Frame>) {
    match frame {
        Some(f) => canvas.blit_frame(f),
        None    => canvas.clear(BG_COLOR),
    }

    // ── Keyboard panel ────────────────────────────────────────────────────
    let (px, py, pw, ph) = KEYBOARD_PANEL;
    canvas.blend_rect(px, py, pw, ph, TEXT_BG, KEYBOARD_ALPHA);

    // ── Keys ──────────────────────────────────────────────────────────────
    for (i, key) in app.layout().keys().iter().enumerate() {
        let r = key.rect;
        let (x, y, w, h) = (r.x as usize, r.y as usize, r.w as usize, r.h as usize);

        let fill = if app.clicked() == Some(i) {
            CLICK_COLOR
        } else if app.hover() == Some(i) {
            HOVER_COLOR
        } else {
            KEY_COLOR
        };
        canvas.fill_rect(x, y, w, h, fill);
        canvas.draw_border(x, y, w, h, KEY_BORDER, BORDER_COLOR);
        canvas.draw_corners(x, y, w, h, CORNER_LEN, CORNER_WIDTH, BORDER_COLOR);

        let scale = if key.is_wide_label() { WIDE_LABEL_SCALE } else { LABEL_SCALE };
        let lw = text_width(&key.label, scale);
        let lh = GLYPH_HEIGHT * scale;
        canvas.draw_text(
            &key.label,
            x + w.saturating_sub(lw) / 2,
            y + h.saturating_sub(lh) / 2,
            scale,
            TEXT_COLOR,
        );
    }

    // ── Hand skeleton (camera frames only) ────────────────────────────────
    if let Some(hand) = app.skeleton() {
        for (a, b) in hand.bones() {
            canvas.draw_line(
                (a.x as isize, a.y as isize),
                (b.x as isize, b.y as isize),
                BONE_WIDTH,
                BONE_COLOR,
            );
        }
        for lm in hand.landmarks.iter().filter(|l| l.x >= 0.0 && l.y >= 0.0) {
            canvas.fill_circle(lm.x as usize, lm.y as usize, JOINT_RADIUS, JOINT_COLOR);
        }
    }

    // ── Fingertips ────────────────────────────────────────────────────────
    if let Some(tips) = app.fingertips() {
        for (lm, color) in [(tips.middle, MIDDLE_COLOR), (tips.index, INDEX_COLOR)] {
            if lm.x >= 0.0 && lm.y >= 0.0 {
                canvas.fill_circle(lm.x as usize, lm.y as usize, TIP_RADIUS, color);
            }
        }
    }

    // ── Typed text ────────────────────────────────────────────────────────
    let (tx, ty, tw, th) = TEXT_PANEL;
    canvas.blend_rect(tx, ty, tw, th, TEXT_BG, PANEL_ALPHA);
    canvas.draw_border(tx, ty, tw, th, KEY_BORDER, BORDER_COLOR);
    let text_y = ty + th.saturating_sub(GLYPH_HEIGHT * TYPED_SCALE) / 2;
    canvas.draw_text(app.visible_text(), tx + 10, text_y, TYPED_SCALE, TEXT_COLOR);

    // ── Header ────────────────────────────────────────────────────────────
    canvas.draw_text("Virtual Keyboard", 50, 8, 3, TEXT_COLOR);
    canvas.draw_text("Pinch to type", 1050, 10, 2, TEXT_COLOR);

    // ── Status + FPS ──────────────────────────────────────────────────────
    canvas.draw_text(app.status(), 50, 690, 2, TEXT_COLOR);
    if app.show_fps() {
        let (fx, fy, fw, fh) = FPS_BOX;
        canvas.blend_rect(fx, fy, fw, fh, TEXT_BG, PANEL_ALPHA);
        canvas.draw_text(&format!("FPS: {}", app.fps()), fx + 10, fy + 10, 2, TEXT_COLOR);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::config::AppConfig;
    use crate::hand::{Hand, Landmark, LANDMARK_COUNT};
    use crate::keystroke::NullSink;
    use crate::source::Capture;
    use std::time::Instant;

    fn make_app() -> AppState {
        let cfg = AppConfig::default();
        AppState::new(cfg.layout().unwrap(), &cfg, Box::new(NullSink))
    }

    fn hovering(x: f32, y: f32) -> Capture {
        Capture {
            frame: None,
            hands: vec![Hand::from_tips(Landmark::new(x, y), Landmark::new(x, y + 80.0))],
        }
    }

    #[test]
    fn idle_key_drawn_in_key_color() {
        let app = make_app();
        let mut canvas = Canvas::new(WIN_W, WIN_H, 0);
        compose(&mut canvas, &app, None);
        // just inside Q, clear of the border and the corner marks
        assert_eq!(canvas.pixel(60, 128), Some(KEY_COLOR));
    }

    #[test]
    fn hovered_key_drawn_in_hover_color() {
        let mut app = make_app();
        app.handle_capture(&hovering(92.0, 92.0), Instant::now());
        let mut canvas = Canvas::new(WIN_W, WIN_H, 0);
        compose(&mut canvas, &app, None);
        assert_eq!(canvas.pixel(60, 128), Some(HOVER_COLOR));
        // W is not hovered
        assert_eq!(canvas.pixel(160, 128), Some(KEY_COLOR));
    }

    #[test]
    fn keyboard_panel_is_translucent() {
        let app = make_app();
        let mut canvas = Canvas::new(WIN_W, WIN_H, 0);
        compose(&mut canvas, &app, None);
        // gap between keys inside the panel: BG blended toward TEXT_BG
        let px = canvas.pixel(40, 40).unwrap();
        assert_ne!(px, BG_COLOR);
        assert_ne!(px, TEXT_BG);
    }

    #[test]
    fn frame_shows_behind_overlay() {
        let app = make_app();
        let frame = Frame::new(1, 1, vec![0x123456]);
        let mut canvas = Canvas::new(WIN_W, WIN_H, 0);
        compose(&mut canvas, &app, Some(&frame));
        // bottom-left corner lies outside every overlay
        assert_eq!(canvas.pixel(0, WIN_H - 1), Some(0x123456));
    }

    #[test]
    fn skeleton_drawn_over_camera_frame() {
        let mut app = make_app();
        // every joint at (600, 470) except the first thumb joint
        let mut landmarks = vec![Landmark::new(600.0, 470.0); LANDMARK_COUNT];
        landmarks[1] = Landmark::new(700.0, 470.0);
        let capture = Capture {
            frame: Some(Frame::new(WIN_W, WIN_H, Vec::new())),
            hands: vec![Hand::new(landmarks, 0.9)],
        };
        app.handle_capture(&capture, Instant::now());

        let mut canvas = Canvas::new(WIN_W, WIN_H, 0);
        compose(&mut canvas, &app, capture.frame.as_ref());
        assert_eq!(canvas.pixel(650, 470), Some(BONE_COLOR));
        assert_eq!(canvas.pixel(700, 470), Some(JOINT_COLOR));
        assert_eq!(canvas.pixel(600, 470), Some(INDEX_COLOR));
    }

    #[test]
    fn simulated_hand_has_no_skeleton() {
        let mut app = make_app();
        app.handle_capture(&hovering(600.0, 470.0), Instant::now());
        let mut canvas = Canvas::new(WIN_W, WIN_H, 0);
        compose(&mut canvas, &app, None);
        // wrist sits under the index tip; nothing drawn off the tips
        assert_eq!(canvas.pixel(600, 470), Some(INDEX_COLOR));
        assert_eq!(canvas.pixel(620, 470), Some(BG_COLOR));
    }
}
