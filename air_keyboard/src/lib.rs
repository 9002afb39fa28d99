//! # air_keyboard
//!
//! Pinch-to-type virtual keyboard.  A QWERTY overlay is drawn over a
//! mirrored webcam feed; hovering the index fingertip over a key and
//! pinching index and middle fingertips together types it, both into the
//! on-screen text panel and into whatever OS window has focus.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Index fingertip over a key | Highlight the key |
//! | Index + middle tips closer than 40 px | Click the hovered key (once per pinch, 0.5 s cooldown) |
//! | Click on a letter / punctuation key | Append it; send the lowercase key to the OS |
//! | Click on `SPACE` | Append a space; send Space |
//! | Click on `BACKSPACE` | Remove one trailing character; send Backspace |
//! | Click on `CLEAR` | Empty the text panel (nothing sent) |
//! | `q` | Quit |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse pointer is the index
//!   fingertip; holding the left button pinches.  The keyboard window keeps
//!   focus while you click, so typed keys stay in the on-screen panel.
//! * `camera` — **Camera mode**: webcam frames via `nokhwa`, hand landmarks
//!   from an ONNX model via `tract`.

pub mod app;
pub mod canvas;
pub mod config;
pub mod decode;
pub mod error;
pub mod gesture;
pub mod hand;
pub mod keystroke;
pub mod source;
pub mod visualizer;

#[cfg(feature = "camera")]
pub mod camera;

pub use error::{Error, Result};
