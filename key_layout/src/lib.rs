//! # key_layout
//!
//! Geometry and text model for a pinch-to-type on-screen keyboard.
//!
//! * [`Layout`] — a static table of [`Key`]s, each a label, a
//!   [`KeyAction`] and a screen [`Rect`].
//! * [`Layout::hit_test`] — which key (if any) lies under a fingertip.
//! * [`TextBuffer`] — the accumulated typed text shown under the keyboard.
//!
//! No I/O happens here; the camera, the window and the OS keystrokes live in
//! the `air_keyboard` crate.
//!
//! ## Quick start
//!
//! ```rust
//! use key_layout::{Layout, TextBuffer};
//!
//! let layout = Layout::qwerty();
//! let key = layout.hit_test(90.0, 90.0).unwrap();   // inside "Q"
//! assert_eq!(key.label, "Q");
//!
//! let mut text = TextBuffer::new();
//! text.apply(&key.action);
//! assert_eq!(text.as_str(), "Q");
//! ```

pub mod buffer;
pub mod layout;

pub use buffer::{TextBuffer, DEFAULT_TAIL};
pub use layout::{default_rows, Key, KeyAction, Layout, LayoutError, Rect};
