//! Key geometry and hit-testing.
//!
//! Keys sit on a 100 px grid starting at (50, 50).  Regular keys are
//! 85 × 85; the bottom row holds the three wide command keys at fixed
//! x offsets.

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const KEY_SIZE:    u32 = 85;
pub const KEY_PITCH:   u32 = 100;
pub const GRID_ORIGIN: u32 = 50;

const SPACE_X:      u32 = 390;
const SPACE_W:      u32 = 300;
const BACKSPACE_X:  u32 = 700;
const BACKSPACE_W:  u32 = 200;
const CLEAR_X:      u32 = 910;
const CLEAR_W:      u32 = 200;

pub const SPACE_LABEL:     &str = "SPACE";
pub const BACKSPACE_LABEL: &str = "BACKSPACE";
pub const CLEAR_LABEL:     &str = "CLEAR";

const LETTER_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL;", "ZXCVBNM,./"];

const COMMAND_ROW: [(&str, KeyAction); 3] = [
    (SPACE_LABEL,     KeyAction::Space),
    (BACKSPACE_LABEL, KeyAction::Backspace),
    (CLEAR_LABEL,     KeyAction::Clear),
];

/// The QWERTY rows drawn by default.
pub fn default_rows() -> Vec<Vec<String>> {
    LETTER_ROWS
        .iter()
        .map(|row| row.chars().map(String::from).collect())
        .chain(std::iter::once(
            COMMAND_ROW.iter().map(|(label, _)| label.to_string()).collect(),
        ))
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout has no keys")]
    EmptyLayout,

    #[error("unknown key label {0:?} (expected a single character, SPACE, BACKSPACE or CLEAR)")]
    UnknownLabel(String),
}

// ════════════════════════════════════════════════════════════════════════════
// Rect
// ════════════════════════════════════════════════════════════════════════════

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self)  -> u32 { self.x + self.w }
    pub fn bottom(&self) -> u32 { self.y + self.h }

    /// Strict containment: a point lying exactly on an edge is outside.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        let (x0, y0) = (self.x as f32, self.y as f32);
        let (x1, y1) = (self.right() as f32, self.bottom() as f32);
        x0 < px && px < x1 && y0 < py && py < y1
    }
}

// ════════════════════════════════════════════════════════════════════════════
// KeyAction
// ════════════════════════════════════════════════════════════════════════════

/// What pressing a key does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Type a single character.
    Char(char),
    Space,
    /// Delete one trailing character.
    Backspace,
    /// Empty the on-screen buffer.  Nothing is sent to the OS.
    Clear,
}

impl KeyAction {
    pub fn from_label(label: &str) -> Result<Self, LayoutError> {
        match label {
            SPACE_LABEL     => Ok(KeyAction::Space),
            BACKSPACE_LABEL => Ok(KeyAction::Backspace),
            CLEAR_LABEL     => Ok(KeyAction::Clear),
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(KeyAction::Char(c)),
                    _ => Err(LayoutError::UnknownLabel(label.to_string())),
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Key
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Key {
    pub label:  String,
    pub action: KeyAction,
    pub rect:   Rect,
}

impl Key {
    /// Labels longer than one character are drawn with a smaller font.
    pub fn is_wide_label(&self) -> bool {
        self.label.chars().count() > 1
    }
}

/// Place the key at `col` of `row` according to the grid rule.
fn key_rect(label: &str, row: usize, col: usize) -> Rect {
    let y = KEY_PITCH * row as u32 + GRID_ORIGIN;
    match label {
        SPACE_LABEL     => Rect::new(SPACE_X,     y, SPACE_W,     KEY_SIZE),
        BACKSPACE_LABEL => Rect::new(BACKSPACE_X, y, BACKSPACE_W, KEY_SIZE),
        CLEAR_LABEL     => Rect::new(CLEAR_X,     y, CLEAR_W,     KEY_SIZE),
        _ => Rect::new(KEY_PITCH * col as u32 + GRID_ORIGIN, y, KEY_SIZE, KEY_SIZE),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Layout
// ════════════════════════════════════════════════════════════════════════════

/// Static table of keys, built once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    keys: Vec<Key>,
}

impl Layout {
    /// The default QWERTY layout with SPACE / BACKSPACE / CLEAR underneath.
    pub fn qwerty() -> Self {
        let mut keys = Vec::new();
        for (i, row) in LETTER_ROWS.iter().enumerate() {
            for (j, c) in row.chars().enumerate() {
                let label = c.to_string();
                keys.push(Key {
                    rect:   key_rect(&label, i, j),
                    action: KeyAction::Char(c),
                    label,
                });
            }
        }
        let i = LETTER_ROWS.len();
        for (j, &(label, action)) in COMMAND_ROW.iter().enumerate() {
            keys.push(Key { label: label.to_string(), action, rect: key_rect(label, i, j) });
        }
        Layout { keys }
    }

    /// Build a layout from rows of labels.
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self, LayoutError> {
        let mut keys = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            for (j, label) in row.iter().enumerate() {
                let label = label.as_ref();
                keys.push(Key {
                    label:  label.to_string(),
                    action: KeyAction::from_label(label)?,
                    rect:   key_rect(label, i, j),
                });
            }
        }
        if keys.is_empty() {
            return Err(LayoutError::EmptyLayout);
        }
        Ok(Layout { keys })
    }

    /// First key whose rectangle strictly contains `(px, py)`.
    pub fn hit_test(&self, px: f32, py: f32) -> Option<&Key> {
        self.keys.iter().find(|k| k.rect.contains(px, py))
    }

    /// Index of the key under `(px, py)`, for highlight bookkeeping.
    pub fn hit_index(&self, px: f32, py: f32) -> Option<usize> {
        self.keys.iter().position(|k| k.rect.contains(px, py))
    }

    pub fn get(&self, label: &str) -> Option<&Key> {
        self.keys.iter().find(|k| k.label == label)
    }

    pub fn keys(&self)     -> &[Key] { &self.keys }
    pub fn len(&self)      -> usize  { self.keys.len() }
    pub fn is_empty(&self) -> bool   { self.keys.is_empty() }
}

impl Default for Layout {
    fn default() -> Self { Layout::qwerty() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn qwerty_has_33_keys() {
        assert_eq!(Layout::qwerty().len(), 33);
    }

    #[test]
    fn qwerty_matches_default_rows() {
        let from_rows = Layout::from_rows(&default_rows()).unwrap();
        assert_eq!(Layout::qwerty(), from_rows);
        assert!(!Layout::qwerty().is_empty());
    }

    #[test]
    fn regular_key_positions_follow_grid() {
        let layout = Layout::qwerty();
        assert_eq!(layout.get("Q").unwrap().rect, Rect::new(50, 50, 85, 85));
        assert_eq!(layout.get("P").unwrap().rect, Rect::new(950, 50, 85, 85));
        assert_eq!(layout.get(";").unwrap().rect, Rect::new(950, 150, 85, 85));
        assert_eq!(layout.get("Z").unwrap().rect, Rect::new(50, 250, 85, 85));
    }

    #[test]
    fn command_keys_have_fixed_geometry() {
        let layout = Layout::qwerty();
        assert_eq!(layout.get("SPACE").unwrap().rect,     Rect::new(390, 350, 300, 85));
        assert_eq!(layout.get("BACKSPACE").unwrap().rect, Rect::new(700, 350, 200, 85));
        assert_eq!(layout.get("CLEAR").unwrap().rect,     Rect::new(910, 350, 200, 85));
    }

    #[test]
    fn actions_from_labels() {
        let layout = Layout::qwerty();
        assert_eq!(layout.get("A").unwrap().action,         KeyAction::Char('A'));
        assert_eq!(layout.get(",").unwrap().action,         KeyAction::Char(','));
        assert_eq!(layout.get("SPACE").unwrap().action,     KeyAction::Space);
        assert_eq!(layout.get("BACKSPACE").unwrap().action, KeyAction::Backspace);
        assert_eq!(layout.get("CLEAR").unwrap().action,     KeyAction::Clear);
    }

    #[test]
    fn hit_test_inside_and_outside() {
        let layout = Layout::qwerty();
        assert_eq!(layout.hit_test(92.0, 92.0).map(|k| k.label.as_str()), Some("Q"));
        assert_eq!(layout.hit_test(540.0, 392.0).map(|k| k.label.as_str()), Some("SPACE"));
        // gap between Q and W
        assert!(layout.hit_test(140.0, 92.0).is_none());
        // below the keyboard
        assert!(layout.hit_test(600.0, 600.0).is_none());
    }

    #[test]
    fn hit_test_edges_are_exclusive() {
        let layout = Layout::qwerty();
        assert!(layout.hit_test(50.0, 92.0).is_none());
        assert!(layout.hit_test(135.0, 92.0).is_none());
        assert!(layout.hit_test(92.0, 50.0).is_none());
        assert!(layout.hit_test(92.0, 135.0).is_none());
        assert!(layout.hit_test(50.5, 50.5).is_some());
    }

    #[test]
    fn empty_rows_rejected() {
        let rows: Vec<Vec<String>> = vec![vec![]];
        assert_eq!(Layout::from_rows(&rows), Err(LayoutError::EmptyLayout));
    }

    #[test]
    fn multi_char_label_rejected() {
        let rows = vec![vec!["AB"]];
        assert_eq!(
            Layout::from_rows(&rows),
            Err(LayoutError::UnknownLabel("AB".to_string()))
        );
    }

    #[test]
    fn custom_rows_use_same_grid() {
        let rows = vec![vec!["1", "2"], vec!["SPACE"]];
        let layout = Layout::from_rows(&rows).unwrap();
        assert_eq!(layout.get("2").unwrap().rect, Rect::new(150, 50, 85, 85));
        assert_eq!(layout.get("SPACE").unwrap().rect, Rect::new(390, 150, 300, 85));
    }

    #[test]
    fn wide_label_detection() {
        let layout = Layout::qwerty();
        assert!(!layout.get("Q").unwrap().is_wide_label());
        assert!(layout.get("CLEAR").unwrap().is_wide_label());
    }

    proptest! {
        #[test]
        fn contains_matches_strict_bounds(
            x in 0u32..1000, y in 0u32..1000, w in 1u32..300, h in 1u32..300,
            px in 0.0f32..1400.0, py in 0.0f32..1400.0,
        ) {
            let r = Rect::new(x, y, w, h);
            let expected = (x as f32) < px && px < (x + w) as f32
                && (y as f32) < py && py < (y + h) as f32;
            prop_assert_eq!(r.contains(px, py), expected);
        }

        #[test]
        fn hit_key_contains_point(px in 0.0f32..1280.0, py in 0.0f32..720.0) {
            let layout = Layout::qwerty();
            if let Some(k) = layout.hit_test(px, py) {
                prop_assert!(k.rect.contains(px, py));
            } else {
                prop_assert!(layout.keys().iter().all(|k| !k.rect.contains(px, py)));
            }
        }
    }
}
