//! Application configuration.
//!
//! Every field has a default, so an empty (or missing) `config.toml` gives
//! the stock 1280×720 QWERTY setup.  Example:
//!
//! ```toml
//! inject_keystrokes = false
//!
//! [pinch]
//! threshold   = 35.0
//! cooldown_ms = 400
//!
//! [keyboard]
//! rows = [["1", "2", "3"], ["SPACE", "BACKSPACE", "CLEAR"]]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use key_layout::{default_rows, Layout, DEFAULT_TAIL};

use crate::error::Result;

pub const CONFIG_DIR_NAME:  &str = "air_keyboard";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Capture device index.
    pub index:  u32,
    pub width:  u32,
    pub height: u32,
    /// Flip frames horizontally so the feed behaves like a mirror.
    pub mirror: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig { index: 0, width: 1280, height: 720, mirror: true }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Path to the 21-point hand-landmark ONNX model.
    pub model_path: Option<PathBuf>,
    /// Minimum hand-presence score for a detection to count.
    pub detection_confidence: f32,
    /// Upper bound on hands reported per frame.  The single-hand landmark
    /// model yields at most one, so values above 1 behave like 1; 0
    /// disables detection.
    pub max_hands: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig { model_path: None, detection_confidence: 0.8, max_hands: 1 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchConfig {
    /// Fingertip distance (pixels) below which the hand counts as pinched.
    pub threshold:   f32,
    /// Minimum time between two registered clicks.
    pub cooldown_ms: u64,
}

impl PinchConfig {
    pub fn cooldown(&self) -> Duration { Duration::from_millis(self.cooldown_ms) }
}

impl Default for PinchConfig {
    fn default() -> Self {
        PinchConfig { threshold: 40.0, cooldown_ms: 500 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Number of trailing characters shown in the text panel.
    pub text_tail: usize,
    pub show_fps:  bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig { text_tail: DEFAULT_TAIL, show_fps: true }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    pub rows: Vec<Vec<String>>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        KeyboardConfig { rows: default_rows() }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera:   CameraConfig,
    pub detector: DetectorConfig,
    pub pinch:    PinchConfig,
    pub display:  DisplayConfig,
    pub keyboard: KeyboardConfig,
    /// Forward clicks to the OS as real keystrokes.
    pub inject_keystrokes: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            camera:   CameraConfig::default(),
            detector: DetectorConfig::default(),
            pinch:    PinchConfig::default(),
            display:  DisplayConfig::default(),
            keyboard: KeyboardConfig::default(),
            inject_keystrokes: true,
        }
    }
}

impl AppConfig {
    /// `<config_dir>/air_keyboard/config.toml`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Load `explicit` if given (it must exist), otherwise the default path
    /// when a file is there, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Build the key layout described by `keyboard.rows`.
    pub fn layout(&self) -> Result<Layout> {
        Ok(Layout::from_rows(&self.keyboard.rows)?)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
