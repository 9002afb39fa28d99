//! Error types for air_keyboard

use thiserror::Error;

/// Result type alias for air_keyboard operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The display window could not be created or updated.
    #[error("window error: {0}")]
    Window(String),

    /// Opening or reading the capture device failed.
    #[error("camera error: {0}")]
    Camera(String),

    /// Loading or running the hand-landmark model failed.
    #[error("hand model error: {0}")]
    Model(String),

    /// The OS keyboard backend rejected a keystroke.
    #[error("keystroke injection failed: {0}")]
    Keystroke(String),

    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid keyboard layout: {0}")]
    Layout(#[from] key_layout::LayoutError),
}

impl From<minifb::Error> for Error {
    fn from(e: minifb::Error) -> Self {
        Error::Window(e.to_string())
    }
}
