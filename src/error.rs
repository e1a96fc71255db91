/// Error types shared by the preference store, the image cache and the CLI

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("preference store error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid cutover time {hour}:{minute} (expected 00:00 to 23:59)")]
    InvalidCutover { hour: u32, minute: u32 },

    #[error("could not parse cutover time {0:?} (expected HH:MM)")]
    CutoverFormat(String),

    #[error("slot index {0} is out of range (0 to 6)")]
    InvalidSlot(usize),

    #[error("could not parse slot {0:?} (expected a number from 0 to 6)")]
    SlotFormat(String),

    #[error("invalid week ordering: {0}")]
    InvalidOrdering(String),

    #[error("unsupported locator {0:?}")]
    UnsupportedLocator(String),

    #[error("background task failed: {0}")]
    Task(String),

    #[error("could not determine the {0} directory")]
    NoDirectory(&'static str),
}

pub type Result<T> = std::result::Result<T, WidgetError>;
