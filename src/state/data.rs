/// Shared data structures for the widget state
///
/// These types flow between the preference store, the image cache
/// and the render planner.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::WidgetError;

/// One of the 7 fixed weekday positions (0..=6)
///
/// Which calendar weekday a slot stands for is decided by the
/// configured `WeekOrdering`, not by the slot itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Slot(u8);

impl Slot {
    /// Number of slots in a week
    pub const COUNT: usize = 7;

    /// Slot 0, also the fallback when a weekday cannot be mapped
    pub const FIRST: Slot = Slot(0);

    /// Build a slot from an index, `None` if it is out of range
    pub fn new(index: usize) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .filter(|&i| usize::from(i) < Self::COUNT)
            .map(Slot)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// All slots in index order
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..Self::COUNT as u8).map(Slot)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Slot {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index: usize = s
            .trim()
            .parse()
            .map_err(|_| WidgetError::SlotFormat(s.to_string()))?;
        Slot::new(index).ok_or(WidgetError::InvalidSlot(index))
    }
}

/// The photo assigned to a slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageReference {
    /// Slot that owns this reference
    pub slot: Slot,
    /// External locator as picked by the user (e.g. "file:///photos/mon.jpg")
    pub locator: String,
    /// Whether the local cache holds a copy that decodes
    pub cached: bool,
}
