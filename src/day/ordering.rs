/// Weekday ordering tables
///
/// Binds each of the 7 slots to a calendar weekday. Deployments disagree
/// on whether the week starts on Monday or Sunday, so the table is
/// configurable and persisted with the widget settings.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WidgetError;
use crate::state::data::Slot;

/// Which calendar weekday each slot shows, slot 0 first
///
/// Any permutation of the seven weekdays is accepted. Monday-first and
/// Sunday-first are the named presets; anything else persists as a comma
/// list such as `sat,sun,mon,tue,wed,thu,fri`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekOrdering {
    table: [Weekday; Slot::COUNT],
}

impl WeekOrdering {
    /// Mon=0 .. Sun=6
    pub const MONDAY_FIRST: WeekOrdering = WeekOrdering {
        table: [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ],
    };

    /// Sun=0, Mon=1 .. Sat=6
    pub const SUNDAY_FIRST: WeekOrdering = WeekOrdering {
        table: [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ],
    };

    /// Build an ordering from a slot table. Every weekday must appear
    /// exactly once.
    pub fn new(table: [Weekday; Slot::COUNT]) -> Result<Self, WidgetError> {
        for (index, day) in table.iter().enumerate() {
            if table[..index].contains(day) {
                return Err(WidgetError::InvalidOrdering(format!(
                    "{day} appears more than once"
                )));
            }
        }
        Ok(Self { table })
    }

    pub fn table(&self) -> &[Weekday; Slot::COUNT] {
        &self.table
    }

    /// Slot a calendar weekday is shown in
    pub fn slot_of(&self, weekday: Weekday) -> Option<Slot> {
        self.table
            .iter()
            .position(|&day| day == weekday)
            .and_then(Slot::new)
    }

    /// Calendar weekday bound to a slot
    pub fn weekday_of(&self, slot: Slot) -> Weekday {
        self.table[slot.index()]
    }

    /// Fallback label shown when a slot has no cached photo
    pub fn label(&self, slot: Slot) -> &'static str {
        weekday_label(self.weekday_of(slot))
    }

    /// Name used when persisting the ordering
    pub fn name(&self) -> String {
        if *self == Self::MONDAY_FIRST {
            "monday".to_string()
        } else if *self == Self::SUNDAY_FIRST {
            "sunday".to_string()
        } else {
            self.table
                .iter()
                .map(|day| day.to_string().to_lowercase())
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

impl Default for WeekOrdering {
    fn default() -> Self {
        Self::MONDAY_FIRST
    }
}

impl fmt::Display for WeekOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for WeekOrdering {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "monday" | "mon" => return Ok(Self::MONDAY_FIRST),
            "sunday" | "sun" => return Ok(Self::SUNDAY_FIRST),
            _ if !s.contains(',') => {
                return Err(WidgetError::InvalidOrdering(format!(
                    "{s:?} (expected monday, sunday or a list of 7 weekdays)"
                )))
            }
            _ => {}
        }

        let days = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<Weekday>()
                    .map_err(|_| WidgetError::InvalidOrdering(format!("unknown weekday {:?}", part.trim())))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = days.len();
        let table: [Weekday; Slot::COUNT] = days.try_into().map_err(|_| {
            WidgetError::InvalidOrdering(format!("expected {} weekdays, got {}", Slot::COUNT, count))
        })?;
        Self::new(table)
    }
}

impl TryFrom<String> for WeekOrdering {
    type Error = WidgetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekOrdering> for String {
    fn from(ordering: WeekOrdering) -> Self {
        ordering.name()
    }
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Понедельник",
        Weekday::Tue => "Вторник",
        Weekday::Wed => "Среда",
        Weekday::Thu => "Четверг",
        Weekday::Fri => "Пятница",
        Weekday::Sat => "Суббота",
        Weekday::Sun => "Воскресенье",
    }
}
