use chrono::{Datelike, Days, Local, NaiveDate};
use tracing::error;

use super::ordering::WeekOrdering;
use crate::state::data::Slot;

/// Maps a calendar date (optionally offset by whole days) to a slot
/// through the configured ordering table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayIndexResolver {
    ordering: WeekOrdering,
}

impl DayIndexResolver {
    pub fn new(ordering: WeekOrdering) -> Self {
        Self { ordering }
    }

    /// Slot for today's local date advanced by `offset_days`
    pub fn resolve_index(&self, offset_days: i64) -> Slot {
        self.resolve_index_on(Local::now().date_naive(), offset_days)
    }

    /// Slot for `date` advanced by `offset_days` (negative goes back)
    pub fn resolve_index_on(&self, date: NaiveDate, offset_days: i64) -> Slot {
        let days = Days::new(offset_days.unsigned_abs());
        let shifted = if offset_days >= 0 {
            date.checked_add_days(days)
        } else {
            date.checked_sub_days(days)
        };

        shifted
            .and_then(|day| self.ordering.slot_of(day.weekday()))
            .unwrap_or_else(|| {
                error!(
                    "❌ No slot for {} {:+} days with {} ordering, falling back to slot 0",
                    date, offset_days, self.ordering
                );
                Slot::FIRST
            })
    }
}
