use chrono::{Days, NaiveDateTime};

use crate::day::cutover::CutoverTime;

/// Next moment the daily refresh alarm should fire
///
/// Today at the cutover (seconds zeroed), or tomorrow if that moment
/// is already behind `now`.
pub fn next_fire_time(now: NaiveDateTime, cutover: CutoverTime) -> NaiveDateTime {
    let today = now.date().and_time(cutover.as_time());
    if today >= now {
        return today;
    }

    today.checked_add_days(Days::new(1)).unwrap_or(today)
}
