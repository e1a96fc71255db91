/// Daily cutover time
///
/// The hour:minute at which "today" logically rolls over to the next
/// weekday for display purposes. Defaults to midnight.

use chrono::{Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WidgetError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CutoverTime {
    hour: u32,
    minute: u32,
}

impl CutoverTime {
    /// Midnight, the default cutover
    pub const MIDNIGHT: CutoverTime = CutoverTime { hour: 0, minute: 0 };

    pub fn new(hour: u32, minute: u32) -> Result<Self, WidgetError> {
        if hour > 23 || minute > 59 {
            return Err(WidgetError::InvalidCutover { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }

    pub fn is_midnight(self) -> bool {
        self == Self::MIDNIGHT
    }

    /// The cutover as a time of day, seconds zeroed
    pub fn as_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for CutoverTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for CutoverTime {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || WidgetError::CutoverFormat(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(format_error)?;
        let hour = hour.parse().map_err(|_| format_error())?;
        let minute = minute.parse().map_err(|_| format_error())?;
        Self::new(hour, minute)
    }
}

/// True iff the current local time is strictly after the cutover
pub fn has_cutover_passed(cutover: CutoverTime) -> bool {
    has_cutover_passed_at(Local::now().time(), cutover)
}

/// True iff `now` is strictly after the cutover, compared at minute
/// precision (seconds and subseconds are ignored)
pub fn has_cutover_passed_at(now: NaiveTime, cutover: CutoverTime) -> bool {
    (now.hour(), now.minute()) > (cutover.hour, cutover.minute)
}

/// Passed, or still inside the cutover minute itself.
/// The daily alarm fires at exactly hh:mm:00, so it uses this form.
pub fn has_cutover_reached_at(now: NaiveTime, cutover: CutoverTime) -> bool {
    (now.hour(), now.minute()) >= (cutover.hour, cutover.minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_default_is_midnight() {
        assert!(CutoverTime::default().is_midnight());
        assert_eq!(CutoverTime::default().to_string(), "00:00");
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(CutoverTime::new(23, 59).is_ok());
        assert!(matches!(
            CutoverTime::new(24, 0),
            Err(WidgetError::InvalidCutover { hour: 24, minute: 0 })
        ));
        assert!(CutoverTime::new(12, 60).is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!("07:30".parse::<CutoverTime>().unwrap(), CutoverTime::new(7, 30).unwrap());
        assert_eq!(" 7:5 ".parse::<CutoverTime>().unwrap(), CutoverTime::new(7, 5).unwrap());
        assert!(matches!("0730".parse::<CutoverTime>(), Err(WidgetError::CutoverFormat(_))));
        assert!(matches!("ab:cd".parse::<CutoverTime>(), Err(WidgetError::CutoverFormat(_))));
        assert!(matches!("25:00".parse::<CutoverTime>(), Err(WidgetError::InvalidCutover { .. })));
    }

    #[rstest]
    #[case(at(6, 59, 59), false)]
    #[case(at(7, 30, 0), false)]
    #[case(at(7, 30, 59), false)]
    #[case(at(7, 31, 0), true)]
    #[case(at(23, 0, 0), true)]
    fn test_passed_ignores_seconds(#[case] now: NaiveTime, #[case] expected: bool) {
        let cutover = CutoverTime::new(7, 30).unwrap();
        assert_eq!(has_cutover_passed_at(now, cutover), expected);
    }

    #[test]
    fn test_reached_includes_cutover_minute() {
        let cutover = CutoverTime::new(7, 30).unwrap();
        assert!(!has_cutover_reached_at(at(7, 29, 59), cutover));
        assert!(has_cutover_reached_at(at(7, 30, 0), cutover));
        assert!(has_cutover_reached_at(at(7, 30, 1), cutover));
    }

    #[test]
    fn test_midnight_never_passed_during_first_minute() {
        assert!(!has_cutover_passed_at(at(0, 0, 30), CutoverTime::MIDNIGHT));
        assert!(has_cutover_passed_at(at(0, 1, 0), CutoverTime::MIDNIGHT));
    }
}
