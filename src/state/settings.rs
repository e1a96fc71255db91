/// Widget settings
///
/// Loaded once at startup from the preference store and passed
/// explicitly to the resolver, the render planner and the scheduler.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prefs::PrefStore;
use crate::day::cutover::CutoverTime;
use crate::day::ordering::WeekOrdering;
use crate::day::resolver::DayIndexResolver;
use crate::error::Result;

/// Namespace holding the settings keys
pub const SETTINGS_NAMESPACE: &str = "widget_settings";
const KEY_UPDATE_HOUR: &str = "updateHour";
const KEY_UPDATE_MINUTE: &str = "updateMinute";
const KEY_WEEK_START: &str = "weekStart";
const KEY_CORNER_RADIUS: &str = "cornerRadius";

/// Corner radius (in pixels) applied to widget bitmaps
pub const DEFAULT_CORNER_RADIUS: f32 = 48.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WidgetSettings {
    /// When "today" rolls over for the daily refresh
    pub cutover: CutoverTime,

    /// Which weekday each slot stands for
    pub week_start: WeekOrdering,

    /// Rounding applied to the widget bitmap (0 = square corners)
    pub corner_radius: f32,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            cutover: CutoverTime::MIDNIGHT,
            week_start: WeekOrdering::MONDAY_FIRST,
            corner_radius: DEFAULT_CORNER_RADIUS,
        }
    }
}

impl WidgetSettings {
    /// Load settings, using the default for anything missing or invalid
    pub fn load(prefs: &PrefStore) -> Result<Self> {
        let mut settings = Self::default();

        let hour = prefs.get_int(SETTINGS_NAMESPACE, KEY_UPDATE_HOUR)?;
        let minute = prefs.get_int(SETTINGS_NAMESPACE, KEY_UPDATE_MINUTE)?;
        if hour.is_some() || minute.is_some() {
            let hour = u32::try_from(hour.unwrap_or(0)).unwrap_or(u32::MAX);
            let minute = u32::try_from(minute.unwrap_or(0)).unwrap_or(u32::MAX);
            match CutoverTime::new(hour, minute) {
                Ok(cutover) => settings.cutover = cutover,
                Err(e) => warn!("⚠️  Stored cutover ignored: {}", e),
            }
        }

        if let Some(raw) = prefs.get_string(SETTINGS_NAMESPACE, KEY_WEEK_START)? {
            match raw.parse() {
                Ok(ordering) => settings.week_start = ordering,
                Err(e) => warn!("⚠️  Stored week start ignored: {}", e),
            }
        }

        if let Some(raw) = prefs.get_string(SETTINGS_NAMESPACE, KEY_CORNER_RADIUS)? {
            match raw.parse::<f32>() {
                Ok(radius) if radius.is_finite() && radius >= 0.0 => settings.corner_radius = radius,
                _ => warn!("⚠️  Stored corner radius {:?} ignored", raw),
            }
        }

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Persist every field
    pub fn save(&self, prefs: &PrefStore) -> Result<()> {
        prefs.put_int(SETTINGS_NAMESPACE, KEY_UPDATE_HOUR, i64::from(self.cutover.hour()))?;
        prefs.put_int(SETTINGS_NAMESPACE, KEY_UPDATE_MINUTE, i64::from(self.cutover.minute()))?;
        prefs.put_string(SETTINGS_NAMESPACE, KEY_WEEK_START, &self.week_start.name())?;
        prefs.put_string(SETTINGS_NAMESPACE, KEY_CORNER_RADIUS, &self.corner_radius.to_string())?;
        Ok(())
    }

    pub fn resolver(&self) -> DayIndexResolver {
        DayIndexResolver::new(self.week_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_gives_defaults() {
        let prefs = PrefStore::open_in_memory().unwrap();
        let settings = WidgetSettings::load(&prefs).unwrap();
        assert_eq!(settings, WidgetSettings::default());
        assert!(settings.cutover.is_midnight());
    }

    #[test]
    fn test_round_trip() {
        let prefs = PrefStore::open_in_memory().unwrap();
        let settings = WidgetSettings {
            cutover: CutoverTime::new(21, 45).unwrap(),
            week_start: WeekOrdering::SUNDAY_FIRST,
            corner_radius: 12.5,
        };
        settings.save(&prefs).unwrap();

        assert_eq!(WidgetSettings::load(&prefs).unwrap(), settings);
    }

    #[test]
    fn test_cutover_uses_legacy_keys() {
        let prefs = PrefStore::open_in_memory().unwrap();
        prefs.put_int(SETTINGS_NAMESPACE, "updateHour", 6).unwrap();
        prefs.put_int(SETTINGS_NAMESPACE, "updateMinute", 15).unwrap();

        let settings = WidgetSettings::load(&prefs).unwrap();
        assert_eq!(settings.cutover, CutoverTime::new(6, 15).unwrap());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let prefs = PrefStore::open_in_memory().unwrap();
        prefs.put_int(SETTINGS_NAMESPACE, "updateHour", 31).unwrap();
        prefs.put_int(SETTINGS_NAMESPACE, "updateMinute", -4).unwrap();
        prefs.put_string(SETTINGS_NAMESPACE, "weekStart", "friday").unwrap();
        prefs.put_string(SETTINGS_NAMESPACE, "cornerRadius", "round").unwrap();

        assert_eq!(WidgetSettings::load(&prefs).unwrap(), WidgetSettings::default());
    }

    #[test]
    fn test_custom_week_table_persists() {
        let prefs = PrefStore::open_in_memory().unwrap();
        let settings = WidgetSettings {
            week_start: "sat,sun,mon,tue,wed,thu,fri".parse().unwrap(),
            ..WidgetSettings::default()
        };
        settings.save(&prefs).unwrap();

        assert_eq!(
            prefs.get_string(SETTINGS_NAMESPACE, "weekStart").unwrap().as_deref(),
            Some("sat,sun,mon,tue,wed,thu,fri")
        );
        assert_eq!(WidgetSettings::load(&prefs).unwrap(), settings);
    }

    #[test]
    fn test_duplicate_week_table_falls_back() {
        let prefs = PrefStore::open_in_memory().unwrap();
        prefs.put_string(SETTINGS_NAMESPACE, "weekStart", "mon,mon,tue,wed,thu,fri,sat").unwrap();

        assert_eq!(WidgetSettings::load(&prefs).unwrap().week_start, WeekOrdering::MONDAY_FIRST);
    }
}
