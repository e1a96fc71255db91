/// Widget render planning
///
/// Turns a host trigger into what the widget should show. Everything
/// here is a pure function of the trigger, the moment, the settings and
/// the cached bitmap; registering with the host is left to the caller.

use chrono::NaiveDateTime;
use clap::ValueEnum;
use image::RgbaImage;
use serde::Serialize;
use tracing::debug;

use crate::day::cutover::has_cutover_reached_at;
use crate::photo::rounded::round_corners;
use crate::photo::store::ImageStore;
use crate::state::data::Slot;
use crate::state::settings::WidgetSettings;

/// Host action that asks for a periodic or manual widget refresh
pub const ACTION_WIDGET_UPDATE: &str = "android.appwidget.action.APPWIDGET_UPDATE";
pub const ACTION_DATE_CHANGED: &str = "android.intent.action.DATE_CHANGED";
pub const ACTION_TIME_CHANGED: &str = "android.intent.action.TIME_SET";
pub const ACTION_TIMEZONE_CHANGED: &str = "android.intent.action.TIMEZONE_CHANGED";
/// Our own daily alarm, fired at the cutover time
pub const ACTION_DAILY_ALARM: &str = "week_widget.action.UPDATE_WIDGET";

/// Why the widget is being redrawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    /// Host update (widget added, periodic refresh, photo changed)
    WidgetUpdate,
    DateChanged,
    TimeChanged,
    TimezoneChanged,
    /// The daily cutover alarm
    DailyAlarm,
}

impl Trigger {
    /// Map a host action string to a trigger, `None` for actions we ignore
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            ACTION_WIDGET_UPDATE => Some(Trigger::WidgetUpdate),
            ACTION_DATE_CHANGED => Some(Trigger::DateChanged),
            ACTION_TIME_CHANGED => Some(Trigger::TimeChanged),
            ACTION_TIMEZONE_CHANGED => Some(Trigger::TimezoneChanged),
            ACTION_DAILY_ALARM => Some(Trigger::DailyAlarm),
            _ => None,
        }
    }
}

/// Which slot to show, and how far from the calendar date it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayResolution {
    pub slot: Slot,
    pub offset_days: i64,
}

/// Decide which day the widget shows for a trigger
///
/// System clock changes and host updates show today. The daily alarm
/// shows tomorrow once the cutover is reached, except for a midnight
/// cutover where the calendar has already rolled over.
pub fn resolve_day(trigger: Trigger, now: NaiveDateTime, settings: &WidgetSettings) -> DayResolution {
    let offset_days = match trigger {
        Trigger::DailyAlarm
            if !settings.cutover.is_midnight()
                && has_cutover_reached_at(now.time(), settings.cutover) =>
        {
            1
        }
        _ => 0,
    };

    let slot = settings.resolver().resolve_index_on(now.date(), offset_days);
    debug!("{:?} at {} resolves to day {} ({:+})", trigger, now, slot, offset_days);
    DayResolution { slot, offset_days }
}

/// What the widget shows: a bitmap or a label, never both
#[derive(Debug, Clone, PartialEq)]
pub enum RenderInstruction {
    Image { slot: Slot, bitmap: RgbaImage },
    Label { slot: Slot, text: String },
}

impl RenderInstruction {
    /// Build the instruction for a resolved day from its cached bitmap
    pub fn build(resolution: DayResolution, cached: Option<RgbaImage>, settings: &WidgetSettings) -> Self {
        let slot = resolution.slot;
        match cached {
            Some(bitmap) => RenderInstruction::Image {
                slot,
                bitmap: round_corners(&bitmap, settings.corner_radius),
            },
            None => RenderInstruction::Label {
                slot,
                text: settings.week_start.label(slot).to_string(),
            },
        }
    }

    pub fn slot(&self) -> Slot {
        match self {
            RenderInstruction::Image { slot, .. } | RenderInstruction::Label { slot, .. } => *slot,
        }
    }

    /// Serializable description (the bitmap itself is reduced to its size)
    pub fn summary(&self) -> RenderSummary {
        match self {
            RenderInstruction::Image { slot, bitmap } => RenderSummary {
                slot: *slot,
                kind: "image",
                label: None,
                size: Some(bitmap.dimensions()),
            },
            RenderInstruction::Label { slot, text } => RenderSummary {
                slot: *slot,
                kind: "label",
                label: Some(text.clone()),
                size: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSummary {
    pub slot: Slot,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<(u32, u32)>,
}

/// Resolve the day for a trigger and build its render instruction
pub fn render(
    trigger: Trigger,
    now: NaiveDateTime,
    settings: &WidgetSettings,
    store: &ImageStore,
) -> RenderInstruction {
    let resolution = resolve_day(trigger, now, settings);
    RenderInstruction::build(resolution, store.get_cached_bitmap(resolution.slot), settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::cutover::CutoverTime;
    use crate::day::ordering::WeekOrdering;
    use crate::state::prefs::PrefStore;
    use chrono::NaiveDate;
    use image::{ImageFormat, Rgba};

    // 2024-01-03 is a Wednesday (slot 2 Monday-first)
    fn wednesday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn settings_with_cutover(h: u32, m: u32) -> WidgetSettings {
        WidgetSettings {
            cutover: CutoverTime::new(h, m).unwrap(),
            ..WidgetSettings::default()
        }
    }

    #[test]
    fn test_actions_map_to_triggers() {
        assert_eq!(Trigger::from_action(ACTION_DATE_CHANGED), Some(Trigger::DateChanged));
        assert_eq!(Trigger::from_action(ACTION_TIME_CHANGED), Some(Trigger::TimeChanged));
        assert_eq!(Trigger::from_action(ACTION_TIMEZONE_CHANGED), Some(Trigger::TimezoneChanged));
        assert_eq!(Trigger::from_action(ACTION_WIDGET_UPDATE), Some(Trigger::WidgetUpdate));
        assert_eq!(Trigger::from_action(ACTION_DAILY_ALARM), Some(Trigger::DailyAlarm));
        assert_eq!(Trigger::from_action("android.intent.action.BOOT_COMPLETED"), None);
    }

    #[test]
    fn test_system_triggers_show_today() {
        let settings = settings_with_cutover(18, 0);
        for trigger in [
            Trigger::WidgetUpdate,
            Trigger::DateChanged,
            Trigger::TimeChanged,
            Trigger::TimezoneChanged,
        ] {
            let resolution = resolve_day(trigger, wednesday_at(20, 0), &settings);
            assert_eq!(resolution.offset_days, 0);
            assert_eq!(resolution.slot.index(), 2);
        }
    }

    #[test]
    fn test_alarm_shows_tomorrow_after_cutover() {
        let settings = settings_with_cutover(18, 0);

        let at_cutover = resolve_day(Trigger::DailyAlarm, wednesday_at(18, 0), &settings);
        assert_eq!((at_cutover.slot.index(), at_cutover.offset_days), (3, 1));

        let early = resolve_day(Trigger::DailyAlarm, wednesday_at(17, 59), &settings);
        assert_eq!((early.slot.index(), early.offset_days), (2, 0));
    }

    #[test]
    fn test_midnight_alarm_shows_new_day() {
        let settings = WidgetSettings::default();
        let resolution = resolve_day(Trigger::DailyAlarm, wednesday_at(0, 0), &settings);
        assert_eq!((resolution.slot.index(), resolution.offset_days), (2, 0));
    }

    #[test]
    fn test_label_when_nothing_cached() {
        let settings = WidgetSettings {
            week_start: WeekOrdering::SUNDAY_FIRST,
            ..WidgetSettings::default()
        };
        let resolution = resolve_day(Trigger::DateChanged, wednesday_at(9, 0), &settings);
        let instruction = RenderInstruction::build(resolution, None, &settings);

        assert_eq!(
            instruction,
            RenderInstruction::Label {
                slot: Slot::new(3).unwrap(),
                text: "Среда".to_string(),
            }
        );
        assert_eq!(instruction.summary().kind, "label");
    }

    #[test]
    fn test_image_is_rounded() {
        let settings = WidgetSettings::default();
        let resolution = resolve_day(Trigger::WidgetUpdate, wednesday_at(9, 0), &settings);
        let bitmap = RgbaImage::from_pixel(200, 120, Rgba([10, 20, 30, 255]));

        let instruction = RenderInstruction::build(resolution, Some(bitmap), &settings);
        match &instruction {
            RenderInstruction::Image { bitmap, .. } => {
                assert_eq!(bitmap.get_pixel(0, 0)[3], 0);
                assert_eq!(bitmap.get_pixel(100, 60)[3], 255);
            }
            other => panic!("expected an image, got {other:?}"),
        }
        assert_eq!(instruction.summary().size, Some((200, 120)));
    }

    #[test]
    fn test_render_reads_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(PrefStore::open_in_memory().unwrap(), dir.path().to_path_buf()).unwrap();
        let settings = WidgetSettings::default();

        let before = render(Trigger::WidgetUpdate, wednesday_at(12, 0), &settings, &store);
        assert!(matches!(before, RenderInstruction::Label { .. }));

        let photo = dir.path().join("wed.png");
        RgbaImage::from_pixel(64, 64, Rgba([1, 1, 1, 255]))
            .save_with_format(&photo, ImageFormat::Png)
            .unwrap();
        store.set_reference(Slot::new(2).unwrap(), photo.to_str().unwrap()).unwrap();

        let after = render(Trigger::WidgetUpdate, wednesday_at(12, 0), &settings, &store);
        assert!(matches!(after, RenderInstruction::Image { .. }));
        assert_eq!(after.slot().index(), 2);
    }
}
