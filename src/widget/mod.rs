/// Widget host boundary
///
/// This module handles:
/// - Mapping host triggers to the day to show and its render instruction (render.rs)
/// - Computing when the daily refresh alarm fires next (schedule.rs)

pub mod render;
pub mod schedule;
