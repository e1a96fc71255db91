/// Photo handling module
///
/// This module handles:
/// - Opening and decoding user-picked locators (source.rs)
/// - Per-day locator persistence and the PNG cache (store.rs)
/// - Rounded-corner post-processing for the widget (rounded.rs)

pub mod rounded;
pub mod source;
pub mod store;
