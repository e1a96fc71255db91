/// State management module
/// 
/// This module handles all persisted state, including:
/// - The namespaced key-value preference store (prefs.rs)
/// - Shared data structures (data.rs)
/// - Widget settings loaded once at startup (settings.rs)

pub mod prefs;
pub mod data;
pub mod settings;
