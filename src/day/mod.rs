/// Day resolution module
///
/// This module handles:
/// - Binding slots to calendar weekdays (ordering.rs)
/// - Mapping "now" plus a day offset to a slot (resolver.rs)
/// - The daily cutover time and its comparisons (cutover.rs)

pub mod cutover;
pub mod ordering;
pub mod resolver;
