//! Title rewrite behind the point picker.
//!
//! The picker offers a fixed scale of values; accepting one puts the value in
//! front of the title and drops whatever value of that kind was there before.

use super::registry::{POST_POINTS_PATTERN, STORY_POINTS_PATTERN};
use super::strip;
use crate::models::{MetricKey, MetricValue};

/// Values offered by the picker.
pub const POINTS_SCALE: [f64; 11] = [0.0, 0.5, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 20.0, 40.0, 100.0];

pub fn is_on_scale(value: f64) -> bool {
    POINTS_SCALE.contains(&value)
}

/// Rewrite `title` so it encodes `value` for `key`. Hours have no picker, so
/// `None` is returned for them.
pub fn insert_points(title: &str, key: MetricKey, value: f64) -> Option<String> {
    let (pattern, open, close) = match key {
        MetricKey::Story => (&*STORY_POINTS_PATTERN, '(', ')'),
        MetricKey::Post => (&*POST_POINTS_PATTERN, '[', ']'),
        MetricKey::Hours => return None,
    };
    let cleaned = strip(title, pattern);
    let rewritten = format!(
        "{}{}{} {}",
        open,
        MetricValue::Points(value),
        close,
        cleaned.trim()
    );
    Some(rewritten.trim_end().to_string())
}
