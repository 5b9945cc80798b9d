use std::sync::LazyLock;

use regex::Regex;

use crate::models::MetricValue;

/// The longest leading run that reads as a decimal number.
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]*)?").expect("leading number pattern"));

/// Read the value a title encodes for `pattern`.
///
/// Returns `None` when the pattern doesn't occur, [`MetricValue::Unknown`] for
/// the `?` marker, and the parsed number otherwise. A comma is accepted as the
/// decimal separator. Only the leading numeric part of the captured numeral is
/// read, so `(1.,5)` counts as 1.
pub fn extract(title: &str, pattern: &Regex) -> Option<MetricValue> {
    let captured = pattern.captures(title)?.get(1)?.as_str();
    if captured == "?" {
        return Some(MetricValue::Unknown);
    }
    let numeral = captured.replacen(',', ".", 1);
    LEADING_NUMBER
        .find(&numeral)?
        .as_str()
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .map(MetricValue::Points)
}

/// Remove the first occurrence of `pattern` from a title.
pub fn strip(title: &str, pattern: &Regex) -> String {
    pattern.replace(title, "").into_owned()
}
