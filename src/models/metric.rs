use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// The metrics that can be encoded in a card title.
///
/// - `Story`: story points, written `(5)`
/// - `Post`: secondary points, written `[3]`
/// - `Hours`: elapsed hours, written `$2.5$`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    Story,
    Post,
    Hours,
}

impl MetricKey {
    pub const ALL: [MetricKey; 3] = [Self::Story, Self::Post, Self::Hours];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Post => "post",
            Self::Hours => "hours",
        }
    }
}

/// A value extracted from a card title.
///
/// Absence of a value is expressed as `Option::None` by the extractor; this
/// type only covers what a title can actually say.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Points(f64),
    /// The `?` marker: acknowledged but not sized yet. Skipped by sums.
    Unknown,
}

impl MetricValue {
    pub fn points(&self) -> Option<f64> {
        match self {
            Self::Points(value) => Some(*value),
            Self::Unknown => None,
        }
    }

    /// Raw encoding stored in a card's annotation attribute.
    pub fn encode(&self) -> String {
        match self {
            Self::Points(value) => value.to_string(),
            Self::Unknown => "?".to_string(),
        }
    }
}

/// Display form used in badges: `?`, or the value rounded to two decimals
/// without trailing zeros.
impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Points(value) => write!(f, "{}", (value * 100.0).round() / 100.0),
            Self::Unknown => f.write_str("?"),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Points(value) => serializer.serialize_f64(*value),
            Self::Unknown => serializer.serialize_str("?"),
        }
    }
}

/// Metric values keyed by [`MetricKey`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricVector(BTreeMap<MetricKey, MetricValue>);

impl MetricVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: MetricKey, value: MetricValue) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: MetricKey) -> Option<MetricValue> {
        self.0.get(&key).copied()
    }

    /// Numeric value for `key`; unknown and missing values read as zero.
    pub fn points(&self, key: MetricKey) -> f64 {
        self.get(key).and_then(|v| v.points()).unwrap_or(0.0)
    }

    /// Add every numeric value of `other` into this vector. Unknown values are
    /// skipped rather than counted or propagated.
    pub fn accumulate(&mut self, other: &MetricVector) {
        for (key, value) in other.iter() {
            let Some(points) = value.points() else {
                continue;
            };
            let total = self.0.entry(key).or_insert(MetricValue::Points(0.0));
            *total = MetricValue::Points(total.points().unwrap_or(0.0) + points);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, MetricValue)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}
