use std::sync::LazyLock;

use regex::Regex;

use crate::config::Settings;
use crate::models::{MetricKey, MetricValue, MetricVector};

/// Story points: `(5)`, `(0,5)`, `(?)`.
pub static STORY_POINTS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\?|[0-9]+\.?,?[0-9]*)\)").expect("story points pattern"));

/// Post points: `[3]`, `[1.5]`, `[?]`.
pub static POST_POINTS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\?|[0-9]+\.?,?[0-9]*)\]").expect("post points pattern"));

/// Hours: `$2$`, `$2,5$`, `$?$`.
pub static HOURS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\?|[0-9]+\.?,?[0-9]*)\$").expect("hours pattern"));

/// Badge class drawn next to a card number when card numbers are shown.
pub const CARD_ID_CLASS: &str = "tally-card-id";

/// Description of one metric: where its value comes from and where it goes.
#[derive(Debug, Clone)]
pub struct MetricKind {
    pub key: MetricKey,
    /// Class of the badge drawn for this metric on cards, lists and the board.
    pub badge_class: &'static str,
    /// Card attribute caching the last value drawn.
    pub attribute: &'static str,
    /// Inactive kinds are neither extracted nor stripped from titles.
    pub active: bool,
    pub pattern: &'static Regex,
    pub default: f64,
}

impl MetricKind {
    pub fn default_value(&self) -> MetricValue {
        MetricValue::Points(self.default)
    }
}

/// The fixed set of metric kinds, configured once from [`Settings`].
#[derive(Debug, Clone)]
pub struct Registry {
    kinds: Vec<MetricKind>,
}

impl Registry {
    pub fn from_settings(settings: &Settings) -> Self {
        let kinds = vec![
            MetricKind {
                key: MetricKey::Story,
                badge_class: "tally-points",
                attribute: "data-tally-points",
                active: settings.show_story_points,
                pattern: &*STORY_POINTS_PATTERN,
                default: 0.0,
            },
            MetricKind {
                key: MetricKey::Post,
                badge_class: "tally-post-points",
                attribute: "data-tally-post-points",
                active: settings.show_post_points,
                pattern: &*POST_POINTS_PATTERN,
                default: 0.0,
            },
            MetricKind {
                key: MetricKey::Hours,
                badge_class: "tally-hours",
                attribute: "data-tally-hours",
                active: true,
                pattern: &*HOURS_PATTERN,
                default: 0.0,
            },
        ];
        Self { kinds }
    }

    pub fn kinds(&self) -> &[MetricKind] {
        &self.kinds
    }

    pub fn active(&self) -> impl Iterator<Item = &MetricKind> {
        self.kinds.iter().filter(|kind| kind.active)
    }

    pub fn get(&self, key: MetricKey) -> Option<&MetricKind> {
        self.kinds.iter().find(|kind| kind.key == key)
    }

    /// Badge classes of every kind, active or not.
    pub fn badge_classes(&self) -> Vec<&'static str> {
        self.kinds.iter().map(|kind| kind.badge_class).collect()
    }

    /// A vector holding each kind's default value.
    pub fn defaults(&self) -> MetricVector {
        let mut vector = MetricVector::new();
        for kind in &self.kinds {
            vector.insert(kind.key, kind.default_value());
        }
        vector
    }
}
