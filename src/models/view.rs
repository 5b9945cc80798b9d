use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MetricKey;
use crate::dom::NodeId;

/// The live board as it currently renders: visible titles, badge texts and
/// totals exactly as they appear in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardView {
    pub name: String,
    /// Board badge texts by metric. Empty when board totals are disabled.
    pub totals: BTreeMap<MetricKey, String>,
    pub lists: Vec<ListView>,
    /// Number of recomputation passes run so far.
    pub passes: u64,
    pub last_recomputed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListView {
    pub id: NodeId,
    pub name: String,
    /// List badge texts by metric. Empty when column totals are disabled.
    pub totals: BTreeMap<MetricKey, String>,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
    pub id: NodeId,
    /// Short card number such as `#4`.
    pub short_id: Option<String>,
    /// Title text as displayed, with metric patterns stripped.
    pub title: String,
    pub badges: BTreeMap<MetricKey, String>,
    pub hidden: bool,
}
