use serde::{Deserialize, Serialize};

use super::MetricKey;

/// A board as stored on disk, used to seed the live document.
///
/// ```json
/// { "name": "Sprint 12",
///   "lists": [ { "name": "Doing", "cards": [ { "title": "Fix login (3) $1,5$" } ] } ] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub name: String,
    #[serde(default)]
    pub lists: Vec<ListSnapshot>,
}

/// A column of cards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSnapshot {
    pub name: String,
    #[serde(default)]
    pub cards: Vec<CardSnapshot>,
}

/// A card with its raw title, metric patterns included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub title: String,
    /// Hidden cards are filtered out of the board view and totals.
    #[serde(default)]
    pub hidden: bool,
}

/// Input for appending a list to the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListInput {
    pub name: String,
}

/// Input for appending a card to a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCardInput {
    pub title: String,
}

/// Input for an external title edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTitleInput {
    pub title: String,
}

/// Input for hiding or revealing a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHiddenInput {
    pub hidden: bool,
}

/// Input for a value accepted from the point picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertPointsInput {
    /// `story` or `post`; hours have no picker.
    pub kind: MetricKey,
    pub value: f64,
}
