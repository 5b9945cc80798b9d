//! Read model and ASCII rendering of the live board.

use std::collections::BTreeMap;

use crate::dom::layout::{self, BOARD_HEADER, CARD, CARD_SHORT_ID, HIDDEN, LIST_HEADER};
use crate::dom::{Document, NodeId};
use crate::models::{BoardView, CardView, ListView, MetricKey};
use crate::points::Registry;

const VISIBLE: char = '●';
const HIDDEN_CARD: char = '○';

/// Snapshot the board as it currently renders. `passes` and
/// `last_recomputed_at` are left for the caller to fill in.
pub fn board_view(doc: &Document, registry: &Registry) -> BoardView {
    let totals = doc
        .query(doc.root(), BOARD_HEADER)
        .map(|header| badge_texts(doc, registry, header))
        .unwrap_or_default();

    let lists = layout::lists(doc)
        .into_iter()
        .map(|list| ListView {
            id: list,
            name: layout::list_name(doc, list),
            totals: doc
                .query(list, LIST_HEADER)
                .map(|header| badge_texts(doc, registry, header))
                .unwrap_or_default(),
            cards: doc
                .query_all(list, CARD)
                .into_iter()
                .map(|card| card_view(doc, registry, card))
                .collect(),
        })
        .collect();

    BoardView {
        name: layout::board_name(doc),
        totals,
        lists,
        passes: 0,
        last_recomputed_at: None,
    }
}

fn card_view(doc: &Document, registry: &Registry, card: NodeId) -> CardView {
    CardView {
        id: card,
        short_id: doc
            .query(card, CARD_SHORT_ID)
            .map(|short_id| doc.text_content(short_id)),
        title: layout::visible_title(doc, card),
        badges: badge_texts(doc, registry, card),
        hidden: doc.has_class(card, HIDDEN),
    }
}

fn badge_texts(doc: &Document, registry: &Registry, scope: NodeId) -> BTreeMap<MetricKey, String> {
    registry
        .kinds()
        .iter()
        .filter_map(|kind| {
            doc.query(scope, kind.badge_class)
                .map(|badge| (kind.key, doc.text_content(badge)))
        })
        .collect()
}

/// Badges written back in title notation: `(8) [2] $3.5$`.
fn badge_suffix(badges: &BTreeMap<MetricKey, String>) -> String {
    let parts: Vec<String> = badges
        .iter()
        .map(|(key, text)| match key {
            MetricKey::Story => format!("({})", text),
            MetricKey::Post => format!("[{}]", text),
            MetricKey::Hours => format!("${}$", text),
        })
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("  {}", parts.join(" "))
    }
}

/// Render the board as an ASCII tree with badges.
///
/// Example output:
/// ```text
/// Sprint 12  (10) [1] $1$
/// ├── To do  (8) [0] $1$
/// │   ├── ● #1 Fix login  (3)
/// │   └── ● #2 Write docs  (5) $1$
/// └── Done  (2) [1] $0$
///     ├── ● #3 Review  (2) [1]
///     └── ○ #4 Old spike (40)
/// ```
pub fn render_tree(view: &BoardView) -> String {
    let mut output = String::new();
    output.push_str(&view.name);
    output.push_str(&badge_suffix(&view.totals));
    output.push('\n');

    for (i, list) in view.lists.iter().enumerate() {
        let is_last = i == view.lists.len() - 1;
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(branch);
        output.push_str(&list.name);
        output.push_str(&badge_suffix(&list.totals));
        output.push('\n');

        let prefix = if is_last { "    " } else { "│   " };
        for (j, card) in list.cards.iter().enumerate() {
            let card_branch = if j == list.cards.len() - 1 {
                "└── "
            } else {
                "├── "
            };
            output.push_str(prefix);
            output.push_str(card_branch);
            output.push(if card.hidden { HIDDEN_CARD } else { VISIBLE });
            output.push(' ');
            if let Some(short_id) = &card.short_id {
                output.push_str(short_id);
                output.push(' ');
            }
            output.push_str(&card.title);
            output.push_str(&badge_suffix(&card.badges));
            output.push('\n');
        }
    }
    output
}
