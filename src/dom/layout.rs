//! Structure of the board inside the host document.
//!
//! ```text
//! .board
//! ├── .js-board-header
//! │   └── .board-header-btn-name          "Sprint 12"
//! └── .js-list-sortable
//!     └── .list
//!         ├── .js-list-header
//!         │   ├── .js-list-name-input     "Doing"
//!         │   └── .list-header-num-cards  "2 cards"
//!         └── .list-cards
//!             └── .list-card[.hide]
//!                 └── .js-card-name
//!                     ├── .card-short-id  "#1"
//!                     └── "Fix login (3)"
//! ```
//!
//! The builders here act as the host application: they are how other users'
//! edits reach the document, and they write with whatever provenance the
//! document currently carries.

use super::{Document, NodeId, NodeKind};
use crate::models::BoardSnapshot;

pub const BOARD_HEADER: &str = "js-board-header";
pub const BOARD_NAME: &str = "board-header-btn-name";
pub const LIST_CONTAINER: &str = "js-list-sortable";
pub const LIST: &str = "list";
pub const LIST_HEADER: &str = "js-list-header";
pub const LIST_NAME: &str = "js-list-name-input";
pub const LIST_CARD_COUNT: &str = "list-header-num-cards";
pub const LIST_CARDS: &str = "list-cards";
pub const CARD: &str = "list-card";
pub const CARD_TITLE: &str = "js-card-name";
pub const CARD_SHORT_ID: &str = "card-short-id";
pub const HIDDEN: &str = "hide";

/// Unmodified title captured by the engine, stored on the card.
pub const ORIGINAL_TITLE_ATTR: &str = "data-original-title";
/// Set to `1` on a card title element when its text was replaced externally.
pub const MUTATED_ATTR: &str = "data-mutated";

const CARD_COUNT_ATTR: &str = "data-count";
const NEXT_SHORT_ID_ATTR: &str = "data-next-short-id";

/// Build a document laid out like the host board.
pub fn build_board(snapshot: &BoardSnapshot) -> Document {
    let mut doc = Document::new();
    let root = doc.root();

    let header = doc.create_element(&["board-header", BOARD_HEADER]);
    let name = element_with_text(&mut doc, &[BOARD_NAME], &snapshot.name);
    doc.append_child(header, name);
    doc.append_child(root, header);

    let container = doc.create_element(&[LIST_CONTAINER]);
    doc.append_child(root, container);

    for list in &snapshot.lists {
        if let Some(list_id) = append_list(&mut doc, &list.name) {
            for card in &list.cards {
                append_card(&mut doc, list_id, &card.title, card.hidden);
            }
        }
    }
    doc
}

/// Append an empty list to the board. `None` if the board has no list container.
pub fn append_list(doc: &mut Document, name: &str) -> Option<NodeId> {
    let container = doc.query(doc.root(), LIST_CONTAINER)?;

    let list = doc.create_element(&[LIST]);
    let header = doc.create_element(&["list-header", LIST_HEADER]);
    let name = element_with_text(doc, &[LIST_NAME], name);
    let count = element_with_text(doc, &[LIST_CARD_COUNT], "0 cards");
    doc.append_child(header, name);
    doc.append_child(header, count);
    doc.append_child(list, header);
    let cards = doc.create_element(&[LIST_CARDS]);
    doc.append_child(list, cards);

    doc.append_child(container, list);
    Some(list)
}

/// Append a card to `list`, numbering it after the cards created before it.
pub fn append_card(doc: &mut Document, list: NodeId, title: &str, hidden: bool) -> Option<NodeId> {
    let cards = doc.query(list, LIST_CARDS)?;

    let short_id = next_short_id(doc);
    let card = if hidden {
        doc.create_element(&[CARD, HIDDEN])
    } else {
        doc.create_element(&[CARD])
    };
    let title_element = doc.create_element(&["list-card-title", CARD_TITLE]);
    let short = element_with_text(doc, &[CARD_SHORT_ID], &format!("#{}", short_id));
    let text = doc.create_text(title);
    doc.append_child(title_element, short);
    doc.append_child(title_element, text);
    doc.append_child(card, title_element);

    doc.append_child(cards, card);
    refresh_card_count(doc, list);
    Some(card)
}

/// Re-render a card's title text the way the host does after an edit: the
/// text node is taken out, rewritten and put back, so observers see it removed
/// and added again.
pub fn replace_card_title(doc: &mut Document, card: NodeId, title: &str) -> bool {
    let Some(title_element) = doc.query(card, CARD_TITLE) else {
        return false;
    };
    let text = match doc.last_child(title_element) {
        Some(last) if doc.kind(last) == NodeKind::Text => {
            doc.remove(last);
            doc.set_text(last, title);
            last
        }
        _ => doc.create_text(title),
    };
    doc.append_child(title_element, text);
    true
}

pub fn set_card_hidden(doc: &mut Document, card: NodeId, hidden: bool) {
    if hidden {
        doc.add_class(card, HIDDEN);
    } else {
        doc.remove_class(card, HIDDEN);
    }
    if let Some(list) = doc.closest(card, LIST) {
        refresh_card_count(doc, list);
    }
}

pub fn remove_card(doc: &mut Document, card: NodeId) {
    let list = doc.closest(card, LIST);
    doc.remove(card);
    if let Some(list) = list {
        refresh_card_count(doc, list);
    }
}

/// Update the card-count indicator of a list to its number of visible cards.
pub fn refresh_card_count(doc: &mut Document, list: NodeId) {
    let Some(count) = doc.query(list, LIST_CARD_COUNT) else {
        return;
    };
    let visible = visible_cards(doc, list).len();
    doc.set_attribute(count, CARD_COUNT_ATTR, &visible.to_string());
    let label = if visible == 1 {
        "1 card".to_string()
    } else {
        format!("{} cards", visible)
    };
    doc.set_text_content(count, &label);
}

// ============================================================
// Lookups
// ============================================================

pub fn is_card(doc: &Document, id: NodeId) -> bool {
    doc.contains(id) && doc.has_class(id, CARD) && doc.is_connected(id)
}

pub fn is_list(doc: &Document, id: NodeId) -> bool {
    doc.contains(id) && doc.has_class(id, LIST) && doc.is_connected(id)
}

pub fn lists(doc: &Document) -> Vec<NodeId> {
    doc.query_all(doc.root(), LIST)
}

/// Cards of a list that are not filtered out, in document order.
pub fn visible_cards(doc: &Document, list: NodeId) -> Vec<NodeId> {
    doc.query_all(list, CARD)
        .into_iter()
        .filter(|&card| !doc.has_class(card, HIDDEN))
        .collect()
}

pub fn board_name(doc: &Document) -> String {
    doc.query(doc.root(), BOARD_NAME)
        .map(|name| doc.text_content(name))
        .unwrap_or_default()
}

pub fn list_name(doc: &Document, list: NodeId) -> String {
    doc.query(list, LIST_NAME)
        .map(|name| doc.text_content(name))
        .unwrap_or_default()
}

/// Title text as currently displayed (the title element's trailing text).
pub fn visible_title(doc: &Document, card: NodeId) -> String {
    doc.query(card, CARD_TITLE)
        .and_then(|title| doc.last_child(title))
        .map(|text| doc.text_content(text))
        .unwrap_or_default()
}

/// Full title including metric patterns: the captured original when the
/// engine has one, otherwise whatever is displayed.
pub fn raw_title(doc: &Document, card: NodeId) -> String {
    let mutated = doc
        .query(card, CARD_TITLE)
        .and_then(|title| doc.attribute(title, MUTATED_ATTR))
        == Some("1");
    match doc.attribute(card, ORIGINAL_TITLE_ATTR) {
        Some(original) if !original.is_empty() && !mutated => original.to_string(),
        _ => visible_title(doc, card),
    }
}

fn element_with_text(doc: &mut Document, classes: &[&str], text: &str) -> NodeId {
    let element = doc.create_element(classes);
    let text = doc.create_text(text);
    doc.append_child(element, text);
    element
}

fn next_short_id(doc: &mut Document) -> u64 {
    let root = doc.root();
    let next = doc
        .attribute(root, NEXT_SHORT_ID_ATTR)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(1);
    doc.set_attribute(root, NEXT_SHORT_ID_ATTR, &(next + 1).to_string());
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ObserveOptions;
    use crate::models::{CardSnapshot, ListSnapshot};

    fn snapshot() -> BoardSnapshot {
        BoardSnapshot {
            name: "Sprint".to_string(),
            lists: vec![ListSnapshot {
                name: "Doing".to_string(),
                cards: vec![
                    CardSnapshot {
                        title: "Fix login (3)".to_string(),
                        hidden: false,
                    },
                    CardSnapshot {
                        title: "Old".to_string(),
                        hidden: true,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_build_board_layout() {
        let doc = build_board(&snapshot());
        let lists = lists(&doc);
        assert_eq!(lists.len(), 1);
        assert_eq!(board_name(&doc), "Sprint");
        assert_eq!(list_name(&doc, lists[0]), "Doing");

        let cards = doc.query_all(lists[0], CARD);
        assert_eq!(cards.len(), 2);
        assert_eq!(visible_cards(&doc, lists[0]), vec![cards[0]]);
        assert_eq!(visible_title(&doc, cards[0]), "Fix login (3)");

        let count = doc.query(lists[0], LIST_CARD_COUNT).unwrap();
        assert_eq!(doc.text_content(count), "1 card");
    }

    #[test]
    fn test_short_ids_are_sequential() {
        let doc = build_board(&snapshot());
        let ids: Vec<String> = doc
            .query_all(doc.root(), CARD_SHORT_ID)
            .into_iter()
            .map(|id| doc.text_content(id))
            .collect();
        assert_eq!(ids, vec!["#1", "#2"]);
    }

    #[test]
    fn test_replace_card_title_rerenders_text_node() {
        let mut doc = build_board(&snapshot());
        let card = doc.query(doc.root(), CARD).unwrap();
        let title = doc.query(card, CARD_TITLE).unwrap();
        let text = doc.last_child(title).unwrap();
        doc.observe(title, ObserveOptions::child_list());
        let nodes = doc.node_count();

        assert!(replace_card_title(&mut doc, card, "Fix login (5)"));

        let records = doc.take_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].removed, vec![text]);
        assert_eq!(records[1].added, vec![text]);
        assert_eq!(doc.node_count(), nodes);
        assert_eq!(visible_title(&doc, card), "Fix login (5)");
        assert_eq!(raw_title(&doc, card), "Fix login (5)");
    }

    #[test]
    fn test_removed_list_is_reclaimed_on_sweep() {
        let mut doc = build_board(&snapshot());
        let list = lists(&doc)[0];
        let card = doc.query(list, CARD).unwrap();
        doc.observe(list, ObserveOptions::child_list().with_subtree());
        let before = doc.node_count();

        doc.remove(list);
        assert!(doc.contains(card));
        let released = doc.sweep();

        assert_eq!(doc.node_count(), before - released);
        assert!(!doc.contains(list));
        assert!(!doc.contains(card));
        assert!(!doc.is_observed(list));

        let list = append_list(&mut doc, "Again").unwrap();
        assert!(is_list(&doc, list));
        assert!(doc.node_count() < before);
    }

    #[test]
    fn test_remove_card_updates_count() {
        let mut doc = build_board(&snapshot());
        let list = lists(&doc)[0];
        let card = doc.query(list, CARD).unwrap();

        remove_card(&mut doc, card);

        assert!(!is_card(&doc, card));
        let count = doc.query(list, LIST_CARD_COUNT).unwrap();
        assert_eq!(doc.text_content(count), "0 cards");
    }
}
