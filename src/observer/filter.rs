use crate::dom::layout::{CARD_TITLE, LIST_CARDS, LIST_CARD_COUNT, LIST_CONTAINER, MUTATED_ATTR};
use crate::dom::{Document, MutationRecord, NodeId};
use crate::points::registry::CARD_ID_CLASS;
use crate::points::Registry;

/// Decides which mutation records warrant a recomputation.
///
/// Records produced by the engine itself never do: they are recognized by
/// their pass provenance, or, for untagged records, by the shape of a badge
/// insert or removal (exactly one node carrying a badge class).
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    badge_classes: Vec<&'static str>,
}

impl ChangeFilter {
    pub fn new(registry: &Registry) -> Self {
        Self {
            badge_classes: registry.badge_classes(),
        }
    }

    /// Whether the record is a side effect of the engine's own writes.
    pub fn is_self_inflicted(&self, doc: &Document, record: &MutationRecord) -> bool {
        if record.provenance.is_engine() {
            return true;
        }
        let added_badge = record.added.len() == 1
            && (self.is_badge(doc, record.added[0])
                || doc.has_class(record.added[0], CARD_ID_CLASS));
        let removed_badge = record.removed.len() == 1 && self.is_badge(doc, record.removed[0]);
        added_badge || removed_badge
    }

    /// Whether the record should schedule a recomputation. A change inside a
    /// card title also flags the title as externally mutated, so the next pass
    /// recaptures it.
    pub fn qualifies(&self, doc: &mut Document, record: &MutationRecord) -> bool {
        if self.is_self_inflicted(doc, record) {
            return false;
        }

        let target = record.target;
        if doc.has_class(target, LIST_CARDS)
            || doc.has_class(target, LIST_CARD_COUNT)
            || doc.has_class(target, LIST_CONTAINER)
        {
            return true;
        }

        if doc.has_class(target, CARD_TITLE) {
            doc.set_attribute(target, MUTATED_ATTR, "1");
            return true;
        }

        false
    }

    /// Run every record through [`ChangeFilter::qualifies`]; true if any did.
    pub fn any_qualifies(&self, doc: &mut Document, records: &[MutationRecord]) -> bool {
        let mut qualified = false;
        for record in records {
            qualified |= self.qualifies(doc, record);
        }
        qualified
    }

    fn is_badge(&self, doc: &Document, node: NodeId) -> bool {
        self.badge_classes
            .iter()
            .any(|class| doc.has_class(node, class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::dom::layout::{self, CARD};
    use crate::dom::{MutationKind, Provenance};
    use crate::models::{BoardSnapshot, CardSnapshot, ListSnapshot};

    fn setup() -> (ChangeFilter, Document) {
        let filter = ChangeFilter::new(&Registry::from_settings(&Settings::default()));
        let doc = layout::build_board(&BoardSnapshot {
            name: "Board".to_string(),
            lists: vec![ListSnapshot {
                name: "List".to_string(),
                cards: vec![CardSnapshot {
                    title: "Task (1)".to_string(),
                    hidden: false,
                }],
            }],
        });
        (filter, doc)
    }

    fn cards_container(doc: &Document) -> NodeId {
        doc.query(doc.root(), LIST_CARDS).unwrap()
    }

    #[test]
    fn test_single_badge_insert_is_ignored() {
        let (filter, mut doc) = setup();
        let target = cards_container(&doc);
        let badge = doc.create_element(&["tally-points"]);
        let record = MutationRecord::child_list(target, vec![badge], vec![], Provenance::Host);

        assert!(!filter.qualifies(&mut doc, &record));
    }

    #[test]
    fn test_single_badge_removal_is_ignored() {
        let (filter, mut doc) = setup();
        let target = cards_container(&doc);
        let badge = doc.create_element(&["tally-hours"]);
        let record = MutationRecord::child_list(target, vec![], vec![badge], Provenance::Host);

        assert!(!filter.qualifies(&mut doc, &record));
    }

    #[test]
    fn test_badge_alongside_other_nodes_qualifies() {
        let (filter, mut doc) = setup();
        let target = cards_container(&doc);
        let badge = doc.create_element(&["tally-points"]);
        let card = doc.create_element(&[CARD]);
        let record =
            MutationRecord::child_list(target, vec![badge, card], vec![], Provenance::Host);

        assert!(filter.qualifies(&mut doc, &record));
    }

    #[test]
    fn test_other_single_node_qualifies() {
        let (filter, mut doc) = setup();
        let target = cards_container(&doc);
        let card = doc.create_element(&[CARD]);
        let record = MutationRecord::child_list(target, vec![card], vec![], Provenance::Host);

        assert!(filter.qualifies(&mut doc, &record));
    }

    #[test]
    fn test_engine_records_are_ignored() {
        let (filter, mut doc) = setup();
        let target = cards_container(&doc);
        let card = doc.create_element(&[CARD]);
        let record = MutationRecord::child_list(target, vec![card], vec![], Provenance::Engine(3));

        assert!(!filter.qualifies(&mut doc, &record));
    }

    #[test]
    fn test_title_change_marks_card_mutated() {
        let (filter, mut doc) = setup();
        let title = doc.query(doc.root(), CARD_TITLE).unwrap();
        let text = doc.create_text("Task (2)");
        let record = MutationRecord::child_list(title, vec![text], vec![], Provenance::Host);

        assert!(filter.qualifies(&mut doc, &record));
        assert_eq!(doc.attribute(title, MUTATED_ATTR), Some("1"));
    }

    #[test]
    fn test_unrelated_targets_do_not_qualify() {
        let (filter, mut doc) = setup();
        let card = doc.query(doc.root(), CARD).unwrap();
        let record = MutationRecord::attribute(card, "class", Provenance::Host);

        assert_eq!(record.kind, MutationKind::Attributes);
        assert!(!filter.qualifies(&mut doc, &record));
    }

    #[test]
    fn test_card_count_attribute_change_qualifies() {
        let (filter, mut doc) = setup();
        let count = doc.query(doc.root(), LIST_CARD_COUNT).unwrap();
        let record = MutationRecord::attribute(count, "data-count", Provenance::Host);

        assert!(filter.qualifies(&mut doc, &record));
    }
}
