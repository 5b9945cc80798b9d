use tracing::debug;

use super::registry::{MetricKind, CARD_ID_CLASS};
use super::{extract, strip, Engine};
use crate::dom::layout::{CARD_SHORT_ID, CARD_TITLE, MUTATED_ATTR, ORIGINAL_TITLE_ATTR};
use crate::dom::{find_or_insert_span, remove_if_exists, Document, NodeId};
use crate::models::{MetricValue, MetricVector};

impl Engine {
    /// Bring one card's badges and visible title in line with its title text
    /// and return the card's metrics.
    ///
    /// The original title is captured once and reused until the host replaces
    /// the title text. Badges are only redrawn when a value changed, a badge
    /// went missing, or the title was freshly captured; otherwise the card is
    /// not written to at all.
    pub fn synchronize_card(&self, doc: &mut Document, card: NodeId) -> MetricVector {
        let Some(title_element) = doc.query(card, CARD_TITLE) else {
            return self.registry.defaults();
        };

        if self.settings.show_card_numbers {
            if let Some(short_id) = doc.query(title_element, CARD_SHORT_ID) {
                doc.add_class(short_id, CARD_ID_CLASS);
            }
        }

        let (original, captured) = self.original_title(doc, card, title_element);
        if original.is_empty() {
            return self.registry.defaults();
        }

        let mut metrics = MetricVector::new();
        let mut extracted: Vec<(&MetricKind, Option<MetricValue>)> = Vec::new();
        let mut stale = captured;
        for kind in self.registry.kinds() {
            let value = if kind.active {
                extract(&original, kind.pattern)
            } else {
                None
            };

            let cached = doc.attribute(card, kind.attribute);
            // The host sometimes re-renders a card without our badge.
            let badge_dropped = cached.is_some() && doc.query(card, kind.badge_class).is_none();
            let changed = cached != value.map(|v| v.encode()).as_deref();
            stale |= badge_dropped || changed;

            metrics.insert(kind.key, value.unwrap_or(kind.default_value()));
            extracted.push((kind, value));
        }

        if !stale {
            return metrics;
        }

        debug!(card = %card, title = %original, "redrawing card badges");
        let text = doc.last_child(title_element);
        let mut cleaned = original.clone();
        for (kind, value) in extracted {
            match value {
                Some(value) => {
                    let badge = find_or_insert_span(doc, title_element, kind.badge_class, text);
                    doc.set_text_content(badge, &value.to_string());
                    doc.set_attribute(card, kind.attribute, &value.encode());
                }
                None => {
                    remove_if_exists(doc, title_element, kind.badge_class);
                    doc.remove_attribute(card, kind.attribute);
                }
            }
            if kind.active {
                cleaned = strip(&cleaned, kind.pattern);
            }
        }
        if let Some(text) = text {
            doc.set_text(text, cleaned.trim());
        }

        metrics
    }

    /// The cached original title, or the displayed text when there is no cache
    /// or the host replaced the title since. The flag tells whether the title
    /// was captured just now.
    fn original_title(
        &self,
        doc: &mut Document,
        card: NodeId,
        title_element: NodeId,
    ) -> (String, bool) {
        let mutated = doc.attribute(title_element, MUTATED_ATTR) == Some("1");
        if let Some(cached) = doc.attribute(card, ORIGINAL_TITLE_ATTR) {
            if !cached.is_empty() && !mutated {
                return (cached.to_string(), false);
            }
        }

        let visible = doc
            .last_child(title_element)
            .map(|text| doc.text_content(text))
            .unwrap_or_default();
        doc.set_attribute(title_element, MUTATED_ATTR, "0");
        doc.set_attribute(card, ORIGINAL_TITLE_ATTR, &visible);
        (visible, true)
    }
}
