use tracing::debug;

use super::Engine;
use crate::dom::layout::{
    self, BOARD_HEADER, BOARD_NAME, LIST_CARD_COUNT, LIST_CONTAINER, LIST_HEADER, LIST_NAME,
};
use crate::dom::{find_or_insert_span, Document, NodeId, ObserveOptions, Provenance};
use crate::models::MetricVector;

impl Engine {
    /// Sum the metrics of every visible card in `list` and draw the list
    /// totals. The totals are returned even when column totals are hidden,
    /// since the board still needs them.
    pub fn aggregate_list(&self, doc: &mut Document, list: NodeId) -> MetricVector {
        doc.observe(list, ObserveOptions::child_list().with_subtree());
        // A freshly rendered card-count indicator is not observed yet.
        if let Some(count) = doc.query(list, LIST_CARD_COUNT) {
            doc.observe(count, ObserveOptions::attributes());
        }

        let mut totals = self.registry.defaults();
        for card in layout::visible_cards(doc, list) {
            let metrics = self.synchronize_card(doc, card);
            totals.accumulate(&metrics);
        }

        if self.settings.show_column_totals {
            if let Some(header) = doc.query(list, LIST_HEADER) {
                let name = doc.query(header, LIST_NAME);
                self.draw_totals(doc, header, name, &totals);
            }
        }

        totals
    }

    /// Run one full pass over the board: synchronize every card, draw list and
    /// board totals, and make sure list insertions and removals are observed.
    ///
    /// Every write made during the pass carries the pass number as its
    /// provenance.
    pub fn recompute(&mut self, doc: &mut Document) -> MetricVector {
        self.passes += 1;
        let pass = self.passes;
        let previous = doc.set_provenance(Provenance::Engine(pass));
        let totals = self.aggregate_board(doc);
        doc.set_provenance(previous);
        totals
    }

    /// Sum every list into the board totals and draw them in the board header.
    pub fn aggregate_board(&self, doc: &mut Document) -> MetricVector {
        let lists = layout::lists(doc);
        let mut totals = self.registry.defaults();
        for &list in &lists {
            let metrics = self.aggregate_list(doc, list);
            totals.accumulate(&metrics);
        }

        if self.settings.show_board_totals {
            if let Some(header) = doc.query(doc.root(), BOARD_HEADER) {
                let name = doc.query(header, BOARD_NAME);
                self.draw_totals(doc, header, name, &totals);
            }
        }

        if let Some(container) = doc.query(doc.root(), LIST_CONTAINER) {
            doc.observe(container, ObserveOptions::child_list());
        }

        debug!(lists = lists.len(), totals = ?totals, "board aggregated");
        totals
    }

    fn draw_totals(
        &self,
        doc: &mut Document,
        header: NodeId,
        before: Option<NodeId>,
        totals: &MetricVector,
    ) {
        for kind in self.registry.active() {
            let badge = find_or_insert_span(doc, header, kind.badge_class, before);
            let value = totals.get(kind.key).unwrap_or(kind.default_value());
            doc.set_text_content(badge, &value.to_string());
        }
    }
}
