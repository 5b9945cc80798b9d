//! Change notification handling: filter out the engine's own writes and
//! coalesce the rest into a single debounced recomputation.

mod debounce;
mod filter;

pub use debounce::{Debouncer, QUIESCENCE_WINDOW};
pub use filter::ChangeFilter;

use crate::dom::{Document, MutationRecord};

/// Routes mutation records to the debouncer.
#[derive(Debug, Clone)]
pub struct Scheduler {
    filter: ChangeFilter,
    debouncer: Debouncer,
}

impl Scheduler {
    pub fn new(filter: ChangeFilter, debouncer: Debouncer) -> Self {
        Self { filter, debouncer }
    }

    /// Handle one batch of notifications. Returns whether a recomputation was
    /// (re)scheduled.
    pub fn notify(&self, doc: &mut Document, records: &[MutationRecord]) -> bool {
        if records.is_empty() || !self.filter.any_qualifies(doc, records) {
            return false;
        }
        self.debouncer.trigger();
        true
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
