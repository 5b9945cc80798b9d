//! The live board: document, engine and scheduler behind one lock.
//!
//! External edits are applied as the host would apply them, the resulting
//! mutation records go through the change filter, and qualifying ones arm the
//! debouncer. When the quiescence window passes, the debouncer runs a full
//! pass under the same lock; the records that pass produces are drained and
//! filtered too, and being engine-tagged they never re-arm it. Detached nodes
//! are swept once their records have been filtered.

mod error;

pub use error::ServiceError;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::dom::layout;
use crate::dom::{Document, NodeId};
use crate::models::{BoardView, MetricKey, MetricVector};
use crate::observer::{ChangeFilter, Debouncer, Scheduler, QUIESCENCE_WINDOW};
use crate::points::{picker, Engine};
use crate::render;

struct BoardState {
    doc: Document,
    engine: Engine,
    totals: MetricVector,
    last_recomputed_at: Option<DateTime<Utc>>,
}

impl BoardState {
    fn run_pass(&mut self, filter: &ChangeFilter) -> MetricVector {
        let totals = self.engine.recompute(&mut self.doc);
        self.totals = totals.clone();
        self.last_recomputed_at = Some(Utc::now());

        let records = self.doc.take_records();
        if filter.any_qualifies(&mut self.doc, &records) {
            warn!(
                pass = self.engine.passes(),
                "Recomputation produced changes that qualify for another pass"
            );
        }
        let released = self.doc.sweep();
        debug!(
            pass = self.engine.passes(),
            records = records.len(),
            released,
            nodes = self.doc.node_count(),
            "pass finished"
        );
        totals
    }
}

#[derive(Clone)]
pub struct BoardService {
    state: Arc<Mutex<BoardState>>,
    filter: ChangeFilter,
    scheduler: Scheduler,
}

impl BoardService {
    /// Take over `doc`, run the first pass right away and start listening for
    /// changes. Must be called inside a tokio runtime.
    pub fn new(doc: Document, settings: Settings) -> Self {
        Self::with_window(doc, settings, QUIESCENCE_WINDOW)
    }

    pub fn with_window(doc: Document, settings: Settings, window: Duration) -> Self {
        let engine = Engine::new(settings);
        let filter = ChangeFilter::new(engine.registry());

        let mut state = BoardState {
            doc,
            engine,
            totals: MetricVector::new(),
            last_recomputed_at: None,
        };
        state.run_pass(&filter);

        let state = Arc::new(Mutex::new(state));
        let debounced_state = state.clone();
        let debounced_filter = filter.clone();
        let debouncer = Debouncer::spawn(window, move || {
            let mut state = debounced_state.lock().expect("board lock poisoned");
            state.run_pass(&debounced_filter);
        });

        Self {
            state,
            scheduler: Scheduler::new(filter.clone(), debouncer),
            filter,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().expect("board lock poisoned")
    }

    /// Apply a host-side edit and hand its notifications to the scheduler.
    fn edit<T>(
        &self,
        apply: impl FnOnce(&mut Document) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut state = self.lock();
        let result = apply(&mut state.doc)?;
        let records = state.doc.take_records();
        if self.scheduler.notify(&mut state.doc, &records) {
            debug!(records = records.len(), "recomputation scheduled");
        }
        state.doc.sweep();
        Ok(result)
    }

    // ============================================================
    // Reads
    // ============================================================

    pub fn view(&self) -> BoardView {
        let state = self.lock();
        let mut view = render::board_view(&state.doc, state.engine.registry());
        view.passes = state.engine.passes();
        view.last_recomputed_at = state.last_recomputed_at;
        view
    }

    pub fn tree(&self) -> String {
        render::render_tree(&self.view())
    }

    /// Totals computed by the most recent pass.
    pub fn totals(&self) -> MetricVector {
        self.lock().totals.clone()
    }

    pub fn settings(&self) -> Settings {
        self.lock().engine.settings().clone()
    }

    /// Live nodes in the document.
    pub fn node_count(&self) -> usize {
        self.lock().doc.node_count()
    }

    /// Whether a recomputation is waiting for the quiescence window.
    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    // ============================================================
    // Recomputation
    // ============================================================

    /// Run a pass immediately, outside the debouncer.
    pub fn recompute_now(&self) -> MetricVector {
        self.lock().run_pass(&self.filter)
    }

    // ============================================================
    // External edits
    // ============================================================

    pub fn add_list(&self, name: &str) -> Result<NodeId, ServiceError> {
        self.edit(|doc| layout::append_list(doc, name).ok_or(ServiceError::NoListContainer))
    }

    pub fn remove_list(&self, list: NodeId) -> Result<(), ServiceError> {
        self.edit(|doc| {
            if !layout::is_list(doc, list) {
                return Err(ServiceError::ListNotFound(list));
            }
            doc.remove(list);
            Ok(())
        })
    }

    pub fn add_card(&self, list: NodeId, title: &str) -> Result<NodeId, ServiceError> {
        self.edit(|doc| {
            if !layout::is_list(doc, list) {
                return Err(ServiceError::ListNotFound(list));
            }
            layout::append_card(doc, list, title, false).ok_or(ServiceError::ListNotFound(list))
        })
    }

    pub fn set_card_title(&self, card: NodeId, title: &str) -> Result<(), ServiceError> {
        self.edit(|doc| {
            ensure_card(doc, card)?;
            layout::replace_card_title(doc, card, title);
            Ok(())
        })
    }

    pub fn set_card_hidden(&self, card: NodeId, hidden: bool) -> Result<(), ServiceError> {
        self.edit(|doc| {
            ensure_card(doc, card)?;
            layout::set_card_hidden(doc, card, hidden);
            Ok(())
        })
    }

    pub fn remove_card(&self, card: NodeId) -> Result<(), ServiceError> {
        self.edit(|doc| {
            ensure_card(doc, card)?;
            layout::remove_card(doc, card);
            Ok(())
        })
    }

    /// Accept a value from the point picker: the card's full title is
    /// rewritten with the new value in front, as if the user had typed it.
    pub fn insert_points(
        &self,
        card: NodeId,
        key: MetricKey,
        value: f64,
    ) -> Result<String, ServiceError> {
        let settings = self.settings();
        if !settings.show_picker {
            return Err(ServiceError::PickerDisabled);
        }
        let active = match key {
            MetricKey::Story => settings.show_story_points,
            MetricKey::Post => settings.show_post_points,
            MetricKey::Hours => false,
        };
        if !active {
            return Err(ServiceError::NoPicker(key.as_str()));
        }
        if !picker::is_on_scale(value) {
            return Err(ServiceError::InvalidValue(value));
        }

        self.edit(|doc| {
            ensure_card(doc, card)?;
            let title = layout::raw_title(doc, card);
            let rewritten = picker::insert_points(&title, key, value)
                .ok_or(ServiceError::NoPicker(key.as_str()))?;
            layout::replace_card_title(doc, card, &rewritten);
            Ok(rewritten)
        })
    }
}

fn ensure_card(doc: &Document, card: NodeId) -> Result<(), ServiceError> {
    if layout::is_card(doc, card) {
        Ok(())
    } else {
        Err(ServiceError::CardNotFound(card))
    }
}
