//! Extraction and aggregation engine.
//!
//! A recomputation pass walks the board top-down ([`Engine::recompute`] →
//! [`Engine::aggregate_list`] → [`Engine::synchronize_card`]) and folds metric
//! vectors bottom-up. Cards whose annotations are current are left untouched,
//! so a pass over a settled board performs no writes at all.

mod aggregate;
mod card;
pub mod extract;
pub mod picker;
pub mod registry;

pub use extract::{extract, strip};
pub use registry::{MetricKind, Registry};

use crate::config::Settings;

/// The synchronization engine for one board.
#[derive(Debug, Clone)]
pub struct Engine {
    settings: Settings,
    registry: Registry,
    passes: u64,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        let registry = Registry::from_settings(&settings);
        Self {
            settings,
            registry,
            passes: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Number of passes run so far. Also the provenance tag of the last pass.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}
