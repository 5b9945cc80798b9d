//! Domain models for board-tally.
//!
//! # Core Concepts
//!
//! - [`MetricKey`] / [`MetricValue`]: one of the three metrics encoded in card
//!   titles (story points, post points, hours) and its extracted value, which
//!   is either a number or the `?` marker for "not sized yet".
//! - [`MetricVector`]: metric values per key, produced for every card, list and
//!   the board as a whole.
//! - [`BoardSnapshot`]: serializable description of a board used to seed the
//!   live document.
//! - [`BoardView`]: read model of the live document, as served over HTTP.

mod board;
mod metric;
mod view;

pub use board::*;
pub use metric::*;
pub use view::*;
