//! Story point, post point and hour tallies for kanban boards.
//!
//! Card titles carry their metrics inline: `(5)` story points, `[3]` post
//! points, `$2.5$` hours. The engine strips these patterns from the displayed
//! titles, draws them as badges, and keeps list and board totals current as
//! the board is edited.

pub mod api;
pub mod config;
pub mod dom;
pub mod models;
pub mod observer;
pub mod points;
pub mod render;
pub mod service;
