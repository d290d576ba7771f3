//! FoodExpress Admin - the restaurant administrator's order board.
//!
//! The board is one of three independently-refreshing views over the same
//! backend order set; there is no push channel, so consistency comes from
//! full re-fetch. Assignments are the one write this side performs, guarded
//! by per-order in-flight flags so a double click never issues two
//! assignment requests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod board;
pub mod dashboard;

pub use board::{AssignmentBanner, BoardError, BoardView, OrderBoard};
pub use dashboard::Dashboard;
