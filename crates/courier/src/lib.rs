//! FoodExpress Courier - the delivery agent's fulfillment dashboard.
//!
//! Assignment is driven externally by the admin order board; the agent's
//! `current_order_id` pointer is the only signal that new work exists. The
//! dashboard therefore re-fetches the agent after every delivery
//! confirmation and, if the pointer is set, re-fetches that order - the
//! two-step dance this module exists to get right.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dashboard;

pub use dashboard::{CourierDashboard, CourierError, CourierView};
