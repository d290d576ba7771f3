//! FoodExpress Core - Shared types library.
//!
//! This crate provides common types used across all FoodExpress client
//! components:
//! - `gateway` - REST client for the order backend
//! - `storefront` - Customer-facing cart and checkout logic
//! - `admin` - Restaurant administrator order board
//! - `courier` - Delivery agent fulfillment flow
//! - `cli` - Command-line driver for all of the above
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The backend
//! is the source of truth for everything these types describe; clients hold
//! read-only mirrors and route every mutation through the gateway.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, statuses, and the cart/order/agent shapes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
