//! Verdant library crate
//!
//! Exposes the session state machines and API client so integration
//! tests and external tooling can exercise them without going through
//! terminal startup.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod notify;
pub mod progress;
pub mod search;
pub mod selection;
pub mod session;
pub mod ui;
pub mod util;
