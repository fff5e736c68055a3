//! Saarthi: a civic issue report console for municipal crews.
//!
//! The library holds the report store, the projection and grouping views,
//! the demo credential gate, and the SOS alert feed; the `saarthi` binary
//! wires them into an interactive console.

pub mod commands;
pub mod config;
pub mod console;
pub mod feed;
pub mod models;
pub mod session;
pub mod stats;
pub mod store;
pub mod view;
