//! Tierlist Maker Core
//!
//! Layered architecture:
//! - domain: items, ordered lists, the tierlist aggregate and id allocation
//! - drag: the two-phase drag reconciler
//! - codec: tierlist <-> persisted record
//! - repository: SQLite, JSON file and in-memory stores
//! - state / commands: the single mutator and its handlers

pub mod codec;
pub mod commands;
pub mod config;
pub mod domain;
pub mod drag;
pub mod repository;
pub mod state;

pub use config::{AppConfig, StoreKind};
pub use state::AppState;
