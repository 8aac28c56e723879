//! Repository Layer
//!
//! Persistence backends for tierlist records.

mod traits;
mod db;
mod tierlist_repo;
mod json_store;
mod memory_store;

#[cfg(test)]
mod tests;

pub use traits::TierlistStore;
pub use db::{init_db, DbState};
pub use tierlist_repo::SqliteTierlistStore;
pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;
