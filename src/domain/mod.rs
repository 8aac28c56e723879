//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO storage or runtime dependencies.

mod entity;
mod item;
mod item_list;
mod id_alloc;
mod tierlist;

pub use entity::{position_of, DomainError, DomainResult, Entity};
pub use item::{Item, ItemDraft, ItemId};
pub use item_list::{ItemList, ListKey, TierId};
pub use id_alloc::IdAllocator;
pub use tierlist::{Direction, Tierlist, DEFAULT_TITLE};
