//! Commands Layer
//!
//! Handlers that bridge callers (CLI, UI shell) to the tierlist state.
//! Errors come back as strings, ready to display.

mod view;
mod tierlist_cmd;
mod item_cmd;
mod tier_cmd;
mod drag_cmd;

pub use view::{ListView, TierlistView};
pub use tierlist_cmd::*;
pub use item_cmd::*;
pub use tier_cmd::*;
pub use drag_cmd::*;
