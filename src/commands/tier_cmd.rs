//! Commands for tier lifecycle and ordering

use crate::domain::{Direction, DomainError, ItemId, TierId};
use crate::state::AppState;

use super::view::ListView;

/// Append an empty tier
pub fn create_tier(state: &AppState, title: String) -> Result<ListView, String> {
    state
        .edit(|s| {
            let id = s.tierlist.add_tier(title, state.ids());
            s.tierlist
                .tier(id)
                .map(ListView::from)
                .ok_or_else(|| DomainError::Internal(format!("tier {} vanished", id)))
        })
        .map_err(|e| e.to_string())
}

pub fn rename_tier(state: &AppState, id: TierId, title: String) -> Result<(), String> {
    state
        .edit(|s| s.tierlist.rename_tier(id, title))
        .map_err(|e| e.to_string())
}

/// Swap a tier with its neighbour; `false` when already at that end
pub fn move_tier(state: &AppState, id: TierId, direction: Direction) -> Result<bool, String> {
    state
        .edit(|s| s.tierlist.move_tier(id, direction))
        .map_err(|e| e.to_string())
}

/// Delete a tier; its items go back to the pool. Returns the moved ids.
pub fn delete_tier(state: &AppState, id: TierId) -> Result<Vec<ItemId>, String> {
    state
        .edit(|s| {
            let dragging = s.drag.active_id();
            let holds_active = dragging
                .and_then(|active| s.tierlist.tier(id).map(|t| t.contains(active)))
                .unwrap_or(false);
            if holds_active {
                return Err(DomainError::Conflict(format!(
                    "tier {} holds the item being dragged",
                    id
                )));
            }
            s.tierlist.delete_tier(id)
        })
        .map_err(|e| e.to_string())
}
