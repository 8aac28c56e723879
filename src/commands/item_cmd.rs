//! Commands for Item CRUD + pool search

use crate::domain::{DomainError, Item, ItemDraft, ItemId};
use crate::state::AppState;

/// Create a new item at the end of the pool
pub fn create_item(state: &AppState, draft: ItemDraft) -> Result<Item, String> {
    if draft.name.trim().is_empty() {
        return Err(DomainError::InvalidInput("item name is empty".to_string()).to_string());
    }
    state
        .edit(|s| Ok(s.tierlist.add_item(draft, state.ids())))
        .map_err(|e| e.to_string())
}

/// Get item by ID
pub fn get_item(state: &AppState, id: ItemId) -> Result<Option<Item>, String> {
    state
        .read(|s| s.tierlist.item(id).cloned())
        .map_err(|e| e.to_string())
}

/// Replace an item's fields; it stays where it is
pub fn update_item(state: &AppState, item: Item) -> Result<Item, String> {
    state
        .edit(|s| {
            s.tierlist.edit_item(item.clone())?;
            Ok(item)
        })
        .map_err(|e| e.to_string())
}

/// Delete item, returning what was removed
pub fn delete_item(state: &AppState, id: ItemId) -> Result<Item, String> {
    state
        .edit(|s| {
            if s.drag.active_id() == Some(id) {
                return Err(DomainError::Conflict(format!("item {} is being dragged", id)));
            }
            s.tierlist.delete_item(id)
        })
        .map_err(|e| e.to_string())
}

/// Pool items whose name contains `keyword`
pub fn filter_pool(state: &AppState, keyword: &str) -> Result<Vec<Item>, String> {
    state
        .read(|s| s.tierlist.filter_pool(keyword).into_iter().cloned().collect())
        .map_err(|e| e.to_string())
}
