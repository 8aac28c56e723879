//! Commands for the tierlist as a whole: title, snapshot, save and load

use tracing::info;

use crate::codec::{self, TierlistRecord};
use crate::state::AppState;

use super::view::TierlistView;

/// Current tierlist, pool first then tiers
pub fn get_tierlist(state: &AppState) -> Result<TierlistView, String> {
    state
        .read(|s| TierlistView::from(&s.tierlist))
        .map_err(|e| e.to_string())
}

/// Current tierlist in its persisted form
pub fn get_record(state: &AppState) -> Result<TierlistRecord, String> {
    state
        .read(|s| codec::serialize(&s.tierlist))
        .map_err(|e| e.to_string())
}

pub fn set_title(state: &AppState, title: String) -> Result<(), String> {
    state
        .edit(|s| {
            s.tierlist.set_title(title);
            Ok(())
        })
        .map_err(|e| e.to_string())
}

/// Discard the current tierlist and start an empty one
pub fn new_tierlist(state: &AppState, title: Option<String>) -> Result<TierlistView, String> {
    state.reset(title).map_err(|e| e.to_string())?;
    info!("new tierlist started");
    get_tierlist(state)
}

pub async fn save_tierlist(state: &AppState) -> Result<(), String> {
    state.save().await.map(|_| ()).map_err(|e| e.to_string())
}

/// Replace the current tierlist with the stored one
pub async fn load_tierlist(state: &AppState) -> Result<TierlistView, String> {
    state.load().await.map_err(|e| e.to_string())?;
    get_tierlist(state)
}
