//! Commands for pointer/keyboard drag events
//!
//! Over-target ids arrive as strings: `"pool"`, `"t<N>"` for a list, or a
//! bare item id. Anything else is treated as hovering over nothing.

use tracing::debug;

use crate::domain::ItemId;
use crate::drag::{DragOutcome, DropTarget, PointerDelta};
use crate::state::AppState;

fn parse_target(over_id: Option<&str>) -> Option<DropTarget> {
    let raw = over_id?;
    match raw.parse::<DropTarget>() {
        Ok(target) => Some(target),
        Err(e) => {
            debug!(over = raw, error = %e, "unrecognised drop target");
            None
        }
    }
}

pub fn drag_start(state: &AppState, active_id: ItemId) -> Result<(), String> {
    state
        .edit(|s| {
            s.drag.drag_start(active_id);
            Ok(())
        })
        .map_err(|e| e.to_string())
}

pub fn drag_over(
    state: &AppState,
    active_id: ItemId,
    over_id: Option<&str>,
    delta: PointerDelta,
) -> Result<DragOutcome, String> {
    let over = parse_target(over_id);
    state
        .edit(|s| s.drag.drag_over(&mut s.tierlist, active_id, over, delta))
        .inspect(|outcome| debug!(active = active_id, ?outcome, "drag over"))
        .map_err(|e| e.to_string())
}

pub fn drag_end(
    state: &AppState,
    active_id: ItemId,
    over_id: Option<&str>,
) -> Result<DragOutcome, String> {
    let over = parse_target(over_id);
    state
        .edit(|s| s.drag.drag_end(&mut s.tierlist, active_id, over))
        .inspect(|outcome| debug!(active = active_id, ?outcome, "drag end"))
        .map_err(|e| e.to_string())
}
