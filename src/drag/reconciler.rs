//! Drag Reconciler
//!
//! Two-phase protocol driven by drag-start / drag-over / drag-end.
//!
//! - drag-over moves the active item into another list as soon as the pointer
//!   crosses into it, so the view always shows where the item would land.
//! - hovering inside the item's own list does nothing until drag-end, which
//!   performs the single stable reorder.
//!
//! drag-end is the only transition back to `Idle`.

use serde::Serialize;
use tracing::debug;

use crate::domain::{DomainError, DomainResult, ItemId, ItemList, ListKey, Tierlist};

use super::{DropTarget, PointerDelta};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging { active: ItemId },
}

/// What a drag event did to the model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragOutcome {
    /// Stale, same-list or unresolvable hover
    Ignored,
    /// Cross-list move applied during hover
    Moved {
        item: ItemId,
        from: ListKey,
        to: ListKey,
        index: usize,
    },
    /// Same-list reorder applied on drop
    Reordered {
        item: ItemId,
        list: ListKey,
        from: usize,
        to: usize,
    },
    /// Drop with nothing left to apply
    Unchanged,
}

#[derive(Debug, Default)]
pub struct DragReconciler {
    phase: DragPhase,
}

impl DragReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn active_id(&self) -> Option<ItemId> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging { active } => Some(active),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.active_id().is_some()
    }

    pub fn drag_start(&mut self, id: ItemId) {
        if let Some(previous) = self.active_id() {
            debug!(previous, next = id, "drag started before previous drop");
        }
        self.phase = DragPhase::Dragging { active: id };
    }

    pub fn drag_over(
        &mut self,
        model: &mut Tierlist,
        active: ItemId,
        over: Option<DropTarget>,
        delta: PointerDelta,
    ) -> DomainResult<DragOutcome> {
        if self.active_id() != Some(active) {
            debug!(active, phase = ?self.phase, "stale drag-over ignored");
            return Ok(DragOutcome::Ignored);
        }

        let (active_list, _) = locate_active(model, active)?;
        let Some((target, over_list)) = over.and_then(|t| resolve(model, t).map(|k| (t, k))) else {
            return Ok(DragOutcome::Ignored);
        };
        if active_list == over_list {
            return Ok(DragOutcome::Ignored);
        }

        let index = match model.list(over_list) {
            Some(list) => insert_index(list, target, delta),
            None => return Ok(DragOutcome::Ignored),
        };
        let index = model.move_item(active, active_list, over_list, index)?;

        Ok(DragOutcome::Moved {
            item: active,
            from: active_list,
            to: over_list,
            index,
        })
    }

    pub fn drag_end(
        &mut self,
        model: &mut Tierlist,
        active: ItemId,
        over: Option<DropTarget>,
    ) -> DomainResult<DragOutcome> {
        self.phase = DragPhase::Idle;

        let (active_list, from) = locate_active(model, active)?;
        let Some((target, over_list)) = over.and_then(|t| resolve(model, t).map(|k| (t, k))) else {
            return Ok(DragOutcome::Unchanged);
        };
        if active_list != over_list {
            // Cross-list moves were already applied by drag-over
            return Ok(DragOutcome::Unchanged);
        }

        let to = match (target, model.list(over_list)) {
            (DropTarget::Item(id), Some(list)) => list.position(id),
            (DropTarget::List(_), Some(list)) => list.len().checked_sub(1),
            (_, None) => None,
        };
        let Some(to) = to else {
            return Ok(DragOutcome::Unchanged);
        };
        if to == from {
            return Ok(DragOutcome::Unchanged);
        }

        model.move_item(active, active_list, over_list, to)?;
        Ok(DragOutcome::Reordered {
            item: active,
            list: active_list,
            from,
            to,
        })
    }
}

/// The dragged item must exist; anything else means the model is corrupt
fn locate_active(model: &Tierlist, active: ItemId) -> DomainResult<(ListKey, usize)> {
    model.locate(active).ok_or_else(|| {
        DomainError::NotFound(format!("dragged item {} is not in any list", active))
    })
}

fn resolve(model: &Tierlist, target: DropTarget) -> Option<ListKey> {
    match target {
        DropTarget::List(key) => model.list(key).map(|l| l.key()),
        DropTarget::Item(id) => model.locate(id).map(|(key, _)| key),
    }
}

/// Where a cross-list hover inserts: at the hovered item, after it when
/// dragging down past the last item, or at the end for the list itself
fn insert_index(list: &ItemList, target: DropTarget, delta: PointerDelta) -> usize {
    let over_index = match target {
        DropTarget::Item(id) => list.position(id),
        DropTarget::List(_) => None,
    };
    match over_index {
        Some(i) if i + 1 == list.len() && delta.is_downward() => i + 1,
        Some(i) => i,
        None => list.len(),
    }
}
