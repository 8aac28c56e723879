//! Drag Reconciliation
//!
//! Keeps the pool and tiers consistent while an item is dragged between them.
//! Cross-list moves are applied on every hover; same-list reordering waits
//! for the drop.

mod reconciler;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, ItemId, ListKey};

pub use reconciler::{DragOutcome, DragPhase, DragReconciler};

/// What the pointer is over: a list's empty space, or another item
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    List(ListKey),
    Item(ItemId),
}

impl FromStr for DropTarget {
    type Err = DomainError;

    /// Input ids are either list tags (`"pool"`, `"t3"`) or bare item ids
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<ItemId>() {
            return Ok(DropTarget::Item(id));
        }
        s.parse::<ListKey>().map(DropTarget::List)
    }
}

/// Pointer movement since the drag started, in screen pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerDelta {
    pub x: f64,
    pub y: f64,
}

impl PointerDelta {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_downward(&self) -> bool {
        self.y > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_target_parsing() {
        assert_eq!("pool".parse::<DropTarget>().unwrap(), DropTarget::List(ListKey::Pool));
        assert_eq!("t2".parse::<DropTarget>().unwrap(), DropTarget::List(ListKey::Tier(2)));
        assert_eq!("17".parse::<DropTarget>().unwrap(), DropTarget::Item(17));
        assert!("over-there".parse::<DropTarget>().is_err());
    }

    #[test]
    fn test_pointer_direction() {
        assert!(PointerDelta::new(0.0, 3.5).is_downward());
        assert!(!PointerDelta::new(10.0, 0.0).is_downward());
        assert!(!PointerDelta::default().is_downward());
    }
}
