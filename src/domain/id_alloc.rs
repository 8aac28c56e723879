//! Id Allocator
//!
//! Monotonic counters for item and tier ids. Freed ids are never handed out
//! again, and reseeding after a load never moves a counter backwards.

use std::sync::atomic::{AtomicU64, Ordering};

use super::item::ItemId;
use super::item_list::TierId;

#[derive(Debug)]
pub struct IdAllocator {
    next_item: AtomicU64,
    next_tier: AtomicU64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next_item: AtomicU64::new(1),
            next_tier: AtomicU64::new(1),
        }
    }

    pub fn next_item_id(&self) -> ItemId {
        self.next_item.fetch_add(1, Ordering::SeqCst)
    }

    pub fn next_tier_id(&self) -> TierId {
        self.next_tier.fetch_add(1, Ordering::SeqCst)
    }

    /// Make sure future ids are above the given watermarks
    pub fn reseed(&self, item_max: ItemId, tier_max: TierId) {
        self.next_item
            .fetch_max(item_max.saturating_add(1), Ordering::SeqCst);
        self.next_tier
            .fetch_max(tier_max.saturating_add(1), Ordering::SeqCst);
    }

    pub fn peek_item_id(&self) -> ItemId {
        self.next_item.load(Ordering::SeqCst)
    }

    pub fn peek_tier_id(&self) -> TierId {
        self.next_tier.load(Ordering::SeqCst)
    }
}
