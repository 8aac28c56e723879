//! Record Shape
//!
//! The persisted form of a tierlist. Items live once in a flat sequence; the
//! pool and tiers reference them by id.

use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemId, TierId, DEFAULT_TITLE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierRecord {
    pub id: TierId,
    pub title: String,
    #[serde(default)]
    pub item_ids: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierlistRecord {
    pub title: String,
    #[serde(default)]
    pub tiers: Vec<TierRecord>,
    #[serde(default)]
    pub tier_max_id: TierId,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub items_pool: Vec<ItemId>,
    #[serde(default)]
    pub item_max_id: ItemId,
}

impl Default for TierlistRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl TierlistRecord {
    pub fn empty() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            tiers: Vec::new(),
            tier_max_id: 0,
            items: Vec::new(),
            items_pool: Vec::new(),
            item_max_id: 0,
        }
    }

    /// Highest ids the allocator must stay above: `(item, tier)`.
    ///
    /// Takes the larger of the stored watermark and the ids actually present,
    /// so a hand-edited or stale record can't cause an id to be reused.
    pub fn watermarks(&self) -> (ItemId, TierId) {
        let item_max = self
            .items
            .iter()
            .map(|it| it.id)
            .chain(self.items_pool.iter().copied())
            .chain(self.tiers.iter().flat_map(|t| t.item_ids.iter().copied()))
            .fold(self.item_max_id, ItemId::max);
        let tier_max = self.tiers.iter().map(|t| t.id).fold(self.tier_max_id, TierId::max);
        (item_max, tier_max)
    }
}
