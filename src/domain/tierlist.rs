//! Tierlist Aggregate
//!
//! One arena of lists: slot 0 is always the pool, the remaining slots are the
//! tiers in display order. Every mutation goes through this type so an item is
//! always in exactly one list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::entity::{DomainError, DomainResult};
use super::id_alloc::IdAllocator;
use super::item::{Item, ItemDraft, ItemId};
use super::item_list::{ItemList, ListKey, TierId};

pub const DEFAULT_TITLE: &str = "Untitled";

const POOL_SLOT: usize = 0;

/// Direction for tier reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tierlist {
    title: String,
    lists: Vec<ItemList>,
}

impl Default for Tierlist {
    fn default() -> Self {
        Self::empty()
    }
}

impl Tierlist {
    pub fn empty() -> Self {
        Self::new(DEFAULT_TITLE)
    }

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lists: vec![ItemList::pool(Vec::new())],
        }
    }

    /// Build from already-validated parts (codec use)
    pub(crate) fn assemble(title: String, pool: Vec<Item>, tiers: Vec<ItemList>) -> Self {
        let mut lists = Vec::with_capacity(tiers.len() + 1);
        lists.push(ItemList::pool(pool));
        lists.extend(tiers);
        Self { title, lists }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn pool(&self) -> &ItemList {
        &self.lists[POOL_SLOT]
    }

    pub fn tiers(&self) -> &[ItemList] {
        &self.lists[POOL_SLOT + 1..]
    }

    /// Pool followed by tiers
    pub fn lists(&self) -> &[ItemList] {
        &self.lists
    }

    fn slot(&self, key: ListKey) -> Option<usize> {
        match key {
            ListKey::Pool => Some(POOL_SLOT),
            ListKey::Tier(_) => self
                .lists
                .iter()
                .skip(POOL_SLOT + 1)
                .position(|l| l.key == key)
                .map(|i| i + POOL_SLOT + 1),
        }
    }

    fn slot_or_not_found(&self, key: ListKey) -> DomainResult<usize> {
        self.slot(key)
            .ok_or_else(|| DomainError::NotFound(format!("List {} not found", key)))
    }

    pub fn list(&self, key: ListKey) -> Option<&ItemList> {
        self.slot(key).map(|s| &self.lists[s])
    }

    pub fn tier(&self, id: TierId) -> Option<&ItemList> {
        self.list(ListKey::Tier(id))
    }

    /// The list holding `id` and the item's index in it
    pub fn locate(&self, id: ItemId) -> Option<(ListKey, usize)> {
        self.lists
            .iter()
            .find_map(|l| l.position(id).map(|pos| (l.key, pos)))
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.locate(id)
            .and_then(|(key, pos)| self.list(key).map(|l| &l.items[pos]))
    }

    /// Every item, pool first, then each tier in order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.lists.iter().flat_map(|l| l.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.lists.iter().map(|l| l.len()).sum()
    }

    pub fn max_item_id(&self) -> ItemId {
        self.items().map(|it| it.id).max().unwrap_or(0)
    }

    pub fn max_tier_id(&self) -> TierId {
        self.tiers()
            .iter()
            .filter_map(|t| t.tier_id())
            .max()
            .unwrap_or(0)
    }

    /// Move an item from one list to an index in another (or the same) list.
    ///
    /// `index` addresses the destination after the item has been taken out of
    /// its source, so a same-list call is a stable array move. Out-of-range
    /// indexes append. Returns the index the item landed at.
    pub fn move_item(
        &mut self,
        id: ItemId,
        from: ListKey,
        to: ListKey,
        index: usize,
    ) -> DomainResult<usize> {
        let from_slot = self.slot_or_not_found(from)?;
        let to_slot = self.slot_or_not_found(to)?;
        let pos = self.lists[from_slot]
            .position(id)
            .ok_or_else(|| DomainError::NotFound(format!("Item {} not in {}", id, from)))?;

        let item = self.lists[from_slot].items.remove(pos);
        let dest = &mut self.lists[to_slot].items;
        let index = index.min(dest.len());
        dest.insert(index, item);

        debug!(item = id, %from, %to, index, "item moved");
        Ok(index)
    }

    /// Create an item from a draft and append it to the pool
    pub fn add_item(&mut self, draft: ItemDraft, ids: &IdAllocator) -> Item {
        let item = Item::from_draft(ids.next_item_id(), draft);
        self.lists[POOL_SLOT].items.push(item.clone());
        info!(item = item.id, name = %item.name, "item added to pool");
        item
    }

    /// Replace the item with the same id, keeping its list and position
    pub fn edit_item(&mut self, item: Item) -> DomainResult<()> {
        let (key, pos) = self
            .locate(item.id)
            .ok_or_else(|| DomainError::NotFound(format!("Item {} not found", item.id)))?;
        let slot = self.slot_or_not_found(key)?;
        self.lists[slot].items[pos] = item;
        Ok(())
    }

    pub fn delete_item(&mut self, id: ItemId) -> DomainResult<Item> {
        let (key, pos) = self
            .locate(id)
            .ok_or_else(|| DomainError::NotFound(format!("Item {} not found", id)))?;
        let slot = self.slot_or_not_found(key)?;
        let removed = self.lists[slot].items.remove(pos);
        info!(item = id, list = %key, "item deleted");
        Ok(removed)
    }

    /// Append an empty tier
    pub fn add_tier(&mut self, title: impl Into<String>, ids: &IdAllocator) -> TierId {
        let id = ids.next_tier_id();
        self.lists.push(ItemList::tier(id, title, Vec::new()));
        info!(tier = id, "tier added");
        id
    }

    /// Swap a tier with its neighbour; `false` at either boundary
    pub fn move_tier(&mut self, id: TierId, direction: Direction) -> DomainResult<bool> {
        let slot = self.slot_or_not_found(ListKey::Tier(id))?;
        let neighbour = match direction {
            Direction::Up if slot > POOL_SLOT + 1 => slot - 1,
            Direction::Down if slot + 1 < self.lists.len() => slot + 1,
            _ => return Ok(false),
        };
        self.lists.swap(slot, neighbour);
        Ok(true)
    }

    /// Remove a tier, returning its items to the end of the pool in order
    pub fn delete_tier(&mut self, id: TierId) -> DomainResult<Vec<ItemId>> {
        let slot = self.slot_or_not_found(ListKey::Tier(id))?;
        let tier = self.lists.remove(slot);
        let moved: Vec<ItemId> = tier.items.iter().map(|it| it.id).collect();
        self.lists[POOL_SLOT].items.extend(tier.items);
        info!(tier = id, returned = moved.len(), "tier deleted");
        Ok(moved)
    }

    pub fn rename_tier(&mut self, id: TierId, title: impl Into<String>) -> DomainResult<()> {
        let slot = self.slot_or_not_found(ListKey::Tier(id))?;
        self.lists[slot].title = title.into();
        Ok(())
    }

    /// Pool items whose name contains the trimmed keyword, in pool order
    pub fn filter_pool(&self, keyword: &str) -> Vec<&Item> {
        let keyword = keyword.trim();
        self.pool()
            .items
            .iter()
            .filter(|it| keyword.is_empty() || it.matches(keyword))
            .collect()
    }

    /// Verify structural invariants: pool first, unique tiers, unique items
    pub fn check_invariants(&self) -> DomainResult<()> {
        if self.lists.first().map(|l| l.key) != Some(ListKey::Pool) {
            return Err(DomainError::Internal("pool is not the first list".to_string()));
        }

        let mut tier_ids = HashSet::new();
        for tier in self.tiers() {
            match tier.key {
                ListKey::Tier(id) if tier_ids.insert(id) => {}
                key => {
                    return Err(DomainError::Internal(format!("list {} appears twice", key)));
                }
            }
        }

        let mut seen = HashSet::new();
        for list in &self.lists {
            for item in &list.items {
                if !seen.insert(item.id) {
                    return Err(DomainError::Internal(format!(
                        "item {} is in more than one place (last seen in {})",
                        item.id, list.key
                    )));
                }
            }
        }
        Ok(())
    }
}
