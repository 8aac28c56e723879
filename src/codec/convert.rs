//! Tierlist <-> Record conversion

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::warn;

use crate::domain::{DomainError, Item, ItemId, ItemList, ListKey, TierId, Tierlist};

use super::record::{TierRecord, TierlistRecord};

/// Malformed record; the whole decode is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("list {list} references item {item_id}, which is not in the item table")]
    DanglingItem { list: ListKey, item_id: ItemId },

    #[error("item {item_id} is referenced by both {first} and {second}")]
    DuplicateReference {
        item_id: ItemId,
        first: ListKey,
        second: ListKey,
    },

    #[error("tier id {0} is used more than once")]
    DuplicateTier(TierId),
}

impl From<RecordError> for DomainError {
    fn from(err: RecordError) -> Self {
        DomainError::InvalidInput(err.to_string())
    }
}

pub fn serialize(tierlist: &Tierlist) -> TierlistRecord {
    TierlistRecord {
        title: tierlist.title().to_string(),
        tiers: tierlist
            .tiers()
            .iter()
            .filter_map(|tier| {
                tier.tier_id().map(|id| TierRecord {
                    id,
                    title: tier.title().to_string(),
                    item_ids: tier.item_ids(),
                })
            })
            .collect(),
        tier_max_id: tierlist.max_tier_id(),
        items: tierlist.items().cloned().collect(),
        items_pool: tierlist.pool().item_ids(),
        item_max_id: tierlist.max_item_id(),
    }
}

pub fn deserialize(record: TierlistRecord) -> Result<Tierlist, RecordError> {
    let mut flat_order: Vec<ItemId> = Vec::with_capacity(record.items.len());
    let mut index: HashMap<ItemId, Item> = HashMap::with_capacity(record.items.len());
    for item in record.items {
        if index.insert(item.id, item.clone()).is_none() {
            flat_order.push(item.id);
        }
    }

    let mut placed: HashMap<ItemId, ListKey> = HashMap::new();
    let mut take = |list: ListKey, ids: &[ItemId]| -> Result<Vec<Item>, RecordError> {
        ids.iter()
            .map(|&item_id| {
                if let Some(&first) = placed.get(&item_id) {
                    return Err(RecordError::DuplicateReference {
                        item_id,
                        first,
                        second: list,
                    });
                }
                let item = index
                    .get(&item_id)
                    .cloned()
                    .ok_or(RecordError::DanglingItem { list, item_id })?;
                placed.insert(item_id, list);
                Ok(item)
            })
            .collect()
    };

    let mut pool = take(ListKey::Pool, &record.items_pool)?;

    let mut tier_ids = HashSet::with_capacity(record.tiers.len());
    let mut tiers = Vec::with_capacity(record.tiers.len());
    for tier in record.tiers {
        if !tier_ids.insert(tier.id) {
            return Err(RecordError::DuplicateTier(tier.id));
        }
        let items = take(ListKey::Tier(tier.id), &tier.item_ids)?;
        tiers.push(ItemList::tier(tier.id, tier.title, items));
    }

    for id in flat_order {
        if placed.contains_key(&id) {
            continue;
        }
        if let Some(item) = index.remove(&id) {
            warn!(item = id, "item not referenced by any list, returning it to the pool");
            pool.push(item);
        }
    }

    Ok(Tierlist::assemble(record.title, pool, tiers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdAllocator, ItemDraft};

    fn sample() -> Tierlist {
        let ids = IdAllocator::new();
        let mut tl = Tierlist::new("Fruit");
        let names = ["apple", "banana", "cherry", "date", "elder"];
        let items: Vec<ItemId> = names
            .iter()
            .map(|n| tl.add_item(ItemDraft::new(*n, format!("https://shop/{}", n)), &ids).id)
            .collect();
        let s = tl.add_tier("S", &ids);
        tl.add_tier("A", &ids);
        tl.move_item(items[3], ListKey::Pool, ListKey::Tier(s), 0).unwrap();
        tl.move_item(items[1], ListKey::Pool, ListKey::Tier(s), 0).unwrap();
        tl
    }

    #[test]
    fn test_round_trip_empty() {
        let tl = Tierlist::empty();
        let record = serialize(&tl);

        assert_eq!(record.item_max_id, 0);
        assert_eq!(record.tier_max_id, 0);
        assert_eq!(deserialize(record).unwrap(), tl);
    }

    #[test]
    fn test_round_trip_pool_and_tiers() {
        let tl = sample();
        let record = serialize(&tl);

        assert_eq!(record.items_pool.len(), 3);
        assert_eq!(record.tiers[0].item_ids, vec![2, 4]);
        assert!(record.tiers[1].item_ids.is_empty());
        assert_eq!(record.items.len(), 5);
        assert_eq!(record.item_max_id, 5);
        assert_eq!(record.tier_max_id, 2);

        assert_eq!(deserialize(record).unwrap(), tl);
    }

    #[test]
    fn test_round_trip_through_json() {
        let tl = sample();
        let json = serde_json::to_string(&serialize(&tl)).unwrap();
        let record: TierlistRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialize(record).unwrap(), tl);
    }

    #[test]
    fn test_flat_items_pool_first() {
        let record = serialize(&sample());
        let order: Vec<&str> = record.items.iter().map(|it| it.name.as_str()).collect();
        assert_eq!(order, vec!["apple", "cherry", "elder", "banana", "date"]);
    }

    #[test]
    fn test_dangling_reference_is_rejected() {
        let mut record = serialize(&sample());
        record.tiers[1].item_ids.push(77);

        let err = deserialize(record).unwrap_err();
        assert_eq!(err, RecordError::DanglingItem { list: ListKey::Tier(2), item_id: 77 });
        assert!(matches!(DomainError::from(err), DomainError::InvalidInput(_)));
    }

    #[test]
    fn test_duplicate_reference_is_rejected() {
        let mut record = serialize(&sample());
        let pooled = record.items_pool[0];
        record.tiers[1].item_ids.push(pooled);

        let err = deserialize(record).unwrap_err();
        assert_eq!(
            err,
            RecordError::DuplicateReference { item_id: pooled, first: ListKey::Pool, second: ListKey::Tier(2) }
        );
    }

    #[test]
    fn test_duplicate_tier_is_rejected() {
        let mut record = serialize(&sample());
        record.tiers[1].id = record.tiers[0].id;
        assert_eq!(deserialize(record).unwrap_err(), RecordError::DuplicateTier(1));
    }

    #[test]
    fn test_last_flat_item_wins() {
        let mut record = TierlistRecord::empty();
        record.items = vec![Item::new(1, "old", ""), Item::new(1, "new", "")];
        record.items_pool = vec![1];

        let tl = deserialize(record).unwrap();
        assert_eq!(tl.item(1).unwrap().name, "new");
        assert_eq!(tl.item_count(), 1);
    }

    #[test]
    fn test_unplaced_items_join_pool() {
        let mut record = TierlistRecord::empty();
        record.items = vec![Item::new(1, "a", ""), Item::new(2, "b", ""), Item::new(3, "c", "")];
        record.items_pool = vec![2];

        let tl = deserialize(record).unwrap();
        assert_eq!(tl.pool().item_ids(), vec![2, 1, 3]);
        tl.check_invariants().unwrap();
    }
}
