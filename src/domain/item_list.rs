//! Ordered Lists
//!
//! The pool and every tier are the same shape: an identified, ordered run of
//! items. `ListKey` is the identifier; the string tags `"pool"` and `"t<N>"`
//! only exist at the input boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entity::{position_of, DomainError};
use super::item::{Item, ItemId};

pub type TierId = u64;

const POOL_TAG: &str = "pool";

/// Identifier of an ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ListKey {
    Pool,
    Tier(TierId),
}

impl ListKey {
    pub fn tier_id(&self) -> Option<TierId> {
        match self {
            ListKey::Pool => None,
            ListKey::Tier(id) => Some(*id),
        }
    }

    pub fn is_pool(&self) -> bool {
        matches!(self, ListKey::Pool)
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKey::Pool => f.write_str(POOL_TAG),
            ListKey::Tier(id) => write!(f, "t{}", id),
        }
    }
}

impl FromStr for ListKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == POOL_TAG {
            return Ok(ListKey::Pool);
        }
        s.strip_prefix('t')
            .and_then(|n| n.parse::<TierId>().ok())
            .map(ListKey::Tier)
            .ok_or_else(|| DomainError::InvalidInput(format!("'{}' is not a list id", s)))
    }
}

impl TryFrom<String> for ListKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ListKey> for String {
    fn from(key: ListKey) -> Self {
        key.to_string()
    }
}

/// An identified, ordered sequence of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemList {
    pub(super) key: ListKey,
    pub(super) title: String,
    pub(super) items: Vec<Item>,
}

impl ItemList {
    pub fn pool(items: Vec<Item>) -> Self {
        Self {
            key: ListKey::Pool,
            title: String::new(),
            items,
        }
    }

    pub fn tier(id: TierId, title: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            key: ListKey::Tier(id),
            title: title.into(),
            items,
        }
    }

    pub fn key(&self) -> ListKey {
        self.key
    }

    pub fn tier_id(&self) -> Option<TierId> {
        self.key.tier_id()
    }

    /// Display title; empty for the pool
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        position_of(&self.items, id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|it| it.id).collect()
    }
}
