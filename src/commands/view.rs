//! Read-only snapshots handed back to callers

use serde::Serialize;

use crate::domain::{Item, ItemList, ListKey, Tierlist};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub key: ListKey,
    pub title: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierlistView {
    pub title: String,
    pub pool: ListView,
    pub tiers: Vec<ListView>,
}

impl From<&ItemList> for ListView {
    fn from(list: &ItemList) -> Self {
        Self {
            key: list.key(),
            title: list.title().to_string(),
            items: list.items().to_vec(),
        }
    }
}

impl From<&Tierlist> for TierlistView {
    fn from(tierlist: &Tierlist) -> Self {
        Self {
            title: tierlist.title().to_string(),
            pool: tierlist.pool().into(),
            tiers: tierlist.tiers().iter().map(ListView::from).collect(),
        }
    }
}
