//! Item Entity
//!
//! A thing being ranked: a product, a book, a song. Owned by exactly one list.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

pub type ItemId = u64;

/// A rankable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier, never reused while the item exists
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Where the item came from (product page etc.)
    pub source_url: String,
    /// Opaque thumbnail reference, resolved by the view layer
    #[serde(default)]
    pub thumbnail_ref: Option<String>,
    /// Free-form notes
    #[serde(default)]
    pub memo: Option<String>,
}

/// Item fields supplied by the add-item flow; the id is assigned by the core
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub name: String,
    pub source_url: String,
    #[serde(default)]
    pub thumbnail_ref: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_url: source_url.into(),
            thumbnail_ref: None,
            memo: None,
        }
    }
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            source_url: source_url.into(),
            thumbnail_ref: None,
            memo: None,
        }
    }

    pub fn from_draft(id: ItemId, draft: ItemDraft) -> Self {
        Self {
            id,
            name: draft.name,
            source_url: draft.source_url,
            thumbnail_ref: draft.thumbnail_ref,
            memo: draft.memo,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail_ref: impl Into<String>) -> Self {
        self.thumbnail_ref = Some(thumbnail_ref.into());
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Pool filter match: substring of the name, case-sensitive
    pub fn matches(&self, keyword: &str) -> bool {
        self.name.contains(keyword)
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
