use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub owner_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

/// The owner-editable part of an item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("item {0} not found")]
    NotFound(i64),

    #[error("user {requester} does not own item {id}")]
    Forbidden { id: i64, requester: i64 },
}

fn slice_index(idx: i64, len: usize) -> usize {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let idx = if idx < 0 { idx.saturating_add(len) } else { idx };
    // clamped to [0, len], so the cast is lossless
    idx.clamp(0, len) as usize
}

#[derive(Default)]
struct ItemTable {
    next_id: i64,
    // ids only grow, so key order is insertion order
    items: BTreeMap<i64, Item>,
}

impl ItemTable {
    fn owned_mut(&mut self, id: i64, requester: i64) -> Result<&mut Item, ItemError> {
        let item = self.items.get_mut(&id).ok_or(ItemError::NotFound(id))?;
        if item.owner_id != requester {
            return Err(ItemError::Forbidden { id, requester });
        }
        Ok(item)
    }
}

/// In-memory items, each tagged with its owner.
#[derive(Default)]
pub struct ItemStore {
    inner: RwLock<ItemTable>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, fields: ItemFields, owner_id: i64) -> Item {
        let mut table = self.inner.write();
        table.next_id += 1;
        let item = Item {
            id: table.next_id,
            title: fields.title,
            description: fields.description,
            price: fields.price,
            owner_id,
            created_at: OffsetDateTime::now_utc(),
        };
        table.items.insert(item.id, item.clone());
        item
    }

    pub fn get(&self, id: i64) -> Option<Item> {
        self.inner.read().items.get(&id).cloned()
    }

    /// Items `[skip, skip + limit)` in creation order.
    ///
    /// Both bounds are slice indices: a negative bound counts back from the
    /// end, and anything past either end is clamped. An inverted range is empty.
    pub fn list_page(&self, skip: i64, limit: i64) -> Vec<Item> {
        let table = self.inner.read();
        let len = table.items.len();
        let start = slice_index(skip, len);
        let stop = slice_index(skip.saturating_add(limit), len);
        table
            .items
            .values()
            .skip(start)
            .take(stop.saturating_sub(start))
            .cloned()
            .collect()
    }

    /// Replace title, description and price. Only the owner may do this.
    pub fn update(&self, id: i64, fields: ItemFields, requester_id: i64) -> Result<Item, ItemError> {
        let mut table = self.inner.write();
        let item = table.owned_mut(id, requester_id)?;
        item.title = fields.title;
        item.description = fields.description;
        item.price = fields.price;
        Ok(item.clone())
    }

    pub fn delete(&self, id: i64, requester_id: i64) -> Result<(), ItemError> {
        let mut table = self.inner.write();
        table.owned_mut(id, requester_id)?;
        table.items.remove(&id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
