//! Inventory store — the single source of truth for stored items.
//!
//! Every mutation builds the next collection, persists it, and only then
//! swaps it in, so callers never observe a change that was not saved.

use fridge_domain::error::FridgeError;
use fridge_domain::id::ItemId;
use fridge_domain::item::Item;

use crate::ports::KeyValueStore;

/// Persistence key for the serialized item collection.
pub const ITEMS_KEY: &str = "savedItems";

/// Result of [`InventoryStore::consume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumed {
    /// The item is still stored with this quantity.
    Remaining(i64),
    /// The quantity reached zero and the item was removed.
    Removed,
    /// No item with that id was stored; nothing changed.
    Missing,
}

/// Owns every [`Item`] and keeps the persisted copy in sync.
pub struct InventoryStore<P> {
    persistence: P,
    items: Vec<Item>,
}

impl<P: KeyValueStore> InventoryStore<P> {
    /// Create an empty store. Call [`load`](Self::load) to restore saved items.
    pub fn new(persistence: P) -> Self {
        Self {
            persistence,
            items: Vec::new(),
        }
    }

    /// Create a store and immediately restore saved items.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Storage`] if the persistence adapter fails.
    pub fn open(persistence: P) -> Result<Self, FridgeError> {
        let mut store = Self::new(persistence);
        store.load()?;
        Ok(store)
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// Missing or undecodable data leaves the store empty; that is the normal
    /// first-run state and is not reported as an error.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Storage`] only when the adapter itself fails to
    /// read.
    pub fn load(&mut self) -> Result<(), FridgeError> {
        let Some(bytes) = self.persistence.read_bytes(ITEMS_KEY)? else {
            tracing::debug!("no saved inventory, starting empty");
            self.items.clear();
            return Ok(());
        };

        self.items = match Item::decode_collection(&bytes) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(%err, size = bytes.len(), "discarding unreadable saved inventory");
                Vec::new()
            }
        };
        tracing::debug!(count = self.items.len(), "inventory loaded");
        Ok(())
    }

    /// Write the full collection to the persistence adapter.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Storage`] if the write fails.
    pub fn save(&self) -> Result<(), FridgeError> {
        Self::persist(&self.persistence, &self.items)
    }

    /// Append a new item.
    ///
    /// # Errors
    ///
    /// - [`FridgeError::DuplicateId`] if an item with the same id is stored.
    /// - [`FridgeError::Validation`] if the quantity is out of range.
    /// - [`FridgeError::Storage`] if persisting fails; nothing is added then.
    pub fn add(&mut self, item: Item) -> Result<(), FridgeError> {
        if self.position(item.id).is_some() {
            return Err(FridgeError::DuplicateId(item.id));
        }
        item.validate()?;

        let mut next = self.items.clone();
        next.push(item);
        self.commit(next)
    }

    /// Replace the item with the same id in place, or append it if absent.
    ///
    /// # Errors
    ///
    /// - [`FridgeError::Validation`] if the quantity is out of range.
    /// - [`FridgeError::Storage`] if persisting fails; nothing changes then.
    pub fn update(&mut self, item: Item) -> Result<(), FridgeError> {
        item.validate()?;

        let mut next = self.items.clone();
        match self.position(item.id) {
            Some(index) => next[index] = item,
            None => next.push(item),
        }
        self.commit(next)
    }

    /// Remove the item with `id`. Absent ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Storage`] if persisting fails.
    pub fn delete(&mut self, id: ItemId) -> Result<(), FridgeError> {
        let Some(index) = self.position(id) else {
            return Ok(());
        };

        let mut next = self.items.clone();
        next.remove(index);
        self.commit(next)
    }

    /// Use up `amount` units of the item with `id`.
    ///
    /// The item is removed once its quantity drops to zero or below.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Storage`] if persisting fails.
    pub fn consume(&mut self, id: ItemId, amount: u32) -> Result<Consumed, FridgeError> {
        let Some(index) = self.position(id) else {
            return Ok(Consumed::Missing);
        };

        let mut next = self.items.clone();
        let remaining = next[index].quantity - i64::from(amount);
        let outcome = if remaining <= 0 {
            next.remove(index);
            Consumed::Removed
        } else {
            next[index].quantity = remaining;
            Consumed::Remaining(remaining)
        };
        self.commit(next)?;
        Ok(outcome)
    }

    /// Filtered, optionally sorted view of the inventory.
    ///
    /// `search_text` is matched case-insensitively against titles (empty
    /// matches everything). With `sort_by_expiration` the result is ordered by
    /// ascending expiration date, ties keeping insertion order; otherwise
    /// insertion order is preserved.
    #[must_use]
    pub fn query(&self, search_text: &str, sort_by_expiration: bool) -> Vec<&Item> {
        let mut view: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| item.title_contains(search_text))
            .collect();
        if sort_by_expiration {
            view.sort_by_key(|item| item.expiration_date);
        }
        view
    }

    /// Look up a stored item by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// All items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn commit(&mut self, next: Vec<Item>) -> Result<(), FridgeError> {
        Self::persist(&self.persistence, &next)?;
        self.items = next;
        Ok(())
    }

    fn persist(persistence: &P, items: &[Item]) -> Result<(), FridgeError> {
        let bytes = Item::encode_collection(items)?;
        persistence.write_bytes(ITEMS_KEY, &bytes)?;
        tracing::trace!(count = items.len(), "inventory saved");
        Ok(())
    }
}
