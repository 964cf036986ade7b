//! Item — one line of the household inventory.
//!
//! An item is created as a draft (from a scan or a blank manual entry),
//! edited by the user, and committed to the inventory store. Once stored its
//! quantity only moves down through consumption; reaching zero removes it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{FridgeError, PersistenceDecodeError, ValidationError};
use crate::id::ItemId;
use crate::time::{Timestamp, now};

/// Smallest quantity a user can enter for an item.
pub const MIN_QUANTITY: i64 = 1;
/// Largest quantity a user can enter for an item.
pub const MAX_QUANTITY: i64 = 100;

/// A grocery item tracked in the fridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    /// Scanned barcode, empty for manual entries.
    pub barcode: String,
    /// Human-readable title, empty until looked up or typed.
    pub title: String,
    pub quantity: i64,
    pub expiration_date: Timestamp,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: ItemId::new(),
            barcode: String::new(),
            title: String::new(),
            quantity: MIN_QUANTITY,
            expiration_date: now(),
        }
    }
}

impl Item {
    /// Create a builder for constructing an [`Item`].
    #[must_use]
    pub fn builder() -> ItemBuilder {
        ItemBuilder::default()
    }

    /// Check domain invariants for an item about to be committed.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Validation`] when `quantity` is outside of
    /// [`MIN_QUANTITY`]`..=`[`MAX_QUANTITY`].
    pub fn validate(&self) -> Result<(), FridgeError> {
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&self.quantity) {
            return Err(ValidationError::QuantityOutOfRange(self.quantity).into());
        }
        Ok(())
    }

    /// Case-insensitive substring match against the title.
    ///
    /// An empty needle matches every item.
    #[must_use]
    pub fn title_contains(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Serialize a collection into the persisted document format.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Storage`] if serialization fails.
    pub fn encode_collection(items: &[Item]) -> Result<Vec<u8>, FridgeError> {
        serde_json::to_vec(items).map_err(|err| FridgeError::Storage(Box::new(err)))
    }

    /// Parse a persisted document and check store-level invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceDecodeError`] when the bytes are not a JSON item
    /// list, an item has a quantity below one, or ids repeat.
    pub fn decode_collection(bytes: &[u8]) -> Result<Vec<Item>, PersistenceDecodeError> {
        let items: Vec<Item> = serde_json::from_slice(bytes)?;
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.quantity < MIN_QUANTITY {
                return Err(PersistenceDecodeError::NonPositiveQuantity {
                    id: item.id,
                    quantity: item.quantity,
                });
            }
            if !seen.insert(item.id) {
                return Err(PersistenceDecodeError::DuplicateId(item.id));
            }
        }
        Ok(items)
    }
}

/// Step-by-step builder for [`Item`].
#[derive(Debug, Default)]
pub struct ItemBuilder {
    id: Option<ItemId>,
    barcode: Option<String>,
    title: Option<String>,
    quantity: Option<i64>,
    expiration_date: Option<Timestamp>,
}

impl ItemBuilder {
    #[must_use]
    pub fn id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn expiration_date(mut self, expiration_date: Timestamp) -> Self {
        self.expiration_date = Some(expiration_date);
        self
    }

    /// Consume the builder, validate, and return an [`Item`].
    ///
    /// Unset fields take the defaults of a blank draft: a fresh id, empty
    /// barcode and title, quantity 1, expiring now.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Validation`] if `quantity` is out of range.
    pub fn build(self) -> Result<Item, FridgeError> {
        let item = Item {
            id: self.id.unwrap_or_default(),
            barcode: self.barcode.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            quantity: self.quantity.unwrap_or(MIN_QUANTITY),
            expiration_date: self.expiration_date.unwrap_or_else(now),
        };
        item.validate()?;
        Ok(item)
    }
}
