//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`FridgeError`]
//! via `#[from]` (or an explicit `From` impl for adapter errors that get
//! boxed into [`FridgeError::Storage`]).

use crate::id::ItemId;
use crate::item::{MAX_QUANTITY, MIN_QUANTITY};

/// Top-level error for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum FridgeError {
    /// A domain invariant was violated by caller-supplied data.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// An item with the same id is already stored.
    #[error("an item with id {0} already exists")]
    DuplicateId(ItemId),

    /// Persisted inventory data could not be decoded.
    #[error("persisted inventory could not be decoded")]
    Decode(#[from] PersistenceDecodeError),

    /// The persistence adapter failed to read or write.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations detected by `validate()` methods.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Quantity outside of the editable range.
    #[error("quantity {0} is outside of {MIN_QUANTITY}..={MAX_QUANTITY}")]
    QuantityOutOfRange(i64),

    /// The credential is empty or only whitespace.
    #[error("API key must not be blank")]
    BlankApiKey,
}

/// Why a persisted item collection was rejected.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceDecodeError {
    /// The bytes are not a valid JSON item list.
    #[error("malformed item document")]
    Json(#[from] serde_json::Error),

    /// The document parsed but contains an item with a non-positive quantity.
    #[error("item {id} has non-positive quantity {quantity}")]
    NonPositiveQuantity { id: ItemId, quantity: i64 },

    /// The document parsed but two items share an id.
    #[error("item id {0} appears more than once")]
    DuplicateId(ItemId),
}
