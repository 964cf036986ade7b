//! Entry service — turns a scan or a manual-entry request into a stored item.
//!
//! The user always edits a [`Draft`], an independent copy of an [`Item`].
//! Nothing reaches the inventory until [`EntryService::commit`] is called;
//! [`EntryService::discard`] just drops the draft.
//!
//! Drafts started from a scan fire a product lookup on a background task.
//! Its outcome travels back over a oneshot channel and is applied by whoever
//! owns the draft, so the draft is never touched from two tasks at once.

use std::sync::Arc;

use tokio::sync::oneshot;

use fridge_domain::credential::ApiKey;
use fridge_domain::error::FridgeError;
use fridge_domain::id::ItemId;
use fridge_domain::item::Item;

use crate::ports::{HttpClient, KeyValueStore};
use crate::services::inventory_store::InventoryStore;
use crate::services::product_lookup::{LookupError, ProductLookup};

type PendingLookup = oneshot::Receiver<Result<String, LookupError>>;

/// An item being edited, not yet committed.
#[derive(Debug)]
pub struct Draft {
    item: Item,
    pending: Option<PendingLookup>,
}

impl Draft {
    fn new(item: Item) -> Self {
        Self {
            item,
            pending: None,
        }
    }

    /// The item as currently edited.
    #[must_use]
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Mutable access for the editing surface.
    pub fn item_mut(&mut self) -> &mut Item {
        &mut self.item
    }

    /// Whether a product lookup is still outstanding.
    #[must_use]
    pub fn is_lookup_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply the lookup result if it has arrived, without waiting.
    ///
    /// Returns `true` when the title was filled in.
    pub fn apply_lookup(&mut self) -> bool {
        let Some(rx) = self.pending.as_mut() else {
            return false;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.settle(result)
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                false
            }
        }
    }

    /// Wait for the outstanding lookup, then apply it.
    ///
    /// Returns `true` when the title was filled in.
    pub async fn await_lookup(&mut self) -> bool {
        let Some(rx) = self.pending.take() else {
            return false;
        };

        match rx.await {
            Ok(result) => self.settle(result),
            Err(_) => false,
        }
    }

    fn settle(&mut self, result: Result<String, LookupError>) -> bool {
        match result {
            Ok(title) if self.item.title.is_empty() => {
                self.item.title = title;
                true
            }
            Ok(title) => {
                tracing::debug!(%title, "keeping the title typed by the user");
                false
            }
            Err(err) => {
                tracing::warn!(%err, barcode = %self.item.barcode, "product lookup failed, title left empty");
                false
            }
        }
    }

    /// Hand the draft back as a plain item, dropping any pending lookup.
    #[must_use]
    pub fn into_item(self) -> Item {
        self.item
    }
}

/// Use-cases for creating and editing items.
pub struct EntryService<H> {
    lookup: Arc<ProductLookup<H>>,
    api_key: Option<ApiKey>,
}

impl<H> EntryService<H>
where
    H: HttpClient + Send + Sync + 'static,
{
    /// Create a service using `lookup` for scanned barcodes.
    pub fn new(lookup: ProductLookup<H>, api_key: Option<ApiKey>) -> Self {
        Self {
            lookup: Arc::new(lookup),
            api_key,
        }
    }

    /// Replace the credential used for subsequent lookups.
    pub fn set_api_key(&mut self, api_key: Option<ApiKey>) {
        self.api_key = api_key;
    }

    /// Whether lookups can be attempted.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// A blank draft: fresh id, empty barcode and title, quantity 1,
    /// expiring now.
    #[must_use]
    pub fn begin_manual_entry(&self) -> Draft {
        Draft::new(Item::default())
    }

    /// A draft for an already stored item, or `None` if `id` is unknown.
    #[must_use]
    pub fn begin_edit<P: KeyValueStore>(
        &self,
        store: &InventoryStore<P>,
        id: ItemId,
    ) -> Option<Draft> {
        store.get(id).cloned().map(Draft::new)
    }

    /// A draft for a scanned barcode whose title is looked up in the
    /// background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn begin_from_scan(&self, barcode: impl Into<String>) -> Draft {
        let mut draft = Draft::new(Item {
            barcode: barcode.into(),
            ..Item::default()
        });

        let (tx, rx) = oneshot::channel();
        let lookup = Arc::clone(&self.lookup);
        let api_key = self.api_key.clone();
        let barcode = draft.item.barcode.clone();
        tokio::spawn(async move {
            let result = lookup.lookup(&barcode, api_key.as_ref()).await;
            // The receiver is gone when the draft was committed or discarded.
            let _ = tx.send(result);
        });

        draft.pending = Some(rx);
        draft
    }

    /// Store the draft, inserting it or replacing the item with the same id.
    ///
    /// A lookup result that has already arrived is applied first; a lookup
    /// still in flight is abandoned.
    ///
    /// # Errors
    ///
    /// - [`FridgeError::Validation`] if the quantity is out of range.
    /// - [`FridgeError::Storage`] if persisting fails.
    pub fn commit<P: KeyValueStore>(
        &self,
        store: &mut InventoryStore<P>,
        mut draft: Draft,
    ) -> Result<ItemId, FridgeError> {
        draft.apply_lookup();
        let item = draft.into_item();
        let id = item.id;
        store.update(item)?;
        tracing::info!(%id, "item saved");
        Ok(id)
    }

    /// Drop the draft without touching the store.
    pub fn discard(&self, draft: Draft) {
        tracing::debug!(id = %draft.item.id, "draft discarded");
        drop(draft);
    }
}
