//! # fridge-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `KeyValueStore` — byte blobs under fixed keys (inventory, credential)
//!   - `HttpClient` — a single GET returning status and raw body
//!   - `Camera` — capture sessions that stream recognized-code frames
//! - Define **driving/inbound** use-case structs:
//!   - `InventoryStore` — CRUD, consume, search/sort over items
//!   - `CredentialStore` — load and save the lookup API key
//!   - `ProductLookup` — resolve a barcode to a product title
//!   - `EntryService` — drafts from scans or manual entry, then commit
//!   - `ScanController` — one barcode per capture session
//!
//! ## Dependency rule
//! Depends on `fridge-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod scanner;
pub mod services;
