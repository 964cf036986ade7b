//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod credential_store;
pub mod entry_service;
pub mod inventory_store;
pub mod product_lookup;
