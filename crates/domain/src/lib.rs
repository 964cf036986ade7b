//! # fridge-domain
//!
//! Pure domain model for the fridge household inventory tracker.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Items** (a barcode, a title, a quantity and an expiration date)
//! - Define the **Credential** used to reach the barcode lookup service
//! - Contain all invariant enforcement (quantity bounds, non-blank keys)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod credential;
pub mod item;
