//! Persisted store of which games each user has played.
//!
//! # Overview
//!
//! The store module owns the full mapping from Matrix user id to an ordered
//! list of game names, persisted as a single pretty-printed JSON file.
//!
//! Two layers:
//!
//! 1. **Persistence** - [`StoreLoader`] reads and writes the backing JSON
//!    file behind the [`StoreBackend`] trait (mockable in tests). Saves go
//!    through an atomic rename so the file is never observed half-written.
//! 2. **Semantics** - [`ProfileStore`] implements the add, remove, list and
//!    bulk operations as load -> mutate -> save transactions serialized by
//!    one lock.
//!
//! # Semantics
//!
//! - Adding checks membership case-insensitively and stores the given casing.
//! - Removing matches exactly; `"chess"` does not remove `"Chess"`.
//! - Bulk operations process all users against one shared load and save the
//!   whole batch once.
//! - A missing backing file is an empty store; an unparseable one is a
//!   [`StoreError::Corrupt`] and is never overwritten.

mod loader;
mod profile_store;

pub use crate::store::loader::{Profiles, StoreBackend, StoreError, StoreLoader};
pub use crate::store::profile_store::{
    AddOutcome, BulkAddOutcome, BulkRemoveOutcome, ProfileStore, RemoveOutcome,
};
