//! Persistent profile store.
//!
//! # Module Structure
//!
//! - `keys`: The fixed set of persisted keys (`StoreKey`)
//! - `snapshot`: Typed in-memory image of all keys (`ProfileSnapshot`)
//! - `medium`: Durable medium trait (`DurableMedium`)
//! - `profile_store`: The store itself, its observer events and background writer

mod keys;
mod medium;
mod profile_store;
mod snapshot;

pub use keys::StoreKey;
pub use medium::DurableMedium;
pub use profile_store::{LoadReport, ProfileStore, StoreEvent};
pub use snapshot::ProfileSnapshot;
