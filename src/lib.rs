//! Flat-file JSON persistence for a fixed set of record collections.
//!
//! Each collection (`units`, `weapons`, `ammo`, `factions`, `groups`) is one
//! JSON object on disk, mapping record id to an arbitrary JSON value. Every
//! operation loads the whole file, and every mutation writes the whole file
//! back. The [`server`] module puts a small HTTP surface on top.
//!
//! ```rust,no_run
//! use collection_store::RecordStore;
//! use serde_json::json;
//!
//! let store = RecordStore::open("data").unwrap();
//! store.put("units", "u1", json!({"hp": 10})).unwrap();
//! assert_eq!(store.get_all("units").unwrap()["u1"], json!({"hp": 10}));
//! store.delete("units", "u1").unwrap();
//! ```
//!
//! **No locking by default.** Concurrent writers to the same collection race
//! and the last save wins. Opt into per-collection locking with
//! [`RecordStoreBuilder::exclusive`]; it only covers writers in this process.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod logging;
pub mod persist;
pub mod policy;
pub mod registry;
pub mod serializer;
pub mod server;
pub mod store;

pub use error::{Error, Result};
pub use policy::WritePolicy;
pub use registry::{CollectionName, Registry};
pub use store::{RecordStore, RecordStoreBuilder, UpsertRequest};

/// One collection in memory: record id to record value.
pub type Collection = serde_json::Map<String, serde_json::Value>;
