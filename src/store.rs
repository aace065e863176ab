//! Record store, its builder, and the upsert payload.

use crate::error::{Error, Result};
use crate::persist::{load, save};
use crate::policy::WritePolicy;
use crate::registry::{CollectionName, Registry};
use crate::serializer::JsonSerializer;
use crate::Collection;
use parking_lot::{Mutex, MutexGuard};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whole-file CRUD over the registry's collections.
///
/// Nothing is cached: every call loads the collection fresh from disk, and
/// every mutation writes the whole collection back. Without
/// [`exclusive`](RecordStoreBuilder::exclusive) two writers racing on the same
/// collection lose updates (last save wins).
pub struct RecordStore {
    registry: Registry,
    serializer: JsonSerializer,
    policy: WritePolicy,
    locks: Option<HashMap<CollectionName, Mutex<()>>>,
}

impl RecordStore {
    /// Open a store over `data_dir` with default settings (pretty JSON,
    /// in-place writes, no locking).
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::builder(data_dir).build()
    }

    /// Start configuring a new store. Call [`.build()`](RecordStoreBuilder::build)
    /// when ready.
    pub fn builder(data_dir: impl AsRef<Path>) -> RecordStoreBuilder {
        RecordStoreBuilder::new(data_dir)
    }

    /// The registry this store resolves names against.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Every record in the collection called `name`.
    pub fn get_all(&self, name: &str) -> Result<Collection> {
        let collection = name.parse::<CollectionName>()?;
        let _guard = self.guard(collection);
        load(self.registry.location(collection), &self.serializer)
    }

    /// Set `id` to the payload's item, creating or overwriting the record.
    ///
    /// The collection name is checked first, then the payload, and only then
    /// is the file loaded, so a bad request never writes anything.
    pub fn upsert(&self, name: &str, request: UpsertRequest) -> Result<()> {
        let collection = name.parse::<CollectionName>()?;
        let (id, item) = request.into_parts()?;
        self.write_record(collection, id, item)
    }

    /// Typed form of [`upsert`](Self::upsert) for callers that already hold
    /// an id and a value.
    pub fn put(&self, name: &str, id: impl Into<String>, value: Value) -> Result<()> {
        let collection = name.parse::<CollectionName>()?;
        self.write_record(collection, id.into(), value)
    }

    /// Remove `id` from the collection. Returns `true` if a record was removed;
    /// deleting an absent id succeeds and leaves the file untouched.
    pub fn delete(&self, name: &str, id: &str) -> Result<bool> {
        let collection = name.parse::<CollectionName>()?;
        let _guard = self.guard(collection);
        let path = self.registry.location(collection);
        let mut data = load(path, &self.serializer)?;
        if data.shift_remove(id).is_none() {
            debug!(%collection, id, "delete of absent record");
            return Ok(false);
        }
        save(path, &data, &self.serializer, self.policy)?;
        Ok(true)
    }

    // ---- internal ----

    fn write_record(&self, collection: CollectionName, id: String, item: Value) -> Result<()> {
        let _guard = self.guard(collection);
        let path = self.registry.location(collection);
        let mut data = load(path, &self.serializer)?;
        debug!(%collection, id = %id, "upsert record");
        data.insert(id, item);
        save(path, &data, &self.serializer, self.policy)
    }

    fn guard(&self, collection: CollectionName) -> Option<MutexGuard<'_, ()>> {
        self.locks.as_ref().map(|locks| locks[&collection].lock())
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("data_dir", &self.registry.data_dir())
            .field("pretty", &self.serializer.is_pretty())
            .field("policy", &self.policy)
            .field("exclusive", &self.locks.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`RecordStore`].
///
/// ```rust,no_run
/// use collection_store::{RecordStore, WritePolicy};
///
/// let store = RecordStore::builder("data")
///     .write_policy(WritePolicy::Atomic)
///     .exclusive(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct RecordStoreBuilder {
    data_dir: PathBuf,
    pretty: bool,
    policy: WritePolicy,
    exclusive: bool,
}

impl RecordStoreBuilder {
    fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            pretty: true,
            policy: WritePolicy::InPlace,
            exclusive: false,
        }
    }

    /// Write indented JSON (default: `true`).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// How saves replace the file (default: [`WritePolicy::InPlace`]).
    pub fn write_policy(mut self, policy: WritePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Hold one lock per collection across each load+save (default: `false`).
    /// Removes the lost-update race between writers in this process.
    pub fn exclusive(mut self, yes: bool) -> Self {
        self.exclusive = yes;
        self
    }

    /// Build the registry, create any missing collection files, and return the
    /// store.
    pub fn build(self) -> Result<RecordStore> {
        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };

        let registry = Registry::new(&self.data_dir);
        registry.init(&serializer)?;

        let locks = self.exclusive.then(|| {
            CollectionName::ALL
                .into_iter()
                .map(|c| (c, Mutex::new(())))
                .collect()
        });

        Ok(RecordStore {
            registry,
            serializer,
            policy: self.policy,
            locks,
        })
    }
}

// ---------------------------------------------------------------------------
// Upsert payload
// ---------------------------------------------------------------------------

/// Raw upsert body of the form `{"id": ..., "item": ...}`.
///
/// Parsing never fails up front; validation happens in
/// [`into_parts`](Self::into_parts) so the store can check the collection name
/// before it looks at the body.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertRequest {
    body: Option<Value>,
}

impl UpsertRequest {
    /// Wrap raw request bytes. Unparsable JSON is kept as "no body".
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            body: serde_json::from_slice(bytes).ok(),
        }
    }

    /// Wrap an already-parsed body.
    pub fn from_value(body: Value) -> Self {
        Self { body: Some(body) }
    }

    /// Build a well-formed request from its parts.
    pub fn new(id: impl Into<String>, item: Value) -> Self {
        Self::from_value(serde_json::json!({ "id": id.into(), "item": item }))
    }

    /// Extract `(id, item)`, or [`Error::MissingField`] when the body is not an
    /// object, lacks either key, or has an `id` that cannot be a record key.
    /// String ids are used as-is and numeric ids are stringified. An explicit
    /// `"item": null` counts as present.
    pub fn into_parts(self) -> Result<(String, Value)> {
        let Some(Value::Object(mut body)) = self.body else {
            return Err(Error::MissingField);
        };
        let id = match body.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(Error::MissingField),
        };
        let item = body.remove("item").ok_or(Error::MissingField)?;
        Ok((id, item))
    }
}
