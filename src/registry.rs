//! The fixed set of collections and where each one lives on disk.

use crate::error::{Error, Result};
use crate::persist::ensure_file;
use crate::serializer::Serializer;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// A recognized collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionName {
    /// `units`
    Units,
    /// `weapons`
    Weapons,
    /// `ammo`
    Ammo,
    /// `factions`
    Factions,
    /// `groups`
    Groups,
}

impl CollectionName {
    /// Every recognized collection, in registration order.
    pub const ALL: [CollectionName; 5] = [
        CollectionName::Units,
        CollectionName::Weapons,
        CollectionName::Ammo,
        CollectionName::Factions,
        CollectionName::Groups,
    ];

    /// Name as it appears in request paths.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionName::Units => "units",
            CollectionName::Weapons => "weapons",
            CollectionName::Ammo => "ammo",
            CollectionName::Factions => "factions",
            CollectionName::Groups => "groups",
        }
    }

    /// Backing file name inside the data directory.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CollectionName::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::UnknownCollection(s.to_string()))
    }
}

impl std::fmt::Display for CollectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable table from collection name to storage location.
///
/// Built once at startup and owned by the [`RecordStore`](crate::RecordStore);
/// nothing reaches for it globally.
#[derive(Debug, Clone)]
pub struct Registry {
    data_dir: PathBuf,
    locations: HashMap<CollectionName, PathBuf>,
}

impl Registry {
    /// Map every recognized collection to `<data_dir>/<name>.json`. Touches
    /// nothing on disk; call [`init`](Self::init) for that.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let locations = CollectionName::ALL
            .into_iter()
            .map(|c| (c, data_dir.join(c.file_name())))
            .collect();
        Self { data_dir, locations }
    }

    /// Storage location for `name`, or [`Error::UnknownCollection`].
    pub fn resolve(&self, name: &str) -> Result<&Path> {
        let collection = name.parse::<CollectionName>()?;
        Ok(self.location(collection))
    }

    /// Storage location for an already-validated collection.
    #[must_use]
    pub fn location(&self, collection: CollectionName) -> &Path {
        // every variant is inserted in `new`
        &self.locations[&collection]
    }

    /// Directory holding every collection file.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Recognized names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        CollectionName::ALL.into_iter().map(CollectionName::as_str)
    }

    /// Create the data directory and an empty-object file for every collection
    /// that has none. Safe to run any number of times; populated files are
    /// left alone.
    pub fn init<S>(&self, serializer: &S) -> Result<()>
    where
        S: Serializer,
    {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| {
            Error::Config(format!("cannot create {}: {e}", self.data_dir.display()))
        })?;
        for collection in CollectionName::ALL {
            let path = self.location(collection);
            if ensure_file(path, serializer)? {
                info!(%collection, path = %path.display(), "created empty collection file");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_recognized_name() {
        for c in CollectionName::ALL {
            assert_eq!(c.as_str().parse::<CollectionName>().unwrap(), c);
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(
            "Units".parse::<CollectionName>(),
            Err(Error::UnknownCollection("Units".into()))
        );
    }

    #[test]
    fn resolve_maps_into_data_dir() {
        let reg = Registry::new("/srv/data");
        assert_eq!(reg.resolve("ammo").unwrap(), Path::new("/srv/data/ammo.json"));
        assert!(matches!(reg.resolve("spells"), Err(Error::UnknownCollection(n)) if n == "spells"));
        assert!(reg.resolve("").is_err());
    }

    #[test]
    fn names_in_registration_order() {
        let reg = Registry::new("data");
        let names: Vec<_> = reg.names().collect();
        assert_eq!(names, ["units", "weapons", "ammo", "factions", "groups"]);
    }
}
