//! Deterministic on-disk storage for captured responses.
//!
//! Fixtures live at `<root>/<namespace>/<action>/<identifier>.json`. The
//! directory tree is the only index: there is no manifest, and re-saving a
//! key overwrites the previous file with byte-identical content for
//! identical inputs.

use fixturist_proto::{Error, Method, Params, Response, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File extension of every fixture file.
const FIXTURE_EXTENSION: &str = "json";

/// The identity of a fixture: handler namespace, action and scenario identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FixtureKey {
    /// Handler namespace, `/`-separated (e.g. `app/api/v1/users`).
    pub namespace: String,

    /// Handler action.
    pub action: String,

    /// Scenario identifier.
    pub identifier: String,
}

impl FixtureKey {
    /// Creates a key, rejecting segments that would escape or collapse the tree.
    pub fn new(
        namespace: impl Into<String>,
        action: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Result<Self> {
        let key = Self {
            namespace: namespace.into(),
            action: action.into(),
            identifier: identifier.into(),
        };

        for segment in key.namespace.split('/') {
            check_segment("namespace", segment)?;
        }
        check_segment("action", &key.action)?;
        check_segment("identifier", &key.identifier)?;

        Ok(key)
    }

    /// Parses the `namespace/action/identifier` form.
    pub fn parse(key: &str) -> Result<Self> {
        let trimmed = key.trim_matches('/');
        let trimmed = trimmed
            .strip_suffix(".json")
            .unwrap_or(trimmed);

        let mut parts = trimmed.rsplitn(3, '/');
        let identifier = parts.next().unwrap_or_default();
        let action = parts.next().unwrap_or_default();
        let namespace = parts.next().unwrap_or_default();
        Self::new(namespace, action, identifier)
    }

    /// Returns the path of this fixture relative to the store root.
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.namespace.split('/').collect();
        path.push(&self.action);
        path.push(format!("{}.{FIXTURE_EXTENSION}", self.identifier));
        path
    }
}

impl fmt::Display for FixtureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.action, self.identifier)
    }
}

fn check_segment(field: &'static str, segment: &str) -> Result<()> {
    let invalid = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\'])
        || segment.contains('\0');
    if invalid {
        return Err(Error::InvalidFixtureKey {
            field,
            segment: segment.to_string(),
        });
    }
    Ok(())
}

/// A persisted snapshot of one scenario's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
    /// Where the fixture lives.
    #[serde(flatten)]
    pub key: FixtureKey,

    /// Request method the handler was invoked with.
    pub method: Method,

    /// Params the scenario supplied (not those added by setups).
    #[serde(default)]
    pub params: Params,

    /// The captured response.
    pub response: Response,
}

impl FixtureRecord {
    /// Serializes the record exactly as it is written to disk.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Reads and writes fixtures under a root directory.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
}

impl FixtureStore {
    /// Creates a store rooted at `root`. Nothing is created until a save.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the absolute location of a key.
    pub fn path_for(&self, key: &FixtureKey) -> PathBuf {
        self.root.join(key.relative_path())
    }

    /// Writes a fixture, creating directories and overwriting any previous file.
    pub fn save(&self, record: &FixtureRecord) -> Result<PathBuf> {
        let path = self.path_for(&record.key);
        let bytes = record.to_bytes().map_err(|e| Error::FixtureWrite {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| Error::FixtureWrite {
                path: path.clone(),
                source,
            })?;
        }
        std::fs::write(&path, &bytes).map_err(|source| Error::FixtureWrite {
            path: path.clone(),
            source,
        })?;

        info!(key = %record.key, bytes = bytes.len(), "Fixture saved");
        Ok(path)
    }

    /// Reads a fixture back.
    pub fn load(&self, key: &FixtureKey) -> Result<FixtureRecord> {
        let path = self.path_for(key);
        let content = std::fs::read(&path).map_err(|source| Error::FixtureRead {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&content).map_err(|source| Error::FixtureDecode { path, source })
    }

    /// Returns true if a fixture exists for the key.
    pub fn exists(&self, key: &FixtureKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Lists every fixture key under the root, sorted.
    ///
    /// A missing root is an empty store.
    pub fn list(&self) -> Result<Vec<FixtureKey>> {
        let mut keys = Vec::new();
        if self.root.exists() {
            self.collect(&self.root, &mut keys)?;
        }
        keys.sort();
        debug!(root = %self.root.display(), count = keys.len(), "Listed fixtures");
        Ok(keys)
    }

    /// Lists fixture keys for one handler namespace.
    pub fn list_namespace(&self, namespace: &str) -> Result<Vec<FixtureKey>> {
        let namespace = namespace.trim_matches('/');
        Ok(self
            .list()?
            .into_iter()
            .filter(|key| key.namespace == namespace)
            .collect())
    }

    /// Deletes one fixture. Returns false if it did not exist.
    ///
    /// Directories left empty by the removal are pruned, up to but not
    /// including the root.
    pub fn remove(&self, key: &FixtureKey) -> Result<bool> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                self.prune_empty_parents(&path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(Error::FixtureWrite { path, source }),
        }
    }

    /// Deletes every fixture under the root. Returns how many were removed.
    ///
    /// Only files that decode as fixtures are touched. Anything else under
    /// the root, and the directories holding it, stays in place.
    pub fn clean(&self) -> Result<usize> {
        let removed = self.remove_fixtures(self.list()?)?;
        info!(root = %self.root.display(), removed, "Fixture tree cleaned");
        Ok(removed)
    }

    /// Deletes every fixture of one handler namespace, with the same rules
    /// as [`FixtureStore::clean`].
    pub fn clean_namespace(&self, namespace: &str) -> Result<usize> {
        let removed = self.remove_fixtures(self.list_namespace(namespace)?)?;
        info!(namespace, removed, "Fixture namespace cleaned");
        Ok(removed)
    }

    fn remove_fixtures(&self, keys: Vec<FixtureKey>) -> Result<usize> {
        let mut removed = 0;
        for key in keys {
            if let Err(e) = self.load(&key) {
                warn!(key = %key, error = %e, "Skipping file that is not a fixture");
                continue;
            }
            if self.remove(&key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    // Stops at the first directory that is not empty (or cannot be removed).
    fn prune_empty_parents(&self, path: &Path) {
        let mut dir = path.parent();
        while let Some(current) = dir {
            if current == self.root || !current.starts_with(&self.root) {
                break;
            }
            if std::fs::remove_dir(current).is_err() {
                break;
            }
            debug!(dir = %current.display(), "Removed empty fixture directory");
            dir = current.parent();
        }
    }

    fn collect(&self, dir: &Path, keys: &mut Vec<FixtureKey>) -> Result<()> {
        let read_err = |source| Error::FixtureRead {
            path: dir.to_path_buf(),
            source,
        };

        for entry in std::fs::read_dir(dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            if path.is_dir() {
                self.collect(&path, keys)?;
            } else if path.extension().is_some_and(|ext| ext == FIXTURE_EXTENSION)
                && let Some(key) = self.key_for(&path)
            {
                keys.push(key);
            }
        }
        Ok(())
    }

    fn key_for(&self, path: &Path) -> Option<FixtureKey> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        FixtureKey::parse(&parts.join("/")).ok()
    }
}
