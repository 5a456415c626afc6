//! Browsable view of one vault folder
//!
//! `import my_frames` binds a `DynamicVault` instead of loading everything:
//! members are listed on demand and loaded (then cached) on first access.
//! Sub-folders come back as child views sharing the same storage.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use vault_core::{Binding, Function, Object, Result, Storage, Value};

/// Lazily loaded folder of a vault
pub struct DynamicVault {
    storage: Arc<dyn Storage>,
    folder: String,
    cache: Mutex<BTreeMap<String, Value>>,
    importers: Mutex<BTreeMap<String, Function>>,
}

impl DynamicVault {
    /// View `folder` (slash-separated, no trailing slash) of `storage`
    pub fn new(storage: Arc<dyn Storage>, folder: impl Into<String>) -> Self {
        Self {
            storage,
            folder: folder.into(),
            cache: Mutex::new(BTreeMap::new()),
            importers: Mutex::new(BTreeMap::new()),
        }
    }

    /// Folder this view is rooted at
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Immediate children: stored objects and sub-folders, sorted
    pub fn list_children(&self) -> Result<Vec<String>> {
        let members = self.storage.list_members(Some(&self.folder))?;
        let children: BTreeSet<String> = members
            .iter()
            .filter_map(|member| member.split('/').next())
            .filter(|child| !child.is_empty())
            .map(str::to_string)
            .collect();
        Ok(children.into_iter().collect())
    }

    /// Fetch a child: a loaded value or a sub-folder view
    ///
    /// Values are cached until `clear_cache`. Returns `None` if there is no
    /// such child.
    pub fn get(&self, name: &str) -> Result<Option<Binding>> {
        if let Some(value) = self.cache.lock().get(name) {
            return Ok(Some(Binding::Value(value.clone())));
        }

        let path = format!("{}/{}", self.folder, name);
        if self.storage.contains(&path)? {
            let importer = self.importers.lock().get(name).cloned();
            let loaded = self.storage.load(&path, importer.as_ref())?;
            debug!(path = %path, "Loaded member into dynamic vault cache");
            self.cache
                .lock()
                .insert(name.to_string(), loaded.value.clone());
            return Ok(Some(Binding::Value(loaded.value)));
        }

        let prefix = format!("{}/", name);
        let is_folder = self
            .storage
            .list_members(Some(&self.folder))?
            .iter()
            .any(|member| member.starts_with(&prefix));
        if is_folder {
            let child = DynamicVault::new(Arc::clone(&self.storage), path);
            return Ok(Some(Binding::Object(Arc::new(child))));
        }
        Ok(None)
    }

    /// Choose importers for specific members (by child name)
    ///
    /// Replaces any previous selection; cached values are kept.
    pub fn set_importers(&self, importers: BTreeMap<String, Function>) {
        *self.importers.lock() = importers;
    }

    /// Forget every loaded value
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    #[cfg(test)]
    fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

impl Object for DynamicVault {
    fn type_name(&self) -> &str {
        "vault folder"
    }

    fn attribute_names(&self) -> Result<Vec<String>> {
        self.list_children()
    }

    fn attribute(&self, name: &str) -> Result<Option<Binding>> {
        self.get(name)
    }
}
