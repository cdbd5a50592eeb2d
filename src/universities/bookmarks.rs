use anyhow::Result;

use crate::workspace::{read_json, write_json, KeyValueStore};

/// Ordered, de-duplicated bookmarks for one identity (or the guest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkStore {
    key: String,
    ids: Vec<String>,
}

impl BookmarkStore {
    pub fn storage_key(owner: Option<&str>) -> String {
        format!("bookmarks:{}", owner.unwrap_or("guest"))
    }

    pub fn empty(owner: Option<&str>) -> Self {
        Self {
            key: Self::storage_key(owner),
            ids: Vec::new(),
        }
    }

    pub fn load(store: &dyn KeyValueStore, owner: Option<&str>) -> Result<Self> {
        let key = Self::storage_key(owner);
        let ids = read_json(store, &key)?.unwrap_or_default();
        Ok(Self { key, ids })
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        write_json(store, &self.key, &self.ids)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Returns false when already bookmarked.
    pub fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    /// Returns whether the university is bookmarked afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.add(id)
        }
    }

    pub fn list(&self) -> &[String] {
        &self.ids
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
