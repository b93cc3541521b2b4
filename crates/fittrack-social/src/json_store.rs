//! JSON-file friend store.
//!
//! Both lists live in one file so a save is a single write-then-rename.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::store::{FriendStore, FriendStoreError, FriendStoreResult};
use crate::types::Person;

#[derive(Debug, Default, Serialize, Deserialize)]
struct FriendsFile {
    #[serde(default)]
    friends: Vec<Person>,
    #[serde(default)]
    requests: Vec<Person>,
}

#[derive(Debug, Clone)]
pub struct JsonFileFriendStore {
    path: PathBuf,
}

impl JsonFileFriendStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> FriendStoreResult<Option<FriendsFile>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            FriendStoreError::storage(format!("read {}: {}", self.path.display(), e))
        })?;

        let file = serde_json::from_str(&contents).map_err(|e| {
            FriendStoreError::storage(format!("parse {}: {}", self.path.display(), e))
        })?;

        Ok(Some(file))
    }
}

impl FriendStore for JsonFileFriendStore {
    fn load_friends(&self) -> FriendStoreResult<Option<Vec<Person>>> {
        Ok(self.read()?.map(|f| f.friends))
    }

    fn load_requests(&self) -> FriendStoreResult<Option<Vec<Person>>> {
        Ok(self.read()?.map(|f| f.requests))
    }

    fn save(&self, friends: &[Person], requests: &[Person]) -> FriendStoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| FriendStoreError::storage(format!("create {}: {}", parent.display(), e)))?;
        }

        let file = FriendsFile {
            friends: friends.to_vec(),
            requests: requests.to_vec(),
        };
        let contents = serde_json::to_string_pretty(&file)
            .map_err(|e| FriendStoreError::storage(format!("serialize: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .map_err(|e| FriendStoreError::storage(format!("write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            FriendStoreError::storage(format!("rename to {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(
            "Saved {} friends and {} requests to {}",
            friends.len(),
            requests.len(),
            self.path.display()
        );
        Ok(())
    }
}
