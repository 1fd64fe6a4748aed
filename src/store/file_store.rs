//! Implements the `Store` trait with one JSON file per key.

use crate::error::Res;
use crate::store::Store;
use crate::utils;
use anyhow::bail;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Keeps each key in `{dir}/{key}.json`. Writes go through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates the store directory if it does not exist.
    pub async fn new(dir: impl Into<PathBuf>) -> Res<Self> {
        let dir = dir.into();
        utils::make_dir(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Res<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("Invalid store key '{key}'");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait::async_trait]
impl Store for FileStore {
    async fn get(&self, key: &str) -> Res<Option<String>> {
        let path = self.path(key)?;
        trace!("get {}", path.display());
        utils::read_if_exists(&path).await
    }

    async fn set(&self, key: &str, value: &str) -> Res<()> {
        let path = self.path(key)?;
        trace!("set {}", path.display());
        utils::write_atomic(&path, value).await
    }

    async fn remove(&self, key: &str) -> Res<()> {
        let path = self.path(key)?;
        trace!("remove {}", path.display());
        utils::remove(&path).await
    }
}
