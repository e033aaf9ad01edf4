use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{LocalCache, RemoteStore, StoreError};

const APP_DIR: &str = "fusuma";

fn file_name(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.json", stem)
}

fn default_dir(base: Option<PathBuf>, what: &str) -> Result<PathBuf, StoreError> {
    base.map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| StoreError::Unavailable(format!("no {} directory for this user", what)))
}

/// Local cache backed by one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<user cache dir>/fusuma`
    pub fn in_default_location() -> Result<Self, StoreError> {
        Ok(Self::new(default_dir(dirs::cache_dir(), "cache")?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(file_name(key))
    }
}

impl LocalCache for FileCache {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        // Atomic replace
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, blob)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Remote store stand-in backed by a directory, e.g. one kept in sync by a
/// file-sync service.
#[derive(Debug, Clone)]
pub struct FileRemote {
    dir: PathBuf,
}

impl FileRemote {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<user data dir>/fusuma`
    pub fn in_default_location() -> Result<Self, StoreError> {
        Ok(Self::new(default_dir(dirs::data_dir(), "data")?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(file_name(key))
    }
}

#[async_trait]
impl RemoteStore for FileRemote {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, blob: String) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, blob).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
