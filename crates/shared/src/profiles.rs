use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

use crate::models::UserProfile;

#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("profile store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Flat JSON file mapping session ids to user profiles.
///
/// Read-modify-write cycles within one process are serialized; writes go to
/// a sibling temp file that is renamed over the store.
#[derive(Clone)]
pub struct ProfileStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl ProfileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub async fn load_profile(
        &self,
        session_id: &str,
    ) -> Result<Option<UserProfile>, ProfileStoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(session_id))
    }

    pub async fn save_profile(
        &self,
        session_id: &str,
        profile: &UserProfile,
    ) -> Result<(), ProfileStoreError> {
        let _guard = self.lock.lock().await;
        let mut profiles = self.read_all().await?;
        profiles.insert(session_id.to_string(), profile.clone());
        self.write_all(&profiles).await
    }

    /// Returns the session's profile, creating and persisting an empty one
    /// first when none exists.
    pub async fn load_or_create_profile(
        &self,
        session_id: &str,
    ) -> Result<UserProfile, ProfileStoreError> {
        self.update_profile(session_id, |profile| profile.clone())
            .await
    }

    /// Applies `apply` to the session's profile (created when missing) and
    /// persists the result atomically with respect to other store calls.
    pub async fn update_profile<F, T>(
        &self,
        session_id: &str,
        apply: F,
    ) -> Result<T, ProfileStoreError>
    where
        F: FnOnce(&mut UserProfile) -> T,
    {
        let _guard = self.lock.lock().await;
        let mut profiles = self.read_all().await?;
        let profile = profiles
            .entry(session_id.to_string())
            .or_insert_with(|| UserProfile::new(Local::now()));
        let output = apply(profile);
        self.write_all(&profiles).await?;
        Ok(output)
    }

    /// Checks that the directory holding the store is reachable.
    pub async fn ping(&self) -> Result<(), ProfileStoreError> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        tokio::fs::metadata(directory).await?;
        Ok(())
    }

    async fn read_all(&self) -> Result<BTreeMap<String, UserProfile>, ProfileStoreError> {
        let bytes = match tokio::fs::read(self.path.as_path()).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(profiles) => Ok(profiles),
            Err(err) => {
                warn!(path = %self.path.display(), "profile store is unreadable: {err}");
                let backup = self.quarantine().await.map_err(|rename_err| {
                    warn!(
                        path = %self.path.display(),
                        "unreadable profile store could not be moved aside: {rename_err}"
                    );
                    ProfileStoreError::Serialization(err)
                })?;
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "moved unreadable profile store aside, starting empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    // Renames an undecodable store so the next write cannot clobber it.
    async fn quarantine(&self) -> Result<PathBuf, std::io::Error> {
        let mut backup = self.path.as_os_str().to_owned();
        backup.push(format!(".corrupt-{}", Local::now().format("%Y%m%d%H%M%S%3f")));
        let backup = PathBuf::from(backup);

        tokio::fs::rename(self.path.as_path(), &backup).await?;
        Ok(backup)
    }

    async fn write_all(
        &self,
        profiles: &BTreeMap<String, UserProfile>,
    ) -> Result<(), ProfileStoreError> {
        let bytes = serde_json::to_vec_pretty(profiles)?;
        let mut temp_path = self.path.as_os_str().to_owned();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        tokio::fs::write(&temp_path, bytes).await?;
        tokio::fs::rename(&temp_path, self.path.as_path()).await?;
        Ok(())
    }
}
