use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use crate::models::UserProfile;

use super::Storage;

/// JSON file-backed storage.
///
/// The whole user document lives in one pretty-printed `profile.json` under
/// the data directory. Writes go through a sibling temp file and a rename;
/// readers only ever see a complete document.
pub struct JsonFileStorage {
    base_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn profile_file(&self) -> PathBuf {
        self.base_path.join("profile.json")
    }

    fn temp_file(&self) -> PathBuf {
        self.base_path.join("profile.json.tmp")
    }
}

#[async_trait::async_trait]
impl Storage for JsonFileStorage {
    async fn load_profile(&self) -> Result<Option<UserProfile>> {
        let path = self.profile_file();
        match fs::read_to_string(&path).await {
            Ok(content) => {
                let profile = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse profile from {:?}", path))?;
                Ok(Some(profile))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read profile from {:?}", path))
            }
        }
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        fs::create_dir_all(&self.base_path)
            .await
            .context("Failed to create data directory")?;

        let content =
            serde_json::to_string_pretty(profile).context("Failed to serialize profile")?;
        let temp = self.temp_file();
        fs::write(&temp, content)
            .await
            .with_context(|| format!("Failed to write {:?}", temp))?;
        fs::rename(&temp, self.profile_file())
            .await
            .context("Failed to move profile into place")?;

        debug!(path = ?self.profile_file(), portfolios = profile.portfolios.len(), "profile saved");
        Ok(())
    }
}
