//! In-memory storage implementation for testing.

use anyhow::Result;
use tokio::sync::Mutex;

use crate::models::UserProfile;

use super::Storage;

/// In-memory storage for testing purposes.
#[derive(Default)]
pub struct MemoryStorage {
    profile: Mutex<Option<UserProfile>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a profile, as if it had been saved earlier.
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            profile: Mutex::new(Some(profile)),
        }
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn load_profile(&self) -> Result<Option<UserProfile>> {
        let profile = self.profile.lock().await;
        Ok(profile.clone())
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let mut stored = self.profile.lock().await;
        *stored = Some(profile.clone());
        Ok(())
    }
}
