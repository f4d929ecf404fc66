mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use anyhow::Result;

use crate::models::UserProfile;

/// Persistence collaborator for the user document.
///
/// The core hands over the complete in-memory object graph as one snapshot;
/// merging is the collaborator's problem (last write wins at the document
/// level). There are no partial updates.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Loads the stored profile, or `None` when nothing has been saved yet.
    async fn load_profile(&self) -> Result<Option<UserProfile>>;

    /// Durably replaces the stored profile with this snapshot.
    async fn save_profile(&self, profile: &UserProfile) -> Result<()>;
}
