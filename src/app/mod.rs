//! Application entry points: load the profile, mutate through the model
//! layer, save, and report JSON results for the CLI or other front-ends.
//!
//! Callers serialize their own mutations (one import or trade entry in
//! flight per portfolio); nothing here defends against interleaved commits.

mod import;
mod mutations;
mod view;

pub use import::{commit_spreadsheet_import, preview_spreadsheet_import};
pub use mutations::{
    add_holding, add_portfolio, delete_holding, record_dividend, record_trade, set_price,
    update_quotes,
};
pub use view::{holdings_view, metrics_view};

use anyhow::Result;

use crate::ledger::{resolve_active, FallbackPolicy};
use crate::models::{Id, UserProfile};
use crate::storage::Storage;

/// Resolves the active portfolio id, or `None` when only the placeholder
/// exists. Under the strict policy a corrected pointer is persisted
/// immediately so later reads agree.
pub(crate) async fn active_id(
    storage: &dyn Storage,
    profile: &mut UserProfile,
    policy: FallbackPolicy,
) -> Result<Option<Id>> {
    let before = profile.active_portfolio_id.clone();
    let active = resolve_active(profile, policy);
    if active.is_placeholder() {
        return Ok(None);
    }
    let id = active.id.clone();
    if policy == FallbackPolicy::Strict && before.as_ref() != Some(&id) {
        storage.save_profile(profile).await?;
    }
    Ok(Some(id))
}

pub(crate) async fn load_profile(storage: &dyn Storage) -> Result<UserProfile> {
    Ok(storage.load_profile().await?.unwrap_or_default())
}
