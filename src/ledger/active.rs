//! Resolves "the" portfolio the rest of the application operates on.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Portfolio, UserProfile};

/// What to do when the persisted active-portfolio pointer does not resolve.
///
/// `Strict` (the default) writes the corrected pointer back into the profile
/// so subsequent reads agree with what was returned. `Lazy` recomputes the
/// fallback on every call and leaves the stored pointer untouched. A call
/// path must use one policy throughout, never a mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    #[default]
    Strict,
    Lazy,
}

/// Returns the active portfolio, falling back safely when state is off.
///
/// - No portfolios at all: a synthetic placeholder (id "0") is returned.
///   It is non-persistable; writes against it must be rejected upstream.
/// - Dangling or absent pointer (deleted portfolio, corrupted state, first
///   load): the first portfolio in list order is used. Under `Strict` the
///   pointer is corrected in the profile; the caller is expected to persist
///   the profile afterwards.
pub fn resolve_active(profile: &mut UserProfile, policy: FallbackPolicy) -> Cow<'_, Portfolio> {
    if profile.portfolios.is_empty() {
        return Cow::Owned(Portfolio::placeholder());
    }

    let pointer_resolves = profile
        .active_portfolio_id
        .as_ref()
        .map(|id| profile.portfolios.iter().any(|p| &p.id == id))
        .unwrap_or(false);

    if !pointer_resolves {
        let first_id = profile.portfolios[0].id.clone();
        debug!(fallback_to = %first_id, ?policy, "active portfolio pointer did not resolve");
        if policy == FallbackPolicy::Strict {
            profile.active_portfolio_id = Some(first_id);
        }
        return Cow::Borrowed(&profile.portfolios[0]);
    }

    let id = profile
        .active_portfolio_id
        .clone()
        .expect("pointer checked above");
    Cow::Borrowed(profile.portfolio(&id).expect("pointer checked above"))
}
