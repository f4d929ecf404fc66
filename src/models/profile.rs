use serde::{Deserialize, Serialize};

use super::{Id, Portfolio};

/// The full user document handed to the persistence collaborator.
///
/// Stored and merged as one snapshot (last write wins at the document level);
/// the core never performs partial updates against storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub portfolios: Vec<Portfolio>,
    /// Pointer to the portfolio the UI currently operates on. May be stale
    /// after a delete or on first load; see `ledger::active`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_portfolio_id: Option<Id>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn portfolio(&self, id: &Id) -> Option<&Portfolio> {
        self.portfolios.iter().find(|p| &p.id == id)
    }

    pub fn portfolio_mut(&mut self, id: &Id) -> Option<&mut Portfolio> {
        self.portfolios.iter_mut().find(|p| &p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_round_trips_through_json() {
        let mut profile = UserProfile::new();
        let portfolio = Portfolio::new("Retirement");
        let id = portfolio.id.clone();
        profile.portfolios.push(portfolio);
        profile.active_portfolio_id = Some(id.clone());

        let json = serde_json::to_string(&profile).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.portfolios.len(), 1);
        assert_eq!(back.active_portfolio_id, Some(id));
    }

    #[test]
    fn missing_active_pointer_deserializes_as_none() {
        let back: UserProfile = serde_json::from_str(r#"{"portfolios":[]}"#).unwrap();
        assert!(back.active_portfolio_id.is_none());
    }
}
