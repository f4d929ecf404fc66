mod holding;
mod id;
mod portfolio;
mod profile;
mod transaction;

pub use holding::{AssetType, Holding};
pub use id::{FixedIdGenerator, Id, IdGenerator, UuidIdGenerator};
pub use portfolio::{LedgerError, Portfolio};
pub use profile::UserProfile;
pub use transaction::{TradeDate, TradeKind, Transaction};
