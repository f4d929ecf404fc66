//! Quote feed collaborators. The core only ever consumes `current_price`
//! updates; it never fetches on its own behalf.

mod proxy;
mod refresh;

pub use proxy::ProxyQuoteSource;
pub use refresh::refresh_prices;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price observation for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub price: Decimal,
}

/// On-demand per-symbol price supplier.
///
/// `Ok(None)` means the feed had nothing for the symbol, which is not an
/// error; the holding keeps its previous price.
#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quote(&self, symbol: &str) -> Result<Option<Quote>>;
}

/// Fixed quotes for tests.
#[derive(Debug, Default)]
pub struct FixedQuoteSource {
    quotes: std::collections::HashMap<String, Quote>,
}

impl FixedQuoteSource {
    pub fn new(quotes: impl IntoIterator<Item = (String, Decimal)>) -> Self {
        Self {
            quotes: quotes
                .into_iter()
                .map(|(symbol, price)| (symbol.to_uppercase(), Quote { price }))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl QuoteSource for FixedQuoteSource {
    async fn fetch_quote(&self, symbol: &str) -> Result<Option<Quote>> {
        Ok(self.quotes.get(&symbol.to_uppercase()).copied())
    }
}
