use serde::{Deserialize, Serialize};

use crate::quotes::QuoteRequest;

/// Canonical quote-service query derived from one intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQuery {
    pub symbol: String,
    pub canonical_metric: String,
    pub metric_phrase: String,
    pub quote_fields: Vec<String>,
}

impl ResolvedQuery {
    pub fn quote_request(&self) -> QuoteRequest {
        QuoteRequest { symbol: self.symbol.clone(), fields: self.quote_fields.clone() }
    }
}
