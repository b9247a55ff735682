use std::collections::BTreeMap;

use async_trait::async_trait;
use stockloop_core::{QuoteRequest, QuoteService, QuoteServiceError, Snapshot};

/// In-memory quote service keyed by uppercase ticker.
#[derive(Clone, Debug, Default)]
pub struct StaticQuoteService {
    snapshots: BTreeMap<String, Snapshot>,
}

impl StaticQuoteService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, symbol: &str, snapshot: Snapshot) -> Self {
        self.snapshots.insert(symbol.to_ascii_uppercase(), snapshot);
        self
    }

    /// Canned snapshots for the tickers in the default company directory.
    pub fn sample() -> Self {
        Self::new()
            .with_snapshot(
                "ZNGA",
                Snapshot::new()
                    .with("symbol", "ZNGA")
                    .with("name", "Zynga Inc.")
                    .with("peRatio", "3.50")
                    .with("dividendYield", "0.00")
                    .with("lastTradePriceOnly", "2.51")
                    .with("lastTradeDate", "5/13/2016"),
            )
            .with_snapshot(
                "APPL",
                Snapshot::new()
                    .with("symbol", "APPL")
                    .with("name", "Apple Inc.")
                    .with("peRatio", "10.84")
                    .with("dividendYield", "2.47")
                    .with("lastTradePriceOnly", "90.52")
                    .with("lastTradeDate", "5/13/2016"),
            )
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.snapshots.keys().map(String::as_str)
    }
}

#[async_trait]
impl QuoteService for StaticQuoteService {
    async fn snapshot(&self, request: &QuoteRequest) -> Result<Snapshot, QuoteServiceError> {
        self.snapshots.get(&request.symbol.to_ascii_uppercase()).cloned().ok_or_else(|| {
            QuoteServiceError::Provider(format!("No quote found for symbol {}", request.symbol))
        })
    }
}

#[cfg(test)]
mod tests {
    use stockloop_core::{QuoteRequest, QuoteService, QuoteServiceError};

    use super::StaticQuoteService;

    fn request(symbol: &str) -> QuoteRequest {
        QuoteRequest { symbol: symbol.to_owned(), fields: vec!["s".to_owned(), "n".to_owned()] }
    }

    #[tokio::test]
    async fn sample_answers_directory_tickers() {
        let service = StaticQuoteService::sample();

        let zynga = service.snapshot(&request("ZNGA")).await.expect("zynga");
        let apple = service.snapshot(&request("appl")).await.expect("apple");

        assert_eq!(zynga.text("peRatio").as_deref(), Some("3.50"));
        assert_eq!(apple.name().as_deref(), Some("Apple Inc."));
        assert_eq!(service.symbols().collect::<Vec<_>>(), vec!["APPL", "ZNGA"]);
    }

    #[tokio::test]
    async fn unknown_symbol_is_a_provider_error() {
        let error = StaticQuoteService::sample()
            .snapshot(&request("ACME"))
            .await
            .expect_err("unknown symbol");

        assert_eq!(
            error,
            QuoteServiceError::Provider("No quote found for symbol ACME".to_owned())
        );
    }
}
