use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::Value;
use stockloop_core::config::QuoteServiceConfig;
use stockloop_core::{QuoteRequest, QuoteService, QuoteServiceError, Snapshot};
use thiserror::Error;
use tracing::{debug, warn};

pub const API_KEY_HEADER: &str = "x-api-key";
const SNAPSHOT_PATH: &str = "snapshot";
const ERROR_PROPERTY: &str = "error";

#[derive(Debug, Error)]
pub enum QuoteClientError {
    #[error("quotes.api_key is not a valid header value")]
    InvalidApiKey,
    #[error("failed to build quote http client: {0}")]
    Build(#[from] reqwest::Error),
}

/// `QuoteService` backed by `GET {base_url}/snapshot?symbol=..&fields=..`.
#[derive(Clone, Debug)]
pub struct HttpQuoteService {
    client: Client,
    snapshot_url: String,
    timeout_secs: u64,
}

impl HttpQuoteService {
    pub fn new(config: &QuoteServiceConfig) -> Result<Self, QuoteClientError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let mut value = HeaderValue::from_str(api_key.expose_secret())
                .map_err(|_| QuoteClientError::InvalidApiKey)?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            snapshot_url: format!("{}/{SNAPSHOT_PATH}", config.base_url.trim_end_matches('/')),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn snapshot_url(&self) -> &str {
        &self.snapshot_url
    }

    fn transport_error(&self, error: reqwest::Error) -> QuoteServiceError {
        if error.is_timeout() {
            QuoteServiceError::Timeout { secs: self.timeout_secs }
        } else {
            QuoteServiceError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl QuoteService for HttpQuoteService {
    async fn snapshot(&self, request: &QuoteRequest) -> Result<Snapshot, QuoteServiceError> {
        debug!(
            event_name = "quotes.snapshot.requested",
            symbol = %request.symbol,
            fields = %request.fields.join(","),
            "requesting quote snapshot"
        );

        let fields = request.fields.join(",");
        let result = async {
            let response = self
                .client
                .get(&self.snapshot_url)
                .query(&[("symbol", request.symbol.as_str()), ("fields", fields.as_str())])
                .send()
                .await
                .map_err(|error| self.transport_error(error))?;

            if !response.status().is_success() {
                return Err(QuoteServiceError::Status { status: response.status().as_u16() });
            }

            let payload: Value = response.json().await.map_err(|error| {
                if error.is_timeout() {
                    QuoteServiceError::Timeout { secs: self.timeout_secs }
                } else {
                    QuoteServiceError::Decode(error.to_string())
                }
            })?;
            decode_snapshot(payload)
        }
        .await;

        if let Err(error) = &result {
            warn!(
                event_name = "quotes.snapshot.failed",
                symbol = %request.symbol,
                error = %error,
                "quote snapshot request failed"
            );
        }
        result
    }
}

fn decode_snapshot(payload: Value) -> Result<Snapshot, QuoteServiceError> {
    let Value::Object(properties) = payload else {
        return Err(QuoteServiceError::Decode("expected a JSON object".to_owned()));
    };

    if let Some(message) = properties.get(ERROR_PROPERTY) {
        let message = match message {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        return Err(QuoteServiceError::Provider(message));
    }

    Ok(Snapshot::from(properties.into_iter().collect::<BTreeMap<_, _>>()))
}
