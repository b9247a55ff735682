use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{NAME_METRIC, SYMBOL_PROPERTY};
use crate::errors::QuoteServiceError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub symbol: String,
    pub fields: Vec<String>,
}

/// Flat record returned by the quote service, keyed by property name
/// (`symbol`, `name`, and canonical metric keys).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    properties: BTreeMap<String, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Textual rendering of a property; `null` and nested values count as
    /// missing.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    pub fn symbol(&self) -> Option<String> {
        self.text(SYMBOL_PROPERTY)
    }

    pub fn name(&self) -> Option<String> {
        self.text(NAME_METRIC)
    }
}

impl From<BTreeMap<String, Value>> for Snapshot {
    fn from(properties: BTreeMap<String, Value>) -> Self {
        Self { properties }
    }
}

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn snapshot(&self, request: &QuoteRequest) -> Result<Snapshot, QuoteServiceError>;
}

#[async_trait]
impl<T> QuoteService for Arc<T>
where
    T: QuoteService + ?Sized,
{
    async fn snapshot(&self, request: &QuoteRequest) -> Result<Snapshot, QuoteServiceError> {
        (**self).snapshot(request).await
    }
}
