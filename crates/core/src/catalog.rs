//! Static lookup tables used by the resolver.
//!
//! Both tables are built once at startup and only read afterwards.

use std::collections::BTreeMap;

pub const SYMBOL_FIELD: &str = "s";
pub const NAME_FIELD: &str = "n";
pub const NAME_METRIC: &str = "name";
pub const SYMBOL_PROPERTY: &str = "symbol";

/// Lower-case company name to ticker symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanyDirectory {
    entries: BTreeMap<String, String>,
}

impl CompanyDirectory {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, symbol)| {
                (name.as_ref().trim().to_lowercase(), symbol.as_ref().trim().to_lowercase())
            })
            .filter(|(name, symbol)| !name.is_empty() && !symbol.is_empty())
            .collect();
        Self { entries }
    }

    /// Returns a copy of this directory with `extra` entries layered on top.
    pub fn extended<I, K, V>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut merged = self.entries.clone();
        merged.extend(Self::new(extra).entries);
        Self { entries: merged }
    }

    pub fn lookup(&self, company: &str) -> Option<&str> {
        self.entries.get(&company.trim().to_lowercase()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, symbol)| (name.as_str(), symbol.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CompanyDirectory {
    fn default() -> Self {
        Self::new([("apple", "appl"), ("zynga", "znga")])
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricDefinition {
    pub key: String,
    pub field_code: String,
    pub phrase: String,
}

impl MetricDefinition {
    pub fn new(key: &str, field_code: &str, phrase: &str) -> Self {
        Self { key: key.to_owned(), field_code: field_code.to_owned(), phrase: phrase.to_owned() }
    }
}

/// Loose user wording mapped onto a canonical metric key when `needle`
/// occurs anywhere in the phrase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhraseRule {
    pub needle: String,
    pub metric_key: String,
}

impl PhraseRule {
    pub fn new(needle: &str, metric_key: &str) -> Self {
        Self { needle: needle.to_owned(), metric_key: metric_key.to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricDictionary {
    metrics: Vec<MetricDefinition>,
    phrase_rules: Vec<PhraseRule>,
}

impl MetricDictionary {
    pub fn new(metrics: Vec<MetricDefinition>, phrase_rules: Vec<PhraseRule>) -> Self {
        Self { metrics, phrase_rules }
    }

    pub fn get(&self, key: &str) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|metric| metric.key == key)
    }

    pub fn field_code(&self, key: &str) -> Option<&str> {
        self.get(key).map(|metric| metric.field_code.as_str())
    }

    pub fn metrics(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    /// Maps a lower-cased phrase to a canonical key candidate. Rules are
    /// tried in order and the first match wins; anything else is
    /// camel-cased verbatim. The result is not checked against the table.
    pub fn classify(&self, phrase: &str) -> String {
        self.phrase_rules
            .iter()
            .find(|rule| phrase.contains(rule.needle.as_str()))
            .map(|rule| rule.metric_key.clone())
            .unwrap_or_else(|| to_camel_case(phrase))
    }

    /// Provider field codes to request for `key`: symbol echo and name
    /// always, then the metric's own field unless it is the name field.
    pub fn quote_fields(&self, key: &str) -> Option<Vec<String>> {
        let code = self.field_code(key)?;
        let mut fields = vec![SYMBOL_FIELD.to_owned(), NAME_FIELD.to_owned()];
        if code != NAME_FIELD {
            fields.push(code.to_owned());
        }
        Some(fields)
    }
}

impl Default for MetricDictionary {
    fn default() -> Self {
        Self::new(
            vec![
                MetricDefinition::new(NAME_METRIC, NAME_FIELD, "name"),
                MetricDefinition::new("lastTradeDate", "d1", "last trade date"),
                MetricDefinition::new("dividendYield", "y", "dividend yield"),
                MetricDefinition::new("peRatio", "p", "pe ratio"),
                MetricDefinition::new("lastTradePriceOnly", "l1", "last trade price"),
            ],
            vec![
                PhraseRule::new("price", "lastTradePriceOnly"),
                PhraseRule::new("ratio", "peRatio"),
                PhraseRule::new("dividend", "dividendYield"),
                PhraseRule::new("company", NAME_METRIC),
            ],
        )
    }
}

pub fn to_camel_case(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    for (index, word) in phrase.split_whitespace().enumerate() {
        let word = word.to_lowercase();
        if index == 0 {
            out.push_str(&word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
