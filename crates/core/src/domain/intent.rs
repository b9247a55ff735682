use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const SYMBOL_SLOT: &str = "Symbol";
pub const METRIC_SLOT: &str = "Metric";
pub const COMPANY_SLOT: &str = "Company";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// An utterance classified by the voice platform, with its named slots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRequest {
    pub name: String,
    #[serde(default)]
    pub slots: BTreeMap<String, Slot>,
}

impl IntentRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), slots: BTreeMap::new() }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.slots.insert(name.clone(), Slot { name, value: Some(value.into()) });
        self
    }

    pub fn with_empty_slot(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.slots.insert(name.clone(), Slot { name, value: None });
        self
    }

    /// Returns the trimmed slot value, treating empty values like absent ones.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .and_then(|slot| slot.value.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}
