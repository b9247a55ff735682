use crate::catalog::{CompanyDirectory, MetricDictionary};
use crate::domain::intent::{IntentRequest, COMPANY_SLOT, METRIC_SLOT, SYMBOL_SLOT};
use crate::domain::query::ResolvedQuery;
use crate::errors::ResolutionError;

/// Turns loose slot values into a canonical quote query.
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    directory: CompanyDirectory,
    metrics: MetricDictionary,
}

impl Resolver {
    pub fn new(directory: CompanyDirectory, metrics: MetricDictionary) -> Self {
        Self { directory, metrics }
    }

    pub fn directory(&self) -> &CompanyDirectory {
        &self.directory
    }

    pub fn metrics(&self) -> &MetricDictionary {
        &self.metrics
    }

    pub fn resolve(&self, intent: &IntentRequest) -> Result<ResolvedQuery, ResolutionError> {
        let symbol = lowercase_slot(intent, SYMBOL_SLOT);
        let company = lowercase_slot(intent, COMPANY_SLOT);
        let metric = lowercase_slot(intent, METRIC_SLOT);

        let symbol = self.resolve_symbol(symbol, company)?;
        let phrase = metric.ok_or(ResolutionError::MetricNotProvided)?;
        let canonical_metric = self.metrics.classify(&phrase);

        let (Some(definition), Some(quote_fields)) =
            (self.metrics.get(&canonical_metric), self.metrics.quote_fields(&canonical_metric))
        else {
            return Err(ResolutionError::UnknownMetric { phrase });
        };

        Ok(ResolvedQuery {
            symbol,
            metric_phrase: definition.phrase.clone(),
            canonical_metric,
            quote_fields,
        })
    }

    fn resolve_symbol(
        &self,
        symbol: Option<String>,
        company: Option<String>,
    ) -> Result<String, ResolutionError> {
        let symbol = match (symbol, company) {
            (Some(symbol), _) => symbol,
            (None, Some(company)) => match self.directory.lookup(&company) {
                Some(symbol) => symbol.to_owned(),
                None => return Err(ResolutionError::UnknownCompany { company }),
            },
            (None, None) => return Err(ResolutionError::SymbolNotProvided),
        };

        let symbol = symbol.to_uppercase();
        if symbol.is_empty() {
            return Err(ResolutionError::SymbolNotProvided);
        }
        Ok(symbol)
    }
}

fn lowercase_slot(intent: &IntentRequest, slot: &str) -> Option<String> {
    intent.slot_value(slot).map(str::to_lowercase)
}
