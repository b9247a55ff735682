//! Voice platform adapter, intent routing and spoken texts for the StockLoop
//! skill.

pub mod adapter;
pub mod envelope;
pub mod intents;
pub mod speech;

pub use adapter::{EventContext, HandlerResult, PlatformAdapter, SkillHandler};
pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use intents::{IntentKind, IntentRouter};

use stockloop_core::config::AppConfig;
use stockloop_core::{MetricDictionary, QuoteService, Resolver};

/// Fully wired skill: configured directory, built-in metrics and the given
/// quote service behind an application-id check.
pub fn build_skill<S>(config: &AppConfig, quotes: S) -> PlatformAdapter<IntentRouter<S>>
where
    S: QuoteService + 'static,
{
    let resolver = Resolver::new(config.company_directory(), MetricDictionary::default());
    PlatformAdapter::new(IntentRouter::new(resolver, quotes))
        .with_application_id(config.skill.application_id.clone())
}
