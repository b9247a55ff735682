//! StockLoop core: slot normalization, quote-service contract and
//! configuration shared by the skill adapter, the server and the CLI.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod quotes;
pub mod resolver;
pub mod session;

pub use catalog::{CompanyDirectory, MetricDefinition, MetricDictionary, PhraseRule};
pub use domain::intent::{IntentRequest, Slot};
pub use domain::query::ResolvedQuery;
pub use domain::speech::{SpeechResponse, SpeechType};
pub use errors::{InterfaceError, QuoteServiceError, ResolutionError, SkillError};
pub use quotes::{QuoteRequest, QuoteService, Snapshot};
pub use resolver::Resolver;
pub use session::{SessionEvent, SessionPhase, SessionTransition};
