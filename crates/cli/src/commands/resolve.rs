use stockloop_core::config::{AppConfig, LoadOptions};
use stockloop_core::{MetricDictionary, Resolver};

use super::{intent_from_slots, CommandResult};

const COMMAND: &str = "resolve";
const INTENT: &str = "CompanyMetricIntent";

pub fn run(slots: &[String]) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "config_validation", error.to_string(), 2)
        }
    };

    let intent = match intent_from_slots(INTENT, slots) {
        Ok(intent) => intent,
        Err(message) => return CommandResult::failure(COMMAND, "invalid_slot", message, 2),
    };

    let resolver = Resolver::new(config.company_directory(), MetricDictionary::default());
    match resolver.resolve(&intent) {
        Ok(query) => CommandResult::document(COMMAND, &query),
        Err(error) => {
            let error_class =
                if error.is_unresolved_symbol() { "unresolved_symbol" } else { "unresolved_metric" };
            CommandResult::failure(COMMAND, error_class, error.to_string(), 3)
        }
    }
}
