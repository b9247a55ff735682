//! Spoken texts returned by the skill.

use stockloop_core::{
    QuoteServiceError, ResolutionError, ResolvedQuery, Snapshot, SpeechResponse,
};

pub const CONTINUATION_PROMPT: &str = "What else can I help with?";
pub const FAREWELL: &str = "Goodbye";
pub const MISSING_VALUE: &str = "not available";

const WELCOME: &str = "Welcome to the Stock Loop Helper. You can ask a question like, get P E Ratio for Zynga? ... Now, what can I help you with.";
const WELCOME_REPROMPT: &str = "For instructions on what you can say, please say help me.";
const EXAMPLE_QUESTION: &str = "what is the P E ratio for Zynga";

pub fn welcome_message() -> SpeechResponse {
    SpeechResponse::ask(WELCOME, WELCOME_REPROMPT)
}

pub fn help_message() -> SpeechResponse {
    SpeechResponse::ask(
        format!(
            "You can ask questions such as, {EXAMPLE_QUESTION}, or, you can say exit... Now, what can I help you with?"
        ),
        format!(
            "You can say things like, {EXAMPLE_QUESTION}, or you can say exit... Now, what can I help you with?"
        ),
    )
}

pub fn farewell_message() -> SpeechResponse {
    SpeechResponse::tell(FAREWELL)
}

pub fn hello_message() -> SpeechResponse {
    SpeechResponse::tell("Hello")
}

pub fn hello_world_message() -> SpeechResponse {
    SpeechResponse::tell("Hello World!")
}

/// "The <metric> for <company> is <value>." followed by the continuation
/// prompt. The company falls back to the ticker when the snapshot has no
/// name.
pub fn metric_message(query: &ResolvedQuery, snapshot: &Snapshot) -> SpeechResponse {
    let company = snapshot.name().unwrap_or_else(|| query.symbol.clone());
    let value = snapshot.text(&query.canonical_metric).unwrap_or_else(|| MISSING_VALUE.to_owned());
    SpeechResponse::ask(
        format!(
            "The {phrase} for {company} is {value}. {CONTINUATION_PROMPT}",
            phrase = query.metric_phrase
        ),
        CONTINUATION_PROMPT,
    )
}

pub fn quote_error_message(error: &QuoteServiceError) -> SpeechResponse {
    SpeechResponse::ask(format!("There was an error: {error}"), CONTINUATION_PROMPT)
}

pub fn clarification_message(error: &ResolutionError) -> SpeechResponse {
    match error {
        ResolutionError::SymbolNotProvided => SpeechResponse::ask(
            "Which company or ticker symbol would you like to know about?",
            "Try saying a company name, like Apple, or a ticker symbol, like Z N G A.",
        ),
        ResolutionError::UnknownCompany { company } => SpeechResponse::ask(
            format!(
                "I don't know the ticker symbol for {company}. Please ask again using the ticker symbol."
            ),
            "Try saying the ticker symbol, like Z N G A.",
        ),
        ResolutionError::MetricNotProvided => SpeechResponse::ask(
            "Which metric would you like? You can ask for the price, the P E ratio, or the dividend yield.",
            "Try asking for the price, the P E ratio, or the dividend yield.",
        ),
        ResolutionError::UnknownMetric { phrase } => SpeechResponse::ask(
            format!(
                "I can't look up {phrase} yet. You can ask for the price, the P E ratio, the dividend yield, or the last trade date."
            ),
            CONTINUATION_PROMPT,
        ),
    }
}

#[cfg(test)]
mod tests {
    use stockloop_core::{QuoteServiceError, ResolutionError, ResolvedQuery, Snapshot};

    use super::{clarification_message, metric_message, quote_error_message, CONTINUATION_PROMPT};

    fn pe_query() -> ResolvedQuery {
        ResolvedQuery {
            symbol: "ZNGA".to_owned(),
            canonical_metric: "peRatio".to_owned(),
            metric_phrase: "pe ratio".to_owned(),
            quote_fields: vec!["s".to_owned(), "n".to_owned(), "p".to_owned()],
        }
    }

    #[test]
    fn metric_message_uses_company_name_and_value() {
        let snapshot = Snapshot::new()
            .with("symbol", "ZNGA")
            .with("name", "Zynga Inc.")
            .with("peRatio", "3.50");

        let response = metric_message(&pe_query(), &snapshot);

        assert_eq!(
            response.speech_text,
            "The pe ratio for Zynga Inc. is 3.50. What else can I help with?"
        );
        assert_eq!(response.reprompt_text.as_deref(), Some(CONTINUATION_PROMPT));
    }

    #[test]
    fn metric_message_falls_back_to_symbol_and_missing_value() {
        let response = metric_message(&pe_query(), &Snapshot::new().with("symbol", "ZNGA"));

        assert_eq!(
            response.speech_text,
            "The pe ratio for ZNGA is not available. What else can I help with?"
        );
    }

    #[test]
    fn quote_error_keeps_session_open() {
        let response = quote_error_message(&QuoteServiceError::Provider("bad symbol".to_owned()));

        assert_eq!(response.speech_text, "There was an error: bad symbol");
        assert!(!response.should_end_session());
    }

    #[test]
    fn clarifications_always_reprompt() {
        for error in [
            ResolutionError::SymbolNotProvided,
            ResolutionError::UnknownCompany { company: "acme".to_owned() },
            ResolutionError::MetricNotProvided,
            ResolutionError::UnknownMetric { phrase: "beta".to_owned() },
        ] {
            assert!(!clarification_message(&error).should_end_session());
        }
    }

    #[test]
    fn unknown_company_clarification_names_the_company() {
        let response = clarification_message(&ResolutionError::UnknownCompany {
            company: "acme".to_owned(),
        });
        assert!(response.speech_text.contains("acme"));
    }
}
