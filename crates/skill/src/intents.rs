use async_trait::async_trait;
use stockloop_core::{IntentRequest, QuoteService, Resolver, SkillError, SpeechResponse};
use tracing::{info, warn};

use crate::adapter::{EventContext, SkillHandler};
use crate::speech;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntentKind {
    CompanyMetric,
    Hello,
    HelloWorld,
    Stop,
    Cancel,
    Help,
}

impl IntentKind {
    pub const ALL: [IntentKind; 6] =
        [Self::CompanyMetric, Self::Hello, Self::HelloWorld, Self::Stop, Self::Cancel, Self::Help];

    pub fn name(self) -> &'static str {
        match self {
            Self::CompanyMetric => "CompanyMetricIntent",
            Self::Hello => "HelloIntent",
            Self::HelloWorld => "HelloWorldIntent",
            Self::Stop => "AMAZON.StopIntent",
            Self::Cancel => "AMAZON.CancelIntent",
            Self::Help => "AMAZON.HelpIntent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Routes platform lifecycle events and named intents to their handlers.
pub struct IntentRouter<S> {
    resolver: Resolver,
    quotes: S,
}

impl<S> IntentRouter<S>
where
    S: QuoteService,
{
    pub fn new(resolver: Resolver, quotes: S) -> Self {
        Self { resolver, quotes }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub async fn route(
        &self,
        intent: &IntentRequest,
        ctx: &EventContext,
    ) -> Result<SpeechResponse, SkillError> {
        let kind = IntentKind::from_name(&intent.name)
            .ok_or_else(|| SkillError::UnknownIntent { name: intent.name.clone() })?;

        info!(
            event_name = "skill.intent.dispatched",
            correlation_id = %ctx.correlation_id,
            session_id = %ctx.session_id,
            intent = kind.name(),
            "intent dispatched"
        );

        Ok(match kind {
            IntentKind::CompanyMetric => self.company_metric(intent, ctx).await,
            IntentKind::Hello => speech::hello_message(),
            IntentKind::HelloWorld => speech::hello_world_message(),
            IntentKind::Stop | IntentKind::Cancel => speech::farewell_message(),
            IntentKind::Help => speech::help_message(),
        })
    }

    async fn company_metric(&self, intent: &IntentRequest, ctx: &EventContext) -> SpeechResponse {
        let query = match self.resolver.resolve(intent) {
            Ok(query) => query,
            Err(error) => {
                info!(
                    event_name = "skill.resolution.unresolved",
                    correlation_id = %ctx.correlation_id,
                    session_id = %ctx.session_id,
                    error = %error,
                    "asking user to clarify"
                );
                return speech::clarification_message(&error);
            }
        };

        let request = query.quote_request();
        match self.quotes.snapshot(&request).await {
            Ok(snapshot) => {
                info!(
                    event_name = "skill.quote.answered",
                    correlation_id = %ctx.correlation_id,
                    session_id = %ctx.session_id,
                    symbol = %query.symbol,
                    metric = %query.canonical_metric,
                    "quote snapshot answered"
                );
                speech::metric_message(&query, &snapshot)
            }
            Err(error) => {
                warn!(
                    event_name = "skill.quote.failed",
                    correlation_id = %ctx.correlation_id,
                    session_id = %ctx.session_id,
                    symbol = %query.symbol,
                    error = %error,
                    "quote service call failed"
                );
                speech::quote_error_message(&error)
            }
        }
    }
}

#[async_trait]
impl<S> SkillHandler for IntentRouter<S>
where
    S: QuoteService + 'static,
{
    async fn on_launch(&self, _ctx: &EventContext) -> Result<SpeechResponse, SkillError> {
        Ok(speech::welcome_message())
    }

    async fn on_intent(
        &self,
        intent: &IntentRequest,
        ctx: &EventContext,
    ) -> Result<SpeechResponse, SkillError> {
        self.route(intent, ctx).await
    }

    async fn on_session_end(
        &self,
        reason: Option<&str>,
        ctx: &EventContext,
    ) -> Result<(), SkillError> {
        info!(
            event_name = "skill.session.ended",
            correlation_id = %ctx.correlation_id,
            session_id = %ctx.session_id,
            reason = reason.unwrap_or("unspecified"),
            "platform session ended"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use stockloop_core::{
        IntentRequest, QuoteRequest, QuoteService, QuoteServiceError, Resolver, SkillError,
        Snapshot,
    };

    use super::{IntentKind, IntentRouter};
    use crate::adapter::{EventContext, SkillHandler};

    struct RecordingQuotes {
        requests: Mutex<Vec<QuoteRequest>>,
        reply: Result<Snapshot, QuoteServiceError>,
    }

    impl RecordingQuotes {
        fn answering(snapshot: Snapshot) -> Self {
            Self { requests: Mutex::new(Vec::new()), reply: Ok(snapshot) }
        }

        fn failing(error: QuoteServiceError) -> Self {
            Self { requests: Mutex::new(Vec::new()), reply: Err(error) }
        }

        fn requests(&self) -> Vec<QuoteRequest> {
            self.requests.lock().expect("requests lock").clone()
        }
    }

    #[async_trait]
    impl QuoteService for RecordingQuotes {
        async fn snapshot(&self, request: &QuoteRequest) -> Result<Snapshot, QuoteServiceError> {
            self.requests.lock().expect("requests lock").push(request.clone());
            self.reply.clone()
        }
    }

    fn router(quotes: RecordingQuotes) -> IntentRouter<RecordingQuotes> {
        IntentRouter::new(Resolver::default(), quotes)
    }

    fn zynga_snapshot() -> Snapshot {
        Snapshot::new().with("symbol", "ZNGA").with("name", "Zynga Inc.").with("peRatio", "3.50")
    }

    #[tokio::test]
    async fn company_metric_intent_queries_once_and_speaks_the_value() {
        let router = router(RecordingQuotes::answering(zynga_snapshot()));
        let intent = IntentRequest::new("CompanyMetricIntent")
            .with_slot("Symbol", "ZNGA")
            .with_slot("Metric", "pe ratio");

        let response = router.route(&intent, &EventContext::default()).await.expect("route");

        assert_eq!(
            router.quotes.requests(),
            vec![QuoteRequest {
                symbol: "ZNGA".to_owned(),
                fields: vec!["s".to_owned(), "n".to_owned(), "p".to_owned()],
            }]
        );
        assert_eq!(
            response.speech_text,
            "The pe ratio for Zynga Inc. is 3.50. What else can I help with?"
        );
        assert_eq!(response.reprompt_text.as_deref(), Some("What else can I help with?"));
    }

    #[tokio::test]
    async fn company_slot_is_mapped_through_the_directory() {
        let router = router(RecordingQuotes::answering(
            Snapshot::new()
                .with("symbol", "APPL")
                .with("name", "Apple Inc.")
                .with("lastTradePriceOnly", "524.88"),
        ));
        let intent = IntentRequest::new("CompanyMetricIntent")
            .with_slot("Company", "apple")
            .with_slot("Metric", "price");

        let response = router.route(&intent, &EventContext::default()).await.expect("route");

        let requests = router.quotes.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].symbol, "APPL");
        assert_eq!(requests[0].fields, vec!["s", "n", "l1"]);
        assert_eq!(
            response.speech_text,
            "The last trade price for Apple Inc. is 524.88. What else can I help with?"
        );
    }

    #[tokio::test]
    async fn quote_service_error_is_spoken_and_session_stays_open() {
        let router = router(RecordingQuotes::failing(QuoteServiceError::Timeout { secs: 5 }));
        let intent = IntentRequest::new("CompanyMetricIntent")
            .with_slot("Symbol", "ZNGA")
            .with_slot("Metric", "dividend yield");

        let response = router.route(&intent, &EventContext::default()).await.expect("route");

        assert_eq!(
            response.speech_text,
            "There was an error: quote service did not answer within 5 seconds"
        );
        assert!(!response.should_end_session());
        assert_eq!(router.quotes.requests().len(), 1);
    }

    #[tokio::test]
    async fn unresolved_slots_ask_for_clarification_without_calling_the_service() {
        let router = router(RecordingQuotes::answering(zynga_snapshot()));

        for intent in [
            IntentRequest::new("CompanyMetricIntent").with_slot("Metric", "price"),
            IntentRequest::new("CompanyMetricIntent").with_slot("Symbol", "ZNGA"),
            IntentRequest::new("CompanyMetricIntent")
                .with_slot("Company", "acme")
                .with_slot("Metric", "price"),
        ] {
            let response = router.route(&intent, &EventContext::default()).await.expect("route");
            assert!(!response.should_end_session());
        }

        assert!(router.quotes.requests().is_empty());
    }

    #[tokio::test]
    async fn stop_and_cancel_say_goodbye_and_close_the_session() {
        let router = router(RecordingQuotes::answering(Snapshot::new()));

        for name in ["AMAZON.StopIntent", "AMAZON.CancelIntent"] {
            let response = router
                .route(&IntentRequest::new(name), &EventContext::default())
                .await
                .expect("route");
            assert_eq!(response.speech_text, "Goodbye");
            assert!(response.should_end_session());
        }
    }

    #[tokio::test]
    async fn help_keeps_the_session_open() {
        let router = router(RecordingQuotes::answering(Snapshot::new()));

        let response = router
            .route(&IntentRequest::new("AMAZON.HelpIntent"), &EventContext::default())
            .await
            .expect("route");

        assert!(response.speech_text.starts_with("You can ask questions such as"));
        assert!(!response.should_end_session());
    }

    #[tokio::test]
    async fn hello_intents_answer_and_close() {
        let router = router(RecordingQuotes::answering(Snapshot::new()));

        let hello = router
            .route(&IntentRequest::new("HelloIntent"), &EventContext::default())
            .await
            .expect("route");
        let hello_world = router
            .route(&IntentRequest::new("HelloWorldIntent"), &EventContext::default())
            .await
            .expect("route");

        assert_eq!(hello.speech_text, "Hello");
        assert_eq!(hello_world.speech_text, "Hello World!");
        assert!(hello.should_end_session() && hello_world.should_end_session());
    }

    #[tokio::test]
    async fn unregistered_intent_fails_before_resolution() {
        let router = router(RecordingQuotes::answering(zynga_snapshot()));
        let intent = IntentRequest::new("OrderPizzaIntent")
            .with_slot("Symbol", "ZNGA")
            .with_slot("Metric", "price");

        let error = router.route(&intent, &EventContext::default()).await.expect_err("route");

        assert_eq!(error, SkillError::UnknownIntent { name: "OrderPizzaIntent".to_owned() });
        assert!(router.quotes.requests().is_empty());
    }

    #[tokio::test]
    async fn launch_welcomes_with_reprompt() {
        let router = router(RecordingQuotes::answering(Snapshot::new()));

        let response = router.on_launch(&EventContext::default()).await.expect("launch");

        assert!(response.speech_text.starts_with("Welcome to the Stock Loop Helper"));
        assert!(!response.should_end_session());
    }

    #[test]
    fn intent_table_round_trips_names() {
        for kind in IntentKind::ALL {
            assert_eq!(IntentKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(IntentKind::from_name("amazon.stopintent"), None);
    }
}
