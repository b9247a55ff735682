use std::sync::Arc;

use stockloop_core::config::{AppConfig, ConfigError};
use stockloop_core::QuoteService;
use stockloop_quotes::{HttpQuoteService, QuoteClientError};
use stockloop_skill::{build_skill, IntentRouter, PlatformAdapter};
use thiserror::Error;
use tracing::info;

pub type SkillAdapter = PlatformAdapter<IntentRouter<Arc<dyn QuoteService>>>;

pub struct Application {
    pub config: AppConfig,
    pub skill: Arc<SkillAdapter>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    QuoteClient(#[from] QuoteClientError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let quotes: Arc<dyn QuoteService> = Arc::new(HttpQuoteService::new(&config.quotes)?);
    info!(
        event_name = "system.bootstrap.quote_client_ready",
        correlation_id = "bootstrap",
        base_url = %config.quotes.base_url,
        timeout_secs = config.quotes.timeout_secs,
        "quote service client constructed"
    );

    let skill = Arc::new(build_skill(&config, quotes));
    info!(
        event_name = "system.bootstrap.skill_ready",
        correlation_id = "bootstrap",
        companies = skill.handler().resolver().directory().len(),
        application_check = config.skill.application_id.is_some(),
        "skill adapter wired"
    );

    Ok(Application { config, skill })
}
