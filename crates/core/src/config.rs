use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CompanyDirectory;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub skill: SkillConfig,
    pub quotes: QuoteServiceConfig,
    pub server: ServerConfig,
    pub directory: DirectoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Default)]
pub struct SkillConfig {
    pub application_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct QuoteServiceConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug, Default)]
pub struct DirectoryConfig {
    pub companies: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub skill_application_id: Option<String>,
    pub quotes_base_url: Option<String>,
    pub quotes_api_key: Option<String>,
    pub quotes_timeout_secs: Option<u64>,
    pub server_port: Option<u16>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            skill: SkillConfig::default(),
            quotes: QuoteServiceConfig {
                base_url: "http://127.0.0.1:9090".to_string(),
                api_key: None,
                timeout_secs: 5,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            directory: DirectoryConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("stockloop.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Built-in directory with the configured companies layered on top.
    pub fn company_directory(&self) -> CompanyDirectory {
        CompanyDirectory::default().extended(&self.directory.companies)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(skill) = patch.skill {
            if let Some(application_id) = skill.application_id {
                self.skill.application_id = Some(application_id);
            }
        }

        if let Some(quotes) = patch.quotes {
            if let Some(base_url) = quotes.base_url {
                self.quotes.base_url = base_url;
            }
            if let Some(quotes_api_key_value) = quotes.api_key {
                self.quotes.api_key = Some(secret_value(quotes_api_key_value));
            }
            if let Some(timeout_secs) = quotes.timeout_secs {
                self.quotes.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(directory) = patch.directory {
            if let Some(companies) = directory.companies {
                self.directory.companies.extend(companies);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("STOCKLOOP_SKILL_APPLICATION_ID") {
            self.skill.application_id = Some(value);
        }

        if let Some(value) = read_env("STOCKLOOP_QUOTES_BASE_URL") {
            self.quotes.base_url = value;
        }
        if let Some(value) = read_env("STOCKLOOP_QUOTES_API_KEY") {
            self.quotes.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("STOCKLOOP_QUOTES_TIMEOUT_SECS") {
            self.quotes.timeout_secs = parse_u64("STOCKLOOP_QUOTES_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("STOCKLOOP_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("STOCKLOOP_SERVER_PORT") {
            self.server.port = parse_u16("STOCKLOOP_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("STOCKLOOP_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("STOCKLOOP_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("STOCKLOOP_LOGGING_LEVEL").or_else(|| read_env("STOCKLOOP_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("STOCKLOOP_LOGGING_FORMAT").or_else(|| read_env("STOCKLOOP_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(application_id) = overrides.skill_application_id {
            self.skill.application_id = Some(application_id);
        }
        if let Some(base_url) = overrides.quotes_base_url {
            self.quotes.base_url = base_url;
        }
        if let Some(api_key) = overrides.quotes_api_key {
            self.quotes.api_key = Some(secret_value(api_key));
        }
        if let Some(timeout_secs) = overrides.quotes_timeout_secs {
            self.quotes.timeout_secs = timeout_secs;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_skill(&self.skill)?;
        validate_quotes(&self.quotes)?;
        validate_server(&self.server)?;
        validate_directory(&self.directory)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("stockloop.toml"), PathBuf::from("config/stockloop.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_skill(skill: &SkillConfig) -> Result<(), ConfigError> {
    if let Some(application_id) = &skill.application_id {
        if application_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "skill.application_id must not be empty when set; remove it to accept any application"
                    .to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_quotes(quotes: &QuoteServiceConfig) -> Result<(), ConfigError> {
    let base_url = quotes.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "quotes.base_url must start with http:// or https://".to_string(),
        ));
    }

    if quotes.timeout_secs == 0 || quotes.timeout_secs > 60 {
        return Err(ConfigError::Validation(
            "quotes.timeout_secs must be in range 1..=60".to_string(),
        ));
    }

    let blank_key =
        quotes.api_key.as_ref().map(|key| key.expose_secret().trim().is_empty()).unwrap_or(false);
    if blank_key {
        return Err(ConfigError::Validation(
            "quotes.api_key must not be empty when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_directory(directory: &DirectoryConfig) -> Result<(), ConfigError> {
    for (company, symbol) in &directory.companies {
        if company.trim().is_empty() {
            return Err(ConfigError::Validation(
                "directory.companies must not contain an empty company name".to_string(),
            ));
        }
        let symbol = symbol.trim();
        let valid_symbol = !symbol.is_empty()
            && symbol.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '.' || ch == '-');
        if !valid_symbol {
            return Err(ConfigError::Validation(format!(
                "directory.companies.{company} must be a ticker symbol (letters, digits, `.` or `-`)"
            )));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    skill: Option<SkillPatch>,
    quotes: Option<QuotesPatch>,
    server: Option<ServerPatch>,
    directory: Option<DirectoryPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SkillPatch {
    application_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct QuotesPatch {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DirectoryPatch {
    companies: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
