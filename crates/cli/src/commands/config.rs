use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use stockloop_core::config::{AppConfig, LoadOptions};
use toml::Value;

use super::CommandResult;

const COMMAND: &str = "config";

struct ConfigField {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "config_validation", error.to_string(), 2)
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        lines.push(render_line(
            field.key,
            &field.value,
            field_source(
                field.key,
                field.env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        ));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn fields(config: &AppConfig) -> Vec<ConfigField> {
    let companies = config
        .company_directory()
        .iter()
        .map(|(company, symbol)| format!("{company}={symbol}"))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        ConfigField {
            key: "skill.application_id",
            value: config.skill.application_id.clone().unwrap_or_else(|| "<unset>".to_string()),
            env_keys: &["STOCKLOOP_SKILL_APPLICATION_ID"],
        },
        ConfigField {
            key: "quotes.base_url",
            value: config.quotes.base_url.clone(),
            env_keys: &["STOCKLOOP_QUOTES_BASE_URL"],
        },
        ConfigField {
            key: "quotes.api_key",
            value: redact_secret(config.quotes.api_key.as_ref().map(|key| key.expose_secret())),
            env_keys: &["STOCKLOOP_QUOTES_API_KEY"],
        },
        ConfigField {
            key: "quotes.timeout_secs",
            value: config.quotes.timeout_secs.to_string(),
            env_keys: &["STOCKLOOP_QUOTES_TIMEOUT_SECS"],
        },
        ConfigField {
            key: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["STOCKLOOP_SERVER_BIND_ADDRESS"],
        },
        ConfigField {
            key: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["STOCKLOOP_SERVER_PORT"],
        },
        ConfigField {
            key: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["STOCKLOOP_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        ConfigField { key: "directory.companies", value: companies, env_keys: &[] },
        ConfigField {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["STOCKLOOP_LOGGING_LEVEL", "STOCKLOOP_LOG_LEVEL"],
        },
        ConfigField {
            key: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["STOCKLOOP_LOGGING_FORMAT", "STOCKLOOP_LOG_FORMAT"],
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("stockloop.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/stockloop.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|env_key| env::var_os(env_key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_secret(secret: Option<&str>) -> String {
    match secret.map(str::trim) {
        None => "<unset>".to_string(),
        Some("") => "<empty>".to_string(),
        Some(_) => "<redacted>".to_string(),
    }
}
