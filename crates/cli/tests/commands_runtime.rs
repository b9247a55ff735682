use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use stockloop_cli::commands::{ask, config, doctor, resolve};

fn slots(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn offline_ask(intent: &str, values: &[&str]) -> ask::AskOptions {
    ask::AskOptions { intent: intent.to_string(), slots: slots(values), launch: false, offline: true }
}

#[test]
fn resolve_returns_query_for_symbol_and_metric() {
    with_env(&[], || {
        let result = resolve::run(&slots(&["Symbol=ZNGA", "Metric=pe ratio"]));
        assert_eq!(result.exit_code, 0, "expected resolved query");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["symbol"], "ZNGA");
        assert_eq!(payload["canonical_metric"], "peRatio");
        assert_eq!(payload["quote_fields"], serde_json::json!(["s", "n", "p"]));
    });
}

#[test]
fn resolve_maps_company_through_directory() {
    with_env(&[], || {
        let result = resolve::run(&slots(&["Company=Apple", "Metric=price"]));
        assert_eq!(result.exit_code, 0, "expected resolved query");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["symbol"], "APPL");
        assert_eq!(payload["canonical_metric"], "lastTradePriceOnly");
    });
}

#[test]
fn resolve_reports_unresolved_symbol() {
    with_env(&[], || {
        let result = resolve::run(&slots(&["Metric=price"]));
        assert_eq!(result.exit_code, 3, "expected resolution failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "resolve");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "unresolved_symbol");
    });
}

#[test]
fn resolve_rejects_slot_without_value_separator() {
    with_env(&[], || {
        let result = resolve::run(&slots(&["Symbol"]));
        assert_eq!(result.exit_code, 2, "expected slot parse failure code");
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_slot");
    });
}

#[test]
fn ask_offline_speaks_company_metric() {
    with_env(&[], || {
        let result =
            ask::run(offline_ask("CompanyMetricIntent", &["Symbol=ZNGA", "Metric=pe ratio"]));
        assert_eq!(result.exit_code, 0, "expected spoken answer");

        let payload = parse_payload(&result.output);
        assert_eq!(
            payload["response"]["outputSpeech"]["text"],
            "The pe ratio for Zynga Inc. is 3.50. What else can I help with?"
        );
        assert_eq!(payload["response"]["shouldEndSession"], false);
    });
}

#[test]
fn ask_offline_launch_welcomes_user() {
    with_env(&[], || {
        let result = ask::run(ask::AskOptions { launch: true, ..offline_ask("ignored", &[]) });
        assert_eq!(result.exit_code, 0, "expected welcome");

        let payload = parse_payload(&result.output);
        let text = payload["response"]["outputSpeech"]["text"].as_str().unwrap_or_default();
        assert!(text.starts_with("Welcome to the Stock Loop Helper"));
        assert!(payload["response"]["reprompt"].is_object());
    });
}

#[test]
fn ask_passes_configured_application_check() {
    with_env(&[("STOCKLOOP_SKILL_APPLICATION_ID", "amzn1.ask.skill.stockloop")], || {
        let result = ask::run(offline_ask("AMAZON.StopIntent", &[]));
        assert_eq!(result.exit_code, 0, "expected goodbye");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["response"]["outputSpeech"]["text"], "Goodbye");
        assert_eq!(payload["response"]["shouldEndSession"], true);
    });
}

#[test]
fn ask_fails_for_unregistered_intent() {
    with_env(&[], || {
        let result = ask::run(offline_ask("OrderPizzaIntent", &[]));
        assert_eq!(result.exit_code, 4, "expected skill failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "ask");
        assert_eq!(payload["error_class"], "unknown_intent");
    });
}

#[test]
fn ask_returns_config_failure_for_invalid_env() {
    with_env(&[("STOCKLOOP_QUOTES_TIMEOUT_SECS", "soon")], || {
        let result = ask::run(offline_ask("AMAZON.HelpIntent", &[]));
        assert_eq!(result.exit_code, 2, "expected config validation failure code");
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

#[test]
fn doctor_passes_with_default_config() {
    with_env(&[], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "expected all checks to pass");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "pass");
        let names: Vec<&str> = payload["checks"]
            .as_array()
            .map(|checks| checks.iter().filter_map(|check| check["name"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(
            names,
            vec!["config_validation", "company_directory", "quote_client", "skill_wiring"]
        );
    });
}

#[test]
fn doctor_skips_dependent_checks_when_config_invalid() {
    with_env(&[("STOCKLOOP_QUOTES_BASE_URL", "ftp://quotes.example")], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 1, "expected doctor failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][0]["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
    });
}

#[test]
fn config_attributes_env_source_and_redacts_api_key() {
    with_env(
        &[
            ("STOCKLOOP_QUOTES_API_KEY", "quotes-secret-value"),
            ("STOCKLOOP_LOG_LEVEL", "debug"),
        ],
        || {
            let result = config::run();
            assert_eq!(result.exit_code, 0);

            let output = result.output;
            assert!(output.contains(
                "- quotes.api_key = <redacted> (source: env (STOCKLOOP_QUOTES_API_KEY))"
            ));
            assert!(output.contains("- logging.level = debug (source: env (STOCKLOOP_LOG_LEVEL))"));
            assert!(output.contains("- directory.companies = apple=appl, zynga=znga (source: default)"));
            assert!(!output.contains("quotes-secret-value"));
        },
    );
}

#[test]
fn config_returns_validation_failure_for_invalid_env() {
    with_env(&[("STOCKLOOP_QUOTES_TIMEOUT_SECS", "soon")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.contains("STOCKLOOP_QUOTES_TIMEOUT_SECS"), "unexpected message: {message}");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "STOCKLOOP_SKILL_APPLICATION_ID",
        "STOCKLOOP_QUOTES_BASE_URL",
        "STOCKLOOP_QUOTES_API_KEY",
        "STOCKLOOP_QUOTES_TIMEOUT_SECS",
        "STOCKLOOP_SERVER_BIND_ADDRESS",
        "STOCKLOOP_SERVER_PORT",
        "STOCKLOOP_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "STOCKLOOP_LOGGING_LEVEL",
        "STOCKLOOP_LOGGING_FORMAT",
        "STOCKLOOP_LOG_LEVEL",
        "STOCKLOOP_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
