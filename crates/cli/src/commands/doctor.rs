use serde::Serialize;
use stockloop_core::config::{AppConfig, LoadOptions};
use stockloop_core::{IntentRequest, MetricDictionary, Resolver};
use stockloop_quotes::HttpQuoteService;

use super::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

const DEPENDENT_CHECKS: [&str; 3] = ["company_directory", "quote_client", "skill_wiring"];

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_company_directory(&config));
            checks.push(check_quote_client(&config));
            checks.push(check_skill_wiring(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.extend(DEPENDENT_CHECKS.into_iter().map(|name| DoctorCheck {
                name,
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            }));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_company_directory(config: &AppConfig) -> DoctorCheck {
    let directory = config.company_directory();
    let entries =
        directory.iter().map(|(company, symbol)| format!("{company}={symbol}")).collect::<Vec<_>>();
    DoctorCheck {
        name: "company_directory",
        status: if directory.is_empty() { CheckStatus::Fail } else { CheckStatus::Pass },
        details: format!("{} companies: {}", directory.len(), entries.join(", ")),
    }
}

fn check_quote_client(config: &AppConfig) -> DoctorCheck {
    match HttpQuoteService::new(&config.quotes) {
        Ok(service) => DoctorCheck {
            name: "quote_client",
            status: CheckStatus::Pass,
            details: format!(
                "client targets `{}` with a {}s timeout",
                service.snapshot_url(),
                config.quotes.timeout_secs
            ),
        },
        Err(error) => {
            DoctorCheck { name: "quote_client", status: CheckStatus::Fail, details: error.to_string() }
        }
    }
}

fn check_skill_wiring(config: &AppConfig) -> DoctorCheck {
    let resolver = Resolver::new(config.company_directory(), MetricDictionary::default());
    let probe = IntentRequest::new("CompanyMetricIntent")
        .with_slot("Symbol", "ZNGA")
        .with_slot("Metric", "pe ratio");
    let application_check = if config.skill.application_id.is_some() {
        "application id check enabled"
    } else {
        "application id check disabled"
    };

    match resolver.resolve(&probe) {
        Ok(query) if query.quote_fields == ["s", "n", "p"] => DoctorCheck {
            name: "skill_wiring",
            status: CheckStatus::Pass,
            details: format!(
                "probe resolved to {} {}; {application_check}",
                query.symbol, query.canonical_metric
            ),
        },
        Ok(query) => DoctorCheck {
            name: "skill_wiring",
            status: CheckStatus::Fail,
            details: format!("probe resolved to unexpected fields {:?}", query.quote_fields),
        },
        Err(error) => {
            DoctorCheck { name: "skill_wiring", status: CheckStatus::Fail, details: error.to_string() }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
