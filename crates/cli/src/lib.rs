pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "stockloop",
    about = "StockLoop operator CLI",
    long_about = "Inspect StockLoop configuration, check readiness, and replay skill requests locally.",
    after_help = "Examples:\n  stockloop doctor --json\n  stockloop resolve --slot Symbol=ZNGA --slot \"Metric=pe ratio\"\n  stockloop ask --offline --slot Company=apple --slot Metric=price"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, company directory, quote client and skill wiring")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Resolve slot values into a quote query without calling the quote service")]
    Resolve {
        #[arg(long = "slot", value_name = "NAME=VALUE", help = "Slot value, repeatable")]
        slots: Vec<String>,
    },
    #[command(about = "Run a synthetic platform request through the skill and print the reply")]
    Ask {
        #[arg(long, default_value = "CompanyMetricIntent", help = "Intent name to send")]
        intent: String,
        #[arg(long = "slot", value_name = "NAME=VALUE", help = "Slot value, repeatable")]
        slots: Vec<String>,
        #[arg(long, help = "Send a launch request instead of an intent")]
        launch: bool,
        #[arg(long, help = "Answer from built-in sample quotes instead of the quote service")]
        offline: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Resolve { slots } => commands::resolve::run(&slots),
        Command::Ask { intent, slots, launch, offline } => {
            commands::ask::run(commands::ask::AskOptions { intent, slots, launch, offline })
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn ask_collects_repeated_slots() {
        let cli = Cli::parse_from([
            "stockloop",
            "ask",
            "--offline",
            "--slot",
            "Symbol=ZNGA",
            "--slot",
            "Metric=pe ratio",
        ]);

        let Command::Ask { intent, slots, launch, offline } = cli.command else {
            panic!("expected ask command");
        };
        assert_eq!(intent, "CompanyMetricIntent");
        assert_eq!(slots, vec!["Symbol=ZNGA", "Metric=pe ratio"]);
        assert!(!launch);
        assert!(offline);
    }
}
