use std::process::ExitCode;

fn main() -> ExitCode {
    stockloop_cli::run()
}
