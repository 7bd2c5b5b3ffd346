use std::process::ExitCode;

fn main() -> ExitCode {
    shedquote_cli::run()
}
