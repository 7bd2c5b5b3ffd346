pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "shedquote",
    about = "Shedquote operator CLI",
    long_about = "Operate shedquote migrations, demo fixtures, config inspection, readiness checks, and interactive design sessions.",
    after_help = "Examples:\n  shedquote doctor --json\n  shedquote migrate\n  shedquote design"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load deterministic demo designs and a sample quote request")]
    Seed,
    #[command(about = "Validate config, database connectivity, and upload directory readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Run the guided shed design wizard, then price and store the result")]
    Design,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Design => commands::design::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
