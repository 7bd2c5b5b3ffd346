//! Interactive chat-style design session on stdin/stdout.
//!
//! Walks the five wizard steps, then prices the accumulated configuration
//! and stores it like a `POST /api/calculate-price` call would.

use std::io::{self, BufRead, Write};

use crate::commands::CommandResult;
use shedquote_core::config::{AppConfig, LoadOptions};
use shedquote_core::domain::design::{NewShedDesign, ShedConfiguration};
use shedquote_core::pricing::price_configuration;
use shedquote_core::wizard::{DesignWizard, SelectionOutcome};
use shedquote_db::repositories::{DesignRepository, SqlDesignRepository};
use shedquote_db::{connect_with_settings, migrations};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "design",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let configuration = match run_session(&mut stdin.lock(), &mut stdout.lock()) {
        Ok(Some(configuration)) => configuration,
        Ok(None) => {
            return CommandResult::failure(
                "design",
                "session_abandoned",
                "design session ended before completion; nothing was stored",
                2,
            );
        }
        Err(error) => {
            return CommandResult::failure("design", "session_io", error.to_string(), 3);
        }
    };

    let pricing = price_configuration(&configuration);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "design",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let design = SqlDesignRepository::new(pool.clone())
            .create(NewShedDesign { configuration, pricing })
            .await
            .map_err(|error| ("design_storage", error.to_string(), 6u8))?;

        pool.close().await;
        Ok::<_, (&'static str, String, u8)>(design)
    });

    match result {
        Ok(design) => CommandResult::success(
            "design",
            format!(
                "stored design {}: total ${}, ${}/month over 36 months",
                design.id, design.pricing.total, design.pricing.monthly_payment
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("design", error_class, message, exit_code)
        }
    }
}

/// Drive one wizard session over the given streams. Returns `None` when the
/// input ends before the session completes (abandonment persists nothing).
fn run_session<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<ShedConfiguration>> {
    let mut wizard = DesignWizard::new();

    loop {
        let options = wizard.options();

        writeln!(output)?;
        writeln!(output, "{}", wizard.prompt())?;
        for (index, option) in options.iter().enumerate() {
            writeln!(output, "  {}) {option}", index + 1)?;
        }
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let selection = match trimmed.parse::<usize>() {
            Ok(number) if (1..=options.len()).contains(&number) => options[number - 1],
            Ok(_) => {
                writeln!(output, "Pick a number between 1 and {}.", options.len())?;
                continue;
            }
            Err(_) => trimmed,
        };

        match wizard.select(selection) {
            Ok(SelectionOutcome::Completed(configuration)) => {
                writeln!(output, "{}", wizard.prompt())?;
                return Ok(Some(configuration));
            }
            Ok(SelectionOutcome::Advanced(_)) => {}
            Err(error) => {
                writeln!(output, "{error}")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::run_session;

    #[test]
    fn numbered_selections_walk_the_happy_path() {
        let mut input = Cursor::new("1\n1\n1\n1\n4\n");
        let mut output = Vec::new();

        let configuration = run_session(&mut input, &mut output)
            .expect("io")
            .expect("session should complete");

        assert_eq!(configuration.size, "8x10 ($3,500)");
        assert_eq!(configuration.style, "A-Frame");
        assert_eq!(configuration.siding, "Smart Panel T1-11 (Included)");
        assert_eq!(configuration.roof, "Asphalt Shingles (Included)");
        assert!(configuration.addons.is_empty());

        let transcript = String::from_utf8(output).expect("utf8");
        assert!(transcript.contains("What size are you thinking?"));
        assert!(transcript.contains("No thanks, calculate price"));
    }

    #[test]
    fn exact_labels_and_addon_loop_are_accepted() {
        let mut input = Cursor::new(
            "12x20 ($8,000)\nLofted Barn\nCedar (+$1,200)\nMetal Standing Seam (+$400)\nSkylights (+$300)\nDone, calculate price\n",
        );
        let mut output = Vec::new();

        let configuration = run_session(&mut input, &mut output)
            .expect("io")
            .expect("session should complete");

        assert_eq!(configuration.size, "12x20 ($8,000)");
        assert_eq!(configuration.addons, vec!["Skylights (+$300)".to_string()]);

        let transcript = String::from_utf8(output).expect("utf8");
        assert!(transcript.contains("Anything else?"));
    }

    #[test]
    fn invalid_input_reprompts_without_advancing() {
        let mut input = Cursor::new("99\nbogus option\n2\n1\n1\n1\n4\n");
        let mut output = Vec::new();

        let configuration = run_session(&mut input, &mut output)
            .expect("io")
            .expect("session should complete");

        assert_eq!(configuration.size, "10x12 ($4,200)");

        let transcript = String::from_utf8(output).expect("utf8");
        assert!(transcript.contains("Pick a number between 1 and 4."));
        assert!(transcript.contains("not an available option"));
    }

    #[test]
    fn ending_input_abandons_the_session() {
        let mut input = Cursor::new("1\n");
        let mut output = Vec::new();

        let result = run_session(&mut input, &mut output).expect("io");
        assert!(result.is_none());
    }
}
