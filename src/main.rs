//! SCS Validator CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use scs_validator::cli::{Cli, CommandDispatcher};
use scs_validator::ui::{should_use_colors, OutputMode, TerminalUI, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("scs_validator=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scs_validator=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("scs starting with args: {:?}", cli);

    let use_color = !cli.no_color && should_use_colors();
    let mut ui = TerminalUI::new(OutputMode::from_flags(cli.verbose), use_color);

    let dispatcher = CommandDispatcher::new(use_color);

    match dispatcher.dispatch(&cli, &mut ui) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            if let Some(hint) = e.hint() {
                ui.hint(hint);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
