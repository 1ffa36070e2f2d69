use anyhow::Result;
use calc_cli::init_logging;
use calc_core::menu::{self, SessionOutcome};
use clap::Parser;
use std::io;

#[derive(Parser, Debug)]
#[clap(name = "simple-calc", version = "0.1.0", about = "Menu driven four-operation calculator")]
struct Cli {
    #[clap(long, short, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, None)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = menu::run_session(&mut stdin.lock(), &mut stdout.lock())?;

    if let SessionOutcome::Completed { operation, result } = outcome {
        log::debug!("{} produced {}", operation.label(), result);
    }
    Ok(())
}
