use anyhow::Result;
use calc_cli::init_logging;
use calc_core::repl::{self, OutputFormat};
use calc_core::{CalcConfig, CalculatorAgent, ConfigLoader};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "calc-agent",
    version = "0.1.0",
    about = "Text-driven calculator: arithmetic, unit conversion, statistics and CSV export"
)]
struct Cli {
    #[clap(long, short, help = "Path to a YAML configuration file")]
    config: Option<PathBuf>,

    #[clap(long, short, help = "Log level (off, error, warn, info, debug, trace)")]
    log_level: Option<String>,

    #[clap(long, help = "Print one JSON object per response instead of text")]
    json: bool,

    #[clap(long, help = "Allow ^, % and math functions in expressions")]
    extended: bool,

    #[clap(long, help = "Process a single command and exit")]
    task: Option<String>,
}

fn load_config(cli: &Cli) -> Result<CalcConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::from_file(path)?,
        None => ConfigLoader::load_default()?,
    };
    if cli.extended {
        config.evaluator.extended = true;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, config.logging.file.as_deref())?;
    log::info!("Starting calc-agent (grammar: {:?})", config.evaluator.grammar());

    let agent = CalculatorAgent::new(&config);
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let stdout = io::stdout();
    let mut output = stdout.lock();

    if let Some(task) = &cli.task {
        let response = agent.process(task);
        repl::write_response(&mut output, &response, format)?;
        output.flush()?;
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    repl::run(&agent, &mut input, &mut output, format)?;
    Ok(())
}
