//! Console loop for the calculator agent

use std::io::{self, BufRead, Write};

use crate::agent::{AgentResponse, CalculatorAgent};

pub const PROMPT: &str = ">> ";

const BANNER: &str = "Calculator Agent - try commands like:
  calculate 2 + 3 * 4
  10 kg to lb
  mean of 5, 10, 15
  generate csv 1 2 3 4 5
Type 'quit' or 'exit' to stop.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit")
}

pub fn write_response<W: Write>(output: &mut W, response: &AgentResponse, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(output, "{}", response.render()),
        OutputFormat::Json => {
            let json = serde_json::to_string(response).map_err(io::Error::other)?;
            writeln!(output, "{}", json)
        }
    }
}

/// Reads one line, replacing invalid UTF-8 instead of failing. `None` at
/// end of input.
pub(crate) fn read_line_lossy<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    match String::from_utf8(buf) {
        Ok(line) => Ok(Some(line)),
        Err(err) => {
            log::warn!("input line is not valid UTF-8, replacing invalid bytes");
            Ok(Some(String::from_utf8_lossy(err.as_bytes()).into_owned()))
        }
    }
}

/// Reads commands until `quit`, `exit` or end of input. Returns how many
/// commands were processed.
pub fn run<R: BufRead, W: Write>(
    agent: &CalculatorAgent,
    input: &mut R,
    output: &mut W,
    format: OutputFormat,
) -> io::Result<usize> {
    if format == OutputFormat::Text {
        writeln!(output, "{}", BANNER)?;
    }

    let mut processed = 0;
    loop {
        if format == OutputFormat::Text {
            write!(output, "{}", PROMPT)?;
            output.flush()?;
        }

        let Some(line) = read_line_lossy(input)? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit_command(line) {
            break;
        }

        let response = agent.process(line);
        write_response(output, &response, format)?;
        processed += 1;
    }

    log::debug!("agent loop finished after {} commands", processed);
    Ok(processed)
}
