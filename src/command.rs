//! Command-line and interactive command parsing for the binary.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: radius-locator [--once] [--stdout] [--config PATH] [--pbm PATH]

  --once         press the locate button once, print the result and exit
  --stdout       always print the ASCII view (default unless --pbm is given)
  --config PATH  read configuration from PATH instead of locator-config.toml
  --pbm PATH     write the rendered frame to PATH as a PBM image

Interactive commands:
  locate          press the locate button
  radius <value>  type a radius in meters into the input
  show            print the current view
  help            show this help
  quit            exit";

/// Parsed command-line flags
#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub once: bool,
    pub stdout: bool,
    pub config: Option<PathBuf>,
    pub pbm: Option<PathBuf>,
    pub help: bool,
}

impl CliArgs {
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--once" => parsed.once = true,
                "--stdout" => parsed.stdout = true,
                "--help" | "-h" => parsed.help = true,
                "--config" => {
                    let path = args.next().ok_or_else(|| anyhow!("--config needs a path"))?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--pbm" => {
                    let path = args.next().ok_or_else(|| anyhow!("--pbm needs a path"))?;
                    parsed.pbm = Some(PathBuf::from(path));
                }
                other => return Err(anyhow!("unknown argument: {}", other)),
            }
        }

        Ok(parsed)
    }

    /// Whether the ASCII view goes to stdout
    pub fn print_ascii(&self) -> bool {
        self.stdout || self.pbm.is_none()
    }
}

/// One line of interactive input
#[derive(Debug, PartialEq)]
pub enum Command {
    /// Trigger button
    Locate,
    /// Radius input edit, carrying the raw text
    Radius(String),
    Show,
    Help,
    Quit,
}

impl Command {
    /// Returns `None` for blank lines, `Err` for anything unrecognised.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "locate" | "l" => Self::Locate,
            "radius" | "r" => Self::Radius(rest.to_string()),
            "show" | "s" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => return Err(anyhow!("unknown command: {}", other)),
        };
        Ok(Some(command))
    }
}
