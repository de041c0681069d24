use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{self, Write};
use std::process;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CtlError, Result};

/// How decoded results are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(CtlError::InvalidArgument(format!(
                "invalid output format '{}', expected json or yaml",
                s
            ))),
        }
    }
}

/// Exits the program after printing an already formatted error report to stderr
pub fn exit_with_error(report: &str) -> ! {
    eprintln!("{}", report);
    process::exit(1);
}

/// Renders `value` in the requested format.
///
/// JSON uses two-space indentation; both formats end with a newline.
pub fn render<T>(value: &T, format: OutputFormat) -> Result<String>
where
    T: Serialize,
{
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
        OutputFormat::Yaml => {
            let mut yaml = serde_yml::to_string(value)?;
            if !yaml.ends_with('\n') {
                yaml.push('\n');
            }
            Ok(yaml)
        }
    }
}

/// Writes `value` to `out` in the requested format.
///
/// The value is fully rendered before anything is written.
pub fn write_formatted<T>(out: &mut dyn Write, value: &T, format: OutputFormat) -> Result<()>
where
    T: Serialize,
{
    let rendered = render(value, format)?;
    ignore_broken_pipe(out.write_all(rendered.as_bytes()))
}

/// Writes a one-line message to `out`.
pub fn write_line(out: &mut dyn Write, message: &str) -> Result<()> {
    ignore_broken_pipe(writeln!(out, "{}", message))
}

// A reader that went away (e.g. `pulsarctl ... | head`) is not a failure of the command.
fn ignore_broken_pipe(result: io::Result<()>) -> Result<()> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}
