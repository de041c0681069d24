//! Long-form help text for verbs.
//!
//! A [`LongDescription`] renders as four sections (USED FOR, REQUIRED
//! PERMISSION, EXAMPLES, OUTPUT), with an optional SCOPE section after the
//! permission.  Example outputs are shown indented under a `#` caption.

use std::fmt::{Display, Formatter, Result as FmtResult};

const INDENT: &str = "    ";

/// One invocation shown in the EXAMPLES section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// What the example does.
    pub desc: String,
    /// The command line.
    pub command: String,
}

/// One possible output shown in the OUTPUT section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// When this output is produced.
    pub desc: String,
    /// The output itself, possibly spanning several lines.
    pub out: String,
}

impl Output {
    /// Creates an output entry.
    pub fn new(desc: impl Into<String>, out: impl Into<String>) -> Self {
        Self {
            desc: desc.into(),
            out: out.into(),
        }
    }
}

/// The long help of a verb.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongDescription {
    /// What the command is for.
    pub used_for: String,
    /// Which permission the caller needs.
    pub permission: String,
    /// Optional scope note.
    pub scope: Option<String>,
    /// Example invocations.
    pub examples: Vec<Example>,
    /// Example outputs, the success case first.
    pub outputs: Vec<Output>,
}

impl LongDescription {
    /// Starts a description with its purpose and required permission.
    pub fn new(used_for: impl Into<String>, permission: impl Into<String>) -> Self {
        Self {
            used_for: used_for.into(),
            permission: permission.into(),
            ..Self::default()
        }
    }

    /// Sets the scope note.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Adds an example invocation.
    pub fn example(mut self, desc: impl Into<String>, command: impl Into<String>) -> Self {
        self.examples.push(Example {
            desc: desc.into(),
            command: command.into(),
        });
        self
    }

    /// Adds an example output.
    pub fn output(mut self, desc: impl Into<String>, out: impl Into<String>) -> Self {
        self.outputs.push(Output::new(desc, out));
        self
    }

    /// Adds several example outputs, typically a group's shared error outputs.
    pub fn outputs(mut self, outputs: impl IntoIterator<Item = Output>) -> Self {
        self.outputs.extend(outputs);
        self
    }
}

impl Display for LongDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "USED FOR:")?;
        writeln!(f, "{}{}", INDENT, self.used_for)?;
        writeln!(f)?;
        writeln!(f, "REQUIRED PERMISSION:")?;
        writeln!(f, "{}{}", INDENT, self.permission)?;
        writeln!(f)?;
        if let Some(scope) = &self.scope {
            writeln!(f, "SCOPE:")?;
            writeln!(f, "{}{}", INDENT, scope)?;
            writeln!(f)?;
        }
        writeln!(f, "EXAMPLES:")?;
        for example in &self.examples {
            writeln!(f, "{}#{}", INDENT, example.desc)?;
            writeln!(f, "{}{}", INDENT, example.command)?;
            writeln!(f)?;
        }
        writeln!(f, "OUTPUT:")?;
        for output in &self.outputs {
            writeln!(f, "{}#{}", INDENT, output.desc)?;
            for line in output.out.lines() {
                writeln!(f, "{}{}", INDENT, line)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
