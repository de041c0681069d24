//! # Shared Command Utilities
//!
//! Verb tables, argument parsing and output helpers used by every command
//! group.  A group is a list of [`VerbSpec`]s; [`parse_verb`] turns the raw
//! arguments after the group name into either help text or an
//! [`Invocation`] that the group then dispatches with [`dispatch_verb`].

use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

use getopts::{Matches, Options};
use serde::Serialize;

use crate::cli_utils::{self, OutputFormat};
use crate::description::LongDescription;
use crate::errors::{CtlError, Result};
use crate::http_utils::AdminClient;
use crate::namespace::NamespaceName;

/// Everything a verb handler needs: the client, the output sink and its format.
pub struct CommandContext<'a> {
    /// Client for the admin and bookie endpoints.
    pub client: &'a AdminClient,
    /// Rendering of decoded results.
    pub output: OutputFormat,
    /// Where results and help text are written.
    pub out: &'a mut dyn Write,
}

impl<'a> CommandContext<'a> {
    /// Creates a context writing to `out`.
    pub fn new(client: &'a AdminClient, output: OutputFormat, out: &'a mut dyn Write) -> Self {
        Self {
            client,
            output,
            out,
        }
    }

    /// Writes a decoded result in the configured format.
    pub fn print<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        cli_utils::write_formatted(&mut *self.out, value, self.output)
    }

    /// Writes a plain line of text.
    pub fn print_line(&mut self, message: &str) -> Result<()> {
        cli_utils::write_line(&mut *self.out, message)
    }
}

/// Whether a verb takes a positional resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameArg {
    /// No positional arguments are accepted.
    None,
    /// Exactly one positional argument naming a resource of this kind.
    Required(&'static str),
}

/// Static description of one verb: its name, help and flags.
pub struct VerbSpec {
    /// The verb as typed on the command line.
    pub name: &'static str,
    /// One-line description shown in group listings.
    pub short: &'static str,
    /// Long help shown by `<verb> --help`.
    pub long: LongDescription,
    /// Positional argument rule.
    pub name_arg: NameArg,
    /// Flags accepted after the verb.
    pub options: Options,
}

impl VerbSpec {
    /// Creates a verb with no positional argument and only `-h/--help`.
    pub fn new(name: &'static str, short: &'static str, long: LongDescription) -> Self {
        let mut options = Options::new();
        options.optflag("h", "help", "print help for this command");
        Self {
            name,
            short,
            long,
            name_arg: NameArg::None,
            options,
        }
    }

    /// Requires one positional name of the given kind.
    pub fn with_name_arg(mut self, kind: &'static str) -> Self {
        self.name_arg = NameArg::Required(kind);
        self
    }

    /// Registers additional flags.
    pub fn flags(mut self, register: impl FnOnce(&mut Options)) -> Self {
        register(&mut self.options);
        self
    }

    /// The synopsis line, e.g. `pulsarctl namespaces get-dispatch-rate <namespace> [flags]`.
    pub fn synopsis(&self, group: &str) -> String {
        match self.name_arg {
            NameArg::None => format!("pulsarctl {} {} [flags]", group, self.name),
            NameArg::Required(kind) => {
                format!("pulsarctl {} {} <{}> [flags]", group, self.name, kind)
            }
        }
    }

    /// The full help text of the verb.
    pub fn help(&self, group: &str) -> String {
        let brief = format!("USAGE:\n    {}", self.synopsis(group));
        format!(
            "{}\n\n{}{}",
            self.short,
            self.long,
            self.options.usage(&brief)
        )
    }
}

/// A named set of verbs, e.g. `namespaces` or `bookie`.
pub struct CommandGroup {
    /// The group as typed on the command line.
    pub name: &'static str,
    /// One-line description shown in the top-level listing.
    pub short: &'static str,
    /// The verbs of the group.
    pub verbs: Vec<VerbSpec>,
}

impl CommandGroup {
    /// Looks up a verb by name.
    pub fn verb(&self, name: &str) -> Option<&VerbSpec> {
        self.verbs.iter().find(|verb| verb.name == name)
    }

    /// All verb names, in declaration order.
    pub fn verb_names(&self) -> Vec<String> {
        self.verbs.iter().map(|verb| verb.name.to_string()).collect()
    }

    /// The group listing shown by `pulsarctl <group>`.
    pub fn usage(&self) -> String {
        let width = self
            .verbs
            .iter()
            .map(|verb| verb.name.len())
            .max()
            .unwrap_or(0);
        let mut usage = format!(
            "{}\n\nUSAGE:\n    pulsarctl {} <command> [args...]\n\nCOMMANDS:\n",
            self.short, self.name
        );
        for verb in &self.verbs {
            usage.push_str(&format!(
                "    {:width$}  {}\n",
                verb.name,
                verb.short,
                width = width
            ));
        }
        usage.push_str(&format!(
            "\nUse \"pulsarctl {} <command> --help\" for more information about a command.",
            self.name
        ));
        usage
    }
}

/// A verb ready to run: its name, positional name and parsed flags.
#[derive(Debug)]
pub struct Invocation {
    /// The verb being run.
    pub verb: &'static str,
    /// The positional resource name, when the verb takes one.
    pub name: Option<String>,
    /// The parsed flags.
    pub matches: Matches,
}

impl Invocation {
    /// The positional resource name.
    pub fn name(&self) -> Result<&str> {
        self.name.as_deref().ok_or_else(|| {
            CtlError::InvalidArgument(format!("the {} command requires a name", self.verb))
        })
    }

    /// The positional name parsed as a namespace.
    pub fn namespace(&self) -> Result<NamespaceName> {
        Ok(self.name()?.parse()?)
    }

    /// Parses the value of `flag`, or returns `default` when the flag is absent.
    pub fn opt_or<T>(&self, flag: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.matches.opt_str(flag) {
            Some(value) => value.parse().map_err(|e: T::Err| {
                CtlError::InvalidArgument(format!("invalid value '{}' for --{}: {}", value, flag, e))
            }),
            None => Ok(default),
        }
    }

    /// Whether a boolean flag was given.
    pub fn flag(&self, flag: &str) -> bool {
        self.matches.opt_present(flag)
    }
}

/// Outcome of parsing the arguments after a group name.
#[derive(Debug)]
pub enum Parsed {
    /// Help was requested; print this text.
    Help(String),
    /// Run this verb.
    Run(Invocation),
}

fn is_help(arg: &str) -> bool {
    matches!(arg, "help" | "-h" | "--help")
}

/// Resolves the verb, parses its flags and checks the positional argument count.
///
/// All validation happens here, before any request is made.
pub fn parse_verb(group: &CommandGroup, args: &[String]) -> Result<Parsed> {
    let Some(verb_name) = args.first() else {
        return Ok(Parsed::Help(group.usage()));
    };
    if is_help(verb_name) {
        return Ok(Parsed::Help(group.usage()));
    }
    let verb = group
        .verb(verb_name)
        .ok_or_else(|| CtlError::UnknownCommand {
            scope: format!("{} command", group.name),
            name: verb_name.clone(),
            available: group.verb_names(),
        })?;

    let matches = verb.options.parse(&args[1..])?;
    if matches.opt_present("help") {
        return Ok(Parsed::Help(verb.help(group.name)));
    }

    let name = match verb.name_arg {
        NameArg::None => {
            if let Some(extra) = matches.free.first() {
                return Err(CtlError::InvalidArgument(format!(
                    "the {} command does not accept positional arguments, got '{}'",
                    verb.name, extra
                )));
            }
            None
        }
        NameArg::Required(kind) => {
            if matches.free.len() != 1 {
                return Err(CtlError::InvalidArgument(format!(
                    "the {kind} name is not specified or the {kind} name is specified more than one"
                )));
            }
            Some(matches.free[0].clone())
        }
    };

    Ok(Parsed::Run(Invocation {
        verb: verb.name,
        name,
        matches,
    }))
}

/// Macro to dispatch a parsed [`Invocation`] to its handler.
macro_rules! dispatch_verb {
    ($invocation:expr, $ctx:expr, {
        $($verb:literal => $handler:expr),* $(,)?
    }) => {
        match $invocation.verb {
            $(
                $verb => $handler($ctx, &$invocation).await,
            )*
            other => Err(crate::errors::CtlError::UnknownCommand {
                scope: "command".to_string(),
                name: other.to_string(),
                available: vec![$($verb.to_string()),*],
            }),
        }
    };
}

pub(crate) use dispatch_verb;

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn group() -> CommandGroup {
        CommandGroup {
            name: "things",
            short: "Operations on things",
            verbs: vec![
                VerbSpec::new(
                    "get",
                    "Get a thing",
                    LongDescription::new("Getting things.", "None."),
                )
                .with_name_arg("thing")
                .flags(|opts| {
                    opts.optopt("c", "count", "how many", "COUNT");
                }),
                VerbSpec::new(
                    "list",
                    "List things",
                    LongDescription::new("Listing things.", "None."),
                ),
            ],
        }
    }

    fn run(parsed: Parsed) -> Invocation {
        match parsed {
            Parsed::Run(invocation) => invocation,
            Parsed::Help(text) => panic!("expected invocation, got help:\n{}", text),
        }
    }

    #[test]
    fn empty_args_show_group_usage() {
        let Parsed::Help(text) = parse_verb(&group(), &[]).unwrap() else {
            panic!("expected help");
        };
        assert!(text.contains("pulsarctl things <command>"));
        assert!(text.contains("    get   Get a thing\n"));
        assert!(text.contains("    list  List things\n"));
    }

    #[test]
    fn verb_help_includes_long_description_and_flags() {
        let Parsed::Help(text) = parse_verb(&group(), &args(&["get", "--help"])).unwrap() else {
            panic!("expected help");
        };
        assert!(text.starts_with("Get a thing\n\nUSED FOR:\n    Getting things."));
        assert!(text.contains("USAGE:\n    pulsarctl things get <thing> [flags]"));
        assert!(text.contains("--count COUNT"));
    }

    #[test]
    fn parses_name_and_flags() {
        let invocation = run(parse_verb(&group(), &args(&["get", "a", "--count", "3"])).unwrap());
        assert_eq!(invocation.verb, "get");
        assert_eq!(invocation.name().unwrap(), "a");
        assert_eq!(invocation.opt_or("count", 1u32).unwrap(), 3);
    }

    #[test]
    fn missing_flag_uses_default() {
        let invocation = run(parse_verb(&group(), &args(&["get", "a"])).unwrap());
        assert_eq!(invocation.opt_or("count", -1i64).unwrap(), -1);
    }

    #[test]
    fn bad_flag_value_is_reported() {
        let invocation = run(parse_verb(&group(), &args(&["get", "a", "-c", "lots"])).unwrap());
        let err = invocation.opt_or("count", 1u32).unwrap_err();
        assert!(err.to_string().starts_with("invalid value 'lots' for --count"));
    }

    #[test]
    fn name_count_is_enforced() {
        let err = parse_verb(&group(), &args(&["get"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "the thing name is not specified or the thing name is specified more than one"
        );
        assert!(parse_verb(&group(), &args(&["get", "a", "b"])).is_err());
        assert!(parse_verb(&group(), &args(&["list", "a"])).is_err());
    }

    #[test]
    fn unknown_verb_and_flag_are_errors() {
        let err = parse_verb(&group(), &args(&["destroy"])).unwrap_err();
        assert!(matches!(err, CtlError::UnknownCommand { .. }));
        let err = parse_verb(&group(), &args(&["list", "--bogus"])).unwrap_err();
        assert!(matches!(err, CtlError::Flags(_)));
    }
}
