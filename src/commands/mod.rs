//! # Command Handlers
//!
//! This module contains the command groups of the pulsarctl CLI application.
//! Each group is implemented in a dedicated submodule.
//!
//! ## Structure
//!
//! - `namespace` - Namespace dispatch rate commands (get, set, remove)
//! - `bookie` - Bookie commands (list, info, gc, state, ...)
//! - `shared` - Verb tables, argument parsing and the output context
//! - `errors` - User-facing error messages and hints

pub mod bookie;
pub mod errors;
pub mod namespace;
pub mod shared;

pub use bookie::{bookie_group, handle_bookie_command};
pub use namespace::{handle_namespace_command, namespace_group};
pub use shared::CommandContext;

use crate::errors::{CtlError, Result};

const GROUPS: &[&str] = &["namespaces", "bookie"];

/// Runs the command named by `args`, the free arguments after the global options.
///
/// An empty argument list or `help` prints the top-level usage.
pub async fn run_command(args: &[String], ctx: &mut CommandContext<'_>) -> Result<()> {
    let Some(group) = args.first() else {
        return ctx.print_line(&usage());
    };
    match group.as_str() {
        "help" | "-h" | "--help" => ctx.print_line(&usage()),
        "namespaces" => handle_namespace_command(&args[1..], ctx).await,
        "bookie" => handle_bookie_command(&args[1..], ctx).await,
        other => Err(CtlError::UnknownCommand {
            scope: "command".to_string(),
            name: other.to_string(),
            available: GROUPS.iter().map(|group| group.to_string()).collect(),
        }),
    }
}

/// The top-level usage text.
pub fn usage() -> String {
    let groups = [namespace_group(), bookie_group()];
    let mut usage = String::from(
        "Usage: pulsarctl [options] <command> <subcommand> [args...]

Options:
  --config <path>               Config file (default: $HOME/.config/pulsarctl/config.yaml)
  --admin-service-url <url>     Pulsar admin service URL (default: http://localhost:8080)
  --bookie-service-url <url>    BookKeeper HTTP service URL (default: http://localhost:8080)
  --auth-token <token>          Bearer token sent with every request
  --tls-allow-insecure          Accept invalid TLS certificates
  --output <format>             Output format: json or yaml (default: json)
  --verbose                     Log requests and responses to stderr

Commands:
",
    );
    for group in &groups {
        usage.push_str(&format!("  {:<12}{}\n", group.name, group.short));
    }
    usage.push_str(
        "\nUse \"pulsarctl <command> --help\" for more information about a command.",
    );
    usage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_lists_every_group() {
        let usage = usage();
        for group in GROUPS {
            assert!(usage.contains(&format!("  {}", group)), "missing {}", group);
        }
        assert!(usage.contains("--admin-service-url"));
    }
}
