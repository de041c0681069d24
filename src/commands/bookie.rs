//! # Bookie Command Handler
//!
//! This module handles the `bookie` command group, which talks to the HTTP
//! service of a single BookKeeper bookie.

use crate::bookie::{BookieType, FileType};
use crate::commands::shared::{
    CommandContext, CommandGroup, Invocation, Parsed, VerbSpec, dispatch_verb, parse_verb,
};
use crate::description::LongDescription;
use crate::errors::Result;

const NO_PERMISSION: &str = "This command does not need any permission.";

/// Example body returned by `bookie state`.
pub const STATE_OUTPUT: &str = "{
  \"running\" : true,
  \"readOnly\" : false,
  \"shuttingDown\" : false,
  \"availableForHighPriorityWrites\" : true
}";

/// Example body returned by `bookie gc-details`.
pub const GC_DETAILS_OUTPUT: &str = "[ {
  \"forceCompacting\" : false,
  \"majorCompacting\" : false,
  \"minorCompacting\" : false,
  \"lastMajorCompactionTime\" : 1598941496000,
  \"lastMinorCompactionTime\" : 1598941496000,
  \"majorCompactionCounter\" : 0,
  \"minorCompactionCounter\" : 0
} ]";

/// The `bookie` command group.
pub fn bookie_group() -> CommandGroup {
    let verbs = vec![
        VerbSpec::new(
            "list",
            "List the bookies of the cluster",
            LongDescription::new(
                "This command is used for listing the read-write or read-only bookies of the cluster.",
                NO_PERMISSION,
            )
            .example("List the read-write bookies", "pulsarctl bookie list")
            .example(
                "List the read-only bookies with their hostnames",
                "pulsarctl bookie list --type ro --show-hostnames",
            )
            .output("normal output", "{\n  \"127.0.0.1:3181\" : \"localhost\"\n}")
            .output(
                "the bookie type is invalid",
                "[✖]  invalid bookie type 'rx', expected one of: rw, ro",
            ),
        )
        .flags(|opts| {
            opts.optopt("t", "type", "bookie type, rw or ro (default rw)", "TYPE");
            opts.optflag("s", "show-hostnames", "resolve and show bookie hostnames");
        }),
        VerbSpec::new(
            "info",
            "Get the disk usage of the bookies of the cluster",
            LongDescription::new(
                "This command is used for getting the free and total disk space of every bookie in the cluster.",
                NO_PERMISSION,
            )
            .example("Get the disk usage of the bookies", "pulsarctl bookie info")
            .output(
                "normal output",
                "{\n  \"127.0.0.1:3181\" : \": {Free: 49120641024(49.12GB), Total: 250685575168(250.69GB)},\",\n  \"ClusterInfo: \" : \"{Free: 49120641024(49.12GB), Total: 250685575168(250.69GB)}\"\n}",
            ),
        ),
        VerbSpec::new(
            "last-log-mark",
            "Get the last log marker of a bookie",
            LongDescription::new(
                "This command is used for getting the last log marker of the journals of a bookie.",
                NO_PERMISSION,
            )
            .example("Get the last log marker", "pulsarctl bookie last-log-mark")
            .output(
                "normal output",
                "{\n  \"LastLogMark: Journal Id - 0(0.txn)\" : \"Pos - 0\"\n}",
            ),
        ),
        VerbSpec::new(
            "list-disk-file",
            "List the files on the disks of a bookie",
            LongDescription::new(
                "This command is used for listing the journal, entry log and index files of a bookie.",
                NO_PERMISSION,
            )
            .example("List all files", "pulsarctl bookie list-disk-file")
            .example(
                "List the journal files",
                "pulsarctl bookie list-disk-file --type journal",
            )
            .output(
                "normal output",
                "{\n  \"journal files\" : \"transaction log file\"\n}",
            ),
        )
        .flags(|opts| {
            opts.optopt(
                "t",
                "type",
                "file type: journal, entrylog or index (default all)",
                "TYPE",
            );
        }),
        VerbSpec::new(
            "expand-storage",
            "Expand the storage of a bookie",
            LongDescription::new(
                "This command is used for making a bookie pick up newly added ledger and index directories.",
                NO_PERMISSION,
            )
            .example("Expand the storage", "pulsarctl bookie expand-storage")
            .output("normal output", "Successfully expand the storage"),
        ),
        VerbSpec::new(
            "gc",
            "Trigger the garbage collection of a bookie",
            LongDescription::new(
                "This command is used for triggering a forced garbage collection on a bookie.",
                NO_PERMISSION,
            )
            .example("Trigger the garbage collection", "pulsarctl bookie gc")
            .output("normal output", "Successfully trigger the garbage collection"),
        ),
        VerbSpec::new(
            "gc-status",
            "Get the garbage collection status of a bookie",
            LongDescription::new(
                "This command is used for checking whether a forced garbage collection is running on a bookie.",
                NO_PERMISSION,
            )
            .example("Get the garbage collection status", "pulsarctl bookie gc-status")
            .output("normal output", "{\n  \"is_in_force_gc\" : \"false\"\n}"),
        ),
        VerbSpec::new(
            "gc-details",
            "Get the garbage collection details of a bookie",
            LongDescription::new(
                "This command is used for getting the compaction details of every ledger directory of a bookie.",
                NO_PERMISSION,
            )
            .example("Get the garbage collection details", "pulsarctl bookie gc-details")
            .output("normal output", GC_DETAILS_OUTPUT),
        ),
        VerbSpec::new(
            "state",
            "Get the state of a bookie",
            LongDescription::new(
                "This command is used for getting whether a bookie is running, read-only or shutting down.",
                NO_PERMISSION,
            )
            .example("Get the bookie state", "pulsarctl bookie state")
            .output("normal output", STATE_OUTPUT),
        ),
    ];
    CommandGroup {
        name: "bookie",
        short: "Operations about bookies",
        verbs,
    }
}

/// Handles all bookie-related commands.
///
/// # Arguments
/// * `args` - Command arguments after the group name (first element is the verb)
/// * `ctx` - Client and output sink
pub async fn handle_bookie_command(args: &[String], ctx: &mut CommandContext<'_>) -> Result<()> {
    let group = bookie_group();
    let invocation = match parse_verb(&group, args)? {
        Parsed::Help(text) => return ctx.print_line(&text),
        Parsed::Run(invocation) => invocation,
    };
    dispatch_verb!(invocation, ctx, {
        "list" => list,
        "info" => info,
        "last-log-mark" => last_log_mark,
        "list-disk-file" => list_disk_file,
        "expand-storage" => expand_storage,
        "gc" => gc,
        "gc-status" => gc_status,
        "gc-details" => gc_details,
        "state" => state,
    })
}

async fn list(ctx: &mut CommandContext<'_>, invocation: &Invocation) -> Result<()> {
    let bookie_type: BookieType = invocation.opt_or("type", BookieType::default())?;
    let show_hostnames = invocation.flag("show-hostnames");
    let bookies = ctx.client.bookie().list(bookie_type, show_hostnames).await?;
    ctx.print(&bookies)
}

async fn info(ctx: &mut CommandContext<'_>, _invocation: &Invocation) -> Result<()> {
    let info = ctx.client.bookie().info().await?;
    ctx.print(&info)
}

async fn last_log_mark(ctx: &mut CommandContext<'_>, _invocation: &Invocation) -> Result<()> {
    let marker = ctx.client.bookie().last_log_mark().await?;
    ctx.print(&marker)
}

async fn list_disk_file(ctx: &mut CommandContext<'_>, invocation: &Invocation) -> Result<()> {
    let file_type = invocation
        .matches
        .opt_str("type")
        .map(|value| value.parse::<FileType>())
        .transpose()?;
    let files = ctx.client.bookie().list_disk_file(file_type).await?;
    ctx.print(&files)
}

async fn expand_storage(ctx: &mut CommandContext<'_>, _invocation: &Invocation) -> Result<()> {
    ctx.client.bookie().expand_storage().await?;
    ctx.print_line("Successfully expand the storage")
}

async fn gc(ctx: &mut CommandContext<'_>, _invocation: &Invocation) -> Result<()> {
    ctx.client.bookie().gc().await?;
    ctx.print_line("Successfully trigger the garbage collection")
}

async fn gc_status(ctx: &mut CommandContext<'_>, _invocation: &Invocation) -> Result<()> {
    let status = ctx.client.bookie().gc_status().await?;
    ctx.print(&status)
}

async fn gc_details(ctx: &mut CommandContext<'_>, _invocation: &Invocation) -> Result<()> {
    let details = ctx.client.bookie().gc_details().await?;
    ctx.print(&details)
}

async fn state(ctx: &mut CommandContext<'_>, _invocation: &Invocation) -> Result<()> {
    let state = ctx.client.bookie().state().await?;
    ctx.print(&state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookie::{BookieState, GcStatus};

    #[test]
    fn state_example_round_trips() {
        let state: BookieState = serde_json::from_str(STATE_OUTPUT).unwrap();
        assert!(state.running && state.available_for_high_priority_writes);
        let expected: serde_json::Value = serde_json::from_str(STATE_OUTPUT).unwrap();
        assert_eq!(serde_json::to_value(state).unwrap(), expected);
    }

    #[test]
    fn gc_details_example_round_trips() {
        let details: Vec<GcStatus> = serde_json::from_str(GC_DETAILS_OUTPUT).unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].last_major_compaction_time, 1598941496000);
        let expected: serde_json::Value = serde_json::from_str(GC_DETAILS_OUTPUT).unwrap();
        assert_eq!(serde_json::to_value(&details).unwrap(), expected);
    }

    #[test]
    fn every_verb_has_help() {
        let group = bookie_group();
        for verb in &group.verbs {
            let help = verb.help(group.name);
            assert!(help.contains("USED FOR:"), "{} has no long help", verb.name);
            assert!(help.contains(&format!("pulsarctl bookie {}", verb.name)));
        }
    }
}
