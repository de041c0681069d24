//! # Namespace Command Handler
//!
//! This module handles the `namespaces` command group: reading, setting and
//! removing the dispatch rate policies of a namespace.

use crate::commands::shared::{
    CommandContext, CommandGroup, Invocation, Parsed, VerbSpec, dispatch_verb, parse_verb,
};
use crate::description::{LongDescription, Output};
use crate::errors::Result;
use crate::namespace::{DispatchRate, DispatchRateKind};

const TENANT_ADMIN: &str = "This command requires tenant admin permissions.";

const NAMESPACE_SCOPE: &str = "The namespace is given as <tenant>/<namespace>, or as <tenant>/<cluster>/<namespace> for legacy clusters.";

/// Example body returned by the dispatch rate getters.
pub const DISPATCH_RATE_OUTPUT: &str = "{
  \"dispatchThrottlingRateInMsg\" : 0,
  \"dispatchThrottlingRateInByte\" : 0,
  \"ratePeriodInSecond\" : 1,
  \"relativeToPublishRate\" : false
}";

/// Error outputs shared by every namespace verb.
pub fn namespace_errors() -> Vec<Output> {
    vec![
        Output::new(
            "the namespace name is not specified or the namespace name is specified more than one",
            "[✖]  the namespace name is not specified or the namespace name is specified more than one",
        ),
        Output::new(
            "the namespace does not exist",
            "[✖]  code: 404 reason: Namespace does not exist",
        ),
    ]
}

/// The `namespaces` command group.
pub fn namespace_group() -> CommandGroup {
    let kinds = [
        DispatchRateKind::Topic,
        DispatchRateKind::Subscription,
        DispatchRateKind::Replicator,
    ];
    let mut verbs = Vec::new();
    for kind in kinds {
        verbs.push(get_rate_verb(kind));
        verbs.push(set_rate_verb(kind));
    }
    verbs.push(remove_replicator_rate_verb());
    CommandGroup {
        name: "namespaces",
        short: "Operations about namespaces",
        verbs,
    }
}

fn get_rate_verb(kind: DispatchRateKind) -> VerbSpec {
    let (name, short) = match kind {
        DispatchRateKind::Topic => (
            "get-dispatch-rate",
            "Get the default message dispatch rate of a namespace",
        ),
        DispatchRateKind::Subscription => (
            "get-subscription-dispatch-rate",
            "Get the default subscription message dispatch rate of a namespace",
        ),
        DispatchRateKind::Replicator => (
            "get-replicator-dispatch-rate",
            "Get the default replicator message dispatch rate of a namespace",
        ),
    };
    let long = LongDescription::new(
        format!(
            "This command is used for getting the default {} of a namespace.",
            kind.label()
        ),
        TENANT_ADMIN,
    )
    .scope(NAMESPACE_SCOPE)
    .example(
        format!(
            "Get the default {} of the namespace <namespace-name>",
            kind.label()
        ),
        format!("pulsarctl namespaces {} <namespace>", name),
    )
    .output("normal output", DISPATCH_RATE_OUTPUT)
    .outputs(namespace_errors());
    VerbSpec::new(name, short, long).with_name_arg("namespace")
}

fn set_rate_verb(kind: DispatchRateKind) -> VerbSpec {
    let (name, short) = match kind {
        DispatchRateKind::Topic => (
            "set-dispatch-rate",
            "Set the default message dispatch rate of a namespace",
        ),
        DispatchRateKind::Subscription => (
            "set-subscription-dispatch-rate",
            "Set the default subscription message dispatch rate of a namespace",
        ),
        DispatchRateKind::Replicator => (
            "set-replicator-dispatch-rate",
            "Set the default replicator message dispatch rate of a namespace",
        ),
    };
    let long = LongDescription::new(
        format!(
            "This command is used for setting the default {} of a namespace.",
            kind.label()
        ),
        TENANT_ADMIN,
    )
    .scope(NAMESPACE_SCOPE)
    .example(
        format!(
            "Set the default {} of the namespace <namespace-name> by message rate",
            kind.label()
        ),
        format!("pulsarctl namespaces {} <namespace> --msg-rate 2", name),
    )
    .example(
        format!(
            "Set the default {} of the namespace <namespace-name> by byte rate over 10 seconds",
            kind.label()
        ),
        format!(
            "pulsarctl namespaces {} <namespace> --byte-rate 1024 --period 10",
            name
        ),
    )
    .output(
        "normal output",
        format!(
            "Set the default {} of the namespace <namespace-name> successfully",
            kind.label()
        ),
    )
    .outputs(namespace_errors());
    VerbSpec::new(name, short, long)
        .with_name_arg("namespace")
        .flags(|opts| {
            opts.optopt(
                "m",
                "msg-rate",
                "message dispatch rate per period, -1 to disable (default -1)",
                "RATE",
            );
            opts.optopt(
                "b",
                "byte-rate",
                "byte dispatch rate per period, -1 to disable (default -1)",
                "RATE",
            );
            opts.optopt(
                "p",
                "period",
                "dispatch rate period in seconds (default 1)",
                "SECONDS",
            );
            opts.optflag(
                "r",
                "relative-to-publish-rate",
                "dispatch rate is relative to the publish rate",
            );
        })
}

fn remove_replicator_rate_verb() -> VerbSpec {
    let long = LongDescription::new(
        "This command is used for removing the replicator message dispatch rate policy of a namespace.",
        TENANT_ADMIN,
    )
    .scope(NAMESPACE_SCOPE)
    .example(
        "Remove the replicator message dispatch rate of the namespace <namespace-name>",
        "pulsarctl namespaces remove-replicator-dispatch-rate <namespace>",
    )
    .output(
        "normal output",
        "Removed the replicator message dispatch rate of the namespace <namespace-name> successfully",
    )
    .outputs(namespace_errors());
    VerbSpec::new(
        "remove-replicator-dispatch-rate",
        "Remove the replicator message dispatch rate of a namespace",
        long,
    )
    .with_name_arg("namespace")
}

/// Handles all namespace-related commands.
///
/// # Arguments
/// * `args` - Command arguments after the group name (first element is the verb)
/// * `ctx` - Client and output sink
pub async fn handle_namespace_command(args: &[String], ctx: &mut CommandContext<'_>) -> Result<()> {
    let group = namespace_group();
    let invocation = match parse_verb(&group, args)? {
        Parsed::Help(text) => return ctx.print_line(&text),
        Parsed::Run(invocation) => invocation,
    };
    dispatch_verb!(invocation, ctx, {
        "get-dispatch-rate" => get_dispatch_rate,
        "set-dispatch-rate" => set_dispatch_rate,
        "get-subscription-dispatch-rate" => get_subscription_dispatch_rate,
        "set-subscription-dispatch-rate" => set_subscription_dispatch_rate,
        "get-replicator-dispatch-rate" => get_replicator_dispatch_rate,
        "set-replicator-dispatch-rate" => set_replicator_dispatch_rate,
        "remove-replicator-dispatch-rate" => remove_replicator_dispatch_rate,
    })
}

/// Builds the requested rate from the `set-*` flags.
fn rate_from_flags(invocation: &Invocation) -> Result<DispatchRate> {
    let defaults = DispatchRate::default();
    Ok(DispatchRate {
        dispatch_throttling_rate_in_msg: invocation
            .opt_or("msg-rate", defaults.dispatch_throttling_rate_in_msg)?,
        dispatch_throttling_rate_in_byte: invocation
            .opt_or("byte-rate", defaults.dispatch_throttling_rate_in_byte)?,
        rate_period_in_second: invocation.opt_or("period", defaults.rate_period_in_second)?,
        relative_to_publish_rate: invocation.flag("relative-to-publish-rate"),
    })
}

async fn get_dispatch_rate(ctx: &mut CommandContext<'_>, invocation: &Invocation) -> Result<()> {
    let namespace = invocation.namespace()?;
    let rate = ctx.client.namespaces().get_dispatch_rate(&namespace).await?;
    ctx.print(&rate)
}

async fn set_dispatch_rate(ctx: &mut CommandContext<'_>, invocation: &Invocation) -> Result<()> {
    let namespace = invocation.namespace()?;
    let rate = rate_from_flags(invocation)?;
    ctx.client
        .namespaces()
        .set_dispatch_rate(&namespace, &rate)
        .await?;
    ctx.print_line(&set_message(DispatchRateKind::Topic, &namespace))
}

async fn get_subscription_dispatch_rate(
    ctx: &mut CommandContext<'_>,
    invocation: &Invocation,
) -> Result<()> {
    let namespace = invocation.namespace()?;
    let rate = ctx
        .client
        .namespaces()
        .get_subscription_dispatch_rate(&namespace)
        .await?;
    ctx.print(&rate)
}

async fn set_subscription_dispatch_rate(
    ctx: &mut CommandContext<'_>,
    invocation: &Invocation,
) -> Result<()> {
    let namespace = invocation.namespace()?;
    let rate = rate_from_flags(invocation)?;
    ctx.client
        .namespaces()
        .set_subscription_dispatch_rate(&namespace, &rate)
        .await?;
    ctx.print_line(&set_message(DispatchRateKind::Subscription, &namespace))
}

async fn get_replicator_dispatch_rate(
    ctx: &mut CommandContext<'_>,
    invocation: &Invocation,
) -> Result<()> {
    let namespace = invocation.namespace()?;
    let rate = ctx
        .client
        .namespaces()
        .get_replicator_dispatch_rate(&namespace)
        .await?;
    ctx.print(&rate)
}

async fn set_replicator_dispatch_rate(
    ctx: &mut CommandContext<'_>,
    invocation: &Invocation,
) -> Result<()> {
    let namespace = invocation.namespace()?;
    let rate = rate_from_flags(invocation)?;
    ctx.client
        .namespaces()
        .set_replicator_dispatch_rate(&namespace, &rate)
        .await?;
    ctx.print_line(&set_message(DispatchRateKind::Replicator, &namespace))
}

async fn remove_replicator_dispatch_rate(
    ctx: &mut CommandContext<'_>,
    invocation: &Invocation,
) -> Result<()> {
    let namespace = invocation.namespace()?;
    ctx.client
        .namespaces()
        .remove_replicator_dispatch_rate(&namespace)
        .await?;
    ctx.print_line(&format!(
        "Removed the replicator message dispatch rate of the namespace {} successfully",
        namespace
    ))
}

fn set_message(kind: DispatchRateKind, namespace: &crate::NamespaceName) -> String {
    format!(
        "Set the default {} of the namespace {} successfully",
        kind.label(),
        namespace
    )
}
