use std::path::PathBuf;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use pulsarctl::{
    AdminClient, ConfigOverrides, CtlConfig, CtlError,
    cli_utils::{self, OutputFormat},
    commands::{self, CommandContext, errors::format_cli_error},
    logging,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Config file (default: $HOME/.config/pulsarctl/config.yaml)")]
    config: String,
    #[arrrg(optional, "Pulsar admin service URL (default: http://localhost:8080)")]
    admin_service_url: String,
    #[arrrg(optional, "BookKeeper HTTP service URL (default: http://localhost:8080)")]
    bookie_service_url: String,
    #[arrrg(optional, "Bearer token sent with every request")]
    auth_token: String,
    #[arrrg(flag, "Accept invalid TLS certificates")]
    tls_allow_insecure: bool,
    #[arrrg(optional, "Output format: json or yaml (default: json)")]
    output: String,
    #[arrrg(flag, "Log requests and responses to stderr")]
    verbose: bool,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

async fn run(options: Options, free: Vec<String>) -> Result<(), CtlError> {
    let output = non_empty(options.output)
        .map(|value| value.parse::<OutputFormat>())
        .transpose()?;
    let config_path = non_empty(options.config).map(PathBuf::from);
    let overrides = ConfigOverrides {
        admin_service_url: non_empty(options.admin_service_url),
        bookie_service_url: non_empty(options.bookie_service_url),
        auth_token: non_empty(options.auth_token),
        tls_allow_insecure: options.tls_allow_insecure,
        output,
    };
    let config = CtlConfig::resolve(config_path.as_deref(), overrides)?;
    tracing::debug!(
        admin = %config.admin_service_url,
        bookie = %config.bookie_service_url,
        "resolved configuration"
    );

    let client = AdminClient::new(&config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut ctx = CommandContext::new(&client, config.output, &mut out);
    commands::run_command(&free, &mut ctx).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if matches!(
        std::env::args().nth(1).as_deref(),
        Some("-h" | "--help" | "-help")
    ) {
        if let Err(err) = cli_utils::write_line(&mut std::io::stdout().lock(), &commands::usage()) {
            cli_utils::exit_with_error(&format_cli_error(&err));
        }
        return;
    }

    let (options, free) =
        Options::from_command_line_relaxed("USAGE: pulsarctl [options] <command> [args...]");
    logging::init_cli_logger(options.verbose);

    if let Err(err) = run(options, free).await {
        cli_utils::exit_with_error(&format_cli_error(&err));
    }
}
