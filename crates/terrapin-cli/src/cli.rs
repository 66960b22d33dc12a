//! Argument parsing, logging setup, and command dispatch.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use terrapin_config::DEFAULT_HOSTNAME;
use terrapin_output::{FormatMode, Formatter};
use terrapin_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::{Instrument, info_span};
use uuid::Uuid;

use crate::client::{AppContext, CliResult};
use crate::commands::api::handle_api;
use crate::commands::resource::handle_resource;
use crate::resources::{ORGANIZATION, PROJECT, RUN, SUBSCRIPTION, WORKSPACE};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Parses process arguments, installs logging, and executes the requested
/// command against standard output. Returns the process exit code.
pub async fn run() -> i32 {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let cli = match parse(std::env::args_os(), &mut stdout, &mut stderr) {
        Ok(cli) => cli,
        Err(exit_code) => return exit_code,
    };

    let logging = LoggingConfig {
        level: if cli.verbose { "debug" } else { DEFAULT_LOG_LEVEL },
        format: cli.log_format,
    };
    if let Err(err) = init_logging(&logging) {
        let _ = writeln!(stderr, "warning: {err}");
    }

    execute(cli, &mut stdout, &mut stderr).await
}

/// Like [`run`], but with explicit arguments and output streams and without
/// installing a log subscriber.
pub async fn run_from<I, T>(
    args: I,
    out: &mut (dyn Write + Send),
    err: &mut (dyn Write + Send),
) -> i32
where
    I: IntoIterator<Item = T> + Send,
    T: Into<OsString> + Clone,
{
    match parse(args, out, err) {
        Ok(cli) => execute(cli, out, err).await,
        Err(exit_code) => exit_code,
    }
}

fn parse<I, T>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> Result<Cli, i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|error| {
        let rendered = error.render().to_string();
        match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = write!(out, "{rendered}");
                0
            }
            _ => {
                let _ = write!(err, "{rendered}");
                2
            }
        }
    })
}

async fn execute(
    cli: Cli,
    out: &mut (dyn Write + Send),
    err: &mut (dyn Write + Send),
) -> i32 {
    let request_id = Uuid::new_v4().to_string();
    let (resource, action) = command_label(&cli.command);
    let span = info_span!("command", resource, action, request_id = %request_id);

    let result = dispatch(cli, &request_id, out).instrument(span).await;
    match result {
        Ok(()) => 0,
        Err(error) => {
            let _ = writeln!(err, "Error: {}", error.display_message());
            error.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, request_id: &str, out: &mut (dyn Write + Send)) -> CliResult<()> {
    let ctx = AppContext::from_cli(&cli, request_id)?;
    let mut out = Formatter::new(ctx.format, out);

    match cli.command {
        Command::Api(args) => handle_api(&ctx, &mut out, args).await,
        Command::Organization(command) => {
            handle_resource(&ctx, &mut out, &ORGANIZATION, command).await
        }
        Command::Workspace(command) => handle_resource(&ctx, &mut out, &WORKSPACE, command).await,
        Command::Subscription(command) => {
            handle_resource(&ctx, &mut out, &SUBSCRIPTION, command).await
        }
        Command::Run(command) => handle_resource(&ctx, &mut out, &RUN, command).await,
        Command::Project(command) => handle_resource(&ctx, &mut out, &PROJECT, command).await,
    }
}

#[derive(Parser)]
#[command(
    name = "terrapin",
    version,
    about = "Command-line client for JSON:API infrastructure-automation services"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "TERRAPIN_HOSTNAME",
        default_value = DEFAULT_HOSTNAME,
        help = "Service hostname; also selects the credentials used"
    )]
    pub(crate) hostname: String,
    #[arg(
        long,
        global = true,
        env = "TERRAPIN_ADDRESS",
        help = "Full base URL overriding https://<hostname>/api/v2/"
    )]
    pub(crate) address: Option<String>,
    #[arg(
        long,
        global = true,
        help = "API token; defaults to TF_TOKEN_<host>, TERRAPIN_TOKEN, or the credentials file"
    )]
    pub(crate) token: Option<String>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        env = "TERRAPIN_OUTPUT",
        default_value_t = FormatMode::Table,
        help = "Select output format: table or json"
    )]
    pub(crate) output: FormatMode,
    #[arg(
        long,
        global = true,
        env = "TERRAPIN_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        help = "Request timeout in seconds"
    )]
    pub(crate) timeout: u64,
    #[arg(long, short, global = true, help = "Log requests at debug level to stderr")]
    pub(crate) verbose: bool,
    #[arg(
        long,
        global = true,
        env = "TERRAPIN_LOG_FORMAT",
        default_value = "pretty",
        hide = true
    )]
    pub(crate) log_format: LogFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Call any API endpoint and print the parsed response.
    Api(ApiArgs),
    /// Organizations.
    #[command(subcommand)]
    Organization(ResourceCommand),
    /// Workspaces within an organization.
    #[command(subcommand)]
    Workspace(ResourceCommand),
    /// An organization's subscription.
    #[command(subcommand)]
    Subscription(ResourceCommand),
    /// Runs within a workspace.
    #[command(subcommand)]
    Run(ResourceCommand),
    /// Projects within an organization.
    #[command(subcommand)]
    Project(ResourceCommand),
}

#[derive(Args)]
pub(crate) struct ApiArgs {
    #[arg(help = "HTTP method: GET, POST, PATCH, PUT or DELETE")]
    pub(crate) method: String,
    #[arg(help = "Path relative to the API base, e.g. organizations/acme/workspaces")]
    pub(crate) path: String,
    #[arg(long, conflicts_with = "body_file", help = "JSON request body")]
    pub(crate) body: Option<String>,
    #[arg(long, help = "Read the JSON request body from a file")]
    pub(crate) body_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum ResourceCommand {
    /// Show one resource.
    Read {
        #[arg(help = "Resource identifier")]
        id: String,
    },
    /// List resources as a table.
    List {
        #[arg(long, help = "Identifier of the parent resource")]
        parent: Option<String>,
    },
    /// Delete one resource.
    Delete {
        #[arg(help = "Resource identifier")]
        id: String,
    },
}

/// Span labels for a command: the resource (or `api`) and the action.
const fn command_label(command: &Command) -> (&'static str, &'static str) {
    let (descriptor, command) = match command {
        Command::Api(_) => return ("api", "call"),
        Command::Organization(command) => (&ORGANIZATION, command),
        Command::Workspace(command) => (&WORKSPACE, command),
        Command::Subscription(command) => (&SUBSCRIPTION, command),
        Command::Run(command) => (&RUN, command),
        Command::Project(command) => (&PROJECT, command),
    };
    let action = match command {
        ResourceCommand::Read { .. } => "read",
        ResourceCommand::List { .. } => "list",
        ResourceCommand::Delete { .. } => "delete",
    };
    (descriptor.name, action)
}
