use std::path::{Path, PathBuf};

use anyhow::Context;
use lnr_lib::{
    ClientSession, Event, FarmClient, HttpTransport, JobState, Poller, PollerConfig, RenderKind,
};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, console::ConsoleHost};

mod config;
mod console;
mod driver;
mod operations;

/// Render scenes on the local network render farm
#[derive(StructOpt, Debug)]
#[structopt(name = "lnr")]
pub struct Opt {
    /// farm url
    #[structopt(long, env = "LNR_SERVER", default_value = "https://0.0.0.0:3001/")]
    server: String,

    #[structopt(long, env = "LNR_PASSWORD", hide_env_values = true)]
    password: String,

    /// command namespace on the farm
    #[structopt(long, env = "LNR_COMMAND", default_value = "farm")]
    command: String,

    /// time between two status requests
    #[structopt(long, default_value = "300")]
    interval_ms: u64,

    #[structopt(long, default_value = "30")]
    timeout_secs: u64,

    /// stop polling after this many failed status requests in a row
    #[structopt(long)]
    max_status_errors: Option<u32>,

    /// folder render data is extracted to, defaults to the scene's folder
    #[structopt(long, parse(from_os_str))]
    output: Option<PathBuf>,

    #[structopt(short, long)]
    verbose: bool,

    #[structopt(subcommand)]
    operation: Operation,
}

#[derive(Debug, StructOpt)]
enum Operation {
    Render(RenderOperation),
    Status(StatusOperation),
    Cancel(CancelOperation),
    Retrieve(RetrieveOperation),
}

/// Submit a scene and wait for the rendered result
#[derive(Debug, StructOpt)]
struct RenderOperation {
    #[structopt(name = "SCENE", parse(from_os_str))]
    scene: PathBuf,
    /// render the whole frame range instead of the current frame
    #[structopt(long)]
    animation: bool,
}

/// Print the farm's current progress
#[derive(Debug, StructOpt)]
struct StatusOperation {}

/// Cancel the job running on the farm
#[derive(Debug, StructOpt)]
struct CancelOperation {}

/// Fetch the render data of a finished job
#[derive(Debug, StructOpt)]
struct RetrieveOperation {
    #[structopt(name = "HANDLE")]
    handle: String,
    #[structopt(name = "FOLDER", parse(from_os_str))]
    folder: PathBuf,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    init_logging(opt.verbose);
    let config = Config::from_opt(&opt)?;

    let transport = HttpTransport::new(&config.server, config.timeout)
        .context("could not build http client")?;
    let client = FarmClient::new(transport, config.credentials.clone());

    match opt.operation {
        Operation::Render(op) => render(client, &config, &op)?,
        Operation::Status(_) => println!("{}", operations::status(&client)),
        Operation::Cancel(_) => println!("{}", operations::cancel(&client)),
        Operation::Retrieve(op) => {
            println!("{}", operations::retrieve(&client, &op.handle, &op.folder))
        }
    }
    Ok(())
}

fn render(
    client: FarmClient<HttpTransport>,
    config: &Config,
    op: &RenderOperation,
) -> anyhow::Result<()> {
    let scene = op
        .scene
        .canonicalize()
        .with_context(|| format!("could not find scene {}", op.scene.display()))?;
    let output = match &config.output {
        Some(output) => output.clone(),
        None => scene.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    let mut poller_config = PollerConfig::new(&output);
    poller_config.max_status_errors = config.max_status_errors;
    let mut poller = Poller::new(client, poller_config);
    let mut session = ClientSession::new();
    let mut host = ConsoleHost::new(&scene, &output);

    let kind = if op.animation {
        RenderKind::Animation
    } else {
        RenderKind::Still
    };
    match poller.submit(&mut session, &mut host, kind)? {
        Event::Submitted(handle) => info!("watching job {}", handle),
        _ => anyhow::bail!("the farm did not accept the render"),
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("could not start runtime")?;
    let state = runtime.block_on(driver::drive(
        &mut poller,
        &mut session,
        &mut host,
        config.interval,
    ));

    match state {
        JobState::Completed { result } => {
            println!("render result: {}", result.display());
            Ok(())
        }
        JobState::Idle => Ok(()),
        JobState::Failed { reason } => anyhow::bail!("render failed: {}", reason),
        JobState::Polling | JobState::Retrieving => {
            anyhow::bail!("stopped watching the job, it may still be running on the farm")
        }
    }
}
