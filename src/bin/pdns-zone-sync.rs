use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use pdns_zone_sync::{
    PowerDnsClient, Reconciler, ZoneDesiredState,
    config::{ClientConfig, load_zone_config},
    reconcile::{drifted, plan, requires_replace},
    state::StateStore,
    today_utc,
    zone::synth::synthesize_create,
};
use serde_json::json;
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// PowerDNS server URL, without the /api/v1 suffix
    #[arg(long, env = "PDNS_ENDPOINT", value_name = "URL")]
    endpoint: Option<String>,
    /// PowerDNS API key
    #[arg(long, env = "PDNS_API_KEY", value_name = "KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// PowerDNS server ID
    #[arg(long, env = "PDNS_SERVER_ID", value_name = "ID", default_value = "localhost")]
    server_id: String,
    /// Accept invalid TLS certificates (needs the https-client feature)
    #[arg(long, env = "PDNS_SKIP_TLS_VERIFY")]
    skip_tls_verify: bool,
    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the changes `apply` would make, without contacting the server
    Plan(ZoneArgs),
    /// Create or update the zone and record the applied state
    Apply(ZoneArgs),
    /// Project the live zone and report drift against the applied state
    Read(StateArgs),
    /// Delete the zone and forget its state
    Destroy(StateArgs),
}

#[derive(Args, Debug)]
struct ZoneArgs {
    /// Desired zone configuration (JSON)
    #[arg(long, value_name = "PATH")]
    zone: PathBuf,
    #[command(flatten)]
    state: StateArgs,
}

#[derive(Args, Debug)]
struct StateArgs {
    /// Applied-state file
    #[arg(long, value_name = "PATH")]
    state: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    tokio::select! {
        res = run(&cli) => res,
        _ = shutdown_signal() => bail!("interrupted"),
    }
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Command::Plan(args) => {
            let desired = load_zone_config(&args.zone)?;
            let store = StateStore::new(&args.state.state);
            print_plan(&desired, store.load()?.as_ref())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Apply(args) => {
            let desired = load_zone_config(&args.zone)?;
            let store = StateStore::new(&args.state.state);
            let reconciler = reconciler(cli)?;

            let applied = match store.load()? {
                None => reconciler
                    .create(&desired, today_utc())
                    .await
                    .with_context(|| format!("failed to create zone {}", desired.name))?,
                Some(previous) if requires_replace(&desired, &previous) => reconciler
                    .replace(&desired, &previous, today_utc())
                    .await
                    .with_context(|| {
                        format!("failed to replace zone {} with {}", previous.name, desired.name)
                    })?,
                Some(previous) => reconciler
                    .update(&desired, &previous, today_utc())
                    .await
                    .with_context(|| format!("failed to update zone {}", desired.name))?,
            };

            store.save(&applied)?;
            info!(zone = %applied.name, serial = %applied.serial, "state saved");
            Ok(ExitCode::SUCCESS)
        }
        Command::Read(args) => {
            let store = StateStore::new(&args.state);
            let applied = require_state(&store)?;
            let live = reconciler(cli)?
                .read(&applied)
                .await
                .with_context(|| format!("failed to read zone {}", applied.name))?;

            println!("{}", serde_json::to_string_pretty(&live)?);
            if drifted(&live, &applied) {
                warn!(zone = %applied.name, "live zone differs from applied state");
                return Ok(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Destroy(args) => {
            let store = StateStore::new(&args.state);
            let applied = require_state(&store)?;
            reconciler(cli)?
                .delete(&applied.name)
                .await
                .with_context(|| format!("failed to delete zone {}", applied.name))?;
            store.remove()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_plan(desired: &ZoneDesiredState, previous: Option<&ZoneDesiredState>) -> Result<()> {
    let today = today_utc();
    let out = match previous {
        None => {
            let (payload, serial) = synthesize_create(desired, today)?;
            json!({ "action": "create", "serial": serial, "zone": payload })
        }
        Some(previous) if requires_replace(desired, previous) => {
            let (payload, serial) = synthesize_create(desired, today)?;
            json!({
                "action": "replace",
                "delete": previous.name,
                "serial": serial,
                "zone": payload,
            })
        }
        Some(previous) => {
            let plan = plan(desired, previous, today)?;
            let action = if plan.is_empty() { "none" } else { "update" };
            let (mutations, serial) = match plan.records {
                Some(records) => (records.mutations, records.serial),
                None => (Vec::new(), previous.serial.clone()),
            };
            json!({
                "action": action,
                "serial": serial,
                "rrsets": mutations,
                "attributes": plan.attributes_changed.then(|| json!({
                    "kind": desired.kind,
                    "dnssec": desired.dnssec,
                })),
            })
        }
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn require_state(store: &StateStore) -> Result<ZoneDesiredState> {
    store
        .load()?
        .with_context(|| format!("no applied state at {}", store.path().display()))
}

fn reconciler(cli: &Cli) -> Result<Reconciler<PowerDnsClient>> {
    let config = client_config(cli)?;
    let client = PowerDnsClient::from_config(&config).context("failed to build HTTP client")?;
    Ok(Reconciler::new(client))
}

fn client_config(cli: &Cli) -> Result<ClientConfig> {
    let Some(endpoint) = cli.endpoint.clone() else {
        bail!("--endpoint (or PDNS_ENDPOINT) is required");
    };
    let Some(api_key) = cli.api_key.clone() else {
        bail!("--api-key (or PDNS_API_KEY) is required");
    };

    Ok(ClientConfig {
        endpoint,
        api_key,
        server_id: cli.server_id.clone(),
        skip_tls_verify: cli.skip_tls_verify,
    })
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!("failed to install CTRL+C handler: {err}");
        std::future::pending::<()>().await;
    }
    info!("interrupt received");
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
