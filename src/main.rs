use anyhow::{Context, Result, bail};
use assetdesk::model::AssetData;
use assetdesk::workflows::AlertAction;
use assetdesk::{AssetDesk, DeskConfig, EntityKind, SaveOutcome, check_connection};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "assetdesk")]
#[command(about = "Inspect and edit the IT asset desk")]
struct Cli {
    /// Directory holding the local JSON mirror
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the asset backend
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Do not contact the backend
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dashboard figures
    Metrics,
    /// Records of one kind as JSON
    List { kind: String },
    AddAsset {
        #[arg(long)]
        name: String,
        #[arg(long)]
        cost: Option<f64>,
        #[arg(long = "type", default_value = "laptop")]
        asset_type: String,
    },
    RenameAsset { id: String, name: String },
    Delete { kind: String, id: String },
    Alert {
        #[arg(value_enum)]
        action: AlertCommand,
        id: String,
    },
    /// Probe the backend
    Health,
    /// Ids that exist only locally
    Pending { kind: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum AlertCommand {
    Ack,
    Resolve,
    Dismiss,
}

impl From<AlertCommand> for AlertAction {
    fn from(command: AlertCommand) -> Self {
        match command {
            AlertCommand::Ack => AlertAction::Acknowledge,
            AlertCommand::Resolve => AlertAction::Resolve,
            AlertCommand::Dismiss => AlertAction::Dismiss,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let desk = AssetDesk::from_config(config)
        .await
        .context("failed to open the asset desk")?;

    match cli.command {
        Command::Metrics => print_json(&desk.metrics()),
        Command::List { kind } => {
            let kind = parse_kind(&kind)?;
            print_json(&desk.list_any(kind).await)
        }
        Command::AddAsset {
            name,
            cost,
            asset_type,
        } => {
            let mut draft = AssetData::named(name);
            draft.purchase_cost = cost;
            draft.asset_type = asset_type;
            let outcome = desk.save(draft, None).await;
            report_save(&outcome)
        }
        Command::RenameAsset { id, name } => {
            let Some(record) = desk.get::<AssetData>(&id).await else {
                bail!("no asset with id '{}'", id);
            };
            let mut draft = record.data.clone();
            draft.name = name;
            desk.begin_edit(record).await;
            let outcome = desk.submit(draft).await;
            report_save(&outcome)
        }
        Command::Delete { kind, id } => {
            let kind = parse_kind(&kind)?;
            if desk.delete_any(kind, &id).await {
                println!("deleted {} {}", kind, id);
            } else {
                println!("no {} with id '{}'", kind, id);
            }
            Ok(())
        }
        Command::Alert { action, id } => {
            let action = AlertAction::from(action);
            let changed = match action {
                AlertAction::Acknowledge => desk.acknowledge_alert(&id).await,
                AlertAction::Resolve => desk.resolve_alert(&id).await,
                AlertAction::Dismiss => desk.dismiss_alert(&id).await,
            }
            .with_context(|| format!("cannot update alert '{}'", id))?;
            if !changed {
                bail!("no alert with id '{}'", id);
            }
            println!("alert {} -> {}", id, action.target_status());
            Ok(())
        }
        Command::Health => {
            let remote = desk
                .config()
                .remote()
                .context("failed to build the remote client")?;
            print_json(&check_connection(remote.as_ref()).await)
        }
        Command::Pending { kind } => {
            let kind = parse_kind(&kind)?;
            print_json(&desk.pending_sync_any(kind).await)
        }
    }
}

fn build_config(cli: &Cli) -> Result<DeskConfig> {
    let mut config = DeskConfig::from_env().context("invalid environment configuration")?;
    if let Some(dir) = &cli.data_dir {
        config = config.data_dir(dir);
    }
    if let Some(url) = &cli.api_url {
        config = config.api_url(url);
    }
    if cli.offline {
        config = config.offline(true);
    }
    // A one-shot command never waits for a sync to settle.
    Ok(config.sync_settle(None))
}

fn parse_kind(raw: &str) -> Result<EntityKind> {
    raw.parse::<EntityKind>()
        .with_context(|| format!("expected one of: {}", kind_names()))
}

fn kind_names() -> String {
    EntityKind::ALL
        .iter()
        .map(|kind| kind.storage_key())
        .collect::<Vec<_>>()
        .join(", ")
}

fn report_save(outcome: &SaveOutcome<AssetData>) -> Result<()> {
    match outcome {
        SaveOutcome::Created { record, synced } | SaveOutcome::Updated { record, synced } => {
            let state = if *synced { "synced" } else { "pending sync" };
            println!("{} '{}' ({})", record.id, record.data.name, state);
            Ok(())
        }
        SaveOutcome::Skipped { id } => bail!("asset '{}' disappeared before saving", id),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{}", rendered);
    Ok(())
}
