use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use lobby_scout::api::transport::McpTransport;
use lobby_scout::config::{Config, EngineConfig};
use lobby_scout::display::output::{display_error, display_info, display_lobby, display_match_history};
use lobby_scout::lobby::identities_from_chat_participants;
use lobby_scout::{LobbyAnalyzer, PlayerIdentity, PlayerStage, Region};
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "Lobby Scout")]
#[command(about = "Flag likely boosted or shared accounts in a champ-select lobby", long_about = None)]
struct Args {
    /// Riot IDs to analyze, in lobby order (Name#TAG)
    players: Vec<String>,

    /// Region (default: LOBBY_REGION or na)
    #[arg(short, long)]
    region: Option<String>,

    /// Read the roster from a saved LCU /chat/v5/participants response
    #[arg(long)]
    lobby_file: Option<PathBuf>,

    /// Number of recent matches to show per player (default: 20)
    #[arg(short, long, default_value = "20")]
    matches: usize,

    /// Print results as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,lobby_scout=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_roster(args: &Args) -> Result<Vec<PlayerIdentity>> {
    let mut roster = Vec::new();

    if let Some(path) = &args.lobby_file {
        let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let payload: serde_json::Value =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        roster.extend(identities_from_chat_participants(&payload));
    }

    for riot_id in &args.players {
        roster.push(PlayerIdentity::parse(riot_id).with_context(|| format!("'{}'", riot_id))?);
    }

    if roster.is_empty() {
        bail!("no players given; pass Name#TAG arguments or --lobby-file");
    }
    Ok(roster)
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(region) = &args.region {
        config.region = Region::normalize(region);
    }

    let roster = load_roster(&args)?;
    let requested = roster.len();
    if !args.json {
        display_info(&format!("Scouting {} players in region {}", requested, config.region));
    }

    let engine_config = EngineConfig {
        display_limit: args.matches,
        ..EngineConfig::default()
    };
    let transport = McpTransport::new(&config.mcp_url);
    let region = config.region;
    let (tx, rx) = mpsc::channel();

    let worker = thread::spawn(move || {
        let mut analyzer = LobbyAnalyzer::new(transport, engine_config);
        analyzer.analyze_lobby(&roster, region, Some(&tx))
    });

    let pb = ProgressBar::new(requested as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg}").unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    for event in rx {
        match event.stage {
            PlayerStage::Done => pb.inc(1),
            PlayerStage::Failed => {
                pb.inc(1);
                pb.println(format!("✗ {}: {}", event.player, event.message));
            }
            _ => {}
        }
        pb.set_message(format!("{} {}", event.player, event.message));
    }
    pb.finish_and_clear();

    let results = worker
        .join()
        .map_err(|_| anyhow::anyhow!("lobby analysis thread panicked"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    display_lobby(&results, requested);
    for result in &results {
        display_match_history(result);
    }

    Ok(())
}
