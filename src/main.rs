// Draft advisor entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, terminal output stays clean JSON)
// 2. Load config
// 3. Read the draft snapshot JSON named on the command line
// 4. Build the ranking context and the LLM client
// 5. Rank, optionally tie-break, print the recommendation set as JSON

use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use snapcount::config;
use snapcount::draft::pick::{Pick, Player};
use snapcount::engine::{recommend, RankingContext};
use snapcount::llm::client::LlmClient;
use snapcount::valuation::scoring::Strategy;

/// Pre-fetched draft snapshot, produced by whatever polls the draft platform.
#[derive(Debug, Deserialize)]
struct Snapshot {
    catalog: Vec<Player>,
    #[serde(default)]
    picks: Vec<Pick>,
    pick_no: u32,
    team_on_clock: String,
    #[serde(default)]
    strategy: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let mut args = std::env::args().skip(1);
    let snapshot_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .context("usage: snapcount <snapshot.json> [strategy]")?;
    let strategy_arg = args.next();

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} roster slots",
        config.league.name,
        config.league.roster_positions.len()
    );

    let snapshot_text = std::fs::read_to_string(&snapshot_path)
        .with_context(|| format!("failed to read snapshot {}", snapshot_path.display()))?;
    let snapshot: Snapshot =
        serde_json::from_str(&snapshot_text).context("failed to parse snapshot JSON")?;
    info!(
        "Snapshot loaded: {} players, {} picks, pick #{}",
        snapshot.catalog.len(),
        snapshot.picks.len(),
        snapshot.pick_no
    );

    // CLI strategy wins over the snapshot's, which wins over the config's.
    let strategy = strategy_arg
        .or(snapshot.strategy)
        .map(|s| {
            Strategy::parse(&s).with_context(|| format!("unknown strategy `{s}`"))
        })
        .transpose()?
        .unwrap_or(config.advisor.default_strategy);

    let ctx = RankingContext {
        league_name: config.league.name.clone(),
        catalog: snapshot.catalog,
        picks: snapshot.picks,
        roster_positions: config.league.roster_positions.clone(),
        scoring: config.league.scoring.clone(),
        pick_no: snapshot.pick_no,
        strategy,
        team_on_clock: snapshot.team_on_clock,
    };

    let llm_client = LlmClient::from_config(&config);
    match &llm_client {
        LlmClient::Active(_) => info!("LLM tie-breaker active (API key configured)"),
        LlmClient::Disabled => info!("LLM tie-breaker disabled (no API key)"),
    }

    let set = recommend(&ctx, &llm_client)
        .await
        .context("ranking failed")?;
    info!(
        "Ranked {} candidates (ai_enabled={})",
        set.ranked.len(),
        set.ai_enabled
    );

    println!("{}", serde_json::to_string_pretty(&set)?);
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("snapcount=info,warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}
