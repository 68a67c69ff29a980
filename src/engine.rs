// Engine orchestration: one immutable draft snapshot in, one ranked
// recommendation set out.
//
// The deterministic pass is pure and synchronous; the only suspension point
// is the optional tie-break call, and its failures never surface to callers.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::draft::needs::{roster_bye_weeks, team_needs};
use crate::draft::pick::{Pick, Player};
use crate::draft::pool::remaining_pool;
use crate::llm::client::{tiebreak, LlmClient, Reranker, TieBreakState};
use crate::valuation::rank::{rank, Recommendation};
use crate::valuation::scarcity::compute_scarcity;
use crate::valuation::scoring::{score_candidate, Strategy};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid ranking context for `{field}`: {message}")]
    InvalidContext { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Context and result types
// ---------------------------------------------------------------------------

/// Immutable snapshot of one draft moment. The engine never mutates it;
/// callers rebuild a fresh context for every pick.
#[derive(Debug, Clone)]
pub struct RankingContext {
    pub league_name: String,
    pub catalog: Vec<Player>,
    pub picks: Vec<Pick>,
    pub roster_positions: Vec<String>,
    /// League scoring settings, carried with the snapshot so consumers see
    /// the settings the projections were computed under.
    pub scoring: HashMap<String, f64>,
    /// Global pick number about to be made (1-based).
    pub pick_no: u32,
    pub strategy: Strategy,
    /// Roster id of the team on the clock.
    pub team_on_clock: String,
}

impl RankingContext {
    /// Current round, derived from the pick number and the number of
    /// distinct rosters seen in the pick log.
    pub fn current_round(&self) -> u32 {
        let teams = self
            .picks
            .iter()
            .map(|p| p.roster_id.as_str())
            .collect::<HashSet<_>>()
            .len()
            .max(1) as u32;
        self.pick_no.saturating_sub(1) / teams + 1
    }
}

/// The engine's output for one pick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub ranked: Vec<Recommendation>,
    /// Unix seconds.
    pub generated_at: i64,
    pub strategy: Strategy,
    /// True only when an AI reordering was actually applied.
    pub ai_enabled: bool,
}

// ---------------------------------------------------------------------------
// Deterministic pass
// ---------------------------------------------------------------------------

/// Rank the remaining pool for the team on the clock. Pure and synchronous.
///
/// An empty pool is success with an empty list; a malformed context
/// (empty roster template, `pick_no == 0`) fails fast.
pub fn rank_deterministic(ctx: &RankingContext) -> Result<Vec<Recommendation>, EngineError> {
    validate_context(ctx)?;

    let pool = remaining_pool(&ctx.catalog, &ctx.picks);
    if pool.is_empty() {
        debug!("pool exhausted, returning empty board");
        return Ok(Vec::new());
    }

    let needs = team_needs(
        &ctx.picks,
        &ctx.team_on_clock,
        &ctx.roster_positions,
        &ctx.catalog,
    );
    let byes = roster_bye_weeks(&ctx.picks, &ctx.team_on_clock, &ctx.catalog);
    let scarcity = compute_scarcity(&pool);

    let scored = pool
        .iter()
        .map(|player| {
            score_candidate(player, &needs, &scarcity, &byes, ctx.pick_no, ctx.strategy)
        })
        .collect();

    let ranked = rank(scored);
    debug!(
        pool = pool.len(),
        board = ranked.len(),
        pick_no = ctx.pick_no,
        "deterministic ranking complete"
    );
    Ok(ranked)
}

fn validate_context(ctx: &RankingContext) -> Result<(), EngineError> {
    if ctx.roster_positions.is_empty() {
        return Err(EngineError::InvalidContext {
            field: "roster_positions".into(),
            message: "roster template must not be empty".into(),
        });
    }
    if ctx.pick_no == 0 {
        return Err(EngineError::InvalidContext {
            field: "pick_no".into(),
            message: "pick numbers are 1-based".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Recommendation with optional tie-break
// ---------------------------------------------------------------------------

/// Produce a full recommendation set: deterministic pass, then an optional
/// tie-break when an LLM client is configured.
pub async fn recommend(
    ctx: &RankingContext,
    llm: &LlmClient,
) -> Result<RecommendationSet, EngineError> {
    match llm {
        LlmClient::Active(client) => recommend_with(ctx, Some(client)).await,
        LlmClient::Disabled => recommend_with(ctx, None).await,
    }
}

/// Like [`recommend`], but over any [`Reranker`]. `None` skips the tie-break.
pub async fn recommend_with(
    ctx: &RankingContext,
    reranker: Option<&dyn Reranker>,
) -> Result<RecommendationSet, EngineError> {
    let deterministic = rank_deterministic(ctx)?;

    let (ranked, ai_enabled) = match reranker {
        Some(r) => {
            let needs = team_needs(
                &ctx.picks,
                &ctx.team_on_clock,
                &ctx.roster_positions,
                &ctx.catalog,
            );
            tiebreak(
                r,
                &ctx.league_name,
                &ctx.team_on_clock,
                ctx.pick_no,
                ctx.current_round(),
                ctx.strategy,
                &needs,
                deterministic,
            )
            .await
        }
        None => {
            debug!(state = ?TieBreakState::DeterministicOnly, "no tie-break backend");
            (deterministic, false)
        }
    };

    Ok(RecommendationSet {
        ranked,
        generated_at: Utc::now().timestamp(),
        strategy: ctx.strategy,
        ai_enabled,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
