// Deterministic multi-factor candidate scoring.
//
// Combines VORP, ADP value, roster need, positional scarcity, bye-week
// overlap, injury risk, and tier-based upside into one weighted score.
// Every constant here is a fixed lookup so the model stays auditable:
// the same context always produces the same score.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::draft::needs::TeamNeeds;
use crate::draft::pick::{Player, Position};
use crate::valuation::scarcity::{scarcity_score, ScarcityEntry, SCARCITY_SCALE};

// ---------------------------------------------------------------------------
// Strategy and weight vectors
// ---------------------------------------------------------------------------

/// Named weighting profile controlling the scorer's emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Emphasize certainty: heavier VORP and need, harsher injury penalty.
    Safe,
    /// Neutral blend.
    #[default]
    Balanced,
    /// Emphasize ceiling: heavier upside bonus and scarcity.
    Upside,
}

impl Strategy {
    /// Parse a strategy selector. Unrecognized strings are rejected rather
    /// than silently defaulting; the caller decides the fallback.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "safe" => Some(Strategy::Safe),
            "balanced" => Some(Strategy::Balanced),
            "upside" => Some(Strategy::Upside),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Safe => "safe",
            Strategy::Balanced => "balanced",
            Strategy::Upside => "upside",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The seven weights (w1..w7) applied to the scoring terms, in order:
/// VORP, ADP discount, need boost, scarcity boost, bye penalty,
/// injury penalty, upside bonus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub vorp: f64,
    pub adp_discount: f64,
    pub need_boost: f64,
    pub scarcity_boost: f64,
    pub bye_penalty: f64,
    pub injury_penalty: f64,
    pub upside_bonus: f64,
}

/// Fixed weight vector per strategy.
pub fn strategy_weights(strategy: Strategy) -> Weights {
    match strategy {
        Strategy::Safe => Weights {
            vorp: 1.1,
            adp_discount: 0.30,
            need_boost: 0.6,
            scarcity_boost: 0.25,
            bye_penalty: 0.08,
            injury_penalty: 0.18,
            upside_bonus: 0.05,
        },
        Strategy::Balanced => Weights {
            vorp: 1.0,
            adp_discount: 0.35,
            need_boost: 0.5,
            scarcity_boost: 0.30,
            bye_penalty: 0.05,
            injury_penalty: 0.15,
            upside_bonus: 0.10,
        },
        Strategy::Upside => Weights {
            vorp: 1.0,
            adp_discount: 0.35,
            need_boost: 0.4,
            scarcity_boost: 0.35,
            bye_penalty: 0.03,
            injury_penalty: 0.10,
            upside_bonus: 0.25,
        },
    }
}

// ---------------------------------------------------------------------------
// Replacement baselines
// ---------------------------------------------------------------------------

/// Expected season output of a replacement-level player at each position.
/// Unknown-position candidates have no baseline and contribute zero VORP.
pub fn replacement_baseline(pos: Position) -> Option<f64> {
    match pos {
        Position::Qb => Some(200.0),
        Position::Rb => Some(150.0),
        Position::Wr => Some(130.0),
        Position::Te => Some(75.0),
        Position::Kicker => Some(60.0),
        Position::Defense => Some(50.0),
        Position::Unknown => None,
    }
}

// ---------------------------------------------------------------------------
// Fit labels
// ---------------------------------------------------------------------------

/// Categorical explanation tag attached to a recommendation.
/// `Stack` is only ever produced by the AI tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    Value,
    Need,
    Stack,
    Upside,
    Safe,
}

impl Fit {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "value" => Some(Fit::Value),
            "need" => Some(Fit::Need),
            "stack" => Some(Fit::Stack),
            "upside" => Some(Fit::Upside),
            "safe" => Some(Fit::Safe),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Candidate score
// ---------------------------------------------------------------------------

/// One scored candidate with every sub-score retained for explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub player_id: String,
    pub full_name: String,
    pub pos: Position,
    #[serde(default)]
    pub team: Option<String>,
    pub score: f64,
    pub vorp: f64,
    pub adp_discount: f64,
    pub need_boost: f64,
    pub scarcity_boost: f64,
    pub bye_penalty: f64,
    pub injury_penalty: f64,
    pub upside_bonus: f64,
    pub reason: String,
    pub fit: Fit,
}

/// Bye-week overlap penalty: exact bye-week equality against the roster's
/// already-drafted players. One overlap is tolerable, a second costs 10,
/// three or more cost 20.
fn bye_overlap_penalty(candidate_bye: Option<u32>, roster_byes: &[u32]) -> f64 {
    let Some(bye) = candidate_bye else {
        return 0.0;
    };
    let overlaps = roster_byes.iter().filter(|&&b| b == bye).count();
    match overlaps {
        0 | 1 => 0.0,
        2 => 10.0,
        _ => 20.0,
    }
}

/// Score one candidate against the current draft situation.
///
/// Per-candidate defects (unknown position, missing ADP or tier) degrade to
/// zero contributions; scoring a candidate never fails.
pub fn score_candidate(
    player: &Player,
    needs: &TeamNeeds,
    scarcity: &HashMap<Position, ScarcityEntry>,
    roster_byes: &[u32],
    pick_no: u32,
    strategy: Strategy,
) -> CandidateScore {
    let w = strategy_weights(strategy);

    let vorp = replacement_baseline(player.pos)
        .map(|baseline| (player.projection_baseline - baseline).max(0.0))
        .unwrap_or(0.0);

    let adp_discount = player
        .adp
        .map(|adp| (adp - pick_no as f64).max(0.0))
        .unwrap_or(0.0);

    let need_boost = needs.boost(player.pos);

    let scarcity_boost = scarcity_score(scarcity, player.pos) * SCARCITY_SCALE;

    let bye_penalty = bye_overlap_penalty(player.bye_week, roster_byes);

    let injury_penalty = player.injury_status.penalty();

    let upside_bonus = player
        .tier
        .filter(|&t| t > 0)
        .map(|t| (1.0 / t as f64) * 20.0)
        .unwrap_or(0.0);

    let score = vorp * w.vorp
        + adp_discount * w.adp_discount
        + need_boost * w.need_boost
        + scarcity_boost * w.scarcity_boost
        - bye_penalty * w.bye_penalty
        - injury_penalty * w.injury_penalty
        + upside_bonus * w.upside_bonus;

    let reason = derive_reason(vorp, adp_discount, need_boost, scarcity_boost, upside_bonus);
    let fit = derive_fit(need_boost, upside_bonus, strategy);

    CandidateScore {
        player_id: player.player_id.clone(),
        full_name: player.full_name.clone(),
        pos: player.pos,
        team: player.team.clone(),
        score,
        vorp,
        adp_discount,
        need_boost,
        scarcity_boost,
        bye_penalty,
        injury_penalty,
        upside_bonus,
        reason,
        fit,
    }
}

// ---------------------------------------------------------------------------
// Reason and fit derivation
// ---------------------------------------------------------------------------

const VORP_REASON_THRESHOLD: f64 = 50.0;
const ADP_REASON_THRESHOLD: f64 = 15.0;
const NEED_REASON_THRESHOLD: f64 = 0.8;
const SCARCITY_REASON_THRESHOLD: f64 = 35.0;
const UPSIDE_REASON_THRESHOLD: f64 = 10.0;

/// Name the strongest sub-scores, capped at two, in fixed priority order.
fn derive_reason(
    vorp: f64,
    adp_discount: f64,
    need_boost: f64,
    scarcity_boost: f64,
    upside_bonus: f64,
) -> String {
    let mut reasons: Vec<&str> = Vec::with_capacity(2);

    let checks: [(f64, f64, &str); 5] = [
        (vorp, VORP_REASON_THRESHOLD, "High VORP"),
        (adp_discount, ADP_REASON_THRESHOLD, "Falling past ADP"),
        (need_boost, NEED_REASON_THRESHOLD, "Fills roster need"),
        (scarcity_boost, SCARCITY_REASON_THRESHOLD, "Position running thin"),
        (upside_bonus, UPSIDE_REASON_THRESHOLD, "League-winning upside"),
    ];

    for (value, threshold, label) in checks {
        if value > threshold && reasons.len() < 2 {
            reasons.push(label);
        }
    }

    if reasons.is_empty() {
        "Solid pick".to_string()
    } else {
        reasons.join(", ")
    }
}

/// Fit label priority: need-dominant, then upside-dominant, then the
/// strategy's own flavor.
fn derive_fit(need_boost: f64, upside_bonus: f64, strategy: Strategy) -> Fit {
    if need_boost > NEED_REASON_THRESHOLD && need_boost >= upside_bonus {
        Fit::Need
    } else if upside_bonus > UPSIDE_REASON_THRESHOLD {
        Fit::Upside
    } else if strategy == Strategy::Safe {
        Fit::Safe
    } else {
        Fit::Value
    }
}
