// Ranking: order scored candidates, compute edges, truncate to the board.

use serde::{Deserialize, Serialize};

use crate::draft::pick::Position;
use crate::valuation::scoring::{CandidateScore, Fit};

/// Maximum number of recommendations surfaced per pick.
pub const BOARD_SIZE: usize = 12;

/// One ranked recommendation, fully explained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub player_id: String,
    pub full_name: String,
    pub pos: Position,
    pub reason: String,
    pub fit: Fit,
    pub edge_vs_next: f64,
    pub score: f64,
    pub vorp: f64,
    pub adp_discount: f64,
    pub need_boost: f64,
    pub scarcity_boost: f64,
    pub bye_penalty: f64,
    pub injury_penalty: f64,
    pub upside_bonus: f64,
}

impl Recommendation {
    fn from_score(cs: CandidateScore, edge_vs_next: f64) -> Self {
        Recommendation {
            player_id: cs.player_id,
            full_name: cs.full_name,
            pos: cs.pos,
            reason: cs.reason,
            fit: cs.fit,
            edge_vs_next,
            score: cs.score,
            vorp: cs.vorp,
            adp_discount: cs.adp_discount,
            need_boost: cs.need_boost,
            scarcity_boost: cs.scarcity_boost,
            bye_penalty: cs.bye_penalty,
            injury_penalty: cs.injury_penalty,
            upside_bonus: cs.upside_bonus,
        }
    }
}

/// Sort scored candidates by score descending (stable, so equal scores keep
/// their pool order), attach each entry's gap to the entry above it, and cut
/// the board at [`BOARD_SIZE`].
///
/// The top entry's edge is 0 by definition; every other edge is non-negative.
pub fn rank(mut scored: Vec<CandidateScore>) -> Vec<Recommendation> {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(BOARD_SIZE);

    let mut ranked = Vec::with_capacity(scored.len());
    let mut prev_score = None;
    for cs in scored {
        let edge = match prev_score {
            None => 0.0,
            Some(prev) => prev - cs.score,
        };
        prev_score = Some(cs.score);
        ranked.push(Recommendation::from_score(cs, edge));
    }
    ranked
}
