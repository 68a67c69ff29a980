// Positional scarcity index calculation.
//
// For each position, measures how many players remain available and how
// strong the remaining talent is (mean quality tier). Thin supply or weak
// remaining tiers both raise the urgency to draft the position now.

use std::collections::HashMap;

use crate::draft::pick::{Player, Position};

/// Sentinel mean tier used when no remaining player at a position has a
/// tier assigned: treat the position as bottom-of-the-barrel quality.
const UNTIERED_SENTINEL: f64 = 10.0;

/// Scale factor applied to the scarcity score inside the scorer.
pub const SCARCITY_SCALE: f64 = 50.0;

/// Scarcity analysis for a single position.
#[derive(Debug, Clone)]
pub struct ScarcityEntry {
    /// The position being analyzed.
    pub position: Position,
    /// Number of available players at this position.
    pub supply: usize,
    /// Mean quality tier among tiered players, or the sentinel when none
    /// carry a tier. Lower = better remaining talent.
    pub mean_tier: f64,
    /// Combined scarcity score, clamped to [0.1, 1.0].
    pub score: f64,
}

/// Compute per-position scarcity for the remaining pool.
///
/// Score = 0.5 * (10 / supply) + 0.5 * (2 / mean_tier), clamped to
/// [0.1, 1.0]. Ten or fewer remaining players at a strong position pushes
/// the score toward the cap; a deep position of late-tier leftovers sits
/// near the floor.
pub fn compute_scarcity(pool: &[Player]) -> HashMap<Position, ScarcityEntry> {
    let mut entries = HashMap::new();

    for &pos in Position::ALL {
        let at_pos: Vec<&Player> = pool.iter().filter(|p| p.pos == pos).collect();
        if at_pos.is_empty() {
            continue;
        }

        let supply = at_pos.len();

        let tiers: Vec<f64> = at_pos
            .iter()
            .filter_map(|p| p.tier)
            .map(|t| t as f64)
            .collect();
        let mean_tier = if tiers.is_empty() {
            UNTIERED_SENTINEL
        } else {
            tiers.iter().sum::<f64>() / tiers.len() as f64
        };

        let supply_term = 10.0 / supply as f64;
        let tier_term = 2.0 / mean_tier;
        let score = (0.5 * supply_term + 0.5 * tier_term).clamp(0.1, 1.0);

        entries.insert(
            pos,
            ScarcityEntry {
                position: pos,
                supply,
                mean_tier,
                score,
            },
        );
    }

    entries
}

/// Scarcity score for a position; 0.0 when the position has no remaining
/// players (nothing left to be urgent about).
pub fn scarcity_score(scarcity: &HashMap<Position, ScarcityEntry>, pos: Position) -> f64 {
    scarcity.get(&pos).map(|e| e.score).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::InjuryStatus;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn player(id: &str, pos: Position, tier: Option<u32>) -> Player {
        Player {
            player_id: id.into(),
            full_name: format!("Player {id}"),
            pos,
            team: None,
            adp: None,
            tier,
            projection_baseline: 100.0,
            bye_week: None,
            injury_status: InjuryStatus::Healthy,
        }
    }

    #[test]
    fn thin_elite_position_scores_near_cap() {
        // 5 RBs, all tier 1: supply term 2.0, tier term 2.0 -> clamped to 1.0
        let pool: Vec<Player> = (0..5)
            .map(|i| player(&format!("rb{i}"), Position::Rb, Some(1)))
            .collect();

        let scarcity = compute_scarcity(&pool);
        let entry = &scarcity[&Position::Rb];
        assert_eq!(entry.supply, 5);
        assert!(approx_eq(entry.mean_tier, 1.0, 1e-9));
        assert!(approx_eq(entry.score, 1.0, 1e-9));
    }

    #[test]
    fn deep_weak_position_scores_near_floor() {
        // 100 WRs at tier 8: 0.5*0.1 + 0.5*0.25 = 0.175
        let pool: Vec<Player> = (0..100)
            .map(|i| player(&format!("wr{i}"), Position::Wr, Some(8)))
            .collect();

        let scarcity = compute_scarcity(&pool);
        let entry = &scarcity[&Position::Wr];
        assert!(approx_eq(entry.score, 0.175, 1e-9));
    }

    #[test]
    fn score_never_below_floor() {
        // 200 kickers at tier 10: raw 0.5*0.05 + 0.5*0.2 = 0.125 -- above
        // floor; push it lower with tier sentinel + huge supply.
        let pool: Vec<Player> = (0..500)
            .map(|i| player(&format!("k{i}"), Position::Kicker, None))
            .collect();

        let scarcity = compute_scarcity(&pool);
        let entry = &scarcity[&Position::Kicker];
        // 0.5*(10/500) + 0.5*(2/10) = 0.01 + 0.1 = 0.11 -> above floor
        assert!(entry.score >= 0.1);
    }

    #[test]
    fn untiered_position_uses_sentinel() {
        let pool = vec![
            player("te1", Position::Te, None),
            player("te2", Position::Te, None),
        ];

        let scarcity = compute_scarcity(&pool);
        let entry = &scarcity[&Position::Te];
        assert!(approx_eq(entry.mean_tier, UNTIERED_SENTINEL, 1e-9));
    }

    #[test]
    fn mean_tier_ignores_untiered_players() {
        let pool = vec![
            player("qb1", Position::Qb, Some(2)),
            player("qb2", Position::Qb, Some(4)),
            player("qb3", Position::Qb, None),
        ];

        let scarcity = compute_scarcity(&pool);
        let entry = &scarcity[&Position::Qb];
        assert_eq!(entry.supply, 3);
        assert!(approx_eq(entry.mean_tier, 3.0, 1e-9));
    }

    #[test]
    fn missing_position_scores_zero() {
        let pool = vec![player("rb1", Position::Rb, Some(1))];
        let scarcity = compute_scarcity(&pool);
        assert!(approx_eq(scarcity_score(&scarcity, Position::Defense), 0.0, 1e-9));
    }

    #[test]
    fn empty_pool_produces_no_entries() {
        let scarcity = compute_scarcity(&[]);
        assert!(scarcity.is_empty());
    }
}
