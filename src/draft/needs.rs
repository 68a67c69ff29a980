// Roster need computation for the team on the clock.
//
// For each startable position in the league's roster template, counts how
// many slots are still unfilled given the players the roster has actually
// drafted. Filled counts come from resolving each pick's player against the
// catalog, not from assuming a position for every pick.

use std::collections::HashMap;

use super::pick::{Pick, Player, Position, SlotLabel};

/// Static draft-urgency weight per position. These are configuration
/// constants, not computed values: RB/WR demand early capital, kickers
/// can wait until the final rounds.
pub fn position_priority(pos: Position) -> f64 {
    match pos {
        Position::Qb => 0.7,
        Position::Rb => 1.0,
        Position::Wr => 1.0,
        Position::Te => 0.8,
        Position::Kicker => 0.3,
        Position::Defense => 0.4,
        Position::Unknown => 0.0,
    }
}

/// Unmet positional requirements for one roster.
#[derive(Debug, Clone, Default)]
pub struct TeamNeeds {
    needs: HashMap<Position, u32>,
}

impl TeamNeeds {
    /// Remaining unfilled slots at a position. Zero for positions the
    /// template doesn't require or that are already covered.
    pub fn need(&self, pos: Position) -> u32 {
        self.needs.get(&pos).copied().unwrap_or(0)
    }

    /// Need count weighted by the position's static priority.
    pub fn boost(&self, pos: Position) -> f64 {
        self.need(pos) as f64 * position_priority(pos)
    }

    /// Whether any startable requirement remains unmet.
    pub fn any_unmet(&self) -> bool {
        self.needs.values().any(|&n| n > 0)
    }
}

/// Compute unmet positional needs for `roster_id`.
///
/// Required slot counts come from the roster template's startable labels;
/// FLEX, bench, and IR placeholders carry no single-position requirement.
/// Filled counts come from looking up each of the roster's picked players
/// in the catalog and taking their true position.
pub fn team_needs(
    picks: &[Pick],
    roster_id: &str,
    roster_positions: &[String],
    catalog: &[Player],
) -> TeamNeeds {
    // Required slots per position from the template.
    let mut required: HashMap<Position, u32> = HashMap::new();
    for label in roster_positions {
        if let SlotLabel::Starter(pos) = SlotLabel::parse(label) {
            *required.entry(pos).or_insert(0) += 1;
        }
    }

    // Filled slots: resolve each of this roster's picks to a catalog position.
    let by_id: HashMap<&str, &Player> = catalog
        .iter()
        .map(|p| (p.player_id.as_str(), p))
        .collect();

    let mut filled: HashMap<Position, u32> = HashMap::new();
    for pick in picks.iter().filter(|p| p.roster_id == roster_id) {
        let Some(player_id) = pick.player_id.as_deref() else {
            continue;
        };
        if let Some(player) = by_id.get(player_id) {
            *filled.entry(player.pos).or_insert(0) += 1;
        }
    }

    let needs = required
        .into_iter()
        .map(|(pos, req)| {
            let have = filled.get(&pos).copied().unwrap_or(0);
            (pos, req.saturating_sub(have))
        })
        .collect();

    TeamNeeds { needs }
}

/// Collect the bye weeks of every player already drafted by `roster_id`.
/// Used by the scorer's bye-overlap penalty.
pub fn roster_bye_weeks(picks: &[Pick], roster_id: &str, catalog: &[Player]) -> Vec<u32> {
    let by_id: HashMap<&str, &Player> = catalog
        .iter()
        .map(|p| (p.player_id.as_str(), p))
        .collect();

    picks
        .iter()
        .filter(|p| p.roster_id == roster_id)
        .filter_map(|p| p.player_id.as_deref())
        .filter_map(|id| by_id.get(id).and_then(|player| player.bye_week))
        .collect()
}
