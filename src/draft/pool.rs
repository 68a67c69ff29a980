// Remaining player pool computation.
//
// The pool is the set difference between the full player catalog and the
// players already present in the pick log. Catalog order is preserved so
// that downstream stable sorts break ties deterministically.

use std::collections::HashSet;

use super::pick::{Pick, Player};

/// Compute the undrafted pool: every catalog player whose ID does not appear
/// in the pick log.
///
/// Picks without a `player_id` (skipped or forfeited slots) are ignored.
/// An empty catalog yields an empty pool; this is not an error.
pub fn remaining_pool(catalog: &[Player], picks: &[Pick]) -> Vec<Player> {
    let drafted: HashSet<&str> = picks
        .iter()
        .filter_map(|p| p.player_id.as_deref())
        .collect();

    catalog
        .iter()
        .filter(|p| !drafted.contains(p.player_id.as_str()))
        .cloned()
        .collect()
}
