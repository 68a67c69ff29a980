// End-to-end tests over the public engine API: deterministic ranking
// invariants, strategy sensitivity, and the tie-break fallback contract.

use std::collections::HashMap;

use async_trait::async_trait;

use snapcount::draft::pick::{InjuryStatus, Pick, Player, Position};
use snapcount::engine::{rank_deterministic, recommend_with, RankingContext};
use snapcount::llm::client::Reranker;
use snapcount::valuation::rank::BOARD_SIZE;
use snapcount::valuation::scoring::{strategy_weights, Strategy};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn player(id: &str, pos: Position, projection: f64) -> Player {
    Player {
        player_id: id.into(),
        full_name: format!("Player {id}"),
        pos,
        team: None,
        adp: None,
        tier: None,
        projection_baseline: projection,
        bye_week: None,
        injury_status: InjuryStatus::Healthy,
    }
}

fn pick(pick_no: u32, roster_id: &str, player_id: &str) -> Pick {
    Pick {
        draft_id: "d1".into(),
        round: (pick_no - 1) / 10 + 1,
        pick: (pick_no - 1) % 10 + 1,
        pick_no,
        roster_id: roster_id.into(),
        player_id: Some(player_id.into()),
        timestamp: Some(1_725_000_000),
    }
}

fn ctx(catalog: Vec<Player>, picks: Vec<Pick>, pick_no: u32) -> RankingContext {
    RankingContext {
        league_name: "Integration League".into(),
        catalog,
        picks,
        roster_positions: vec![
            "QB".into(),
            "RB".into(),
            "RB".into(),
            "WR".into(),
            "WR".into(),
            "TE".into(),
            "FLEX".into(),
            "K".into(),
            "DEF".into(),
            "BN".into(),
        ],
        scoring: HashMap::new(),
        pick_no,
        strategy: Strategy::Balanced,
        team_on_clock: "1".into(),
    }
}

struct FailingReranker;

#[async_trait]
impl Reranker for FailingReranker {
    async fn rerank(&self, _system: &str, _user: &str) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("backend unavailable"))
    }
}

struct SwapTopTwoReranker;

#[async_trait]
impl Reranker for SwapTopTwoReranker {
    async fn rerank(&self, _system: &str, user: &str) -> anyhow::Result<String> {
        // Echo back every candidate id from the prompt, with the first two
        // swapped, in the contract shape the engine expects.
        let mut ids: Vec<String> = user
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                line.strip_prefix("\"player_id\": \"")
                    .and_then(|rest| rest.strip_suffix("\","))
                    .or_else(|| {
                        line.strip_prefix("\"player_id\": \"")
                            .and_then(|rest| rest.strip_suffix('"'))
                    })
                    .map(|s| s.to_string())
            })
            .collect();
        if ids.len() >= 2 {
            ids.swap(0, 1);
        }
        let entries: Vec<String> = ids
            .iter()
            .map(|id| {
                format!(
                    r#"{{"player_id":"{id}","reason":"Context call","fit":"value","edge_vs_next":0.0}}"#
                )
            })
            .collect();
        Ok(format!(r#"{{"ranked":[{}]}}"#, entries.join(",")))
    }
}

// Well-formed entries that omit the required edge field.
struct EdgelessReranker;

#[async_trait]
impl Reranker for EdgelessReranker {
    async fn rerank(&self, _system: &str, user: &str) -> anyhow::Result<String> {
        let entries: Vec<String> = user
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                line.strip_prefix("\"player_id\": \"")
                    .and_then(|rest| rest.strip_suffix("\","))
                    .map(|id| {
                        format!(r#"{{"player_id":"{id}","reason":"Trust me","fit":"value"}}"#)
                    })
            })
            .collect();
        Ok(format!(r#"{{"ranked":[{}]}}"#, entries.join(",")))
    }
}

// ---------------------------------------------------------------------------
// Deterministic invariants
// ---------------------------------------------------------------------------

#[test]
fn board_bounded_by_pool_and_board_size() {
    let small = ctx(
        vec![
            player("a", Position::Rb, 200.0),
            player("b", Position::Wr, 180.0),
        ],
        vec![],
        1,
    );
    let ranked = rank_deterministic(&small).unwrap();
    assert_eq!(ranked.len(), 2);

    let catalog: Vec<Player> = (0..30)
        .map(|i| player(&format!("p{i}"), Position::Wr, 140.0 + i as f64))
        .collect();
    let big = ctx(catalog, vec![], 1);
    let ranked = rank_deterministic(&big).unwrap();
    assert_eq!(ranked.len(), BOARD_SIZE);
}

#[test]
fn edge_invariants_hold() {
    let catalog: Vec<Player> = (0..15)
        .map(|i| player(&format!("p{i}"), Position::Rb, 150.0 + (i * 7) as f64))
        .collect();
    let ranked = rank_deterministic(&ctx(catalog, vec![], 1)).unwrap();

    assert_eq!(ranked[0].edge_vs_next, 0.0);
    for pair in ranked.windows(2) {
        let gap = pair[0].score - pair[1].score;
        assert!(pair[1].edge_vs_next >= 0.0);
        assert!((pair[1].edge_vs_next - gap).abs() < 1e-9);
    }
    // Scores are non-increasing down the board.
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn ranking_is_idempotent() {
    let catalog = vec![
        player("a", Position::Rb, 240.0),
        player("b", Position::Wr, 190.0),
        player("c", Position::Qb, 310.0),
        player("d", Position::Te, 140.0),
    ];
    let c = ctx(catalog, vec![pick(1, "2", "a")], 2);

    let first = serde_json::to_string(&rank_deterministic(&c).unwrap()).unwrap();
    let second = serde_json::to_string(&rank_deterministic(&c).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn drafted_players_never_appear() {
    let catalog: Vec<Player> = (0..10)
        .map(|i| player(&format!("p{i}"), Position::Wr, 150.0 + i as f64))
        .collect();
    let picks = vec![pick(1, "2", "p9"), pick(2, "3", "p8"), pick(3, "1", "p7")];
    let ranked = rank_deterministic(&ctx(catalog, picks, 4)).unwrap();

    let ids: Vec<&str> = ranked.iter().map(|r| r.player_id.as_str()).collect();
    assert!(!ids.contains(&"p9"));
    assert!(!ids.contains(&"p8"));
    assert!(!ids.contains(&"p7"));
    assert_eq!(ranked.len(), 7);
}

// ---------------------------------------------------------------------------
// Scoring scenarios
// ---------------------------------------------------------------------------

#[test]
fn three_rb_vorp_scenario() {
    let mut rb1 = player("rb1", Position::Rb, 200.0);
    rb1.adp = Some(5.0);
    let mut rb2 = player("rb2", Position::Rb, 180.0);
    rb2.adp = Some(50.0);
    let mut rb3 = player("rb3", Position::Rb, 150.0);
    rb3.adp = Some(100.0);

    let ranked = rank_deterministic(&ctx(vec![rb1, rb2, rb3], vec![], 10)).unwrap();

    assert!((ranked.iter().find(|r| r.player_id == "rb1").unwrap().vorp - 50.0).abs() < 1e-9);
    assert!((ranked.iter().find(|r| r.player_id == "rb2").unwrap().vorp - 30.0).abs() < 1e-9);
    assert!((ranked.iter().find(|r| r.player_id == "rb3").unwrap().vorp - 0.0).abs() < 1e-9);
    assert_eq!(ranked[0].player_id, "rb1");
}

#[test]
fn injury_penalty_is_exact_weighted_delta() {
    let healthy = player("h", Position::Rb, 250.0);
    let mut out = player("o", Position::Rb, 250.0);
    out.injury_status = InjuryStatus::Out;

    let ranked = rank_deterministic(&ctx(vec![healthy, out], vec![], 1)).unwrap();
    let h = ranked.iter().find(|r| r.player_id == "h").unwrap();
    let o = ranked.iter().find(|r| r.player_id == "o").unwrap();

    let w = strategy_weights(Strategy::Balanced);
    assert!((h.score - o.score - 50.0 * w.injury_penalty).abs() < 1e-9);
    assert_eq!(ranked[0].player_id, "h");
}

#[test]
fn strategy_switch_flips_upside_candidate() {
    // Near-equal projections; the tiered, banged-up candidate wins only
    // when the strategy chases ceiling.
    let mut ceiling = player("ceiling", Position::Rb, 184.0);
    ceiling.tier = Some(1);
    ceiling.injury_status = InjuryStatus::Questionable;
    let steady = player("steady", Position::Rb, 185.0);

    let mut safe_ctx = ctx(vec![ceiling.clone(), steady.clone()], vec![], 1);
    safe_ctx.strategy = Strategy::Safe;
    let safe_ranked = rank_deterministic(&safe_ctx).unwrap();
    assert_eq!(safe_ranked[0].player_id, "steady");

    let mut upside_ctx = ctx(vec![ceiling, steady], vec![], 1);
    upside_ctx.strategy = Strategy::Upside;
    let upside_ranked = rank_deterministic(&upside_ctx).unwrap();
    assert_eq!(upside_ranked[0].player_id, "ceiling");
}

// ---------------------------------------------------------------------------
// Tie-break contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failing_backend_falls_back_byte_equal() {
    let catalog = vec![
        player("a", Position::Rb, 240.0),
        player("b", Position::Wr, 200.0),
        player("c", Position::Qb, 320.0),
    ];
    let c = ctx(catalog, vec![], 1);

    let set = recommend_with(&c, Some(&FailingReranker)).await.unwrap();
    assert!(!set.ai_enabled);

    let deterministic = rank_deterministic(&c).unwrap();
    let from_set = serde_json::to_string(&set.ranked).unwrap();
    let from_det = serde_json::to_string(&deterministic).unwrap();
    assert_eq!(from_set, from_det);
}

#[tokio::test]
async fn applied_tiebreak_reorders_and_keeps_subscores() {
    let catalog = vec![
        player("a", Position::Rb, 240.0),
        player("b", Position::Rb, 230.0),
        player("c", Position::Rb, 220.0),
    ];
    let c = ctx(catalog, vec![], 1);
    let deterministic = rank_deterministic(&c).unwrap();

    let set = recommend_with(&c, Some(&SwapTopTwoReranker)).await.unwrap();
    assert!(set.ai_enabled);

    // Top two swapped relative to the deterministic pass.
    assert_eq!(set.ranked[0].player_id, deterministic[1].player_id);
    assert_eq!(set.ranked[1].player_id, deterministic[0].player_id);
    assert_eq!(set.ranked[2].player_id, deterministic[2].player_id);

    // Sub-scores are the deterministic ones; reasons come from the reply.
    assert_eq!(set.ranked[0].vorp, deterministic[1].vorp);
    assert_eq!(set.ranked[0].score, deterministic[1].score);
    assert_eq!(set.ranked[0].reason, "Context call");

    // Edges stay non-negative after the reorder.
    assert!(set.ranked.iter().all(|r| r.edge_vs_next >= 0.0));
}

#[tokio::test]
async fn reply_without_edge_field_falls_back() {
    let catalog = vec![
        player("a", Position::Rb, 240.0),
        player("b", Position::Wr, 200.0),
    ];
    let c = ctx(catalog, vec![], 1);

    let set = recommend_with(&c, Some(&EdgelessReranker)).await.unwrap();
    assert!(!set.ai_enabled);

    let deterministic = rank_deterministic(&c).unwrap();
    assert_eq!(set.ranked, deterministic);
    assert!(set.ranked.iter().all(|r| r.reason != "Trust me"));
}

#[tokio::test]
async fn no_backend_reports_deterministic_set() {
    let catalog = vec![player("a", Position::Rb, 240.0)];
    let c = ctx(catalog, vec![], 1);

    let set = recommend_with(&c, None).await.unwrap();
    assert!(!set.ai_enabled);
    assert_eq!(set.strategy, Strategy::Balanced);
    assert_eq!(set.ranked.len(), 1);
}

// ---------------------------------------------------------------------------
// Serialization contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recommendation_set_serializes_snake_case() {
    let catalog = vec![player("a", Position::Rb, 240.0)];
    let c = ctx(catalog, vec![], 1);
    let set = recommend_with(&c, None).await.unwrap();

    let json = serde_json::to_value(&set).unwrap();
    assert!(json.get("ranked").is_some());
    assert!(json.get("generated_at").is_some());
    assert_eq!(json["strategy"], "balanced");
    assert_eq!(json["ai_enabled"], false);

    let entry = &json["ranked"][0];
    for field in [
        "player_id",
        "full_name",
        "pos",
        "reason",
        "fit",
        "edge_vs_next",
        "score",
        "vorp",
        "adp_discount",
        "need_boost",
        "scarcity_boost",
        "bye_penalty",
        "injury_penalty",
        "upside_bonus",
    ] {
        assert!(entry.get(field).is_some(), "missing field {field}");
    }
}
