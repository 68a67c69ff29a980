// Prompt templates for the draft tie-breaker.
//
// Constructs compact, structured prompts for the rerank call. Each prompt
// carries pre-computed scores so the LLM focuses on context and trade-offs
// rather than arithmetic, and a strict JSON response contract so the reply
// can be validated mechanically.

use serde_json::json;

use crate::draft::needs::TeamNeeds;
use crate::draft::pick::Position;
use crate::valuation::rank::Recommendation;
use crate::valuation::scoring::Strategy;

/// Maximum candidates forwarded to the rerank call.
pub const RERANK_CANDIDATES: usize = 8;

/// Hard cap on the length of an LLM-supplied reason string.
pub const MAX_REASON_LEN: usize = 140;

// ---------------------------------------------------------------------------
// System prompt
// ---------------------------------------------------------------------------

/// Return the static system prompt for rerank calls.
pub fn system_prompt() -> String {
    "You are a fantasy football draft advisor. You receive a pre-ranked list of \
     draft candidates with deterministic scores already computed.\n\
     \n\
     Your job is to re-order the candidates where context the numbers miss \
     justifies it, and to write a short reason for each. Do NOT do arithmetic; \
     the scores are already correct.\n\
     \n\
     Respond with ONLY a JSON object in this exact shape:\n\
     {\"ranked\": [{\"player_id\": \"...\", \"reason\": \"...\", \"fit\": \"...\", \"edge_vs_next\": 0.0}]}\n\
     \n\
     Rules:\n\
     - Include every candidate you were given, exactly once.\n\
     - \"fit\" must be one of: value, need, stack, upside, safe.\n\
     - \"reason\" must be at most 140 characters.\n\
     - \"edge_vs_next\" must be a number; echo the candidate's edge if you have \
       no reason to change it.\n\
     - No prose outside the JSON object."
        .to_string()
}

// ---------------------------------------------------------------------------
// Rerank prompt
// ---------------------------------------------------------------------------

/// Build the user prompt for one rerank call.
///
/// Includes the draft situation, the team's unmet starter needs, and the
/// candidate slate as pretty-printed JSON.
pub fn build_rerank_prompt(
    league_name: &str,
    team_on_clock: &str,
    pick_no: u32,
    round: u32,
    strategy: Strategy,
    needs: &TeamNeeds,
    candidates: &[Recommendation],
) -> String {
    let mut prompt = String::with_capacity(2048);

    // Section 1: DRAFT SITUATION
    prompt.push_str(&format!(
        "## DRAFT SITUATION\n\
         League: {} | Round {} | Overall pick #{}\n\
         Team on clock: {}\n\
         Strategy: {}\n\n",
        league_name, round, pick_no, team_on_clock, strategy,
    ));

    // Section 2: ROSTER NEEDS
    prompt.push_str("## MY UNMET STARTER NEEDS\n");
    prompt.push_str(&format_needs(needs));
    prompt.push('\n');

    // Section 3: CANDIDATES
    prompt.push_str("## CANDIDATES (ranked by deterministic score, best first)\n");
    prompt.push_str(&format_candidates(candidates));
    prompt.push('\n');

    // Section 4: Closing instruction
    prompt.push_str(
        "## YOUR TASK\n\
         Re-order these candidates if context justifies it and return the JSON \
         object described in the system prompt.",
    );

    prompt
}

/// Format unmet needs as one line per position, or a placeholder when the
/// starting lineup is already covered.
fn format_needs(needs: &TeamNeeds) -> String {
    let mut s = String::new();
    for &pos in Position::ALL {
        let count = needs.need(pos);
        if count > 0 {
            s.push_str(&format!("  {} : {} open\n", pos.display_str(), count));
        }
    }
    if s.is_empty() {
        s.push_str("  (all starter slots filled)\n");
    }
    s
}

/// Serialize the candidate slate for the prompt: only the fields the LLM
/// should reason about, pretty-printed for readability.
fn format_candidates(candidates: &[Recommendation]) -> String {
    let slate: Vec<serde_json::Value> = candidates
        .iter()
        .map(|r| {
            json!({
                "player_id": r.player_id,
                "full_name": r.full_name,
                "pos": r.pos.display_str(),
                "score": (r.score * 10.0).round() / 10.0,
                "edge_vs_next": (r.edge_vs_next * 10.0).round() / 10.0,
                "vorp": (r.vorp * 10.0).round() / 10.0,
                "adp_discount": (r.adp_discount * 10.0).round() / 10.0,
                "need_boost": (r.need_boost * 100.0).round() / 100.0,
                "reason": r.reason,
            })
        })
        .collect();
    serde_json::to_string_pretty(&json!({ "candidates": slate }))
        .unwrap_or_else(|_| "{}".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
