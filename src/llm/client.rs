// AI tie-breaker client for an OpenAI-compatible chat-completions endpoint.
//
// Sends the deterministic top candidates in a single non-streaming request,
// validates the structured JSON reply, and merges the reordering back onto
// the deterministic records. Every failure mode resolves to the deterministic
// order; the tie-breaker can refine a ranking but never break one.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::draft::needs::TeamNeeds;
use crate::llm::prompt::{
    build_rerank_prompt, system_prompt, MAX_REASON_LEN, RERANK_CANDIDATES,
};
use crate::valuation::rank::Recommendation;
use crate::valuation::scoring::{Fit, Strategy};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const TEMPERATURE: f64 = 0.3;

// ---------------------------------------------------------------------------
// Reranker trait
// ---------------------------------------------------------------------------

/// Abstraction over the generative backend: one prompt in, raw text out.
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(&self, system: &str, user: &str) -> anyhow::Result<String>;
}

// ---------------------------------------------------------------------------
// OpenAiClient
// ---------------------------------------------------------------------------

/// Low-level chat-completions client.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiClient {
    /// Create a new client with the given API key, model, and request bounds.
    pub fn new(api_key: String, model: String, max_tokens: u32, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: OPENAI_API_URL.to_string(),
            api_key,
            model,
            max_tokens,
            timeout,
        }
    }

    /// Point the client at a different endpoint (mock servers in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Reranker for OpenAiClient {
    async fn rerank(&self, system: &str, user: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "temperature": TEMPERATURE,
            "max_tokens": self.max_tokens,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = response.json().await?;
        let content = payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| anyhow::anyhow!("response missing choices[0].message.content"))?;

        Ok(content.to_string())
    }
}

// ---------------------------------------------------------------------------
// LlmClient wrapper
// ---------------------------------------------------------------------------

/// High-level wrapper that is either an active tie-breaker client or disabled.
pub enum LlmClient {
    /// Endpoint configured and ready.
    Active(OpenAiClient),
    /// Tie-breaking disabled (no API key configured).
    Disabled,
}

impl LlmClient {
    /// Build an `LlmClient` from the application config.
    ///
    /// Returns `Active` if an API key is present in credentials, otherwise
    /// returns `Disabled`.
    pub fn from_config(config: &Config) -> Self {
        match &config.credentials.openai_api_key {
            Some(key) if !key.is_empty() => LlmClient::Active(OpenAiClient::new(
                key.clone(),
                config.advisor.llm.model.clone(),
                config.advisor.llm.max_tokens,
                Duration::from_secs(config.advisor.llm.timeout_secs),
            )),
            _ => LlmClient::Disabled,
        }
    }
}

// ---------------------------------------------------------------------------
// Tie-break lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle of one tie-break attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreakState {
    /// No backend configured; the deterministic order stands as produced.
    DeterministicOnly,
    /// Request in flight.
    AiPending,
    /// Attempt finished, with or without an applied reordering.
    AiResolved { ai_applied: bool },
}

impl TieBreakState {
    pub fn ai_applied(&self) -> bool {
        matches!(self, TieBreakState::AiResolved { ai_applied: true })
    }
}

/// Run one tie-break attempt over an already-ranked deterministic list.
///
/// Sends the top candidates to the backend and merges a valid reply back in.
/// Any failure along the way resolves to the deterministic list unchanged;
/// the returned flag is true only when a reordering was actually applied.
pub async fn tiebreak(
    reranker: &dyn Reranker,
    league_name: &str,
    team_on_clock: &str,
    pick_no: u32,
    round: u32,
    strategy: Strategy,
    needs: &TeamNeeds,
    deterministic: Vec<Recommendation>,
) -> (Vec<Recommendation>, bool) {
    if deterministic.is_empty() {
        return (deterministic, false);
    }

    let slate_len = deterministic.len().min(RERANK_CANDIDATES);
    let slate = &deterministic[..slate_len];
    let system = system_prompt();
    let user = build_rerank_prompt(
        league_name,
        team_on_clock,
        pick_no,
        round,
        strategy,
        needs,
        slate,
    );

    let mut state = TieBreakState::AiPending;
    debug!(?state, candidates = slate_len, "tie-break request");

    let raw = match reranker.rerank(&system, &user).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(error = %err, "tie-break call failed, keeping deterministic order");
            state = TieBreakState::AiResolved { ai_applied: false };
            return (deterministic, state.ai_applied());
        }
    };

    let expected: HashSet<&str> = slate.iter().map(|r| r.player_id.as_str()).collect();
    match validate_rerank(&raw, &expected) {
        Ok(entries) => {
            state = TieBreakState::AiResolved { ai_applied: true };
            debug!(?state, "tie-break applied");
            (apply_tiebreak(deterministic, &entries), state.ai_applied())
        }
        Err(err) => {
            warn!(error = %err, "tie-break response rejected, keeping deterministic order");
            state = TieBreakState::AiResolved { ai_applied: false };
            (deterministic, state.ai_applied())
        }
    }
}

// ---------------------------------------------------------------------------
// Response parsing and validation
// ---------------------------------------------------------------------------

/// Why a rerank reply was rejected.
#[derive(Debug, thiserror::Error)]
pub enum RerankError {
    #[error("no JSON object found in response")]
    NoJson,
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unknown player_id in response: {0}")]
    UnknownPlayer(String),
    #[error("duplicate player_id in response: {0}")]
    DuplicatePlayer(String),
    #[error("response covered {got} of {expected} candidates")]
    Incomplete { got: usize, expected: usize },
    #[error("reason for {player_id} exceeds {MAX_REASON_LEN} characters")]
    ReasonTooLong { player_id: String },
    #[error("unrecognized fit label for {player_id}: {fit}")]
    BadFit { player_id: String, fit: String },
}

#[derive(Debug, Deserialize)]
struct RerankEnvelope {
    ranked: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    player_id: String,
    reason: String,
    fit: String,
    edge_vs_next: f64,
}

/// One validated rerank entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankEntry {
    pub player_id: String,
    pub reason: String,
    pub fit: Fit,
    /// Edge claimed by the reply. Required by the wire contract; the merge
    /// recomputes edges over the final order, so this value is advisory.
    pub edge_vs_next: f64,
}

/// Extract the outermost JSON object from an LLM reply: everything from the
/// first `{` to the last `}`. Tolerates prose around the object.
pub(crate) fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse and validate a raw rerank reply against the candidate slate.
///
/// Rejects missing fields, unknown or duplicate player ids, over-long
/// reasons, unrecognized fit labels, and replies that cover fewer candidates
/// than were sent.
pub(crate) fn validate_rerank(
    raw: &str,
    expected: &HashSet<&str>,
) -> Result<Vec<RerankEntry>, RerankError> {
    let json = extract_json(raw).ok_or(RerankError::NoJson)?;
    let envelope: RerankEnvelope = serde_json::from_str(json)?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut entries = Vec::with_capacity(envelope.ranked.len());
    for entry in envelope.ranked {
        if !expected.contains(entry.player_id.as_str()) {
            return Err(RerankError::UnknownPlayer(entry.player_id));
        }
        if !seen.insert(entry.player_id.clone()) {
            return Err(RerankError::DuplicatePlayer(entry.player_id));
        }
        if entry.reason.chars().count() > MAX_REASON_LEN {
            return Err(RerankError::ReasonTooLong {
                player_id: entry.player_id,
            });
        }
        let fit = Fit::parse(&entry.fit).ok_or_else(|| RerankError::BadFit {
            player_id: entry.player_id.clone(),
            fit: entry.fit.clone(),
        })?;
        entries.push(RerankEntry {
            player_id: entry.player_id,
            reason: entry.reason,
            fit,
            edge_vs_next: entry.edge_vs_next,
        });
    }

    if entries.len() < expected.len() {
        return Err(RerankError::Incomplete {
            got: entries.len(),
            expected: expected.len(),
        });
    }

    Ok(entries)
}

/// Merge validated rerank entries back onto the deterministic list.
///
/// Entries take the AI's order with the AI's reason and fit; every sub-score
/// comes from the matching deterministic record. Deterministic candidates
/// below the slate keep their order and are appended after the reordered
/// block. Edges are recomputed over the final order and floored at zero.
pub(crate) fn apply_tiebreak(
    deterministic: Vec<Recommendation>,
    entries: &[RerankEntry],
) -> Vec<Recommendation> {
    let mut remaining: Vec<Option<Recommendation>> =
        deterministic.into_iter().map(Some).collect();

    let mut merged = Vec::with_capacity(remaining.len());
    for entry in entries {
        let found = remaining
            .iter_mut()
            .find(|slot| {
                slot.as_ref()
                    .map(|r| r.player_id == entry.player_id)
                    .unwrap_or(false)
            })
            .and_then(|slot| slot.take());
        if let Some(mut rec) = found {
            rec.reason = entry.reason.clone();
            rec.fit = entry.fit;
            merged.push(rec);
        }
    }
    merged.extend(remaining.into_iter().flatten());

    let mut prev_score: Option<f64> = None;
    for rec in &mut merged {
        rec.edge_vs_next = match prev_score {
            None => 0.0,
            Some(prev) => (prev - rec.score).max(0.0),
        };
        prev_score = Some(rec.score);
    }
    merged
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
