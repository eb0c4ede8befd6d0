// File: src/scoring.rs
use crate::core::types::SignToken;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{info, warn};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;
/// Returned when the upstream answer cannot be read.
pub const FALLBACK_SCORE: f64 = 5.0;

/// A learner's interpretation of a signed example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub original_translation: String,
    pub user_translation: String,
    #[serde(default)]
    pub sign_sequence: Vec<SignToken>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationScore {
    pub score: f64,
    pub feedback: String,
}

/// Grades an interpretation against the official translation. Implemented by
/// the serving layer on top of whichever language model it talks to.
pub trait TranslationScorer {
    fn score(&self, request: &ScoreRequest) -> Result<TranslationScore>;
}

/// The instruction sent upstream for one request.
pub fn build_prompt(request: &ScoreRequest) -> String {
    let signs = request
        .sign_sequence
        .iter()
        .map(|s| s.word.as_str())
        .collect::<Vec<_>>()
        .join(" → ");

    format!(
        "You are scoring NZSL (New Zealand Sign Language) interpretation accuracy. \
Be encouraging and address the learner as \"you\".\n\n\
Original signed sentence signs: {signs}\n\
Official English translation: \"{original}\"\n\
User's interpretation: \"{user}\"\n\n\
Score the interpretation from 0 to 10 on meaning, not wording: 10 is a full \
meaning match, 6-7 captures the core idea, 0-1 is unrelated. Only claim \
something was missed if it is really absent.\n\n\
Respond with ONLY a JSON object: {{\"score\": X, \"feedback\": \"...\"}}",
        original = request.original_translation,
        user = request.user_translation,
    )
}

#[derive(Deserialize)]
struct RawScore {
    score: Option<serde_json::Value>,
    feedback: Option<String>,
}

/// Reads the upstream answer. Markdown code fences are ignored and the score
/// is clamped into [0, 10]. Anything unreadable degrades to a middle score
/// with feedback saying why; this never fails.
pub fn parse_score_response(text: &str) -> TranslationScore {
    let cleaned = strip_code_fence(text.trim());

    let raw: RawScore = match serde_json::from_str(cleaned) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Could not parse scoring response {cleaned:?}: {e}");
            return degraded(format!(
                "Unable to parse scoring response. JSON error: {e}. Please try again."
            ));
        }
    };

    let score = raw.score.as_ref().and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });
    let (Some(score), Some(feedback)) = (score, raw.feedback) else {
        warn!("Scoring response missing score or feedback: {cleaned:?}");
        return degraded(
            "Response validation failed: missing score or feedback. Please try again.".to_string(),
        );
    };

    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        warn!("Score {score} out of range, clamping to 0-10");
    }
    TranslationScore {
        score: score.clamp(MIN_SCORE, MAX_SCORE),
        feedback,
    }
}

fn degraded(feedback: String) -> TranslationScore {
    TranslationScore {
        score: FALLBACK_SCORE,
        feedback,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(body) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Per-token prices used to estimate spend, in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenPricing {
    pub input_per_token: f64,
    pub output_per_token: f64,
}

impl Default for TokenPricing {
    fn default() -> Self {
        // $1 per million input tokens, $5 per million output tokens
        Self {
            input_per_token: 0.000_001,
            output_per_token: 0.000_005,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_requests: u64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub estimated_cost: f64,
}

/// Running totals of scoring calls. One tracker lives as long as the server
/// that owns it and is shared by reference between request handlers.
#[derive(Debug, Default)]
pub struct UsageTracker {
    pricing: TokenPricing,
    stats: Mutex<UsageStats>,
}

impl UsageTracker {
    pub fn new(pricing: TokenPricing) -> Self {
        Self {
            pricing,
            stats: Mutex::new(UsageStats::default()),
        }
    }

    /// Adds one request's token counts and returns its estimated cost.
    pub fn record(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        let cost = input_tokens as f64 * self.pricing.input_per_token
            + output_tokens as f64 * self.pricing.output_per_token;

        let mut stats = self.stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        stats.total_requests += 1;
        stats.total_input_tokens += input_tokens;
        stats.total_output_tokens += output_tokens;
        stats.estimated_cost += cost;
        info!(
            "[Usage] Input: {input_tokens}, Output: {output_tokens}, Cost: ${cost:.6}, Total Cost: ${:.4}",
            stats.estimated_cost
        );
        cost
    }

    pub fn snapshot(&self) -> UsageStats {
        self.stats
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
