//! LLM-based solution quality scoring
//!
//! Scoring is advisory. [`assess`] wraps any scorer so that a failure or a
//! timeout becomes a [`QualityOutcome::Unavailable`] value instead of an error.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use skillforge_skills::SkillDocument;
use tracing::{debug, warn};

use crate::error::QualityError;
use crate::solution::Solution;

/// Note attached to every degraded quality result
pub const ADVISORY_NOTE: &str =
    "Quality scoring is advisory; structural validation results are unaffected.";

/// Quality assessment produced by a scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Overall score, 0-100
    pub score: f64,
    /// One-paragraph verdict
    #[serde(default)]
    pub summary: String,
    /// Per-dimension scores, 0-100
    #[serde(default)]
    pub dimensions: BTreeMap<String, f64>,
    /// Concrete improvement suggestions
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Quality section of a solution validation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualityOutcome {
    /// Scorer answered
    Scored(QualityReport),
    /// Scorer failed; validation continues regardless
    Unavailable {
        /// Failure description
        error: String,
        /// Advisory note
        note: String,
    },
}

impl QualityOutcome {
    /// Degraded outcome for a scorer failure
    pub fn unavailable(error: &QualityError) -> Self {
        QualityOutcome::Unavailable {
            error: error.to_string(),
            note: ADVISORY_NOTE.to_string(),
        }
    }
}

/// Scores the conversational and design quality of a solution
#[async_trait]
pub trait QualityScorer: Send + Sync {
    /// Score a solution together with its (expanded) skills
    async fn score(
        &self,
        solution: &Solution,
        skills: &[SkillDocument],
    ) -> Result<QualityReport, QualityError>;
}

/// Run a scorer under a deadline, degrading every failure
pub async fn assess(
    scorer: &dyn QualityScorer,
    solution: &Solution,
    skills: &[SkillDocument],
    timeout: Duration,
) -> QualityOutcome {
    match tokio::time::timeout(timeout, scorer.score(solution, skills)).await {
        Ok(Ok(report)) => {
            debug!(score = report.score, "Quality scoring completed");
            QualityOutcome::Scored(report)
        }
        Ok(Err(err)) => {
            warn!(error = %err, "Quality scoring failed");
            QualityOutcome::unavailable(&err)
        }
        Err(_) => {
            let err = QualityError::Timeout(timeout);
            warn!(error = %err, "Quality scoring timed out");
            QualityOutcome::unavailable(&err)
        }
    }
}

/// Quality scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Whether to call the LLM at all
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer token
    #[serde(default)]
    pub api_key: Option<String>,

    /// Deadline for one scoring call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl QualityConfig {
    /// Scoring deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Scorer used when no LLM is configured; always fails
pub struct DisabledQualityScorer;

#[async_trait]
impl QualityScorer for DisabledQualityScorer {
    async fn score(
        &self,
        _solution: &Solution,
        _skills: &[SkillDocument],
    ) -> Result<QualityReport, QualityError> {
        Err(QualityError::NotConfigured)
    }
}

const SYSTEM_PROMPT: &str = "You review designs of multi-skill AI agent solutions. \
Judge clarity of intents, coverage of scenarios, safety of guardrails and handoff design. \
Reply with a JSON object only: {\"score\": 0-100, \"summary\": string, \
\"dimensions\": {name: 0-100}, \"suggestions\": [string]}.";

/// Scorer backed by an OpenAI-compatible chat completions endpoint
pub struct LlmQualityScorer {
    client: reqwest::Client,
    config: QualityConfig,
}

impl LlmQualityScorer {
    /// Create a scorer from configuration
    pub fn new(config: QualityConfig) -> Result<Self, QualityError> {
        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    fn digest(solution: &Solution, skills: &[SkillDocument]) -> Value {
        let skills: Vec<Value> = skills
            .iter()
            .map(|skill| {
                json!({
                    "id": skill.id,
                    "name": skill.name,
                    "problem": skill.problem_statement(),
                    "intents": skill.supported_intents().iter().map(|i| &i.id).collect::<Vec<_>>(),
                    "tools": skill.tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                    "guardrails": skill.guardrails(),
                    "role": skill.role.as_ref().map(|r| &r.name),
                })
            })
            .collect();
        json!({ "solution": solution, "skills": skills })
    }

    fn parse_report(body: &Value) -> Result<QualityReport, QualityError> {
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| QualityError::InvalidReport("missing message content".to_string()))?;

        let trimmed = content
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        let mut report: QualityReport = serde_json::from_str(trimmed)
            .map_err(|e| QualityError::InvalidReport(e.to_string()))?;
        report.score = report.score.clamp(0.0, 100.0);
        Ok(report)
    }
}

#[async_trait]
impl QualityScorer for LlmQualityScorer {
    async fn score(
        &self,
        solution: &Solution,
        skills: &[SkillDocument],
    ) -> Result<QualityReport, QualityError> {
        let url = format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'));
        let body = json!({
            "model": self.config.model,
            "temperature": 0,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": Self::digest(solution, skills).to_string()}
            ]
        });

        debug!(url = %url, model = %self.config.model, "Requesting quality score");

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message: String = response.text().await.unwrap_or_default().chars().take(200).collect();
            return Err(QualityError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response.json().await?;
        Self::parse_report(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowScorer;

    #[async_trait]
    impl QualityScorer for SlowScorer {
        async fn score(
            &self,
            _solution: &Solution,
            _skills: &[SkillDocument],
        ) -> Result<QualityReport, QualityError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(QualityReport {
                score: 90.0,
                summary: String::new(),
                dimensions: BTreeMap::new(),
                suggestions: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_disabled_scorer_degrades() {
        let outcome = assess(
            &DisabledQualityScorer,
            &Solution::default(),
            &[],
            Duration::from_secs(1),
        )
        .await;

        match outcome {
            QualityOutcome::Unavailable { error, note } => {
                assert!(error.contains("not configured"));
                assert_eq!(note, ADVISORY_NOTE);
            }
            other => panic!("expected degraded outcome, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades() {
        let outcome = assess(&SlowScorer, &Solution::default(), &[], Duration::from_secs(5)).await;
        assert!(matches!(outcome, QualityOutcome::Unavailable { error, .. } if error.contains("timed out")));
    }

    #[test]
    fn test_parse_report_strips_fences_and_clamps() {
        let body = json!({
            "choices": [{"message": {"content": "```json\n{\"score\": 140, \"summary\": \"ok\"}\n```"}}]
        });
        let report = LlmQualityScorer::parse_report(&body).unwrap();
        assert_eq!(report.score, 100.0);
        assert_eq!(report.summary, "ok");
    }

    #[test]
    fn test_parse_report_rejects_missing_content() {
        let err = LlmQualityScorer::parse_report(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, QualityError::InvalidReport(_)));
    }

    #[test]
    fn test_outcome_serializes_flat() {
        let value = serde_json::to_value(QualityOutcome::unavailable(&QualityError::NotConfigured))
            .unwrap();
        assert!(value.get("error").is_some());
        assert!(value.get("note").is_some());
    }
}
