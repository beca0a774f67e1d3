//! Application state for the API server

use std::sync::Arc;
use std::time::Instant;

use skillforge_validation::{
    DisabledQualityScorer, LlmQualityScorer, QualityError, QualityScorer, SolutionValidator,
};

use crate::config::AppConfig;

/// Application state shared across all API handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,
    /// Cross-skill validator with its quality scorer
    pub solution_validator: Arc<SolutionValidator>,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Build state from configuration; scoring uses the LLM only when enabled
    pub fn new(config: AppConfig) -> Result<Self, QualityError> {
        let scorer: Arc<dyn QualityScorer> = if config.quality.enabled {
            Arc::new(LlmQualityScorer::new(config.quality.clone())?)
        } else {
            Arc::new(DisabledQualityScorer)
        };
        Ok(Self::with_scorer(config, scorer))
    }

    /// Build state around a specific scorer
    pub fn with_scorer(config: AppConfig, scorer: Arc<dyn QualityScorer>) -> Self {
        let timeout = config.quality.timeout();
        Self {
            config: Arc::new(config),
            solution_validator: Arc::new(SolutionValidator::new(scorer, timeout)),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
