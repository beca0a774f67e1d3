//! Cascading validation engine
//!
//! Holds the issue set of one skill document. Every revision runs a relevance
//! sweep, detects shallow changes against the previous revision and raises
//! issues through the rule table. Single writer; no locking.
//!
//! With a sink attached, every change to the issue set schedules a debounced
//! write, so the engine must then be driven from inside a tokio runtime.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use skillforge_skills::SkillDocument;
use tracing::{debug, info};

use crate::changes::ChangeDetector;
use crate::error::{CascadeError, Result};
use crate::ids::{Clock, IdGenerator, SystemClock, UuidIdGenerator};
use crate::models::{Issue, IssueSeverity, IssueStatus, RelevanceCheck, TriggeredBy};
use crate::persistence::{DebouncedPersister, IssueSink, DEFAULT_DEBOUNCE};
use crate::relevance::{self, GUARDRAILS_INFO_TTL_SECS};
use crate::rules;

/// Engine tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Persistence debounce delay
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Age at which `Policy guardrails updated` issues expire
    #[serde(default = "default_info_ttl_secs")]
    pub info_ttl_secs: i64,
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_info_ttl_secs() -> i64 {
    GUARDRAILS_INFO_TTL_SECS
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            info_ttl_secs: default_info_ttl_secs(),
        }
    }
}

impl CascadeConfig {
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }

    pub fn info_ttl(&self) -> Duration {
        Duration::seconds(self.info_ttl_secs)
    }
}

/// What one revision did to the issue set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevisionOutcome {
    /// Ids of newly raised issues
    pub raised: Vec<String>,
    /// Number of issues pruned by the sweep
    pub pruned: usize,
}

impl RevisionOutcome {
    pub fn changed(&self) -> bool {
        !self.raised.is_empty() || self.pruned > 0
    }
}

/// Issue store plus change-driven rule evaluation
pub struct CascadeEngine {
    issues: Vec<Issue>,
    previous: Option<SkillDocument>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    info_ttl: Duration,
    debounce: std::time::Duration,
    persister: Option<DebouncedPersister>,
}

impl CascadeEngine {
    /// Engine with random ids and the system clock
    pub fn new() -> Self {
        Self::with_sources(Arc::new(UuidIdGenerator), Arc::new(SystemClock))
    }

    /// Engine with injected id and time sources
    pub fn with_sources(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            issues: Vec::new(),
            previous: None,
            ids,
            clock,
            info_ttl: Duration::seconds(GUARDRAILS_INFO_TTL_SECS),
            debounce: DEFAULT_DEBOUNCE,
            persister: None,
        }
    }

    /// Apply configuration
    pub fn with_config(mut self, config: &CascadeConfig) -> Self {
        self.info_ttl = config.info_ttl();
        self.debounce = config.debounce();
        if let Some(persister) = self.persister.as_mut() {
            persister.set_delay(self.debounce);
        }
        self
    }

    /// Persist the issue set to `sink` after every change, debounced
    pub fn with_sink(mut self, sink: Arc<dyn IssueSink>) -> Self {
        self.persister = Some(DebouncedPersister::new(sink, self.debounce));
        self
    }

    /// Load stored issues from `cascading_issues` and take the document as
    /// the baseline revision
    pub fn hydrate(&mut self, skill: &SkillDocument) -> Result<()> {
        self.issues = match &skill.cascading_issues {
            Some(stored) if !stored.is_null() => serde_json::from_value(stored.clone())?,
            _ => Vec::new(),
        };
        // Issues stored without a check get one rebuilt from their title
        for issue in self.issues.iter_mut().filter(|issue| issue.check.is_none()) {
            issue.check = rules::infer_check(&issue.title, skill);
        }
        self.previous = Some(skill.clone());
        debug!(skill = %skill.id, issues = self.issues.len(), "Hydrated cascading issues");
        Ok(())
    }

    /// Write the issue set back onto a document
    pub fn export_into(&self, skill: &mut SkillDocument) -> Result<()> {
        skill.cascading_issues = Some(serde_json::to_value(&self.issues)?);
        Ok(())
    }

    /// Process a new revision of the document
    pub fn on_revision(&mut self, skill: &SkillDocument) -> RevisionOutcome {
        let now = self.clock.now();
        let pruned = relevance::sweep(&mut self.issues, skill, now, self.info_ttl);

        let mut raised = Vec::new();
        if let Some(previous) = self.previous.take() {
            for change in ChangeDetector::detect(&previous, skill) {
                for draft in rules::issues_for(&change, skill) {
                    if self.is_duplicate(&draft.check) {
                        continue;
                    }
                    let id = self.ids.next_id();
                    if self.issues.iter().any(|issue| issue.id == id) {
                        continue;
                    }
                    self.issues.push(Issue {
                        id: id.clone(),
                        severity: draft.severity,
                        category: draft.category,
                        title: draft.title,
                        context: draft.context,
                        chat_prompt: draft.chat_prompt,
                        triggered_by: TriggeredBy {
                            change_type: change.kind().to_string(),
                            id: change.id().to_string(),
                            timestamp: now,
                        },
                        related_ids: draft.related_ids,
                        status: IssueStatus::New,
                        created_at: now,
                        resolved_at: None,
                        check: Some(draft.check),
                    });
                    raised.push(id);
                }
            }
        }
        self.previous = Some(skill.clone());

        let outcome = RevisionOutcome { raised, pruned };
        if outcome.changed() {
            info!(
                skill = %skill.id,
                raised = outcome.raised.len(),
                pruned = outcome.pruned,
                total = self.issues.len(),
                "Cascading issues updated"
            );
            self.schedule_persist();
        }
        outcome
    }

    fn schedule_persist(&self) {
        if let Some(persister) = &self.persister {
            persister.schedule(self.issues.clone());
        }
    }

    /// Write any pending issue set to the sink now
    pub async fn flush(&self) -> Result<()> {
        match &self.persister {
            Some(persister) => persister.flush().await,
            None => Ok(()),
        }
    }

    fn is_duplicate(&self, check: &RelevanceCheck) -> bool {
        self.issues.iter().any(|issue| {
            issue.status != IssueStatus::Resolved && issue.check.as_ref() == Some(check)
        })
    }

    /// Every stored issue, including resolved and dismissed ones
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues that still need attention
    pub fn active_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.is_active())
    }

    /// Active blockers; the document is export-ready when there are none
    pub fn blockers(&self) -> impl Iterator<Item = &Issue> {
        self.active_issues()
            .filter(|issue| issue.severity == IssueSeverity::Blocker)
    }

    pub fn get(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.id == id)
    }

    /// `new → reviewing`
    pub fn start_review(&mut self, id: &str) -> Result<&Issue> {
        self.transition(id, IssueStatus::Reviewing, &[IssueStatus::New])
    }

    /// `reviewing → resolved`
    pub fn resolve(&mut self, id: &str) -> Result<&Issue> {
        self.transition(id, IssueStatus::Resolved, &[IssueStatus::Reviewing])
    }

    /// `new | reviewing → dismissed`
    pub fn dismiss(&mut self, id: &str) -> Result<&Issue> {
        self.transition(
            id,
            IssueStatus::Dismissed,
            &[IssueStatus::New, IssueStatus::Reviewing],
        )
    }

    fn transition(&mut self, id: &str, to: IssueStatus, from: &[IssueStatus]) -> Result<&Issue> {
        let now = self.clock.now();
        let index = self
            .issues
            .iter()
            .position(|issue| issue.id == id)
            .ok_or_else(|| CascadeError::IssueNotFound(id.to_string()))?;
        let issue = &mut self.issues[index];

        if !from.contains(&issue.status) {
            return Err(CascadeError::InvalidTransition {
                id: id.to_string(),
                from: issue.status,
                to,
            });
        }

        debug!(issue = %id, from = %issue.status, to = %to, "Issue status changed");
        issue.status = to;
        if to == IssueStatus::Resolved {
            issue.resolved_at = Some(now);
        }
        self.schedule_persist();
        Ok(&self.issues[index])
    }
}

impl Default for CascadeEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ManualClock, SequentialIdGenerator};
    use chrono::{DateTime, Utc};
    use serde_json::json;

    fn new_engine() -> (CascadeEngine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(DateTime::<Utc>::UNIX_EPOCH));
        let engine = CascadeEngine::with_sources(Arc::new(SequentialIdGenerator::new()), clock.clone());
        (engine, clock)
    }

    fn doc(value: serde_json::Value) -> SkillDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_first_revision_is_baseline() {
        let (mut engine, _) = new_engine();
        let outcome = engine.on_revision(&doc(json!({"tools": [{"name": "a.b.c"}]})));
        assert!(!outcome.changed());
        assert!(engine.issues().is_empty());
    }

    #[test]
    fn test_lifecycle_transitions() {
        let (mut engine, clock) = new_engine();
        engine.on_revision(&doc(json!({"tools": []})));
        engine.on_revision(&doc(json!({"tools": [{"name": "a.b.c"}]})));

        assert_eq!(engine.issues().len(), 2);
        assert!(matches!(
            engine.resolve("issue-1"),
            Err(CascadeError::InvalidTransition { from: IssueStatus::New, .. })
        ));

        engine.start_review("issue-1").unwrap();
        clock.advance(Duration::minutes(5));
        let resolved = engine.resolve("issue-1").unwrap();
        assert_eq!(resolved.status, IssueStatus::Resolved);
        assert_eq!(
            resolved.resolved_at,
            Some(DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(5))
        );

        assert!(matches!(
            engine.dismiss("issue-1"),
            Err(CascadeError::InvalidTransition { .. })
        ));
        assert!(matches!(engine.dismiss("nope"), Err(CascadeError::IssueNotFound(_))));
        assert_eq!(engine.dismiss("issue-2").unwrap().status, IssueStatus::Dismissed);
        assert_eq!(engine.active_issues().count(), 0);
    }

    #[test]
    fn test_duplicate_checks_are_suppressed() {
        let (mut engine, _) = new_engine();
        engine.on_revision(&doc(json!({"tools": []})));
        engine.on_revision(&doc(json!({"tools": [{"name": "a.b.c"}]})));
        // Removing the tool prunes both issues
        engine.on_revision(&doc(json!({"tools": []})));
        assert_eq!(engine.issues().len(), 0);

        engine.on_revision(&doc(json!({"tools": [{"name": "a.b.c"}]})));
        // Same conditions raised again are suppressed
        engine.on_revision(&doc(json!({"tools": [{"name": "a.b.c"}, {"name": "a.b.c"}]})));
        assert_eq!(engine.issues().len(), 2);
    }

    #[test]
    fn test_export_and_hydrate() {
        let (mut engine, _) = new_engine();
        engine.on_revision(&doc(json!({"tools": []})));
        let mut skill = doc(json!({"tools": [{"name": "a.b.c"}]}));
        engine.on_revision(&skill);
        engine.export_into(&mut skill).unwrap();

        let (mut restored, _) = new_engine();
        restored.hydrate(&skill).unwrap();
        assert_eq!(restored.issues(), engine.issues());
        assert_eq!(restored.blockers().count(), 1);

        // Hydrated document is the baseline: no change, no new issues
        assert!(restored.on_revision(&skill).raised.is_empty());
    }

    fn recording_sink() -> (Arc<dyn IssueSink>, Arc<std::sync::Mutex<Vec<Vec<Issue>>>>) {
        let writes = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorded = Arc::clone(&writes);
        let sink = crate::persistence::CallbackSink::new(move |issues: Vec<Issue>| {
            recorded.lock().unwrap().push(issues);
        });
        (Arc::new(sink), writes)
    }

    #[tokio::test(start_paused = true)]
    async fn test_changes_are_persisted_after_debounce() {
        let (sink, writes) = recording_sink();
        let config = CascadeConfig {
            debounce_ms: 200,
            ..CascadeConfig::default()
        };
        let (engine, _) = new_engine();
        let mut engine = engine.with_sink(sink).with_config(&config);

        engine.on_revision(&doc(json!({"tools": []})));
        engine.on_revision(&doc(json!({"tools": [{"name": "a.b.c"}]})));
        engine.dismiss("issue-2").unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert!(writes.lock().unwrap().is_empty());

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        let writes = writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].len(), 2);
        assert_eq!(writes[0][1].status, IssueStatus::Dismissed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_skips_the_timer() {
        let (sink, writes) = recording_sink();
        let (engine, _) = new_engine();
        let mut engine = engine.with_sink(sink);

        engine.on_revision(&doc(json!({"tools": []})));
        engine.on_revision(&doc(json!({"tools": [{"name": "a.b.c"}]})));
        engine.flush().await.unwrap();
        assert_eq!(writes.lock().unwrap().len(), 1);

        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        assert_eq!(writes.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_baseline_revision_writes_nothing() {
        let (sink, writes) = recording_sink();
        let (engine, _) = new_engine();
        let mut engine = engine.with_sink(sink);

        engine.on_revision(&doc(json!({"tools": [{"name": "a.b.c"}]})));
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        assert!(writes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_hydrated_issue_without_check_is_pruned() {
        let (mut engine, _) = new_engine();
        let stored = json!([{
            "id": "legacy-1",
            "severity": "blocker",
            "category": "policy",
            "title": "Tool \"a.b.c\" missing policy",
            "context": "",
            "chatPrompt": "",
            "triggeredBy": {"type": "tool_added", "id": "a.b.c", "timestamp": "1970-01-01T00:00:00Z"},
            "relatedIds": [],
            "status": "new",
            "createdAt": "1970-01-01T00:00:00Z"
        }]);
        let skill = doc(json!({"tools": [{"name": "a.b.c"}], "cascading_issues": stored}));
        engine.hydrate(&skill).unwrap();
        assert_eq!(
            engine.get("legacy-1").unwrap().check,
            Some(RelevanceCheck::ToolMissingPolicy { tool: "a.b.c".to_string() })
        );

        let outcome = engine.on_revision(&doc(json!({
            "tools": [{"name": "a.b.c", "policy": {"allowed": true}}]
        })));
        assert_eq!(outcome.pruned, 1);
        assert!(engine.issues().is_empty());
    }

    #[test]
    fn test_hydrated_info_issue_without_check_expires() {
        let (mut engine, clock) = new_engine();
        let stored = json!([{
            "id": "legacy-2",
            "severity": "info",
            "category": "policy",
            "title": "Policy guardrails updated",
            "context": "",
            "chatPrompt": "",
            "triggeredBy": {"type": "policy_changed", "id": "policy", "timestamp": "1970-01-01T00:00:00Z"},
            "relatedIds": [],
            "status": "new",
            "createdAt": "1970-01-01T00:00:00Z"
        }]);
        let skill = doc(json!({"cascading_issues": stored}));
        engine.hydrate(&skill).unwrap();

        clock.advance(Duration::hours(3));
        let outcome = engine.on_revision(&skill);
        assert_eq!(outcome.pruned, 1);
        assert!(engine.issues().is_empty());
    }

    #[test]
    fn test_hydrate_rejects_malformed_issues() {
        let (mut engine, _) = new_engine();
        let skill = doc(json!({"cascading_issues": [{"id": 1}]}));
        assert!(matches!(engine.hydrate(&skill), Err(CascadeError::InvalidIssues(_))));
    }
}
