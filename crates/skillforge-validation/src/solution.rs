//! Cross-skill solution validation
//!
//! A solution wires several skills together through grants, handoffs, channel
//! routing and security contracts. Structural validity here means every
//! reference points at a skill (or grant) that actually exists.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use skillforge_skills::{ExpansionEngine, SkillDocument};
use tracing::info;

use crate::error::{ErrorCode, Severity, ValidationError};
use crate::quality::{assess, QualityOutcome, QualityScorer};
use crate::structural::{StructuralValidator, ValidationReport};

/// Multi-skill solution document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub skills: Vec<SolutionSkill>,
    #[serde(default)]
    pub grants: Vec<Grant>,
    #[serde(default)]
    pub handoffs: Vec<Handoff>,
    /// Channel name → routing entry
    #[serde(default)]
    pub routing: BTreeMap<String, ChannelRoute>,
    #[serde(default)]
    pub security_contracts: Vec<SecurityContract>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Skill membership entry: a bare id or an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SolutionSkill {
    Id(String),
    Entry {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<String>,
    },
}

impl SolutionSkill {
    /// Referenced skill id
    pub fn id(&self) -> &str {
        match self {
            SolutionSkill::Id(id) => id,
            SolutionSkill::Entry { id, .. } => id,
        }
    }
}

/// Capability token passed between skills
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub issued_by: Vec<String>,
    #[serde(default)]
    pub consumed_by: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Conversation transfer between two skills
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Handoff {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default)]
    pub grants_passed: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Routing entry for one channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelRoute {
    #[serde(default)]
    pub default_skill: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Security agreement between a consuming and a providing skill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityContract {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub consumer: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub requires_grants: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Connector inventory supplied alongside a solution
#[derive(Debug, Clone, Default)]
pub struct ConnectorBindings {
    /// Configured connectors (objects with an `id`)
    pub connectors: Option<Vec<Value>>,
    /// Available MCP servers (array of ids/objects, or an object keyed by id)
    pub mcp_store: Option<Value>,
}

impl ConnectorBindings {
    fn known_ids(&self) -> Option<HashSet<String>> {
        if self.connectors.is_none() && self.mcp_store.is_none() {
            return None;
        }

        let mut ids = HashSet::new();
        for connector in self.connectors.iter().flatten() {
            collect_ids(connector, &mut ids);
        }
        match &self.mcp_store {
            Some(Value::Array(entries)) => entries.iter().for_each(|e| collect_ids(e, &mut ids)),
            Some(Value::Object(map)) => ids.extend(map.keys().cloned()),
            _ => {}
        }
        Some(ids)
    }
}

fn collect_ids(entry: &Value, ids: &mut HashSet<String>) {
    match entry {
        Value::String(id) => {
            ids.insert(id.clone());
        }
        Value::Object(map) => {
            for key in ["id", "connection_id"] {
                if let Some(id) = map.get(key).and_then(Value::as_str) {
                    ids.insert(id.to_string());
                }
            }
        }
        _ => {}
    }
}

/// Counts reported with a solution validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub skills: usize,
    pub grants: usize,
    pub handoffs: usize,
    pub routes: usize,
    pub security_contracts: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// Full result of validating a solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
    pub summary: SolutionSummary,
    pub quality: QualityOutcome,
}

/// Validates solutions: referential integrity first, quality scoring second
pub struct SolutionValidator {
    scorer: Arc<dyn QualityScorer>,
    quality_timeout: Duration,
}

impl SolutionValidator {
    /// Create a validator around a quality scorer
    pub fn new(scorer: Arc<dyn QualityScorer>, quality_timeout: Duration) -> Self {
        Self {
            scorer,
            quality_timeout,
        }
    }

    /// Expand every skill, check the solution, then score it (best effort)
    pub async fn validate(
        &self,
        solution: &Solution,
        skills: &[SkillDocument],
        bindings: &ConnectorBindings,
    ) -> SolutionReport {
        let expanded: Vec<SkillDocument> = skills
            .iter()
            .map(|skill| ExpansionEngine::expand(skill).skill)
            .collect();

        let report = Self::check_structure(solution, &expanded, bindings);
        let quality = assess(self.scorer.as_ref(), solution, &expanded, self.quality_timeout).await;

        let summary = SolutionSummary {
            skills: expanded.len(),
            grants: solution.grants.len(),
            handoffs: solution.handoffs.len(),
            routes: solution.routing.len(),
            security_contracts: solution.security_contracts.len(),
            errors: report.errors.len(),
            warnings: report.warnings.len(),
        };

        info!(
            solution = %solution.id,
            valid = report.valid,
            errors = summary.errors,
            warnings = summary.warnings,
            "Validated solution"
        );

        SolutionReport {
            valid: report.valid,
            errors: report.errors,
            warnings: report.warnings,
            summary,
            quality,
        }
    }

    /// Referential integrity checks over already-expanded skills
    pub fn check_structure(
        solution: &Solution,
        skills: &[SkillDocument],
        bindings: &ConnectorBindings,
    ) -> ValidationReport {
        let mut findings = Vec::new();
        let known: HashSet<&str> = skills.iter().map(|skill| skill.id.as_str()).collect();
        let declared_grants: HashSet<&str> =
            solution.grants.iter().map(|grant| grant.key.as_str()).collect();

        let mut members = HashSet::new();
        for (idx, member) in solution.skills.iter().enumerate() {
            members.insert(member.id());
            if !known.contains(member.id()) {
                findings.push(ValidationError::error(
                    format!("skills[{}]", idx),
                    ErrorCode::UnknownReference,
                    format!("Solution lists skill {} but no such skill was provided", member.id()),
                ));
            }
        }
        if !solution.skills.is_empty() {
            for skill in skills.iter().filter(|s| !members.contains(s.id.as_str())) {
                findings.push(ValidationError::warning(
                    "skills",
                    ErrorCode::UnknownReference,
                    format!("Skill {} was provided but is not part of the solution", skill.id),
                ));
            }
        }

        for (idx, grant) in solution.grants.iter().enumerate() {
            for (field, ids) in [("issued_by", &grant.issued_by), ("consumed_by", &grant.consumed_by)] {
                for id in ids.iter().filter(|id| !known.contains(id.as_str())) {
                    let verb = if field == "issued_by" { "issued" } else { "consumed" };
                    findings.push(ValidationError::error(
                        format!("grants[{}].{}", idx, field),
                        ErrorCode::UnknownReference,
                        format!("Grant {} is {} by unknown skill {}", grant.key, verb, id),
                    ));
                }
            }
        }

        for (idx, handoff) in solution.handoffs.iter().enumerate() {
            for (field, id) in [("from", &handoff.from), ("to", &handoff.to)] {
                if !known.contains(id.as_str()) {
                    findings.push(ValidationError::error(
                        format!("handoffs[{}].{}", idx, field),
                        ErrorCode::UnknownReference,
                        format!("Handoff {} {} unknown skill {}", handoff.id, field, id),
                    ));
                }
            }
            if !handoff.from.is_empty() && handoff.from == handoff.to {
                findings.push(ValidationError::warning(
                    format!("handoffs[{}]", idx),
                    ErrorCode::InvalidFormat,
                    format!("Handoff {} hands off to its own source skill", handoff.id),
                ));
            }
            for grant in handoff
                .grants_passed
                .iter()
                .filter(|g| !declared_grants.contains(g.as_str()))
            {
                findings.push(ValidationError::warning(
                    format!("handoffs[{}].grants_passed", idx),
                    ErrorCode::UnknownReference,
                    format!("Handoff {} passes undeclared grant {}", handoff.id, grant),
                ));
            }
        }

        for (channel, route) in &solution.routing {
            if !known.contains(route.default_skill.as_str()) {
                findings.push(ValidationError::error(
                    format!("routing.{}.default_skill", channel),
                    ErrorCode::UnknownReference,
                    format!(
                        "Channel {} routes to unknown skill {}",
                        channel, route.default_skill
                    ),
                ));
            }
        }

        for (idx, contract) in solution.security_contracts.iter().enumerate() {
            for (field, id) in [("consumer", &contract.consumer), ("provider", &contract.provider)] {
                if !known.contains(id.as_str()) {
                    findings.push(ValidationError::error(
                        format!("security_contracts[{}].{}", idx, field),
                        ErrorCode::UnknownReference,
                        format!(
                            "Security contract {} names unknown {} skill {}",
                            contract.name, field, id
                        ),
                    ));
                }
            }
            for grant in contract
                .requires_grants
                .iter()
                .filter(|g| !declared_grants.contains(g.as_str()))
            {
                findings.push(ValidationError::error(
                    format!("security_contracts[{}].requires_grants", idx),
                    ErrorCode::UnknownReference,
                    format!(
                        "Security contract {} requires undeclared grant {}",
                        contract.name, grant
                    ),
                ));
            }
        }

        if let Some(available) = bindings.known_ids() {
            for skill in skills {
                for (idx, tool) in skill.tools.iter().enumerate() {
                    let Some(connection) = tool.source.as_ref().and_then(|s| s.connection_id.as_deref())
                    else {
                        continue;
                    };
                    if !available.contains(connection) {
                        findings.push(ValidationError::warning(
                            format!("skills[{}].tools[{}].source.connection_id", skill.id, idx),
                            ErrorCode::UnknownReference,
                            format!("Tool {} uses unavailable connector {}", tool.name, connection),
                        ));
                    }
                }
            }
        }

        // Per-skill structural findings are advisory at solution level.
        for skill in skills {
            let report = StructuralValidator::validate(skill);
            let prefix = format!("skills[{}]", skill.id);
            for mut finding in report.errors.into_iter().chain(report.warnings) {
                finding.severity = Severity::Warning;
                findings.push(finding.prefixed(&prefix));
            }
        }

        ValidationReport::from_findings(findings)
    }
}
