//! Data models for verification results and sessions

use crate::sources::SourceRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of disagreement between sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictType {
    Temporal,
    Semantic,
    Numerical,
    Categorical,
}

impl ConflictType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictType::Temporal => "temporal",
            ConflictType::Semantic => "semantic",
            ConflictType::Numerical => "numerical",
            ConflictType::Categorical => "categorical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
}

impl ConflictSeverity {
    /// Confidence penalty applied per conflict of this severity
    pub fn penalty(&self) -> f32 {
        match self {
            ConflictSeverity::High => 0.2,
            ConflictSeverity::Medium => 0.1,
            ConflictSeverity::Low => 0.05,
        }
    }
}

/// A detected disagreement between at least two sources about one fact.
/// Always produced by a detector, never constructed by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactConflict {
    pub fact: String,
    pub conflicting_sources: Vec<String>,
    pub conflict_type: ConflictType,
    pub severity: ConflictSeverity,
    pub description: String,
}

/// Strategy that produced (or failed to produce) a winning value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    MajorityVote,
    AuthorityPreference,
    TemporalRecency,
    SemanticAnalysis,
    ManualReview,
}

impl ResolutionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionMethod::MajorityVote => "majority_vote",
            ResolutionMethod::AuthorityPreference => "authority_preference",
            ResolutionMethod::TemporalRecency => "temporal_recency",
            ResolutionMethod::SemanticAnalysis => "semantic_analysis",
            ResolutionMethod::ManualReview => "manual_review",
        }
    }
}

impl fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of conflict resolution for one fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub resolved: bool,
    pub resolution_method: ResolutionMethod,
    pub final_value: String,
    pub confidence: f32,
    pub explanation: String,
}

/// How the verdict was reached, by conflict and source count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationMethod {
    #[serde(rename = "single_source_verification")]
    SingleSource,
    #[serde(rename = "conflict_resolution")]
    ConflictResolution,
    #[serde(rename = "multi_source_verification")]
    MultiSource,
}

impl VerificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationMethod::SingleSource => "single_source_verification",
            VerificationMethod::ConflictResolution => "conflict_resolution",
            VerificationMethod::MultiSource => "multi_source_verification",
        }
    }
}

/// Immutable verdict for one fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub fact: String,
    pub verified: bool,
    pub confidence: f32,
    pub sources: Vec<SourceRecord>,
    pub conflicts: Vec<FactConflict>,
    pub resolution: ConflictResolution,
    pub timestamp: DateTime<Utc>,
    pub verification_method: VerificationMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }
}

/// One verification run over a set of facts. `end_time` is set exactly when
/// the status becomes terminal; `results` only grows while running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationSession {
    pub session_id: String,
    pub query: String,
    pub domain: String,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub results: Vec<VerificationResult>,
    pub overall_confidence: f32,
    pub status: SessionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_penalties() {
        assert!((ConflictSeverity::High.penalty() - 0.2).abs() < f32::EPSILON);
        assert!((ConflictSeverity::Medium.penalty() - 0.1).abs() < f32::EPSILON);
        assert!((ConflictSeverity::Low.penalty() - 0.05).abs() < f32::EPSILON);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&VerificationMethod::MultiSource).unwrap(),
            "\"multi_source_verification\""
        );
        assert_eq!(
            serde_json::to_string(&ResolutionMethod::MajorityVote).unwrap(),
            "\"majority_vote\""
        );
        assert_eq!(serde_json::to_string(&ConflictType::Numerical).unwrap(), "\"numerical\"");
        assert_eq!(serde_json::to_string(&SessionStatus::Running).unwrap(), "\"running\"");
    }
}
