//! Helpers for exercising the scorecard flow without a network.
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scorecard_types::{ScoreCategory, ScorecardData, Scores};
use serde_json::{json, Value};

use crate::archive::{ArchiveError, ArtifactSink};
use crate::model::{model_fn, ScoringModel};

/// A model that always answers with `response`.
///
/// # Example
/// ```ignore
/// let evaluator = Evaluator::builder()
///     .model(canned_model(sample_payload(8.0, 7.0, 6.0, 9.0).to_string()))
///     .build()?;
/// ```
pub fn canned_model(response: impl Into<String>) -> Arc<dyn ScoringModel> {
    let response = response.into();
    model_fn("canned", move |_req| {
        let response = response.clone();
        async move { Ok(response) }
    })
}

/// Well-formed model payload with the given category scores.
pub fn sample_payload(passion: f64, motivation: f64, skills: f64, behavior: f64) -> Value {
    json!({
        "scores": {
            "passion": { "score": passion, "reasoning": "Shows genuine curiosity about the field." },
            "motivation": { "score": motivation, "reasoning": "Sets clear goals and tracks them." },
            "skills": { "score": skills, "reasoning": "Solid fundamentals, limited depth in tooling." },
            "behavior": { "score": behavior, "reasoning": "Collaborative and calm under pressure." },
        },
        "summary": "A motivated candidate with strong team instincts.",
        "strengths": ["Collaboration", "Ownership", "Curiosity"],
        "areasForImprovement": ["Technical depth", "Delegation"],
    })
}

/// Typed counterpart of [`sample_payload`].
pub fn sample_scorecard(passion: f64, motivation: f64, skills: f64, behavior: f64) -> ScorecardData {
    ScorecardData {
        scores: Scores {
            passion: ScoreCategory::new(passion, "Shows genuine curiosity about the field."),
            motivation: ScoreCategory::new(motivation, "Sets clear goals and tracks them."),
            skills: ScoreCategory::new(skills, "Solid fundamentals, limited depth in tooling."),
            behavior: ScoreCategory::new(behavior, "Collaborative and calm under pressure."),
        },
        summary: "A motivated candidate with strong team instincts.".to_string(),
        strengths: vec!["Collaboration".into(), "Ownership".into(), "Curiosity".into()],
        areas_for_improvement: vec!["Technical depth".into(), "Delegation".into()],
    }
}

/// Collects emitted artifacts in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(filename, content)` pair emitted so far.
    pub fn artifacts(&self) -> Vec<(String, String)> {
        self.artifacts
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    /// Content of the most recent artifact named `filename`.
    pub fn latest(&self, filename: &str) -> Option<String> {
        self.artifacts()
            .into_iter()
            .rev()
            .find(|(name, _)| name == filename)
            .map(|(_, content)| content)
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn emit(&self, filename: &str, content: &str) -> Result<(), ArchiveError> {
        self.artifacts
            .lock()
            .map_err(|_| ArchiveError::Emit {
                filename: filename.to_string(),
                message: "sink lock poisoned".to_string(),
            })?
            .push((filename.to_string(), content.to_string()));
        Ok(())
    }
}

/// A sink that rejects every artifact.
#[derive(Debug, Default)]
pub struct FailingSink;

#[async_trait]
impl ArtifactSink for FailingSink {
    async fn emit(&self, filename: &str, _content: &str) -> Result<(), ArchiveError> {
        Err(ArchiveError::Emit {
            filename: filename.to_string(),
            message: "disk full".to_string(),
        })
    }
}
