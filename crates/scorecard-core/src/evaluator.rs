use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonschema::JSONSchema;
use scorecard_types::{Question, ScorecardData};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::model::{GenerationRequest, ModelError, ScoringModel};
use crate::prompt::{build_prompt, SYSTEM_INSTRUCTION};
use crate::schema::{response_schema, to_json_schema};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// How much of the model response is checked before it is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
	/// Only `scores` and `summary` must be present.
	#[default]
	Lenient,
	/// Full response schema plus every score within 1..=10.
	Strict,
}

#[derive(Debug, Error)]
pub enum EvaluationError {
	#[error("Failed to generate scorecard: request timed out after {} seconds", .0.as_secs())]
	Timeout(Duration),

	#[error("Failed to generate scorecard: {0}")]
	Remote(#[from] ModelError),

	#[error("Failed to generate scorecard: invalid data structure received from API: {0}")]
	MalformedResponse(String),

	#[error("{answers} answers supplied for {questions} questions")]
	AnswerCountMismatch { questions: usize, answers: usize },
}

pub struct EvaluatorBuilder {
	model: Option<Arc<dyn ScoringModel>>,
	timeout: Duration,
	temperature: f32,
	validation: Validation,
}

impl EvaluatorBuilder {
	pub fn new() -> Self {
		Self {
			model: None,
			timeout: DEFAULT_TIMEOUT,
			temperature: DEFAULT_TEMPERATURE,
			validation: Validation::default(),
		}
	}

	pub fn model(mut self, model: Arc<dyn ScoringModel>) -> Self {
		self.model = Some(model);
		self
	}

	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn temperature(mut self, temperature: f32) -> Self {
		self.temperature = temperature;
		self
	}

	pub fn validation(mut self, validation: Validation) -> Self {
		self.validation = validation;
		self
	}

	pub fn build(self) -> anyhow::Result<Evaluator> {
		let strict_schema = match self.validation {
			Validation::Lenient => None,
			Validation::Strict => {
				let schema = to_json_schema(&response_schema());
				let compiled = JSONSchema::compile(&schema)
					.map_err(|e| anyhow::anyhow!("Invalid response schema: {}", e))?;
				Some(compiled)
			}
		};

		Ok(Evaluator {
			model: self.model.ok_or_else(|| anyhow::anyhow!("model must be set"))?,
			timeout: self.timeout,
			temperature: self.temperature,
			strict_schema,
		})
	}
}

impl Default for EvaluatorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Turns questionnaire answers into a [`ScorecardData`] by delegating to a
/// scoring model.
pub struct Evaluator {
	model: Arc<dyn ScoringModel>,
	timeout: Duration,
	temperature: f32,
	strict_schema: Option<JSONSchema>,
}

impl Evaluator {
	pub fn builder() -> EvaluatorBuilder {
		EvaluatorBuilder::new()
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Scores `answers` against `questions` with a single model call.
	///
	/// The call races the configured timeout. When the timeout wins, the
	/// request future is dropped and nothing it produces is observed.
	pub async fn evaluate(
		&self,
		questions: &[Question],
		answers: &[String],
	) -> Result<ScorecardData, EvaluationError> {
		if questions.len() != answers.len() {
			return Err(EvaluationError::AnswerCountMismatch {
				questions: questions.len(),
				answers: answers.len(),
			});
		}

		let request = GenerationRequest {
			system: SYSTEM_INSTRUCTION.to_string(),
			prompt: build_prompt(questions, answers),
			schema: response_schema(),
			temperature: self.temperature,
		};

		let started = Instant::now();
		let text = match tokio::time::timeout(self.timeout, self.model.generate(&request)).await {
			Ok(Ok(text)) => text,
			Ok(Err(err)) => {
				error!(model = self.model.name(), "Error evaluating answers: {}", err);
				return Err(err.into());
			}
			Err(_) => {
				error!(model = self.model.name(), "Evaluation timed out after {:?}", self.timeout);
				return Err(EvaluationError::Timeout(self.timeout));
			}
		};
		debug!(elapsed_ms = started.elapsed().as_millis() as u64, "model responded");

		let scorecard = self.parse_response(&text)?;

		info!(
			model = self.model.name(),
			overall = %scorecard.overall_score_display(),
			"scorecard generated"
		);
		Ok(scorecard)
	}

	fn parse_response(&self, text: &str) -> Result<ScorecardData, EvaluationError> {
		let value: Value = serde_json::from_str(strip_json_fences(text))
			.map_err(|e| EvaluationError::MalformedResponse(format!("invalid JSON: {e}")))?;

		for key in ["scores", "summary"] {
			let present = match value.get(key) {
				None | Some(Value::Null) => false,
				Some(Value::String(s)) => !s.is_empty(),
				Some(_) => true,
			};
			if !present {
				return Err(EvaluationError::MalformedResponse(format!("missing '{key}'")));
			}
		}

		if let Some(schema) = &self.strict_schema {
			if let Err(errors) = schema.validate(&value) {
				let messages: Vec<String> = errors
					.map(|e| format!("{}: {}", e.instance_path, e))
					.collect();
				return Err(EvaluationError::MalformedResponse(messages.join("; ")));
			}
		}

		let scorecard: ScorecardData = serde_json::from_value(value)
			.map_err(|e| EvaluationError::MalformedResponse(e.to_string()))?;

		if self.strict_schema.is_some() {
			for (category, s) in scorecard.scores.iter() {
				if !(1.0..=10.0).contains(&s.score) {
					return Err(EvaluationError::MalformedResponse(format!(
						"{} score {} outside 1-10",
						category.key(),
						s.score
					)));
				}
			}
		}

		Ok(scorecard)
	}
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
	let text = text.trim();
	let inner = text
		.strip_prefix("```json")
		.or_else(|| text.strip_prefix("```"));
	match inner {
		Some(stripped) => {
			let stripped = stripped.trim_start();
			stripped.strip_suffix("```").map(str::trim).unwrap_or(stripped)
		}
		None => text,
	}
}
