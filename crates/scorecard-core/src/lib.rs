//! scorecard-core: score questionnaire answers with a remote model and archive
//! the result as standalone HTML reports.
//! See `examples/offline_assessment.rs` for a quickstart.

pub mod archive;
pub mod assessment;
pub mod config;
pub mod evaluator;
pub mod gemini;
pub mod model;
pub mod prompt;
pub mod questions;
pub mod report;
pub mod schema;
pub mod testing;

pub use archive::{ArchiveError, ArtifactSink, DirectorySink, ReportArchive, ReportMeta, INDEX_FILENAME};
pub use assessment::{ArchiveStatus, Assessment, AssessmentOutcome};
pub use config::{api_key_from_env, ConfigError, ScorecardConfig};
pub use evaluator::{EvaluationError, Evaluator, EvaluatorBuilder, Validation};
pub use gemini::GeminiModel;
pub use model::{model_fn, GenerationRequest, ModelError, ScoringModel};
pub use questions::question_bank;
pub use schema::response_schema;

pub use scorecard_store::{AppendOutcome, KeyValueStore, MemoryStore, ReportIndex, SqliteStore, StoreError};
pub use scorecard_types::{
	entries_table, AnswerSet, Category, Question, ReportEntry, ScoreCategory, ScoreTier, ScorecardData, Scores,
};
