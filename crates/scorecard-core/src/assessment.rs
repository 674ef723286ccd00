use std::sync::Arc;

use scorecard_types::{AnswerSet, Question, ScorecardData};
use tracing::{info, warn};

use crate::archive::ReportArchive;
use crate::evaluator::{EvaluationError, Evaluator};

/// What happened to the report for an evaluated assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveStatus {
    Saved { filename: String },
    Failed { message: String },
    /// No archive configured.
    Skipped,
}

/// A delivered scorecard together with the independent archival result.
#[derive(Debug, Clone)]
pub struct AssessmentOutcome {
    pub scorecard: ScorecardData,
    pub archive: ArchiveStatus,
}

/// Drives one questionnaire through evaluation and best-effort archival.
pub struct Assessment {
    questions: Vec<Question>,
    evaluator: Arc<Evaluator>,
    archive: Option<ReportArchive>,
}

impl Assessment {
    pub fn new(questions: Vec<Question>, evaluator: Arc<Evaluator>) -> Self {
        Self {
            questions,
            evaluator,
            archive: None,
        }
    }

    pub fn with_archive(mut self, archive: ReportArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Empty answers sized for this questionnaire.
    pub fn blank_answers(&self) -> AnswerSet {
        AnswerSet::with_len(self.questions.len())
    }

    /// Evaluates `answers` and, on success, archives the report.
    ///
    /// Archival failure never turns into an error here; it is reported in
    /// [`AssessmentOutcome::archive`] alongside the scorecard.
    pub async fn submit(&self, answers: &AnswerSet) -> Result<AssessmentOutcome, EvaluationError> {
        let scorecard = self
            .evaluator
            .evaluate(&self.questions, answers.as_slice())
            .await?;

        let archive = match &self.archive {
            None => ArchiveStatus::Skipped,
            Some(archive) => match archive.archive(&scorecard, answers.as_slice()).await {
                Ok(filename) => {
                    info!("HTML report generated successfully: {}", filename);
                    ArchiveStatus::Saved { filename }
                }
                Err(err) => {
                    warn!("Failed to generate HTML report: {}", err);
                    ArchiveStatus::Failed {
                        message: err.to_string(),
                    }
                }
            },
        };

        Ok(AssessmentOutcome { scorecard, archive })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::INDEX_FILENAME;
    use crate::model::model_fn;
    use crate::questions::question_bank;
    use crate::testing::{canned_model, sample_payload, FailingSink, MemorySink};
    use scorecard_store::ReportIndex;

    fn full_answers(n: usize) -> AnswerSet {
        AnswerSet::from_vec((0..n).map(|i| format!("Detailed answer number {i}")).collect())
    }

    fn evaluator_for(payload: serde_json::Value) -> Arc<Evaluator> {
        Arc::new(
            Evaluator::builder()
                .model(canned_model(payload.to_string()))
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_submission() {
        let sink = Arc::new(MemorySink::new());
        let index = ReportIndex::in_memory();
        let archive = ReportArchive::new(index.clone(), sink.clone(), question_bank());
        let assessment = Assessment::new(question_bank(), evaluator_for(sample_payload(8.0, 7.0, 6.0, 9.0)))
            .with_archive(archive);

        let answers = full_answers(25);
        assert!(answers.is_complete());

        let outcome = assessment.submit(&answers).await.unwrap();
        let scores = &outcome.scorecard.scores;
        assert_eq!(
            (scores.passion.score, scores.motivation.score, scores.skills.score, scores.behavior.score),
            (8.0, 7.0, 6.0, 9.0)
        );
        assert_eq!(outcome.scorecard.overall_score_display(), "7.5");

        let filename = match &outcome.archive {
            ArchiveStatus::Saved { filename } => filename.clone(),
            other => panic!("expected saved report, got {other:?}"),
        };
        let report = sink.latest(&filename).unwrap();
        assert_eq!(report.matches("class=\"score-row").count(), 4);
        assert!(report.contains("Detailed answer number 24"));

        assert_eq!(index.count(), 1);
        assert!(sink.latest(INDEX_FILENAME).unwrap().contains("Overall Score: 7.5"));
    }

    #[tokio::test]
    async fn test_archive_failure_keeps_scorecard() {
        let archive = ReportArchive::new(ReportIndex::in_memory(), Arc::new(FailingSink), question_bank());
        let assessment = Assessment::new(question_bank(), evaluator_for(sample_payload(5.0, 5.0, 5.0, 5.0)))
            .with_archive(archive);

        let outcome = assessment.submit(&full_answers(25)).await.unwrap();
        assert_eq!(outcome.scorecard.scores.skills.score, 5.0);
        assert!(matches!(outcome.archive, ArchiveStatus::Failed { ref message } if message.contains("disk full")));
    }

    #[tokio::test]
    async fn test_without_archive_is_skipped() {
        let assessment = Assessment::new(question_bank(), evaluator_for(sample_payload(5.0, 5.0, 5.0, 5.0)));
        let outcome = assessment.submit(&assessment.blank_answers()).await.unwrap();
        assert_eq!(outcome.archive, ArchiveStatus::Skipped);
    }

    #[tokio::test]
    async fn test_evaluation_failure_skips_archive() {
        let sink = Arc::new(MemorySink::new());
        let archive = ReportArchive::new(ReportIndex::in_memory(), sink.clone(), question_bank());
        let model = model_fn("down", |_req| async move {
            Err::<String, _>(anyhow::anyhow!("quota exceeded"))
        });
        let evaluator = Arc::new(Evaluator::builder().model(model).build().unwrap());
        let assessment = Assessment::new(question_bank(), evaluator).with_archive(archive);

        let err = assessment.submit(&full_answers(25)).await.unwrap_err();
        assert!(matches!(err, EvaluationError::Remote(_)));
        assert!(sink.artifacts().is_empty());
    }
}
