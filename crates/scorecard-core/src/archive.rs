use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rand::Rng;
use scorecard_store::{AppendOutcome, ReportIndex};
use scorecard_types::{Question, ReportEntry, ScorecardData};
use thiserror::Error;
use tracing::{debug, info};

use crate::report::{render_index, render_report, ReportDocument};

pub const INDEX_FILENAME: &str = "index.html";
const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to emit {filename}: {message}")]
    Emit { filename: String, message: String },
}

/// Destination for generated documents.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn emit(&self, filename: &str, content: &str) -> Result<(), ArchiveError>;
}

/// Writes artifacts as files under a directory, creating it on first use.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn emit(&self, filename: &str, content: &str) -> Result<(), ArchiveError> {
        let to_err = |e: std::io::Error| ArchiveError::Emit {
            filename: filename.to_string(),
            message: e.to_string(),
        };
        tokio::fs::create_dir_all(&self.dir).await.map_err(to_err)?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, content).await.map_err(to_err)?;
        debug!("wrote {:?}", path);
        Ok(())
    }
}

/// Identity of one report: when it was generated and its unique id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMeta {
    pub report_id: String,
    pub timestamp: String,
}

impl ReportMeta {
    /// `report_<unix millis>_<9 base-36 chars>` stamped with the current time.
    pub fn generate() -> Self {
        let now = Utc::now();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();

        Self {
            report_id: format!("report_{}_{}", now.timestamp_millis(), suffix),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn filename(&self) -> String {
        report_filename(&self.report_id)
    }
}

pub fn report_filename(report_id: &str) -> String {
    format!("assessment_{report_id}.html")
}

/// Renders completed scorecards into standalone reports and keeps the
/// report index document in step with durable storage.
#[derive(Clone)]
pub struct ReportArchive {
    index: ReportIndex,
    sink: Arc<dyn ArtifactSink>,
    questions: Vec<Question>,
}

impl ReportArchive {
    pub fn new(index: ReportIndex, sink: Arc<dyn ArtifactSink>, questions: Vec<Question>) -> Self {
        Self {
            index,
            sink,
            questions,
        }
    }

    /// Emits the report for `scorecard`, updates the index and returns the
    /// report filename.
    pub async fn archive(
        &self,
        scorecard: &ScorecardData,
        answers: &[String],
    ) -> Result<String, ArchiveError> {
        self.archive_as(ReportMeta::generate(), scorecard, answers).await
    }

    /// Same as [`archive`](Self::archive) with a caller-supplied identity.
    pub async fn archive_as(
        &self,
        meta: ReportMeta,
        scorecard: &ScorecardData,
        answers: &[String],
    ) -> Result<String, ArchiveError> {
        let filename = meta.filename();
        let html = render_report(&ReportDocument {
            scorecard,
            questions: &self.questions,
            answers,
            timestamp: &meta.timestamp,
            report_id: &meta.report_id,
        });
        self.sink.emit(&filename, &html).await?;

        self.update_index(ReportEntry {
            filename: filename.clone(),
            timestamp: meta.timestamp,
            report_id: meta.report_id,
            overall_score: scorecard.overall_score_display(),
        })
        .await?;

        info!(%filename, "report archived");
        Ok(filename)
    }

    /// Adds `entry` unless its report id is already indexed, then re-emits
    /// the index document.
    pub async fn update_index(&self, entry: ReportEntry) -> Result<AppendOutcome, ArchiveError> {
        let (outcome, entries) = self.index.append(entry);
        self.sink.emit(INDEX_FILENAME, &render_index(&entries)).await?;
        Ok(outcome)
    }

    /// Re-emits the index document from storage. Returns the entry count.
    pub async fn regenerate_index(&self) -> Result<usize, ArchiveError> {
        let entries = self.index.load();
        self.sink.emit(INDEX_FILENAME, &render_index(&entries)).await?;
        Ok(entries.len())
    }

    /// Empties the index and emits the empty-state index document.
    pub async fn clear_all(&self) -> Result<(), ArchiveError> {
        self.index.clear();
        self.sink.emit(INDEX_FILENAME, &render_index(&[])).await
    }

    pub fn report_count(&self) -> usize {
        self.index.count()
    }

    pub fn entries(&self) -> Vec<ReportEntry> {
        self.index.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::question_bank;
    use crate::testing::{sample_scorecard, FailingSink, MemorySink};

    fn archive_with(sink: Arc<MemorySink>) -> ReportArchive {
        ReportArchive::new(ReportIndex::in_memory(), sink, question_bank())
    }

    fn answers() -> Vec<String> {
        vec!["An answer".to_string(); 25]
    }

    #[test]
    fn test_report_meta_format() {
        let meta = ReportMeta::generate();
        let parts: Vec<&str> = meta.report_id.splitn(3, '_').collect();
        assert_eq!(parts[0], "report");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| BASE36.contains(&b)));
        assert!(meta.timestamp.ends_with('Z'));
        assert_eq!(meta.filename(), format!("assessment_{}.html", meta.report_id));
    }

    #[test]
    fn test_report_ids_differ() {
        let a = ReportMeta::generate();
        let b = ReportMeta::generate();
        assert_ne!(a.report_id, b.report_id);
    }

    #[tokio::test]
    async fn test_archive_emits_report_then_index() {
        let sink = Arc::new(MemorySink::new());
        let archive = archive_with(sink.clone());

        let filename = archive
            .archive(&sample_scorecard(8.0, 7.0, 6.0, 9.0), &answers())
            .await
            .unwrap();

        let artifacts = sink.artifacts();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].0, filename);
        assert_eq!(artifacts[1].0, INDEX_FILENAME);
        assert!(artifacts[1].1.contains(&format!("href=\"{filename}\"")));

        let entries = archive.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].overall_score, "7.5");
        assert_eq!(entries[0].filename, filename);
    }

    #[tokio::test]
    async fn test_same_report_id_indexed_once() {
        let sink = Arc::new(MemorySink::new());
        let archive = archive_with(sink.clone());
        let meta = ReportMeta {
            report_id: "report_1_fixed".to_string(),
            timestamp: "2024-05-01T10:00:00.000Z".to_string(),
        };

        let scorecard = sample_scorecard(8.0, 7.0, 6.0, 9.0);
        archive.archive_as(meta.clone(), &scorecard, &answers()).await.unwrap();
        archive.archive_as(meta, &scorecard, &answers()).await.unwrap();

        assert_eq!(archive.report_count(), 1);
        let index = sink.latest(INDEX_FILENAME).unwrap();
        assert_eq!(index.matches("data-report-id=\"report_1_fixed\"").count(), 1);
    }

    #[tokio::test]
    async fn test_clear_then_regenerate_is_empty() {
        let sink = Arc::new(MemorySink::new());
        let archive = archive_with(sink.clone());
        archive
            .archive(&sample_scorecard(5.0, 5.0, 5.0, 5.0), &answers())
            .await
            .unwrap();

        archive.clear_all().await.unwrap();
        assert!(sink.latest(INDEX_FILENAME).unwrap().contains("No Reports Yet"));

        let count = archive.regenerate_index().await.unwrap();
        assert_eq!(count, 0);
        assert_eq!(archive.report_count(), 0);
        assert!(sink.latest(INDEX_FILENAME).unwrap().contains("No Reports Yet"));
    }

    #[tokio::test]
    async fn test_regenerate_keeps_insertion_order() {
        let sink = Arc::new(MemorySink::new());
        let archive = archive_with(sink.clone());
        for id in ["report_1_a", "report_2_b", "report_3_c"] {
            let meta = ReportMeta {
                report_id: id.to_string(),
                timestamp: "2024-05-01T10:00:00.000Z".to_string(),
            };
            archive
                .archive_as(meta, &sample_scorecard(6.0, 6.0, 6.0, 6.0), &answers())
                .await
                .unwrap();
        }

        archive.regenerate_index().await.unwrap();
        let index = sink.latest(INDEX_FILENAME).unwrap();
        let positions: Vec<usize> = ["report_1_a", "report_2_b", "report_3_c"]
            .iter()
            .map(|id| index.find(&format!("data-report-id=\"{id}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_sink_failure_is_reported() {
        let archive = ReportArchive::new(
            ReportIndex::in_memory(),
            Arc::new(FailingSink),
            question_bank(),
        );
        let err = archive
            .archive(&sample_scorecard(5.0, 5.0, 5.0, 5.0), &answers())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert_eq!(archive.report_count(), 0);
    }

    #[tokio::test]
    async fn test_directory_sink_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let archive = ReportArchive::new(
            ReportIndex::in_memory(),
            Arc::new(DirectorySink::new(&out)),
            question_bank(),
        );

        let filename = archive
            .archive(&sample_scorecard(8.0, 7.0, 6.0, 9.0), &answers())
            .await
            .unwrap();

        let report = std::fs::read_to_string(out.join(&filename)).unwrap();
        assert!(report.contains("Candidate Assessment Report"));
        let index = std::fs::read_to_string(out.join(INDEX_FILENAME)).unwrap();
        assert!(index.contains(&filename));
    }
}
