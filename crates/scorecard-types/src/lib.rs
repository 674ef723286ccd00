use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tabled::{Table, Tabled};

/// Competency dimension shared by questions and scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
	Passion,
	Motivation,
	Skills,
	Behavior,
}

impl Category {
	/// All categories in scoring order.
	pub const ALL: [Category; 4] = [
		Category::Passion,
		Category::Motivation,
		Category::Skills,
		Category::Behavior,
	];

	/// Key used for this category inside the `scores` object.
	pub fn key(self) -> &'static str {
		match self {
			Category::Passion => "passion",
			Category::Motivation => "motivation",
			Category::Skills => "skills",
			Category::Behavior => "behavior",
		}
	}

	/// Longer human label, as used in the response schema descriptions.
	pub fn label(self) -> &'static str {
		match self {
			Category::Passion => "Passion",
			Category::Motivation => "Motivation",
			Category::Skills => "Skills & Learning",
			Category::Behavior => "Behavior & Workstyle",
		}
	}

	pub fn icon(self) -> &'static str {
		match self {
			Category::Passion => "🔥",
			Category::Motivation => "⚡",
			Category::Skills => "🛠️",
			Category::Behavior => "🧠",
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Category::Passion => "Passion",
			Category::Motivation => "Motivation",
			Category::Skills => "Skills",
			Category::Behavior => "Behavior",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
	pub text: String,
	pub category: Category,
}

impl Question {
	pub fn new(text: impl Into<String>, category: Category) -> Self {
		Self { text: text.into(), category }
	}
}

/// Answers collected for a questionnaire, one slot per question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
	answers: Vec<String>,
}

impl AnswerSet {
	/// Empty answers for `len` questions.
	pub fn with_len(len: usize) -> Self {
		Self { answers: vec![String::new(); len] }
	}

	pub fn from_vec(answers: Vec<String>) -> Self {
		Self { answers }
	}

	/// Replaces the answer at `index`. Returns `false` if the index is out of range.
	pub fn set(&mut self, index: usize, text: impl Into<String>) -> bool {
		match self.answers.get_mut(index) {
			Some(slot) => {
				*slot = text.into();
				true
			}
			None => false,
		}
	}

	pub fn len(&self) -> usize {
		self.answers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.answers.is_empty()
	}

	/// True when every answer has content after trimming whitespace.
	pub fn is_complete(&self) -> bool {
		self.answers.iter().all(|a| !a.trim().is_empty())
	}

	/// Positions of answers that are still blank.
	pub fn unanswered(&self) -> Vec<usize> {
		self.answers
			.iter()
			.enumerate()
			.filter(|(_, a)| a.trim().is_empty())
			.map(|(i, _)| i)
			.collect()
	}

	pub fn as_slice(&self) -> &[String] {
		&self.answers
	}
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCategory {
	#[serde(default, deserialize_with = "null_as_default")]
	pub score: f64,
	#[serde(default, deserialize_with = "null_as_default")]
	pub reasoning: String,
}

impl ScoreCategory {
	pub fn new(score: f64, reasoning: impl Into<String>) -> Self {
		Self { score, reasoning: reasoning.into() }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
	#[serde(default, deserialize_with = "null_as_default")]
	pub passion: ScoreCategory,
	#[serde(default, deserialize_with = "null_as_default")]
	pub motivation: ScoreCategory,
	#[serde(default, deserialize_with = "null_as_default")]
	pub skills: ScoreCategory,
	#[serde(default, deserialize_with = "null_as_default")]
	pub behavior: ScoreCategory,
}

impl Scores {
	pub fn get(&self, category: Category) -> &ScoreCategory {
		match category {
			Category::Passion => &self.passion,
			Category::Motivation => &self.motivation,
			Category::Skills => &self.skills,
			Category::Behavior => &self.behavior,
		}
	}

	/// Categories paired with their scores, in scoring order.
	pub fn iter(&self) -> impl Iterator<Item = (Category, &ScoreCategory)> + '_ {
		Category::ALL.into_iter().map(move |c| (c, self.get(c)))
	}
}

/// Structured evaluation returned by the scoring model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardData {
	pub scores: Scores,
	pub summary: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub strengths: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub areas_for_improvement: Vec<String>,
}

impl ScorecardData {
	/// Unweighted mean of the four category scores.
	pub fn overall_score(&self) -> f64 {
		let sum: f64 = self.scores.iter().map(|(_, s)| s.score).sum();
		sum / Category::ALL.len() as f64
	}

	/// Overall score rounded half away from zero to one decimal place.
	pub fn overall_score_display(&self) -> String {
		format_score(self.overall_score())
	}

	pub fn summary_table(&self) -> String {
		let rows: Vec<ScoreRow> = self
			.scores
			.iter()
			.map(|(category, s)| ScoreRow {
				category: category.label().to_string(),
				score: format_score(s.score),
				tier: ScoreTier::of(s.score).to_string(),
				reasoning: truncate(s.reasoning.clone(), 72),
			})
			.collect();

		let table = Table::new(rows);
		let overall = self.overall_score();

		format!(
			"{}\n\nOverall: {} ({})\n",
			table,
			format_score(overall),
			ScoreTier::of(overall)
		)
	}
}

/// One decimal place, rounding halves away from zero.
pub fn format_score(value: f64) -> String {
	format!("{:.1}", (value * 10.0).round() / 10.0)
}

/// Colour tier used for overall and per-category scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
	Good,
	Warning,
	Poor,
}

impl ScoreTier {
	pub fn of(score: f64) -> Self {
		if score >= 7.0 {
			ScoreTier::Good
		} else if score >= 4.0 {
			ScoreTier::Warning
		} else {
			ScoreTier::Poor
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			ScoreTier::Good => "good",
			ScoreTier::Warning => "warning",
			ScoreTier::Poor => "poor",
		}
	}
}

impl fmt::Display for ScoreTier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Catalog entry for one generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
	pub filename: String,
	pub timestamp: String,
	pub report_id: String,
	pub overall_score: String,
}

#[derive(Debug, Clone, Tabled)]
struct ScoreRow {
	category: String,
	score: String,
	tier: String,
	reasoning: String,
}

#[derive(Debug, Clone, Tabled)]
struct EntryRow {
	report_id: String,
	generated: String,
	overall: String,
	file: String,
}

/// Tabular listing of report index entries in stored order.
pub fn entries_table(entries: &[ReportEntry]) -> String {
	let rows: Vec<EntryRow> = entries
		.iter()
		.map(|e| EntryRow {
			report_id: e.report_id.clone(),
			generated: e.timestamp.clone(),
			overall: e.overall_score.clone(),
			file: e.filename.clone(),
		})
		.collect();
	Table::new(rows).to_string()
}

fn truncate(s: String, max_len: usize) -> String {
	if s.chars().count() <= max_len {
		return s;
	}
	let mut truncated = s.chars().take(max_len.saturating_sub(1)).collect::<String>();
	truncated.push('…');
	truncated
}
