use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use scorecard_core::{
	api_key_from_env, entries_table, question_bank, AnswerSet, ArchiveStatus, Assessment, DirectorySink,
	Evaluator, GeminiModel, ReportArchive, ReportIndex, ScorecardConfig, SqliteStore,
};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "scorecard", about = "Score candidate questionnaires and archive the reports")]
struct Cli {
	/// YAML config file (model, timeout, validation, output directory)
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	/// Print the questionnaire
	Questions(QuestionsArgs),
	/// Write an empty answers file to fill in
	Template(TemplateArgs),
	/// Evaluate an answers file and archive the report
	Run(RunArgs),
	/// Inspect or rebuild the report index
	#[command(subcommand)]
	Index(IndexCommand),
}

#[derive(Debug, Clone, Parser)]
struct QuestionsArgs {
	/// Print as JSON instead of text
	#[arg(long, action = ArgAction::SetTrue)]
	json: bool,
}

#[derive(Debug, Clone, Parser)]
struct TemplateArgs {
	/// Where to write the answers file
	#[arg(long, default_value = "answers.json")]
	out: PathBuf,
}

#[derive(Debug, Clone, Parser)]
struct RunArgs {
	/// JSON file holding the answers: either `["...", ...]` or `{ "answers": [...] }`
	#[arg(long)]
	answers: PathBuf,

	/// Submit even if some answers are blank
	#[arg(long, action = ArgAction::SetTrue)]
	allow_incomplete: bool,

	/// Skip writing the HTML report and index
	#[arg(long, action = ArgAction::SetTrue)]
	no_archive: bool,

	/// Output the scorecard JSON to a file
	#[arg(long)]
	json_out: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum IndexCommand {
	/// List indexed reports
	List,
	/// Rewrite index.html from stored entries
	Regenerate,
	/// Remove every entry and write an empty index.html
	Clear,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswersFile {
	Plain(Vec<String>),
	Wrapped { answers: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	let cli = Cli::parse();
	let config = ScorecardConfig::load(cli.config.as_deref())?;

	match cli.command {
		Commands::Questions(args) => questions(args)?,
		Commands::Template(args) => template(args).await?,
		Commands::Run(args) => run(args, &config).await?,
		Commands::Index(cmd) => index(cmd, &config).await?,
	}
	Ok(())
}

fn questions(args: QuestionsArgs) -> Result<()> {
	let bank = question_bank();
	if args.json {
		println!("{}", serde_json::to_string_pretty(&bank)?);
		return Ok(());
	}
	for (i, q) in bank.iter().enumerate() {
		println!("{:>2}. [{}] {}", i + 1, q.category, q.text);
	}
	Ok(())
}

async fn template(args: TemplateArgs) -> Result<()> {
	let blank = AnswerSet::with_len(question_bank().len());
	let json = serde_json::to_string_pretty(&blank)?;
	tokio::fs::write(&args.out, json)
		.await
		.with_context(|| format!("Failed to write {:?}", args.out))?;
	println!("Wrote {} blank answers to {}", blank.len(), args.out.display());
	Ok(())
}

fn open_archive(config: &ScorecardConfig) -> Result<ReportArchive> {
	let store_path = config.store_path();
	if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
	}
	let store = SqliteStore::open(&store_path)
		.with_context(|| format!("Failed to open report store {:?}", store_path))?;
	Ok(ReportArchive::new(
		ReportIndex::new(Arc::new(store)),
		Arc::new(DirectorySink::new(&config.output_dir)),
		question_bank(),
	))
}

async fn load_answers(path: &Path) -> Result<AnswerSet> {
	let content = tokio::fs::read_to_string(path)
		.await
		.with_context(|| format!("Failed to read {:?}", path))?;
	let parsed: AnswersFile =
		serde_json::from_str(&content).with_context(|| format!("Invalid answers file {:?}", path))?;
	let answers = match parsed {
		AnswersFile::Plain(answers) | AnswersFile::Wrapped { answers } => answers,
	};
	Ok(AnswerSet::from_vec(answers))
}

async fn run(args: RunArgs, config: &ScorecardConfig) -> Result<()> {
	let questions = question_bank();
	let answers = load_answers(&args.answers).await?;

	if answers.len() != questions.len() {
		anyhow::bail!(
			"{:?} holds {} answers but the questionnaire has {} questions",
			args.answers,
			answers.len(),
			questions.len()
		);
	}
	if !answers.is_complete() && !args.allow_incomplete {
		let missing: Vec<String> = answers.unanswered().iter().map(|i| (i + 1).to_string()).collect();
		anyhow::bail!(
			"Unanswered questions: {} (pass --allow-incomplete to submit anyway)",
			missing.join(", ")
		);
	}

	let api_key = api_key_from_env()?;
	let model = GeminiModel::with_endpoint(api_key, &config.model.api_base, &config.model.name)?;
	let evaluator = Evaluator::builder()
		.model(Arc::new(model))
		.timeout(config.model.timeout())
		.temperature(config.model.temperature)
		.validation(config.validation)
		.build()?;
	info!("Scoring with {} (timeout {:?})", config.model.name, evaluator.timeout());

	let mut assessment = Assessment::new(questions, Arc::new(evaluator));
	if !args.no_archive {
		assessment = assessment.with_archive(open_archive(config)?);
	}

	let outcome = match assessment.submit(&answers).await {
		Ok(outcome) => outcome,
		Err(err) => anyhow::bail!("Evaluation Failed: {err}\nFix the issue and run the command again."),
	};

	println!("{}", outcome.scorecard.summary_table());
	println!("Summary: {}\n", outcome.scorecard.summary);
	println!("Strengths:");
	for s in &outcome.scorecard.strengths {
		println!("  + {s}");
	}
	println!("Areas for improvement:");
	for a in &outcome.scorecard.areas_for_improvement {
		println!("  - {a}");
	}

	match &outcome.archive {
		ArchiveStatus::Saved { filename } => {
			println!("\nReport: {}", config.output_dir.join(filename).display())
		}
		ArchiveStatus::Failed { message } => eprintln!("\nwarning: report not saved: {message}"),
		ArchiveStatus::Skipped => {}
	}

	if let Some(path) = args.json_out {
		let json = serde_json::to_string_pretty(&outcome.scorecard)?;
		tokio::fs::write(path, json).await?;
	}

	Ok(())
}

async fn index(cmd: IndexCommand, config: &ScorecardConfig) -> Result<()> {
	let archive = open_archive(config)?;
	match cmd {
		IndexCommand::List => {
			let entries = archive.entries();
			if entries.is_empty() {
				println!("No reports yet.");
			} else {
				println!("{}", entries_table(&entries));
				println!("\nTotal reports: {}", entries.len());
			}
		}
		IndexCommand::Regenerate => {
			let count = archive.regenerate_index().await?;
			println!("Rewrote index.html with {} report(s)", count);
		}
		IndexCommand::Clear => {
			archive.clear_all().await?;
			println!("Cleared the report index");
		}
	}
	Ok(())
}
