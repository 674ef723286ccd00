use std::sync::Arc;

use scorecard_core::testing::{canned_model, sample_payload};
use scorecard_core::{
    question_bank, Assessment, DirectorySink, Evaluator, ReportArchive, ReportIndex,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A canned model stands in for the remote service.
    let model = canned_model(sample_payload(8.0, 7.0, 6.0, 9.0).to_string());
    let evaluator = Arc::new(Evaluator::builder().model(model).build()?);

    let out_dir = std::env::args().nth(1).unwrap_or_else(|| "offline-reports".to_string());
    let archive = ReportArchive::new(
        ReportIndex::in_memory(),
        Arc::new(DirectorySink::new(&out_dir)),
        question_bank(),
    );

    let assessment = Assessment::new(question_bank(), evaluator).with_archive(archive);

    let mut answers = assessment.blank_answers();
    for (i, question) in assessment.questions().iter().enumerate() {
        answers.set(i, format!("Sample answer about {}", question.category));
    }

    let outcome = assessment.submit(&answers).await?;
    println!("{}", outcome.scorecard.summary_table());
    println!("Archive: {:?} (written to {out_dir})", outcome.archive);

    Ok(())
}
