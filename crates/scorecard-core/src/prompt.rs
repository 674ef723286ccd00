use scorecard_types::Question;

/// Separator placed between question/answer blocks.
pub const BLOCK_DELIMITER: &str = "\n\n---\n\n";

/// Substituted for blank answers in the prompt.
pub const NO_ANSWER: &str = "No answer provided.";

pub const SYSTEM_INSTRUCTION: &str = "You are an expert HR analyst and talent acquisition specialist. \
Respond only with a JSON object matching the provided response schema.";

const PREAMBLE: &str = "You are an expert HR analyst and talent acquisition specialist. Your task is to \
evaluate a candidate's written responses to a structured interview questionnaire. Analyze the answers \
for depth, clarity, and alignment with key professional attributes. Provide a quantitative and \
qualitative assessment based ONLY on the provided answers.

Please evaluate the following candidate's answers. Score each of the four categories (Passion, \
Motivation, Skills, Behavior) on a scale from 1 to 10, where 1 is low and 10 is high. Provide a brief \
reasoning for each score. Also, provide an overall summary of the candidate's profile, a list of their \
key strengths, and a list of potential areas for improvement.

**Assessment Questions and Candidate's Answers:**";

const CLOSING: &str = "Based on your analysis, return the data in the specified JSON format. Do not \
include any text outside of the JSON object. Be concise and professional in your reasoning and \
summaries.";

/// Renders one `Category/Question/Answer` block per question, in order.
///
/// Answers missing at an index, or empty, render as [`NO_ANSWER`].
pub fn qa_blocks(questions: &[Question], answers: &[String]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let answer = answers
                .get(i)
                .map(String::as_str)
                .filter(|a| !a.is_empty())
                .unwrap_or(NO_ANSWER);
            format!(
                "Category: {}\nQuestion: {}\nAnswer: {}",
                q.category, q.text, answer
            )
        })
        .collect::<Vec<_>>()
        .join(BLOCK_DELIMITER)
}

/// Full user prompt sent to the scoring model.
pub fn build_prompt(questions: &[Question], answers: &[String]) -> String {
    format!(
        "{PREAMBLE}\n\n{}\n\n{CLOSING}",
        qa_blocks(questions, answers)
    )
}
