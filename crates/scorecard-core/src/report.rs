use chrono::{DateTime, Utc};
use scorecard_types::{format_score, Question, ReportEntry, ScoreTier, ScorecardData};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

/// Shown in place of an answer that is missing or blank.
pub const NO_ANSWER: &str = "No answer provided";

const SHARED_STYLE: &str = r#"
        .glass-card {
            background: rgba(255, 255, 255, 0.9);
            backdrop-filter: blur(10px);
            border: 1px solid rgba(255, 255, 255, 0.2);
        }
        .shadow-glow {
            box-shadow: 0 0 20px rgba(147, 51, 234, 0.15);
        }
        .modern-heading {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
            background-clip: text;
        }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', sans-serif;
        }"#;

/// Inputs for one standalone report document.
pub struct ReportDocument<'a> {
    pub scorecard: &'a ScorecardData,
    pub questions: &'a [Question],
    pub answers: &'a [String],
    pub timestamp: &'a str,
    pub report_id: &'a str,
}

fn tier_classes(tier: ScoreTier) -> &'static str {
    match tier {
        ScoreTier::Good => "border-green-500 bg-green-50 text-green-700",
        ScoreTier::Warning => "border-yellow-500 bg-yellow-50 text-yellow-700",
        ScoreTier::Poor => "border-red-500 bg-red-50 text-red-700",
    }
}

/// Renders an ISO 8601 timestamp for people; unparseable input is shown as-is.
pub fn human_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        })
        .unwrap_or_else(|_| timestamp.to_string())
}

fn page(title: &str, max_width: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <script src="{}"></script>
    <style>{}
    </style>
</head>
<body class="bg-gradient-to-br from-purple-50 to-pink-50 min-h-screen py-8">
    <div class="{} mx-auto px-4 sm:px-6 lg:px-8">
{}
    </div>
</body>
</html>
"#,
        html_escape(title),
        TAILWIND_CDN,
        SHARED_STYLE,
        max_width,
        body
    )
}

fn list_items(items: &[String], bullet: &str) -> String {
    let mut html = String::new();
    for item in items {
        html.push_str(&format!(
            r#"
                            <li class="flex items-start">
                                <div class="w-5 h-5 rounded-full bg-gradient-to-br {} mr-3 mt-1 flex-shrink-0"></div>
                                <span class="leading-relaxed">{}</span>
                            </li>"#,
            bullet,
            html_escape(item)
        ));
    }
    html
}

/// Renders the standalone report for one completed assessment.
pub fn render_report(doc: &ReportDocument<'_>) -> String {
    let scorecard = doc.scorecard;
    let overall = scorecard.overall_score();

    let mut bars = String::new();
    for (category, s) in scorecard.scores.iter() {
        let width = (s.score * 10.0).clamp(0.0, 100.0);
        bars.push_str(&format!(
            r#"
                    <div class="score-row flex items-center gap-3" data-category="{}">
                        <span class="text-sm font-medium text-gray-700 w-20">{}</span>
                        <div class="flex-1 bg-gray-200 rounded-full h-4">
                            <div class="bg-gradient-to-r from-purple-500 to-pink-500 h-4 rounded-full" style="width: {}%"></div>
                        </div>
                        <span class="text-sm font-bold text-gray-900 w-8">{}</span>
                    </div>"#,
            category.key(),
            category,
            width,
            s.score
        ));
    }

    let mut breakdown = String::new();
    for (category, s) in scorecard.scores.iter() {
        let classes = tier_classes(ScoreTier::of(s.score));
        breakdown.push_str(&format!(
            r#"
                <div class="breakdown glass-card p-6 rounded-2xl border-l-4 {} shadow-glow" data-category="{}">
                    <div class="flex justify-between items-start mb-4">
                        <div class="flex items-center gap-3">
                            <span class="text-2xl">{}</span>
                            <h4 class="text-xl font-bold text-gray-900">{}</h4>
                        </div>
                        <span class="text-2xl font-bold w-14 h-14 flex items-center justify-center rounded-2xl bg-white shadow-lg border-2">{}</span>
                    </div>
                    <p class="text-gray-600 text-base leading-relaxed">{}</p>
                </div>"#,
            classes,
            category.key(),
            category.icon(),
            category.label(),
            s.score,
            html_escape(&s.reasoning)
        ));
    }

    let mut answers = String::new();
    for (i, question) in doc.questions.iter().enumerate() {
        let answer = doc
            .answers
            .get(i)
            .map(String::as_str)
            .filter(|a| !a.is_empty())
            .unwrap_or(NO_ANSWER);
        answers.push_str(&format!(
            r#"
                <div class="answer glass-card p-6 rounded-2xl shadow-glow">
                    <div class="flex items-start gap-3">
                        <span class="w-8 h-8 bg-gradient-to-br from-purple-500 to-pink-500 rounded-xl text-white font-bold text-sm flex items-center justify-center">{}</span>
                        <div class="flex-1">
                            <h4 class="text-lg font-bold text-gray-900 mb-2">{}</h4>
                            <span class="inline-block px-3 py-1 bg-purple-500 text-white text-xs font-semibold rounded-full mb-3">{}</span>
                            <p class="text-gray-600 leading-relaxed whitespace-pre-wrap">{}</p>
                        </div>
                    </div>
                </div>"#,
            i + 1,
            html_escape(&question.text),
            question.category,
            html_escape(answer)
        ));
    }

    let body = format!(
        r#"        <div class="text-center mb-12">
            <h1 class="text-4xl md:text-5xl font-bold modern-heading">Candidate Assessment Report</h1>
            <p class="text-gray-600 text-lg">Generated on {generated}</p>
            <p class="text-gray-500 text-sm mt-2">Report ID: {report_id}</p>
        </div>

        <div class="grid grid-cols-1 lg:grid-cols-5 gap-8">
            <div class="lg:col-span-2 glass-card p-8 rounded-2xl shadow-glow">
                <h3 class="text-2xl font-bold text-gray-900 mb-6">Score Profile</h3>
                <div class="space-y-4 mb-6">{bars}
                </div>
                <div class="overall text-center p-6 rounded-2xl border-2 {overall_classes} shadow-lg" data-tier="{overall_tier}">
                    <p class="font-semibold text-lg text-gray-600 mb-2">Overall Score</p>
                    <p class="text-5xl font-bold modern-heading">{overall}</p>
                </div>
            </div>

            <div class="lg:col-span-3 space-y-8">
                <div class="glass-card p-8 rounded-2xl shadow-glow">
                    <h3 class="text-2xl font-bold text-gray-900 mb-6">AI Summary &amp; Recommendation</h3>
                    <p class="text-gray-600 text-lg leading-relaxed whitespace-pre-wrap">{summary}</p>
                </div>
                <div class="grid grid-cols-1 md:grid-cols-2 gap-8">
                    <div class="glass-card p-6 rounded-2xl shadow-glow">
                        <h4 class="text-xl font-bold text-gray-900 mb-4">Key Strengths</h4>
                        <ul class="strengths space-y-3 text-gray-600 text-base">{strengths}
                        </ul>
                    </div>
                    <div class="glass-card p-6 rounded-2xl shadow-glow">
                        <h4 class="text-xl font-bold text-gray-900 mb-4">Improvement Areas</h4>
                        <ul class="improvements space-y-3 text-gray-600 text-base">{improvements}
                        </ul>
                    </div>
                </div>
            </div>
        </div>

        <div class="mt-16">
            <h3 class="text-3xl font-bold modern-heading mb-8">Detailed Breakdown</h3>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-8">{breakdown}
            </div>
        </div>

        <div class="mt-16">
            <h3 class="text-3xl font-bold modern-heading mb-8">Candidate Answers</h3>
            <div class="space-y-6">{answers}
            </div>
        </div>

        <div class="mt-16 text-center glass-card p-8 rounded-2xl shadow-glow">
            <p class="text-gray-600 text-lg">Generated by Candidate Assessment System</p>
            <p class="text-gray-500 text-sm mt-2">Report ID: {report_id}</p>
        </div>"#,
        generated = html_escape(&human_timestamp(doc.timestamp)),
        report_id = html_escape(doc.report_id),
        bars = bars,
        overall_classes = tier_classes(ScoreTier::of(overall)),
        overall_tier = ScoreTier::of(overall),
        overall = format_score(overall),
        summary = html_escape(&scorecard.summary),
        strengths = list_items(&scorecard.strengths, "from-green-500 to-emerald-500"),
        improvements = list_items(&scorecard.areas_for_improvement, "from-yellow-500 to-orange-500"),
        breakdown = breakdown,
        answers = answers,
    );

    page(
        &format!("Candidate Assessment Report - {}", doc.timestamp),
        "max-w-7xl",
        &body,
    )
}

/// Renders the catalog of all reports, in the order given.
pub fn render_index(entries: &[ReportEntry]) -> String {
    let listing = if entries.is_empty() {
        r#"        <div class="empty-state text-center py-16">
            <h2 class="text-2xl font-bold text-gray-900 mb-4">No Reports Yet</h2>
            <p class="text-gray-600 text-lg">Complete an assessment to generate your first report!</p>
        </div>"#
            .to_string()
    } else {
        let mut rows = String::new();
        for entry in entries {
            rows.push_str(&format!(
                r#"
            <div class="report-entry glass-card p-6 rounded-2xl shadow-glow" data-report-id="{id}">
                <div class="flex items-center justify-between">
                    <div class="flex-1">
                        <h3 class="text-xl font-bold text-gray-900">Assessment Report</h3>
                        <p class="text-gray-600 text-sm">ID: {id}</p>
                        <div class="flex items-center gap-4 text-sm text-gray-500">
                            <span>Generated: {generated}</span>
                            <span class="text-purple-600 font-semibold">Overall Score: {score}</span>
                        </div>
                    </div>
                    <a href="{href}" class="bg-gradient-to-r from-purple-500 to-pink-500 text-white px-6 py-3 rounded-xl font-semibold shadow-lg">View Report</a>
                </div>
            </div>"#,
                id = html_escape(&entry.report_id),
                generated = html_escape(&human_timestamp(&entry.timestamp)),
                score = html_escape(&entry.overall_score),
                href = html_escape(&entry.filename),
            ));
        }
        format!(
            r#"        <div class="space-y-6">
            <p class="text-center text-gray-600 text-lg mb-8">Total Reports: <span class="font-bold text-purple-600">{}</span></p>{}
        </div>"#,
            entries.len(),
            rows
        )
    };

    let body = format!(
        r#"        <div class="text-center mb-12">
            <h1 class="text-4xl md:text-6xl font-bold modern-heading">Assessment Reports</h1>
            <p class="text-gray-600 text-xl">View all candidate assessment reports</p>
        </div>

{}

        <div class="mt-16 text-center glass-card p-8 rounded-2xl shadow-glow">
            <p class="text-gray-600 text-lg">Candidate Assessment System</p>
            <p class="text-gray-500 text-sm mt-2">Static HTML Report Generator</p>
        </div>"#,
        listing
    );

    page("Candidate Assessment Reports", "max-w-6xl", &body)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
