use askama::Template;

use crate::{
    error::Result,
    model::{Language, ProblemRecord, SolutionDraft, SolutionRecord, LEETCODE_BASE_URL},
    parser::strip_tags,
};

const DESCRIPTION_BUDGET: usize = 500;
const ELLIPSIS: &str = "...";

const PREVIEW_HEADING: &str = "Preview README";
const NO_PROBLEM: &str = "*Fetch a problem to see the full preview*";
const NO_APPROACH: &str = "*No approach provided yet*";
const NOT_SPECIFIED: &str = "Not specified";
const NO_CODE: &str = "// Your solution code will appear here";

#[derive(Debug, Template)]
#[template(path = "readme.md.j2", escape = "none")]
struct ReadmeView<'a> {
    heading: String,
    difficulty: String,
    topics: String,
    problem_url: &'a str,
    description: String,
    approach: &'a str,
    time_complexity: &'a str,
    space_complexity: &'a str,
    language: String,
    code: &'a str,
}

impl ReadmeView<'_> {
    fn render_markdown(&self) -> Result<String> {
        let mut out = self.render().map_err(anyhow::Error::from)?;
        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }
}

/// Tag-stripped content cut to the description budget, ellipsis always appended.
fn description(content: &str) -> String {
    let mut text: String = strip_tags(content).chars().take(DESCRIPTION_BUDGET).collect();
    text.push_str(ELLIPSIS);
    text
}

fn heading(problem: &ProblemRecord) -> String {
    format!("{}. {}", problem.frontend_id, problem.title)
}

/// Renders the README committed next to a solution. Pure: same input, same bytes.
pub fn render_readme(problem: &ProblemRecord, solution: &SolutionRecord) -> Result<String> {
    ReadmeView {
        heading: heading(problem),
        difficulty: problem.difficulty.badge(),
        topics: problem.topic_tags.join(", "),
        problem_url: &problem.url,
        description: description(&problem.content),
        approach: &solution.approach,
        time_complexity: &solution.time_complexity,
        space_complexity: &solution.space_complexity,
        language: solution.language.to_string(),
        code: &solution.code,
    }
    .render_markdown()
}

/// Same layout as [`render_readme`], with placeholders for whatever is missing.
pub fn render_preview(problem: Option<&ProblemRecord>, draft: &SolutionDraft) -> Result<String> {
    let filled = |value: &Option<String>| -> Option<String> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(String::from)
    };
    let approach = filled(&draft.approach).unwrap_or_else(|| NO_APPROACH.to_string());
    let time = filled(&draft.time_complexity).unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let space = filled(&draft.space_complexity).unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let code = match draft.code.as_deref() {
        Some(code) if !code.trim().is_empty() => code,
        _ => NO_CODE,
    };
    let language = draft.language.unwrap_or(Language::TypeScript).to_string();
    let fallback_url = format!("{}/problemset/", LEETCODE_BASE_URL);

    let view = match problem {
        Some(problem) => ReadmeView {
            heading: heading(problem),
            difficulty: problem.difficulty.badge(),
            topics: problem.topic_tags.join(", "),
            problem_url: &problem.url,
            description: description(&problem.content),
            approach: &approach,
            time_complexity: &time,
            space_complexity: &space,
            language,
            code,
        },
        None => ReadmeView {
            heading: PREVIEW_HEADING.to_string(),
            difficulty: NOT_SPECIFIED.to_string(),
            topics: NOT_SPECIFIED.to_string(),
            problem_url: &fallback_url,
            description: NO_PROBLEM.to_string(),
            approach: &approach,
            time_complexity: &time,
            space_complexity: &space,
            language,
            code,
        },
    };
    view.render_markdown()
}
