use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    parser::{self, Example, ParsedContent},
    paths,
    taxonomy::{Category, Subcategory},
};

pub const LEETCODE_BASE_URL: &str = "https://leetcode.com";

/// Difficulty as reported by the catalog. Unrecognized labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[strum(default)]
    Other(String),
}

impl Difficulty {
    /// Badge shown in the README metadata block.
    pub fn badge(&self) -> String {
        match self {
            Self::Easy => "🟢 Easy".to_string(),
            Self::Medium => "🟧 Medium".to_string(),
            Self::Hard => "🔴 Hard".to_string(),
            Self::Other(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => f.write_str("Easy"),
            Self::Medium => f.write_str("Medium"),
            Self::Hard => f.write_str("Hard"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for Difficulty {
    fn from(raw: String) -> Self {
        match raw.parse() {
            Ok(difficulty) => difficulty,
            Err(_) => Self::Other(raw),
        }
    }
}

impl From<Difficulty> for String {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.to_string()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Java,
    Cpp,
    Go,
}

impl Language {
    pub fn extension(self) -> &'static str {
        match self {
            Self::TypeScript => "ts",
            Self::JavaScript => "js",
            Self::Python => "py",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::Go => "go",
        }
    }
}

/// Where a problem record came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProblemSource {
    /// Fetched from the catalog; examples and constraints live in the HTML.
    Remote,
    /// Typed in by hand with pre-structured examples and constraints.
    Manual {
        examples: Vec<Example>,
        constraints: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRecord {
    pub question_id: String,
    pub frontend_id: String,
    pub title: String,
    pub slug: String,
    pub difficulty: Difficulty,
    pub content: String,
    pub topic_tags: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub example_testcases: Option<String>,
    #[serde(default)]
    pub sample_test_case: Option<String>,
    pub source: ProblemSource,
}

impl ProblemRecord {
    pub fn is_manual(&self) -> bool {
        matches!(self.source, ProblemSource::Manual { .. })
    }

    /// Structured view of the problem. Re-derived on every call.
    pub fn parsed(&self) -> ParsedContent {
        match &self.source {
            ProblemSource::Remote => parser::parse_content(&self.content),
            ProblemSource::Manual {
                examples,
                constraints,
            } => ParsedContent {
                examples: examples.clone(),
                constraints: constraints.clone(),
                statement: self.content.trim().to_string(),
            },
        }
    }
}

/// Canonical public URL of a problem page.
pub fn problem_url(base_url: &str, slug: &str) -> String {
    format!("{}/problems/{}/", base_url.trim_end_matches('/'), slug)
}

/// A problem typed in by hand when the catalog is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualProblem {
    pub frontend_id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topic_tags: Vec<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub constraints: String,
}

impl From<ManualProblem> for ProblemRecord {
    fn from(manual: ManualProblem) -> Self {
        let slug = paths::slugify(&manual.title);
        let examples = manual
            .examples
            .into_iter()
            .filter(|e| !e.input.trim().is_empty() && !e.output.trim().is_empty())
            .collect();
        Self {
            question_id: manual.frontend_id.clone(),
            url: problem_url(LEETCODE_BASE_URL, &slug),
            frontend_id: manual.frontend_id,
            title: manual.title,
            slug,
            difficulty: manual.difficulty,
            content: manual.description,
            topic_tags: manual.topic_tags,
            hints: Vec::new(),
            example_testcases: None,
            sample_test_case: None,
            source: ProblemSource::Manual {
                examples,
                constraints: manual.constraints,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub code: String,
    pub language: Language,
    pub category: Category,
    pub subcategory: Subcategory,
    pub approach: String,
    pub time_complexity: String,
    pub space_complexity: String,
}

/// Partially filled solution used for README previews.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionDraft {
    pub code: Option<String>,
    pub language: Option<Language>,
    pub approach: Option<String>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
}

impl From<&SolutionRecord> for SolutionDraft {
    fn from(solution: &SolutionRecord) -> Self {
        Self {
            code: Some(solution.code.clone()),
            language: Some(solution.language),
            approach: Some(solution.approach.clone()),
            time_complexity: Some(solution.time_complexity.clone()),
            space_complexity: Some(solution.space_complexity.clone()),
        }
    }
}
