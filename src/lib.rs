//! Fetch a LeetCode problem, render its README, and publish README plus
//! solution to a GitHub repository as a single commit.

pub mod auth;
pub mod config;
pub mod error;
pub mod github;
pub mod leetcode;
pub mod model;
pub mod parser;
pub mod paths;
pub mod publish;
pub mod readme;
pub mod retry;
pub mod taxonomy;
pub mod validation;

pub use auth::{Identity, TokenValidation, TokenValidator};
pub use config::{ClientConfig, ClientConfigBuilder, PublishTarget, PublishTargetBuilder};
pub use error::{ErrorCategory, Failure, Result, SyncError};
pub use leetcode::ProblemFetcher;
pub use model::{
    Difficulty, Language, ManualProblem, ProblemRecord, ProblemSource, SolutionDraft,
    SolutionRecord,
};
pub use parser::{parse_content, Example, ParsedContent};
pub use paths::{derive_path, FileKind, ProblemPaths};
pub use publish::{CommitResult, Publisher};
pub use readme::{render_preview, render_readme};
pub use taxonomy::{Category, Placement, Subcategory};

/// The three remote operations behind one configuration.
#[derive(Debug, Clone)]
pub struct SyncClient {
    fetcher: ProblemFetcher,
    publisher: Publisher,
    validator: TokenValidator,
}

impl SyncClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            fetcher: ProblemFetcher::new(&config)?,
            publisher: Publisher::new(config.clone()),
            validator: TokenValidator::new(config),
        })
    }

    pub async fn fetch_problem(&self, frontend_id: &str) -> Result<ProblemRecord> {
        self.fetcher.fetch(frontend_id).await
    }

    pub async fn publish(
        &self,
        target: &PublishTarget,
        problem: &ProblemRecord,
        solution: &SolutionRecord,
    ) -> CommitResult {
        self.publisher.publish(target, problem, solution).await
    }

    pub async fn validate_token(&self, token: &str) -> TokenValidation {
        self.validator.validate(token).await
    }
}
