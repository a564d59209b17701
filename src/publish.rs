//! Repository Publisher: writes README and solution as one commit through the
//! Git object graph, moving the branch ref only once everything else exists.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{ClientConfig, PublishTarget},
    error::{Failure, Result},
    github::{GitDataApi, GitHubClient, TreeEntry},
    model::{ProblemRecord, SolutionRecord},
    paths::ProblemPaths,
    readme::render_readme,
};

/// Outcome of one publish attempt. Nothing is retained between attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CommitResult {
    Committed {
        commit_sha: String,
        message: String,
        readme_url: String,
        solution_url: String,
    },
    Failed(Failure),
}

impl CommitResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// The two files a publish writes, rendered up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub paths: ProblemPaths,
    pub readme: String,
    pub solution: String,
}

impl GeneratedFiles {
    pub fn new(problem: &ProblemRecord, solution: &SolutionRecord) -> Result<Self> {
        Ok(Self {
            paths: ProblemPaths::new(problem, solution),
            readme: render_readme(problem, solution)?,
            solution: solution.code.clone(),
        })
    }
}

pub fn commit_message(readme_exists: bool, problem: &ProblemRecord) -> String {
    let verb = if readme_exists { "Update" } else { "Add" };
    format!("{}: {}. {}", verb, problem.frontend_id, problem.title)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub commit_sha: String,
    pub message: String,
}

/// Runs the seven-step write. Steps 1-6 only create unreachable objects; the
/// final ref update is the single visible change.
pub async fn commit_files<G>(
    api: &G,
    branch: &str,
    problem: &ProblemRecord,
    files: &GeneratedFiles,
) -> Result<CommitOutcome>
where
    G: GitDataApi + ?Sized,
{
    let parent = api.get_ref(branch).await?;
    let base_tree = api.get_commit_tree(&parent).await?;
    debug!("base tree {} at {}", base_tree, parent);

    let (readme_blob, solution_blob) = tokio::try_join!(
        api.create_blob(&files.readme),
        api.create_blob(&files.solution)
    )?;

    let entries = [
        TreeEntry::file(&files.paths.readme, readme_blob),
        TreeEntry::file(&files.paths.solution, solution_blob),
    ];
    let tree = api.create_tree(&base_tree, &entries).await?;

    let exists = match api.content_exists(&files.paths.readme, branch).await {
        Ok(exists) => exists,
        Err(e) => {
            warn!("existence probe for {} failed: {}", files.paths.readme, e);
            false
        }
    };
    let message = commit_message(exists, problem);

    let commit_sha = api.create_commit(&message, &tree, &parent).await?;
    api.update_ref(branch, &commit_sha).await?;

    Ok(CommitOutcome {
        commit_sha,
        message,
    })
}

#[derive(Debug, Clone)]
pub struct Publisher {
    config: ClientConfig,
}

impl Publisher {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub async fn publish(
        &self,
        target: &PublishTarget,
        problem: &ProblemRecord,
        solution: &SolutionRecord,
    ) -> CommitResult {
        let client = match GitHubClient::new(&self.config, target.token.as_str()) {
            Ok(client) => client,
            Err(e) => return CommitResult::Failed(e.into()),
        };
        let repo = client.repo(&target.owner, &target.repo);
        self.publish_with(&repo, target, problem, solution).await
    }

    /// Publishes through any [`GitDataApi`], validating problem and solution first.
    #[instrument(skip_all, fields(repo = %target.repo, branch = %target.branch, problem = %problem.frontend_id))]
    pub async fn publish_with<G>(
        &self,
        api: &G,
        target: &PublishTarget,
        problem: &ProblemRecord,
        solution: &SolutionRecord,
    ) -> CommitResult
    where
        G: GitDataApi + ?Sized,
    {
        info!("publishing {}. {}", problem.frontend_id, problem.title);
        match self.try_publish(api, target, problem, solution).await {
            Ok(result) => {
                info!("published to {}/{}", target.owner, target.repo);
                result
            }
            Err(e) => {
                warn!("publish failed: {}", e);
                CommitResult::Failed(e.into())
            }
        }
    }

    async fn try_publish<G>(
        &self,
        api: &G,
        target: &PublishTarget,
        problem: &ProblemRecord,
        solution: &SolutionRecord,
    ) -> Result<CommitResult>
    where
        G: GitDataApi + ?Sized,
    {
        problem.validate()?;
        solution.validate()?;
        let files = GeneratedFiles::new(problem, solution)?;
        debug!("writing into {}", files.paths.folder);
        let outcome = commit_files(api, &target.branch, problem, &files).await?;

        let blob_url = |path: &str| {
            format!(
                "{}/{}/{}/blob/{}/{}",
                self.config.github_web_url.trim_end_matches('/'),
                target.owner,
                target.repo,
                outcome.commit_sha,
                path
            )
        };
        Ok(CommitResult::Committed {
            readme_url: blob_url(&files.paths.readme),
            solution_url: blob_url(&files.paths.solution),
            commit_sha: outcome.commit_sha.clone(),
            message: outcome.message,
        })
    }
}
