//! Thin client for the GitHub Git Data API, plus the trait seams the publisher
//! and token validator are written against.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header::ACCEPT, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::{
    config::{ClientConfig, GITHUB_API_VERSION},
    error::{Result, SyncError},
};

const SERVICE: &str = "github";
const FILE_MODE: &str = "100644";
const BLOB: &str = "blob";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub sha: String,
}

impl TreeEntry {
    /// Regular, non-executable file pointing at an uploaded blob.
    pub fn file(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: FILE_MODE,
            kind: BLOB,
            sha: sha.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub login: String,
    pub name: Option<String>,
}

/// The object-graph operations a two-file commit needs. Nothing but
/// [`GitDataApi::update_ref`] changes what readers of the branch see.
#[async_trait]
pub trait GitDataApi: Send + Sync {
    /// Commit SHA the branch currently points at.
    async fn get_ref(&self, branch: &str) -> Result<String>;
    /// Tree SHA of a commit.
    async fn get_commit_tree(&self, commit_sha: &str) -> Result<String>;
    async fn create_blob(&self, content: &str) -> Result<String>;
    async fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String>;
    async fn create_commit(&self, message: &str, tree_sha: &str, parent_sha: &str)
        -> Result<String>;
    async fn update_ref(&self, branch: &str, commit_sha: &str) -> Result<()>;
    async fn content_exists(&self, path: &str, branch: &str) -> Result<bool>;
}

#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn authenticated_user(&self) -> Result<Identity>;
}

#[derive(Debug, Deserialize)]
struct Sha {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    object: Sha,
}

#[derive(Debug, Deserialize)]
struct CommitObject {
    tree: Sha,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(config: &ClientConfig, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: config.http_client()?,
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Git Data operations scoped to one repository.
    pub fn repo<'a>(&'a self, owner: &'a str, name: &'a str) -> Repository<'a> {
        Repository {
            client: self,
            owner,
            name,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_url, path))
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = transmit(request).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| SyncError::external(SERVICE, format!("malformed response: {}", e)))
    }
}

async fn transmit(request: RequestBuilder) -> Result<Response> {
    request
        .send()
        .await
        .map_err(|e| SyncError::external(SERVICE, e.to_string()))
}

async fn status_error(response: Response) -> SyncError {
    let status = response.status();
    let message = match response.json::<ApiMessage>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SyncError::unauthorized(message),
        StatusCode::NOT_FOUND => SyncError::not_found(message),
        _ => SyncError::external(SERVICE, format!("HTTP {}: {}", status.as_u16(), message)),
    }
}

#[async_trait]
impl IdentityApi for GitHubClient {
    async fn authenticated_user(&self) -> Result<Identity> {
        self.send(self.request(Method::GET, "/user")).await
    }
}

pub struct Repository<'a> {
    client: &'a GitHubClient,
    owner: &'a str,
    name: &'a str,
}

impl Repository<'_> {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(
            method,
            &format!("/repos/{}/{}/{}", self.owner, self.name, path),
        )
    }
}

#[async_trait]
impl<'a> GitDataApi for Repository<'a> {
    async fn get_ref(&self, branch: &str) -> Result<String> {
        let git_ref: RefObject = self
            .client
            .send(self.request(Method::GET, &format!("git/ref/heads/{}", branch)))
            .await?;
        debug!("heads/{} is at {}", branch, git_ref.object.sha);
        Ok(git_ref.object.sha)
    }

    async fn get_commit_tree(&self, commit_sha: &str) -> Result<String> {
        let commit: CommitObject = self
            .client
            .send(self.request(Method::GET, &format!("git/commits/{}", commit_sha)))
            .await?;
        Ok(commit.tree.sha)
    }

    async fn create_blob(&self, content: &str) -> Result<String> {
        let body = json!({ "content": STANDARD.encode(content), "encoding": "base64" });
        let blob: Sha = self
            .client
            .send(self.request(Method::POST, "git/blobs").json(&body))
            .await?;
        debug!("created blob {} ({} bytes)", blob.sha, content.len());
        Ok(blob.sha)
    }

    async fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String> {
        let body = json!({ "base_tree": base_tree, "tree": entries });
        let tree: Sha = self
            .client
            .send(self.request(Method::POST, "git/trees").json(&body))
            .await?;
        debug!("created tree {} on top of {}", tree.sha, base_tree);
        Ok(tree.sha)
    }

    async fn create_commit(
        &self,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
    ) -> Result<String> {
        let body = json!({ "message": message, "tree": tree_sha, "parents": [parent_sha] });
        let commit: Sha = self
            .client
            .send(self.request(Method::POST, "git/commits").json(&body))
            .await?;
        debug!("created commit {} with parent {}", commit.sha, parent_sha);
        Ok(commit.sha)
    }

    async fn update_ref(&self, branch: &str, commit_sha: &str) -> Result<()> {
        let body = json!({ "sha": commit_sha, "force": false });
        let _: serde_json::Value = self
            .client
            .send(
                self.request(Method::PATCH, &format!("git/refs/heads/{}", branch))
                    .json(&body),
            )
            .await?;
        debug!("moved heads/{} to {}", branch, commit_sha);
        Ok(())
    }

    async fn content_exists(&self, path: &str, branch: &str) -> Result<bool> {
        let request = self
            .request(Method::GET, &format!("contents/{}", path))
            .query(&[("ref", branch)]);
        let response = transmit(request).await?;
        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(status_error(response).await),
        }
    }
}
