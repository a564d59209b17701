use std::{fmt, time::Duration};

use derive_builder::Builder;

use crate::{
    error::{Result, SyncError},
    model::LEETCODE_BASE_URL,
    retry::RetryPolicy,
};

pub const LEETCODE_GRAPHQL_URL: &str = "https://leetcode.com/graphql";
pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const GITHUB_WEB_URL: &str = "https://github.com";
pub const GITHUB_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_BRANCH: &str = "main";

/// Endpoints and transport knobs shared by the fetcher, publisher and validator.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), default, build_fn(validate = "Self::validate"))]
pub struct ClientConfig {
    pub leetcode_graphql_url: String,
    pub leetcode_base_url: String,
    pub github_api_url: String,
    pub github_web_url: String,
    /// Attempts per catalog request, first one included.
    pub retry_count: u32,
    pub retry_base_delay: Duration,
    pub timeout: Duration,
    /// Page size of the catalog keyword search.
    pub list_limit: u32,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            leetcode_graphql_url: LEETCODE_GRAPHQL_URL.to_string(),
            leetcode_base_url: LEETCODE_BASE_URL.to_string(),
            github_api_url: GITHUB_API_URL.to_string(),
            github_web_url: GITHUB_WEB_URL.to_string(),
            retry_count: 3,
            retry_base_delay: Duration::from_secs(1),
            timeout: Duration::from_millis(10_000),
            list_limit: 50,
            user_agent: format!("leetcode-sync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.retry_count == Some(0) {
            return Err("retry_count must be at least 1".into());
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err("timeout must be greater than zero".into());
        }
        if self.list_limit == Some(0) {
            return Err("list_limit must be at least 1".into());
        }
        Ok(())
    }
}

impl ClientConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_count,
            base_delay: self.retry_base_delay,
        }
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| SyncError::Internal(e.into()))
    }
}

/// Repository coordinates and credentials for one publish call.
#[derive(Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct PublishTarget {
    pub owner: String,
    pub repo: String,
    #[builder(default = "DEFAULT_BRANCH.to_string()")]
    pub branch: String,
    pub token: String,
}

impl PublishTargetBuilder {
    fn validate(&self) -> Result<(), String> {
        let required = [
            ("owner", &self.owner),
            ("repo", &self.repo),
            ("token", &self.token),
        ];
        for (name, value) in required {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("{} must not be empty", name));
            }
        }
        if self.branch.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err("branch must not be empty".into());
        }
        Ok(())
    }
}

impl fmt::Debug for PublishTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishTarget")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_should_work() {
        let config = ClientConfigBuilder::default().build().unwrap();
        assert_eq!(config.retry_count, 3);
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert_eq!(config.leetcode_graphql_url, LEETCODE_GRAPHQL_URL);

        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn zero_retries_should_fail() {
        assert!(ClientConfigBuilder::default().retry_count(0u32).build().is_err());
    }

    #[test]
    fn publish_target_should_default_branch_and_hide_token() {
        let target = PublishTargetBuilder::default()
            .owner("octo")
            .repo("solutions")
            .token("ghp_secret")
            .build()
            .unwrap();
        assert_eq!(target.branch, "main");
        let debug = format!("{:?}", target);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn publish_target_should_reject_blank_fields() {
        assert!(PublishTargetBuilder::default()
            .owner("octo")
            .repo(" ")
            .token("t")
            .build()
            .is_err());
        assert!(PublishTargetBuilder::default().owner("octo").build().is_err());
    }
}
