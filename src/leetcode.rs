//! Problem Fetcher: resolves a frontend id to a full [`ProblemRecord`] with two
//! sequential GraphQL calls, each under its own retry budget.

use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::{
    config::ClientConfig,
    error::{Result, SyncError},
    model::{problem_url, Difficulty, ProblemRecord, ProblemSource},
    parser::strip_html,
    retry::{self, RetryPolicy},
    validation,
};

const SERVICE: &str = "leetcode";
const DETAIL_FAILED: &str = "Failed to fetch problem details from LeetCode";

const PROBLEM_LIST_QUERY: &str = r#"
  query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int, $filters: QuestionListFilterInput) {
    problemsetQuestionList: questionList(
      categorySlug: $categorySlug
      limit: $limit
      skip: $skip
      filters: $filters
    ) {
      total: totalNum
      questions: data {
        questionId
        questionFrontendId
        title
        titleSlug
      }
    }
  }
"#;

const PROBLEM_DETAIL_QUERY: &str = r#"
  query questionData($titleSlug: String!) {
    question(titleSlug: $titleSlug) {
      questionId
      questionFrontendId
      title
      titleSlug
      content
      difficulty
      exampleTestcases
      topicTags {
        name
      }
      hints
      sampleTestCase
    }
  }
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListData {
    problemset_question_list: Option<QuestionList>,
}

#[derive(Debug, Deserialize)]
struct QuestionList {
    #[serde(default)]
    questions: Vec<QuestionSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionSummary {
    question_frontend_id: String,
    title_slug: String,
}

#[derive(Debug, Deserialize)]
struct DetailData {
    question: Option<QuestionDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDetail {
    question_id: String,
    question_frontend_id: String,
    title: String,
    title_slug: String,
    #[serde(default)]
    content: Option<String>,
    difficulty: String,
    #[serde(default)]
    example_testcases: Option<String>,
    #[serde(default)]
    topic_tags: Vec<TopicTag>,
    #[serde(default)]
    hints: Option<Vec<String>>,
    #[serde(default)]
    sample_test_case: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TopicTag {
    name: String,
}

#[derive(Debug, Clone)]
pub struct ProblemFetcher {
    http: reqwest::Client,
    endpoint: String,
    base_url: String,
    list_limit: u32,
    retry: RetryPolicy,
}

impl ProblemFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_client(config.http_client()?, config))
    }

    pub fn with_client(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            endpoint: config.leetcode_graphql_url.clone(),
            base_url: config.leetcode_base_url.clone(),
            list_limit: config.list_limit,
            retry: config.retry_policy(),
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, frontend_id: &str) -> Result<ProblemRecord> {
        let frontend_id = validation::problem_number(frontend_id)?;
        info!("fetching problem #{}", frontend_id);

        let summary = self.find_summary(frontend_id).await?;
        debug!("resolved #{} to slug `{}`", frontend_id, summary.title_slug);

        let detail = self.fetch_detail(&summary.title_slug).await?;
        let record = self.assemble(detail);
        info!("fetched problem #{}: {}", record.frontend_id, record.title);
        Ok(record)
    }

    async fn find_summary(&self, frontend_id: &str) -> Result<QuestionSummary> {
        let body = json!({
            "query": PROBLEM_LIST_QUERY,
            "variables": {
                "categorySlug": "",
                "skip": 0,
                "limit": self.list_limit,
                "filters": { "searchKeywords": frontend_id },
            },
        });
        let response = self.post(&body, "problem list").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(not_found(frontend_id));
        }

        let list: GraphQlResponse<ListData> = read_json(response).await?;
        let questions = match list {
            GraphQlResponse {
                data:
                    Some(ListData {
                        problemset_question_list: Some(list),
                    }),
                errors: None,
            } => list.questions,
            GraphQlResponse { errors, .. } => {
                return Err(query_failed("Failed to fetch problem list from LeetCode", errors))
            }
        };

        questions
            .into_iter()
            .find(|q| q.question_frontend_id == frontend_id)
            .ok_or_else(|| not_found(frontend_id))
    }

    /// The slug came from the catalog itself, so any failure here, a 404
    /// included, is a service error rather than a missing problem.
    async fn fetch_detail(&self, slug: &str) -> Result<QuestionDetail> {
        let body = json!({
            "query": PROBLEM_DETAIL_QUERY,
            "variables": { "titleSlug": slug },
        });
        let response = self.post(&body, "problem detail").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SyncError::external(
                SERVICE,
                format!("{}: HTTP 404", DETAIL_FAILED),
            ));
        }

        match read_json::<GraphQlResponse<DetailData>>(response).await? {
            GraphQlResponse {
                data: Some(DetailData {
                    question: Some(question),
                }),
                errors: None,
            } => Ok(question),
            GraphQlResponse { errors, .. } => Err(query_failed(DETAIL_FAILED, errors)),
        }
    }

    async fn post(&self, body: &Value, context: &str) -> Result<Response> {
        retry::with_backoff(&self.retry, context, |_| {
            retry::send_once(SERVICE, self.http.post(&self.endpoint).json(body))
        })
        .await
    }

    fn assemble(&self, detail: QuestionDetail) -> ProblemRecord {
        ProblemRecord {
            url: problem_url(&self.base_url, &detail.title_slug),
            question_id: detail.question_id,
            frontend_id: detail.question_frontend_id,
            title: detail.title,
            slug: detail.title_slug,
            difficulty: Difficulty::from(detail.difficulty),
            content: detail.content.unwrap_or_default(),
            topic_tags: detail.topic_tags.into_iter().map(|t| t.name).collect(),
            hints: detail
                .hints
                .unwrap_or_default()
                .iter()
                .map(|hint| strip_html(hint))
                .collect(),
            example_testcases: detail.example_testcases,
            sample_test_case: detail.sample_test_case,
            source: ProblemSource::Remote,
        }
    }
}

fn not_found(frontend_id: &str) -> SyncError {
    SyncError::not_found(format!("Problem #{} not found", frontend_id))
}

fn query_failed(message: &str, errors: Option<Vec<GraphQlError>>) -> SyncError {
    match errors.as_deref().and_then(|e| e.first()) {
        Some(first) => SyncError::external(SERVICE, format!("{}: {}", message, first.message)),
        None => SyncError::external(SERVICE, message),
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| SyncError::external(SERVICE, format!("malformed response: {}", e)))
}
