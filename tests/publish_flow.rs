use std::time::Duration;

use leetcode_sync::{
    Category, ClientConfigBuilder, CommitResult, ErrorCategory, Language, PublishTargetBuilder,
    SolutionRecord, Subcategory, SyncClient,
};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;

const REPO: &str = "/repos/octo/notes";
const README_PATH: &str = "arrays/two-pointers/11-container-with-most-water/README.md";

fn client_for(server: &ServerGuard) -> SyncClient {
    let config = ClientConfigBuilder::default()
        .leetcode_graphql_url(format!("{}/graphql", server.url()))
        .github_api_url(server.url())
        .github_web_url("https://github.example")
        .retry_base_delay(Duration::from_millis(1))
        .build()
        .unwrap();
    SyncClient::new(config).unwrap()
}

fn solution() -> SolutionRecord {
    SolutionRecord {
        code: "def max_area(height):\n    return 0\n".into(),
        language: Language::Python,
        category: Category::Arrays,
        subcategory: Subcategory::TwoPointers,
        approach: "Move the shorter wall inwards.".into(),
        time_complexity: "O(n)".into(),
        space_complexity: "O(1)".into(),
    }
}

async fn mock_leetcode(server: &mut ServerGuard) -> [Mock; 2] {
    let list = server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJson(
            json!({ "variables": { "filters": { "searchKeywords": "11" } } }),
        ))
        .with_body(
            json!({ "data": { "problemsetQuestionList": { "total": 2, "questions": [
                { "questionId": "110", "questionFrontendId": "110", "title": "Balanced Binary Tree", "titleSlug": "balanced-binary-tree" },
                { "questionId": "11", "questionFrontendId": "11", "title": "Container With Most Water", "titleSlug": "container-with-most-water" }
            ] } } })
            .to_string(),
        )
        .create_async()
        .await;
    let detail = server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJson(
            json!({ "variables": { "titleSlug": "container-with-most-water" } }),
        ))
        .with_body(
            json!({ "data": { "question": {
                "questionId": "11",
                "questionFrontendId": "11",
                "title": "Container With Most Water",
                "titleSlug": "container-with-most-water",
                "content": "<p>You are given an integer array <code>height</code>.</p>",
                "difficulty": "Medium",
                "topicTags": [{ "name": "Array" }, { "name": "Two Pointers" }],
                "hints": [],
                "exampleTestcases": "[1,8,6,2,5,4,8,3,7]",
                "sampleTestCase": "[1,8,6,2,5,4,8,3,7]"
            } } })
            .to_string(),
        )
        .create_async()
        .await;
    [list, detail]
}

#[tokio::test]
async fn fetch_then_publish_should_work() {
    let mut server = Server::new_async().await;
    let _leetcode = mock_leetcode(&mut server).await;

    let get_ref = server
        .mock("GET", format!("{}/git/ref/heads/main", REPO).as_str())
        .with_body(r#"{"object":{"sha":"base-commit"}}"#)
        .create_async()
        .await;
    let _commit_tree = server
        .mock("GET", format!("{}/git/commits/base-commit", REPO).as_str())
        .with_body(r#"{"sha":"base-commit","tree":{"sha":"base-tree"}}"#)
        .create_async()
        .await;
    let blobs = server
        .mock("POST", format!("{}/git/blobs", REPO).as_str())
        .with_status(201)
        .with_body(r#"{"sha":"blob-sha"}"#)
        .expect(2)
        .create_async()
        .await;
    let tree = server
        .mock("POST", format!("{}/git/trees", REPO).as_str())
        .match_body(Matcher::PartialJson(json!({ "base_tree": "base-tree" })))
        .with_status(201)
        .with_body(r#"{"sha":"new-tree"}"#)
        .create_async()
        .await;
    let _probe = server
        .mock("GET", format!("{}/contents/{}", REPO, README_PATH).as_str())
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;
    let commit = server
        .mock("POST", format!("{}/git/commits", REPO).as_str())
        .match_body(Matcher::Json(json!({
            "message": "Add: 11. Container With Most Water",
            "tree": "new-tree",
            "parents": ["base-commit"]
        })))
        .with_status(201)
        .with_body(r#"{"sha":"new-commit"}"#)
        .create_async()
        .await;
    let update = server
        .mock("PATCH", format!("{}/git/refs/heads/main", REPO).as_str())
        .match_body(Matcher::Json(json!({ "sha": "new-commit", "force": false })))
        .with_body(r#"{"ref":"refs/heads/main","object":{"sha":"new-commit"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let problem = client.fetch_problem("11").await.unwrap();
    assert_eq!(problem.url, "https://leetcode.com/problems/container-with-most-water/");

    let target = PublishTargetBuilder::default()
        .owner("octo")
        .repo("notes")
        .token("ghp_test")
        .build()
        .unwrap();
    let result = client.publish(&target, &problem, &solution()).await;

    assert_eq!(
        result,
        CommitResult::Committed {
            commit_sha: "new-commit".into(),
            message: "Add: 11. Container With Most Water".into(),
            readme_url: format!(
                "https://github.example/octo/notes/blob/new-commit/{}",
                README_PATH
            ),
            solution_url: "https://github.example/octo/notes/blob/new-commit/arrays/two-pointers/11-container-with-most-water/solution.py".into(),
        }
    );
    get_ref.assert_async().await;
    blobs.assert_async().await;
    tree.assert_async().await;
    commit.assert_async().await;
    update.assert_async().await;
}

#[tokio::test]
async fn missing_branch_should_fail_without_writes() {
    let mut server = Server::new_async().await;
    let _leetcode = mock_leetcode(&mut server).await;

    let _missing = server
        .mock("GET", format!("{}/git/ref/heads/main", REPO).as_str())
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;
    let writes = server
        .mock("POST", Matcher::Regex(format!("^{}/git/", REPO)))
        .expect(0)
        .create_async()
        .await;
    let update = server
        .mock("PATCH", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let problem = client.fetch_problem("11").await.unwrap();
    let target = PublishTargetBuilder::default()
        .owner("octo")
        .repo("notes")
        .token("ghp_test")
        .build()
        .unwrap();
    let result = client.publish(&target, &problem, &solution()).await;

    let CommitResult::Failed(failure) = result else {
        panic!("expected failure");
    };
    assert_eq!(failure.category, ErrorCategory::NotFound);
    writes.assert_async().await;
    update.assert_async().await;
}
