//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the upstream API and run full
//! wall and member crawls end-to-end.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use vk_harvest::config::{ClientConfig, CrawlConfig, MembersConfig};
use vk_harvest::crawler::{crawl, spawn_crawl, spawn_members, COMMENTS_METHOD, WALL_METHOD};
use vk_harvest::model::Record;
use vk_harvest::HarvestError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a job configuration pointed at the mock server
fn create_test_config(base_url: &str) -> CrawlConfig {
    CrawlConfig {
        client: ClientConfig {
            token: "secret-token".to_string(),
            min_interval: Duration::from_millis(1),
            timeout: Duration::from_secs(5),
            proxy: None,
            api_base: base_url.to_string(),
            api_version: "5.131".to_string(),
        },
        domain: "testclub".to_string(),
        owner_id: -42,
        count: 10,
        filter_keywords: false,
        keywords_path: PathBuf::from("data/words.txt"),
    }
}

fn query(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn query_i64(request: &Request, key: &str) -> Option<i64> {
    query(request, key).and_then(|v| v.parse().ok())
}

fn post(id: i64, text: &str, comments: i64) -> Value {
    json!({
        "id": id,
        "owner_id": -42,
        "date": 1_700_000_000,
        "text": text,
        "attachments": [],
        "comments": {"count": comments},
        "likes": {"count": 3},
        "reposts": {"count": 1},
        "views": {"count": 100}
    })
}

fn comment(id: i64, from_id: i64, text: &str, thread: i64) -> Value {
    json!({
        "id": id,
        "from_id": from_id,
        "date": 1_700_000_100,
        "text": text,
        "likes": {"count": 0},
        "thread": {"count": thread}
    })
}

fn ok(response: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "response": response }))
}

fn api_error() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "error": {"error_code": 5, "error_msg": "User authorization failed"}
    }))
}

/// Serves comment and reply pages by post id, comment id and offset
#[derive(Default)]
struct FakeComments {
    /// (post_id, offset) -> comment items
    comments: HashMap<(i64, i64), Vec<Value>>,
    /// (comment_id, offset) -> reply items
    replies: HashMap<(i64, i64), Vec<Value>>,
    /// (post_id, offset) pages that come back without `response`
    broken: Vec<(i64, i64)>,
    profiles: Vec<Value>,
}

impl Respond for FakeComments {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let post_id = query_i64(request, "post_id").unwrap_or_default();
        let offset = query_i64(request, "offset").unwrap_or_default();

        let items = match query_i64(request, "comment_id") {
            Some(comment_id) => self.replies.get(&(comment_id, offset)),
            None => {
                if self.broken.contains(&(post_id, offset)) {
                    return api_error();
                }
                self.comments.get(&(post_id, offset))
            }
        };

        let items = items.cloned().unwrap_or_default();
        ok(json!({
            "count": items.len(),
            "items": items,
            "profiles": self.profiles
        }))
    }
}

async fn mount_wall(server: &MockServer, posts: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path(format!("/{}", WALL_METHOD)))
        .respond_with(ok(json!({"count": posts.len(), "items": posts})))
        .mount(server)
        .await;
}

async fn mount_comments(server: &MockServer, fake: FakeComments) {
    Mock::given(method("POST"))
        .and(path(format!("/{}", COMMENTS_METHOD)))
        .respond_with(fake)
        .mount(server)
        .await;
}

/// (post_id, comment_id, offset) of every comment listing request, in order
async fn comment_requests(server: &MockServer) -> Vec<(i64, Option<i64>, i64)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == format!("/{}", COMMENTS_METHOD))
        .map(|r| {
            (
                query_i64(r, "post_id").unwrap_or_default(),
                query_i64(r, "comment_id"),
                query_i64(r, "offset").unwrap_or_default(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_comment_pagination_requests_trailing_page() {
    let mock_server = MockServer::start().await;
    mount_wall(&mock_server, vec![post(1, "hello", 150)]).await;
    mount_comments(&mock_server, FakeComments::default()).await;

    let records = crawl(create_test_config(&mock_server.uri())).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(
        comment_requests(&mock_server).await,
        vec![(1, None, 0), (1, None, 100)]
    );
}

#[tokio::test]
async fn test_post_without_comments_issues_no_comment_requests() {
    let mock_server = MockServer::start().await;
    mount_wall(&mock_server, vec![post(1, "a", 0), post(2, "b", 0)]).await;
    mount_comments(&mock_server, FakeComments::default()).await;

    let records = crawl(create_test_config(&mock_server.uri())).await.unwrap();

    assert_eq!(records.len(), 2);
    assert!(comment_requests(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_wall_request_parameters() {
    let mock_server = MockServer::start().await;
    mount_wall(&mock_server, vec![]).await;

    let records = crawl(create_test_config(&mock_server.uri())).await.unwrap();
    assert!(records.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(query(&requests[0], "domain").as_deref(), Some("testclub"));
    assert_eq!(query(&requests[0], "count").as_deref(), Some("10"));
    assert_eq!(query(&requests[0], "v").as_deref(), Some("5.131"));
    assert_eq!(
        query(&requests[0], "access_token").as_deref(),
        Some("secret-token")
    );
}

#[tokio::test]
async fn test_replies_reference_their_parent_comment() {
    let mock_server = MockServer::start().await;
    mount_wall(&mock_server, vec![post(7, "news", 1)]).await;

    let mut fake = FakeComments::default();
    fake.comments
        .insert((7, 0), vec![comment(70, 500, "first", 2)]);
    fake.replies.insert(
        (70, 0),
        vec![comment(71, 501, "re", 0), comment(72, 999, "re re", 0)],
    );
    fake.profiles = vec![
        json!({"id": 500, "first_name": "Anna", "last_name": "K"}),
        json!({"id": 501, "first_name": "Boris", "last_name": "L"}),
    ];
    mount_comments(&mock_server, fake).await;

    let records = crawl(create_test_config(&mock_server.uri())).await.unwrap();
    let kinds: Vec<_> = records.iter().map(|r| r.kind().as_str()).collect();
    assert_eq!(kinds, vec!["post", "comment", "reply", "reply"]);

    let link = "https://vk.com/testclub?w=wall-42_7";
    match &records.records()[1] {
        Record::Comment(c) => {
            assert_eq!(c.comment_id, 70);
            assert_eq!(c.first_name, "Anna");
            assert_eq!(c.post_link, link);
        }
        other => panic!("expected comment, got {:?}", other),
    }

    for record in &records.records()[2..] {
        match record {
            Record::Reply(r) => {
                assert_eq!(r.parent_comment_id, 70);
                assert_eq!(r.post_id, 7);
                assert_eq!(r.post_link, link);
            }
            other => panic!("expected reply, got {:?}", other),
        }
    }

    match &records.records()[3] {
        Record::Reply(r) => {
            assert_eq!(r.first_name, "");
            assert_eq!(r.last_name, "");
        }
        other => panic!("expected reply, got {:?}", other),
    }

    assert_eq!(
        comment_requests(&mock_server).await,
        vec![
            (7, None, 0),
            (7, Some(70), 0),
            (7, Some(70), 100),
            (7, None, 100)
        ]
    );
}

#[tokio::test]
async fn test_top_level_api_error_aborts_job() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/{}", WALL_METHOD)))
        .respond_with(api_error())
        .mount(&mock_server)
        .await;

    let result = crawl(create_test_config(&mock_server.uri())).await;

    match result {
        Err(HarvestError::Api { method, body }) => {
            assert_eq!(method, WALL_METHOD);
            assert!(body.contains("User authorization failed"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_top_level_http_failure_aborts_job() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/{}", WALL_METHOD)))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let result = crawl(create_test_config(&mock_server.uri())).await;
    assert!(matches!(result, Err(HarvestError::RequestFailed { .. })));
}

#[tokio::test]
async fn test_transport_failure_does_not_expose_token() {
    let mut config = create_test_config("http://127.0.0.1:1");
    config.client.token = "SUPER-SECRET-TOKEN".to_string();

    let err = crawl(config).await.unwrap_err();

    assert!(matches!(err, HarvestError::RequestFailed { .. }));
    let shown = err.to_string();
    assert!(shown.contains(WALL_METHOD));
    assert!(!shown.contains("SUPER-SECRET-TOKEN"), "token leaked: {}", shown);
}

#[tokio::test]
async fn test_failed_comment_page_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_wall(&mock_server, vec![post(1, "hello", 150)]).await;

    let mut fake = FakeComments::default();
    fake.broken.push((1, 0));
    fake.comments
        .insert((1, 100), vec![comment(105, 1, "late", 0)]);
    mount_comments(&mock_server, fake).await;

    let records = crawl(create_test_config(&mock_server.uri())).await.unwrap();

    let kinds: Vec<_> = records.iter().map(|r| r.kind().as_str()).collect();
    assert_eq!(kinds, vec!["post", "comment"]);
    assert_eq!(
        comment_requests(&mock_server).await,
        vec![(1, None, 0), (1, None, 100)]
    );
}

#[tokio::test]
async fn test_keyword_filter_skips_post_and_its_comments() {
    let mock_server = MockServer::start().await;
    mount_wall(
        &mock_server,
        vec![post(1, "Большая СКИДКА сегодня", 1), post(2, "nothing here", 5)],
    )
    .await;

    let mut fake = FakeComments::default();
    fake.comments.insert(
        (1, 0),
        vec![
            comment(10, 1, "где скидка?", 0),
            comment(11, 2, "unrelated", 0),
        ],
    );
    mount_comments(&mock_server, fake).await;

    let mut words = tempfile::NamedTempFile::new().unwrap();
    writeln!(words, "  Скидка \n\nsale").unwrap();

    let mut config = create_test_config(&mock_server.uri());
    config.filter_keywords = true;
    config.keywords_path = words.path().to_path_buf();

    let records = crawl(config).await.unwrap();

    let ids: Vec<_> = records
        .iter()
        .map(|r| match r {
            Record::Post(p) => p.post_id,
            Record::Comment(c) => c.comment_id,
            other => panic!("unexpected record {:?}", other),
        })
        .collect();
    assert_eq!(ids, vec![1, 10]);
    assert!(comment_requests(&mock_server)
        .await
        .iter()
        .all(|(post_id, _, _)| *post_id == 1));
}

#[tokio::test]
async fn test_missing_keyword_file_disables_filtering() {
    let mock_server = MockServer::start().await;
    mount_wall(&mock_server, vec![post(1, "a", 0), post(2, "b", 0)]).await;

    let mut config = create_test_config(&mock_server.uri());
    config.filter_keywords = true;
    config.keywords_path = PathBuf::from("/nonexistent/words.txt");

    let records = crawl(config).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_spawned_crawl_reports_progress() {
    let mock_server = MockServer::start().await;
    mount_wall(
        &mock_server,
        vec![post(1, "a", 0), post(2, "b", 0), post(3, "c", 0)],
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let fingerprint = config.fingerprint();
    let mut handle = spawn_crawl(config);

    let mut seen = Vec::new();
    while let Some(percent) = handle.next_progress().await {
        seen.push(percent);
    }
    let outcome = handle.wait().await.unwrap();

    assert_eq!(seen, vec![0, 33, 66, 100]);
    assert_eq!(outcome.summary.total, 3);
    assert_eq!(outcome.summary.posts, 3);
    assert_eq!(outcome.member_total, None);
    assert_eq!(outcome.fingerprint, fingerprint);
}

#[tokio::test]
async fn test_cancelled_crawl_sends_no_requests() {
    let mock_server = MockServer::start().await;
    mount_wall(&mock_server, vec![post(1, "a", 0)]).await;

    let handle = spawn_crawl(create_test_config(&mock_server.uri()));
    handle.cancel();

    let result = handle.wait().await;
    assert!(matches!(result, Err(HarvestError::Cancelled)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_members_with_optional_params() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groups.getMembers"))
        .respond_with(ok(json!({
            "count": 2500,
            "items": [
                {"id": 1, "first_name": "A", "last_name": "B", "city": {"id": 2, "title": "Kazan"}},
                {"id": 2, "first_name": "C", "last_name": "D"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let request = MembersConfig {
        group_id: "testclub".to_string(),
        count: 2,
        offset: 1000,
        sort: Some("id_asc".to_string()),
        fields: Some("city".to_string()),
        filter: None,
    };

    let client = create_test_config(&mock_server.uri()).client;
    let mut handle = spawn_members(client.clone(), request.clone());
    let mut seen = Vec::new();
    while let Some(percent) = handle.next_progress().await {
        seen.push(percent);
    }
    let outcome = handle.wait().await.unwrap();

    assert_eq!(seen, vec![0, 100]);
    assert_eq!(outcome.member_total, Some(2500));
    assert_eq!(outcome.fingerprint, request.fingerprint(&client));
    assert_eq!(outcome.summary.members, 2);

    match &outcome.records.records()[0] {
        Record::Member(m) => {
            assert_eq!(m.user_id, 1);
            assert_eq!(m.extra["city"]["title"], "Kazan");
        }
        other => panic!("expected member, got {:?}", other),
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(query(&requests[0], "group_id").as_deref(), Some("testclub"));
    assert_eq!(query(&requests[0], "offset").as_deref(), Some("1000"));
    assert_eq!(query(&requests[0], "sort").as_deref(), Some("id_asc"));
    assert_eq!(query(&requests[0], "fields").as_deref(), Some("city"));
    assert_eq!(query(&requests[0], "filter"), None);
}

#[tokio::test]
async fn test_members_ids_only_and_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groups.getMembers"))
        .respond_with(ok(json!({"count": 3, "items": [5, 6, 7]})))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/groups.getMembers"))
        .respond_with(api_error())
        .mount(&mock_server)
        .await;

    let request = MembersConfig {
        group_id: "testclub".to_string(),
        count: 1000,
        offset: 0,
        sort: None,
        fields: None,
        filter: None,
    };
    let client = create_test_config(&mock_server.uri()).client;

    let outcome = spawn_members(client.clone(), request.clone())
        .wait()
        .await
        .unwrap();
    let ids: Vec<_> = outcome
        .records
        .iter()
        .map(|r| match r {
            Record::Member(m) => m.user_id,
            other => panic!("expected member, got {:?}", other),
        })
        .collect();
    assert_eq!(ids, vec![5, 6, 7]);

    let result = spawn_members(client, request).wait().await;
    assert!(matches!(result, Err(HarvestError::Api { .. })));
}
