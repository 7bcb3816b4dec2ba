//! End-to-end HTTP tests for the issue API.
//!
//! Each test starts its own server on an ephemeral port, backed by a fresh
//! store, and talks to it over real HTTP with `ureq`.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tracker::AppState;
use tracker_storage::{DocumentStore, MemoryStore, SqliteStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Spawns a server over `store` and returns its base URL.
fn spawn_with(store: Arc<dyn DocumentStore>) -> String {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            tracker::serve(listener, AppState::new(store), std::future::pending())
                .await
                .unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}

fn spawn_server() -> String {
    spawn_with(Arc::new(MemoryStore::new()))
}

/// An agent that returns 4xx/5xx responses instead of erroring.
fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into()
}

fn issues_url(base: &str, project: &str) -> String {
    format!("{base}/api/issues/{project}")
}

fn read_json(mut resp: ureq::http::Response<ureq::Body>) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body: Value = resp.body_mut().read_json().unwrap();
    (status, body)
}

fn post_form(url: &str, fields: &[(&str, &str)]) -> (u16, Value) {
    read_json(agent().post(url).send_form(fields.iter().copied()).unwrap())
}

fn put_json(url: &str, body: &Value) -> (u16, Value) {
    read_json(agent().put(url).send_json(body).unwrap())
}

fn delete_json(url: &str, body: &Value) -> (u16, Value) {
    read_json(agent().delete(url).force_send_body().send_json(body).unwrap())
}

fn get_all(url: &str, query: &[(&str, &str)]) -> (u16, Value) {
    let mut req = agent().get(url);
    for (k, v) in query {
        req = req.query(*k, *v);
    }
    read_json(req.call().unwrap())
}

/// Creates an issue with the three required fields and returns its body.
fn create(url: &str, title: &str) -> Value {
    let (status, body) = post_form(
        url,
        &[
            ("issue_title", title),
            ("issue_text", "text"),
            ("created_by", "tester"),
        ],
    );
    assert_eq!(status, 200);
    assert!(body["_id"].is_string(), "no _id in {body}");
    body
}

fn id_of(issue: &Value) -> String {
    issue["_id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// POST
// ---------------------------------------------------------------------------

#[test]
fn create_with_every_field_echoes_it() {
    let url = issues_url(&spawn_server(), "apitest");
    let (status, body) = post_form(
        &url,
        &[
            ("issue_title", "Faux Issue Title"),
            ("issue_text", "Functional Test - Every field filled in"),
            ("created_by", "fCC"),
            ("assigned_to", "Dom"),
            ("status_text", "In QA"),
        ],
    );

    assert_eq!(status, 200);
    assert_eq!(body["issue_title"], "Faux Issue Title");
    assert_eq!(body["issue_text"], "Functional Test - Every field filled in");
    assert_eq!(body["created_by"], "fCC");
    assert_eq!(body["assigned_to"], "Dom");
    assert_eq!(body["status_text"], "In QA");
    assert_eq!(body["open"], true);
    assert_eq!(id_of(&body).len(), 24);
    assert_eq!(body["created_on"], body["updated_on"]);
}

#[test]
fn create_with_required_fields_defaults_the_rest() {
    let url = issues_url(&spawn_server(), "apitest");
    let body = create(&url, "Required only");

    assert_eq!(body["assigned_to"], "");
    assert_eq!(body["status_text"], "");
    assert_eq!(body["open"], true);
    let created = body["created_on"].as_str().unwrap();
    assert!(created.ends_with('Z') && created.len() == 24, "{created}");
}

#[test]
fn create_missing_required_field() {
    let url = issues_url(&spawn_server(), "apitest");
    let (status, body) = post_form(&url, &[("issue_title", "x"), ("created_by", "y")]);

    assert_eq!(status, 200);
    assert_eq!(body, json!({ "error": "required field(s) missing" }));

    let (_, list) = get_all(&url, &[]);
    assert_eq!(list, json!([]));
}

#[test]
fn create_accepts_json_bodies() {
    let url = issues_url(&spawn_server(), "apitest");
    let resp = agent()
        .post(&url)
        .send_json(&json!({
            "issue_title": "json",
            "issue_text": "body",
            "created_by": "client",
        }))
        .unwrap();
    let (status, body) = read_json(resp);
    assert_eq!(status, 200);
    assert_eq!(body["issue_title"], "json");
}

#[test]
fn responses_are_json() {
    let url = issues_url(&spawn_server(), "apitest");
    let resp = agent().get(&url).call().unwrap();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "{content_type}");
}

// ---------------------------------------------------------------------------
// GET
// ---------------------------------------------------------------------------

#[test]
fn list_returns_issues_in_insertion_order() {
    let url = issues_url(&spawn_server(), "apitest");
    let a = create(&url, "first");
    let b = create(&url, "second");
    let c = create(&url, "third");

    let (status, list) = get_all(&url, &[]);
    assert_eq!(status, 200);
    assert_eq!(list, json!([a, b, c]));
}

#[test]
fn list_unknown_project_is_empty() {
    let (status, list) = get_all(&issues_url(&spawn_server(), "nobody"), &[]);
    assert_eq!(status, 200);
    assert_eq!(list, json!([]));
}

#[test]
fn projects_are_isolated() {
    let base = spawn_server();
    create(&issues_url(&base, "one"), "in one");
    let (_, list) = get_all(&issues_url(&base, "two"), &[]);
    assert_eq!(list, json!([]));
}

#[test]
fn list_with_one_filter() {
    let url = issues_url(&spawn_server(), "apitest");
    create(&url, "keep");
    create(&url, "drop");
    create(&url, "keep");

    let (_, list) = get_all(&url, &[("issue_title", "keep")]);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|i| i["issue_title"] == "keep"));
}

#[test]
fn list_with_multiple_filters_is_a_conjunction() {
    let url = issues_url(&spawn_server(), "apitest");
    let other = create(&url, "shared title");
    let target = create(&url, "shared title");
    let (_, closed) = put_json(
        &url,
        &json!({ "_id": id_of(&target), "status_text": "done", "open": false }),
    );
    assert_eq!(closed["result"], "successfully updated");

    let (_, list) = get_all(&url, &[("issue_title", "shared title"), ("open", "")]);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["_id"], target["_id"]);
    assert_eq!(list[0]["status_text"], "done");

    // Any non-empty value, "false" included, selects open issues.
    let (_, list) = get_all(
        &url,
        &[("issue_title", "shared title"), ("open", "false")],
    );
    assert_eq!(list, json!([other]));
}

#[test]
fn list_by_id_and_timestamp() {
    let url = issues_url(&spawn_server(), "apitest");
    let issue = create(&url, "one");
    create(&url, "two");

    let (_, by_id) = get_all(&url, &[("_id", id_of(&issue).as_str())]);
    assert_eq!(by_id, json!([issue]));

    let created = issue["created_on"].as_str().unwrap();
    let (_, by_time) = get_all(&url, &[("created_on", created)]);
    assert!(
        by_time.as_array().unwrap().iter().any(|i| i["_id"] == issue["_id"]),
        "{by_time}"
    );
}

#[test]
fn list_with_malformed_id_filter_is_a_bad_request() {
    let url = issues_url(&spawn_server(), "apitest");
    create(&url, "one");
    let (status, body) = get_all(&url, &[("_id", "not-an-object-id")]);
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "invalid _id filter: not-an-object-id" }));
}

// ---------------------------------------------------------------------------
// PUT
// ---------------------------------------------------------------------------

#[test]
fn update_one_field() {
    let url = issues_url(&spawn_server(), "apitest");
    let issue = create(&url, "before");
    let id = id_of(&issue);
    thread::sleep(Duration::from_millis(5));

    let (status, body) = put_json(&url, &json!({ "_id": id, "issue_text": "after" }));
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "result": "successfully updated", "_id": id }));

    let (_, list) = get_all(&url, &[("_id", id.as_str())]);
    let updated = &list[0];
    assert_eq!(updated["issue_text"], "after");
    assert_eq!(updated["issue_title"], "before");
    assert_eq!(updated["created_by"], issue["created_by"]);
    assert_eq!(updated["created_on"], issue["created_on"]);
    assert!(
        updated["updated_on"].as_str().unwrap() > issue["updated_on"].as_str().unwrap(),
        "updated_on did not advance"
    );
}

#[test]
fn update_multiple_fields_over_form() {
    let url = issues_url(&spawn_server(), "apitest");
    let id = id_of(&create(&url, "before"));

    let resp = agent()
        .put(&url)
        .send_form([
            ("_id", id.as_str()),
            ("issue_title", "after"),
            ("assigned_to", "Dom"),
            ("open", "true"),
        ])
        .unwrap();
    let (_, body) = read_json(resp);
    assert_eq!(body["result"], "successfully updated");

    let (_, list) = get_all(&url, &[("_id", id.as_str())]);
    assert_eq!(list[0]["issue_title"], "after");
    assert_eq!(list[0]["assigned_to"], "Dom");
    assert_eq!(list[0]["open"], true);
}

#[test]
fn update_without_open_closes_the_issue() {
    let url = issues_url(&spawn_server(), "apitest");
    let id = id_of(&create(&url, "t"));

    put_json(&url, &json!({ "_id": id, "status_text": "looked at" }));

    let (_, list) = get_all(&url, &[("_id", id.as_str())]);
    assert_eq!(list[0]["open"], false);
}

#[test]
fn update_missing_id() {
    let url = issues_url(&spawn_server(), "apitest");
    let (status, body) = put_json(&url, &json!({ "issue_title": "x" }));
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "error": "missing _id" }));
}

#[test]
fn update_with_no_fields() {
    let url = issues_url(&spawn_server(), "apitest");
    let id = id_of(&create(&url, "t"));
    let (_, body) = put_json(&url, &json!({ "_id": id }));
    assert_eq!(body, json!({ "error": "no update field(s) sent", "_id": id }));
}

#[test]
fn update_unknown_or_malformed_id() {
    let url = issues_url(&spawn_server(), "apitest");
    create(&url, "t");

    for id in ["5f665eb46e296f6b9b6a504d", "invalid"] {
        let (status, body) = put_json(&url, &json!({ "_id": id, "issue_text": "x" }));
        assert_eq!(status, 200);
        assert_eq!(body, json!({ "error": "could not update", "_id": id }));
    }
}

#[test]
fn update_with_numeric_id_echoes_the_number() {
    let url = issues_url(&spawn_server(), "apitest");
    create(&url, "t");
    let (status, body) = put_json(&url, &json!({ "_id": 123, "issue_text": "x" }));
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "error": "could not update", "_id": 123 }));

    let (_, body) = put_json(&url, &json!({ "_id": 0, "issue_text": "x" }));
    assert_eq!(body, json!({ "error": "missing _id" }));
}

#[test]
fn update_in_unknown_project() {
    let base = spawn_server();
    let id = id_of(&create(&issues_url(&base, "real"), "t"));
    let (_, body) = put_json(
        &issues_url(&base, "ghost"),
        &json!({ "_id": id, "issue_text": "x" }),
    );
    assert_eq!(body, json!({ "error": "could not update", "_id": id }));
}

// ---------------------------------------------------------------------------
// DELETE
// ---------------------------------------------------------------------------

#[test]
fn delete_removes_only_that_issue() {
    let url = issues_url(&spawn_server(), "apitest");
    let a = create(&url, "a");
    let b = create(&url, "b");
    let c = create(&url, "c");
    let id = id_of(&b);

    let (status, body) = delete_json(&url, &json!({ "_id": id }));
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "result": "successfully deleted", "_id": id }));

    let (_, list) = get_all(&url, &[]);
    assert_eq!(list, json!([a, c]));

    let (_, again) = delete_json(&url, &json!({ "_id": id }));
    assert_eq!(again, json!({ "error": "could not delete", "_id": id }));
}

#[test]
fn delete_over_form() {
    let url = issues_url(&spawn_server(), "apitest");
    let id = id_of(&create(&url, "a"));
    let resp = agent()
        .delete(&url)
        .force_send_body()
        .send_form([("_id", id.as_str())])
        .unwrap();
    let (_, body) = read_json(resp);
    assert_eq!(body["result"], "successfully deleted");
}

#[test]
fn delete_missing_id() {
    let url = issues_url(&spawn_server(), "apitest");
    let (status, body) = delete_json(&url, &json!({}));
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "error": "missing _id" }));
}

#[test]
fn delete_unknown_or_malformed_id() {
    let url = issues_url(&spawn_server(), "apitest");
    create(&url, "t");
    for id in ["5f665eb46e296f6b9b6a504d", "invalid"] {
        let (_, body) = delete_json(&url, &json!({ "_id": id }));
        assert_eq!(body, json!({ "error": "could not delete", "_id": id }));
    }

    let (status, body) = delete_json(&url, &json!({ "_id": 123 }));
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "error": "could not delete", "_id": 123 }));
}

#[test]
fn deleting_the_last_issue_keeps_the_project() {
    let url = issues_url(&spawn_server(), "apitest");
    let only = create(&url, "only");
    let (_, body) = delete_json(&url, &json!({ "_id": id_of(&only) }));
    assert_eq!(body["result"], "successfully deleted");

    for _ in 0..2 {
        let (status, list) = get_all(&url, &[]);
        assert_eq!(status, 200);
        assert_eq!(list, json!([]));
    }

    let next = create(&url, "next");
    let (_, list) = get_all(&url, &[]);
    assert_eq!(list, json!([next]));

    let (_, again) = get_all(&url, &[]);
    assert_eq!(again, list);
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[test]
fn malformed_json_body_is_a_bad_request() {
    let url = issues_url(&spawn_server(), "apitest");
    let resp = agent()
        .post(&url)
        .header("content-type", "application/json")
        .send("{not json")
        .unwrap();
    let (status, body) = read_json(resp);
    assert_eq!(status, 400);
    assert!(
        body["error"].as_str().unwrap().starts_with("invalid request body"),
        "{body}"
    );
}

#[test]
fn unknown_route_is_not_found() {
    let base = spawn_server();
    let mut resp = agent().get(&format!("{base}/api/nothing")).call().unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    assert_eq!(resp.body_mut().read_to_string().unwrap(), "Not Found");
}

#[test]
fn cors_allows_any_origin() {
    let url = issues_url(&spawn_server(), "apitest");
    let resp = agent()
        .get(&url)
        .header("origin", "http://example.test")
        .call()
        .unwrap();
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[test]
fn sqlite_backed_server_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("issues.db");

    let first = spawn_with(Arc::new(SqliteStore::open(&path).unwrap()));
    let issue = create(&issues_url(&first, "apitest"), "durable");

    let second = spawn_with(Arc::new(SqliteStore::open(&path).unwrap()));
    let (_, list) = get_all(&issues_url(&second, "apitest"), &[]);
    assert_eq!(list, json!([issue]));
}
