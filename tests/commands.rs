use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use jmap_email_cli::cli::{
    DeleteEmailsArgs, GetEmailArgs, ListEmailsArgs, ListMailboxesArgs, MoveByIdsArgs,
    SearchKeywordsArgs, parse_args_from,
};
use jmap_email_cli::commands::{
    delete_emails, get_email, list_emails, list_mailboxes, move_by_ids, search_keywords,
};
use jmap_email_cli::config::JmapConfig;
use jmap_email_cli::errors::AppError;
use jmap_email_cli::jmap::JmapClient;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;

const TOKEN: &str = "test-token";
const ACCOUNT: &str = "acct1";

type Responder = Arc<dyn Fn(&str, &Value) -> Result<Value, Value> + Send + Sync>;
type CallLog = Arc<Mutex<Vec<(String, Value)>>>;

#[derive(Clone)]
struct FakeJmap {
    api_url: String,
    calls: CallLog,
    responder: Responder,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn session(
    State(fake): State<FakeJmap>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "apiUrl": fake.api_url,
        "primaryAccounts": { "urn:ietf:params:jmap:mail": ACCOUNT },
        "accounts": { ACCOUNT: { "name": "test@example.com" } },
        "state": "s0"
    })))
}

async fn api(
    State(fake): State<FakeJmap>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let call = &body["methodCalls"][0];
    let method = call[0].as_str().unwrap_or_default().to_owned();
    let arguments = call[1].clone();
    fake.calls
        .lock()
        .expect("call log lock")
        .push((method.clone(), arguments.clone()));

    let invocation = match (fake.responder)(&method, &arguments) {
        Ok(result) => json!([method, result, call[2]]),
        Err(error) => json!(["error", error, call[2]]),
    };
    Ok(Json(json!({ "methodResponses": [invocation], "sessionState": "s0" })))
}

async fn start_server<F>(responder: F) -> (String, CallLog)
where
    F: Fn(&str, &Value) -> Result<Value, Value> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeJmap {
        api_url: format!("http://{addr}/api"),
        calls: Arc::clone(&calls),
        responder: Arc::new(responder),
    };
    let app = Router::new()
        .route("/session", get(session))
        .route("/api", post(api))
        .with_state(fake);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{addr}/session"), calls)
}

fn config(session_url: &str, token: &str, account_id: Option<&str>) -> JmapConfig {
    JmapConfig {
        session_url: session_url.to_owned(),
        bearer_token: SecretString::new(token.into()),
        account_id: account_id.map(str::to_owned),
        connect_timeout_ms: 5_000,
        request_timeout_ms: 5_000,
    }
}

async fn connect<F>(responder: F) -> (JmapClient, CallLog)
where
    F: Fn(&str, &Value) -> Result<Value, Value> + Send + Sync + 'static,
{
    let (session_url, calls) = start_server(responder).await;
    let client = JmapClient::connect(&config(&session_url, TOKEN, None))
        .await
        .expect("connect");
    (client, calls)
}

fn methods(calls: &CallLog) -> Vec<String> {
    calls
        .lock()
        .expect("call log lock")
        .iter()
        .map(|(m, _)| m.clone())
        .collect()
}

fn arguments_of(calls: &CallLog, method: &str) -> Value {
    calls
        .lock()
        .expect("call log lock")
        .iter()
        .find(|(m, _)| m == method)
        .map(|(_, a)| a.clone())
        .unwrap_or_else(|| panic!("{method} was not called"))
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("utf-8 output")
}

/// Twelve emails, newest first, `e1` .. `e12`
fn mailbox_contents() -> Vec<Value> {
    (1..=12)
        .map(|i| {
            json!({
                "id": format!("e{i}"),
                "subject": format!("Message {i}"),
                "from": [{ "name": "Sender", "email": "sender@example.com" }],
                "preview": format!("Preview {i}"),
                "keywords": if i % 2 == 0 { json!({ "$seen": true }) } else { json!({}) }
            })
        })
        .collect()
}

fn get_by_ids(arguments: &Value, all: &[Value]) -> Value {
    let ids = arguments["ids"].as_array().cloned().unwrap_or_default();
    let list: Vec<Value> = ids
        .iter()
        .filter_map(|id| all.iter().find(|e| &e["id"] == id).cloned())
        .collect();
    let not_found: Vec<Value> = ids
        .iter()
        .filter(|id| !all.iter().any(|e| &e["id"] == *id))
        .cloned()
        .collect();
    json!({ "accountId": ACCOUNT, "list": list, "notFound": not_found })
}

#[tokio::test]
async fn list_emails_shows_newest_ten_by_default() {
    let all = mailbox_contents();
    let (client, calls) = connect(move |method, arguments| match method {
        "Email/query" => {
            let limit = arguments["limit"].as_u64().unwrap_or(0) as usize;
            let ids: Vec<Value> = all.iter().take(limit).map(|e| e["id"].clone()).collect();
            Ok(json!({ "accountId": ACCOUNT, "ids": ids, "total": all.len() }))
        }
        "Email/get" => Ok(get_by_ids(arguments, &all)),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: ListEmailsArgs = parse_args_from(["list-emails"]).expect("parse");
    let mut out = Vec::new();
    list_emails::run(&client, &args, &mut out).await.expect("run");
    let text = output(out);

    assert!(text.starts_with("Found 10 email(s)\n"));
    assert!(text.ends_with("Total: 10 emails\n"));
    assert_eq!(text.matches("\nID: ").count(), 10);
    assert!(!text.contains("ID: e11"));
    assert!(text.find("ID: e1\n") < text.find("ID: e2\n"));
    assert!(text.contains("[UNREAD] Message 1\n"));
    assert!(text.contains("\nMessage 2\n"));

    assert_eq!(methods(&calls), vec!["Email/query", "Email/get"]);
    let query = arguments_of(&calls, "Email/query");
    assert_eq!(query["accountId"], json!(ACCOUNT));
    assert!(query.get("filter").is_none());
    assert_eq!(
        query["sort"],
        json!([{ "property": "receivedAt", "isAscending": false }])
    );
    assert_eq!(query["limit"], json!(10));
}

#[tokio::test]
async fn list_emails_resolves_mailbox_and_combines_filters() {
    let (client, calls) = connect(|method, arguments| match method {
        "Mailbox/query" => {
            assert_eq!(arguments["filter"], json!({ "name": "Archive" }));
            Ok(json!({ "ids": ["mb-archive", "mb-archive-2"] }))
        }
        "Email/query" => Ok(json!({ "ids": [] })),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: ListEmailsArgs = parse_args_from([
        "list-emails",
        "--unread",
        "--mailbox",
        "Archive",
        "--from",
        "boss@example.com",
    ])
    .expect("parse");
    let mut out = Vec::new();
    list_emails::run(&client, &args, &mut out).await.expect("run");

    assert_eq!(output(out), "No emails found\n");
    assert_eq!(methods(&calls), vec!["Mailbox/query", "Email/query"]);
    assert_eq!(
        arguments_of(&calls, "Email/query")["filter"],
        json!({
            "inMailbox": "mb-archive",
            "notKeyword": "$seen",
            "from": "boss@example.com"
        })
    );
}

#[tokio::test]
async fn search_keywords_with_no_matches_reports_keywords() {
    let (client, calls) = connect(|method, arguments| match method {
        "Mailbox/query" => {
            assert_eq!(arguments["filter"], json!({ "name": "Inbox" }));
            Ok(json!({ "ids": ["mb-inbox"] }))
        }
        "Email/query" => Ok(json!({ "ids": [] })),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: SearchKeywordsArgs =
        parse_args_from(["search-keywords", "invoice", "receipt"]).expect("parse");
    let mut out = Vec::new();
    search_keywords::run(&client, &args, &mut out).await.expect("run");

    assert_eq!(output(out), "No emails found matching keywords: invoice, receipt\n");
    assert_eq!(methods(&calls), vec!["Mailbox/query", "Email/query"]);
    let query = arguments_of(&calls, "Email/query");
    assert_eq!(query["limit"], json!(50));
    assert_eq!(
        query["filter"],
        json!({
            "operator": "OR",
            "conditions": [
                { "inMailbox": "mb-inbox", "text": "invoice" },
                { "inMailbox": "mb-inbox", "text": "receipt" }
            ]
        })
    );
}

#[tokio::test]
async fn search_keywords_lists_matches() {
    let all = mailbox_contents();
    let (client, _calls) = connect(move |method, arguments| match method {
        "Mailbox/query" => Ok(json!({ "ids": ["mb-archive"] })),
        "Email/query" => Ok(json!({ "ids": ["e3", "e4"] })),
        "Email/get" => {
            assert!(arguments.get("fetchTextBodyValues").is_none());
            Ok(get_by_ids(arguments, &all))
        }
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: SearchKeywordsArgs = parse_args_from([
        "search-keywords",
        "--mailbox",
        "Archive",
        "--limit",
        "5",
        "meeting",
    ])
    .expect("parse");
    let mut out = Vec::new();
    search_keywords::run(&client, &args, &mut out).await.expect("run");
    let text = output(out);

    assert!(text.starts_with("Found 2 emails matching: meeting\n"));
    assert!(text.contains("ID: e3\n"));
    assert!(text.contains("ID: e4\n"));
}

fn reversed(mut response: Value) -> Value {
    if let Some(list) = response["list"].as_array_mut() {
        list.reverse();
    }
    response
}

#[tokio::test]
async fn list_emails_keeps_query_order_when_get_reorders() {
    let all = mailbox_contents();
    let (client, _calls) = connect(move |method, arguments| match method {
        "Email/query" => Ok(json!({ "ids": ["e1", "e2", "e3"] })),
        "Email/get" => Ok(reversed(get_by_ids(arguments, &all))),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: ListEmailsArgs = parse_args_from(["list-emails", "--limit", "3"]).expect("parse");
    let mut out = Vec::new();
    list_emails::run(&client, &args, &mut out).await.expect("run");
    let text = output(out);

    let ids: Vec<&str> = text.lines().filter(|l| l.starts_with("ID: ")).collect();
    assert_eq!(ids, vec!["ID: e1", "ID: e2", "ID: e3"]);
}

#[tokio::test]
async fn search_keywords_keeps_query_order_when_get_reorders() {
    let all = mailbox_contents();
    let (client, _calls) = connect(move |method, arguments| match method {
        "Mailbox/query" => Ok(json!({ "ids": ["mb-inbox"] })),
        "Email/query" => Ok(json!({ "ids": ["e5", "e7", "e9"] })),
        "Email/get" => Ok(reversed(get_by_ids(arguments, &all))),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: SearchKeywordsArgs =
        parse_args_from(["search-keywords", "invoice"]).expect("parse");
    let mut out = Vec::new();
    search_keywords::run(&client, &args, &mut out).await.expect("run");
    let text = output(out);

    let ids: Vec<&str> = text.lines().filter(|l| l.starts_with("ID: ")).collect();
    assert_eq!(ids, vec!["ID: e5", "ID: e7", "ID: e9"]);
}

#[tokio::test]
async fn search_keywords_fails_for_unknown_mailbox() {
    let (client, calls) = connect(|method, _| match method {
        "Mailbox/query" => Ok(json!({ "ids": [] })),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: SearchKeywordsArgs =
        parse_args_from(["search-keywords", "--mailbox", "Nowhere", "x"]).expect("parse");
    let mut out = Vec::new();
    let err = search_keywords::run(&client, &args, &mut out)
        .await
        .expect_err("must fail");

    assert_eq!(err.to_string(), "Mailbox \"Nowhere\" not found");
    assert_eq!(err.exit_code(), 1);
    assert_eq!(methods(&calls), vec!["Mailbox/query"]);
}

#[tokio::test]
async fn get_email_prints_detail_with_text_body() {
    let (client, calls) = connect(|method, _| match method {
        "Email/get" => Ok(json!({
            "list": [{
                "id": "M1",
                "subject": "Lunch",
                "from": [{ "name": "Ada", "email": "ada@example.com" }],
                "to": [{ "email": "me@example.com" }],
                "cc": [{ "name": "Bob", "email": "bob@example.com" }],
                "size": 3072,
                "keywords": { "$seen": true, "$flagged": true },
                "textBody": [{ "partId": "1", "type": "text/plain" }],
                "htmlBody": [{ "partId": "2", "type": "text/html" }],
                "bodyValues": {
                    "1": { "value": "See you at noon." },
                    "2": { "value": "<p>See you at noon.</p>" }
                }
            }],
            "notFound": []
        })),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: GetEmailArgs = parse_args_from(["get-email", "M1"]).expect("parse");
    let mut out = Vec::new();
    get_email::run(&client, &args, &mut out).await.expect("run");

    assert_eq!(
        output(out),
        "Subject: ⭐ Lunch\n\
         From: Ada <ada@example.com>\n\
         To: me@example.com\n\
         Cc: Bob <bob@example.com>\n\
         Size: 3.00 KB\n\
         ID: M1\n\
         \n\
         --- Body ---\n\
         \n\
         See you at noon.\n"
    );

    let get = arguments_of(&calls, "Email/get");
    assert_eq!(get["ids"], json!(["M1"]));
    assert_eq!(get["fetchTextBodyValues"], json!(true));
    assert_eq!(get["fetchHTMLBodyValues"], json!(true));
    assert!(
        get["properties"]
            .as_array()
            .is_some_and(|p| p.contains(&json!("bodyValues")))
    );
}

#[tokio::test]
async fn get_email_reports_missing_id() {
    let (client, _calls) = connect(|method, arguments| match method {
        "Email/get" => Ok(get_by_ids(arguments, &[])),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: GetEmailArgs = parse_args_from(["get-email", "missing-id"]).expect("parse");
    let mut out = Vec::new();
    let err = get_email::run(&client, &args, &mut out)
        .await
        .expect_err("must fail");

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.to_string(), "Email missing-id not found");
    assert!(out.is_empty());
}

#[tokio::test]
async fn get_email_with_empty_list_and_no_not_found_is_not_found() {
    let (client, _calls) = connect(|method, _| match method {
        "Email/get" => Ok(json!({ "accountId": ACCOUNT, "list": [], "notFound": [] })),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: GetEmailArgs = parse_args_from(["get-email", "ghost"]).expect("parse");
    let mut out = Vec::new();
    let err = get_email::run(&client, &args, &mut out)
        .await
        .expect_err("must fail");

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.to_string(), "Email ghost not found");
    assert!(out.is_empty());
}

#[tokio::test]
async fn list_mailboxes_prints_tree() {
    let (client, calls) = connect(|method, _| match method {
        "Mailbox/get" => Ok(json!({
            "list": [
                { "id": "i", "name": "Inbox", "parentId": null, "unreadEmails": 2, "totalEmails": 9 },
                { "id": "c", "name": "Clients", "parentId": "i", "unreadEmails": 0, "totalEmails": 4 },
                { "id": "t", "name": "Trash", "parentId": null, "unreadEmails": 0, "totalEmails": 0 },
                { "id": "a", "name": "Acme", "parentId": "c", "unreadEmails": 1, "totalEmails": 3 }
            ],
            "notFound": []
        })),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: ListMailboxesArgs = parse_args_from(["list-mailboxes"]).expect("parse");
    let mut out = Vec::new();
    list_mailboxes::run(&client, &args, &mut out).await.expect("run");

    assert_eq!(
        output(out),
        "Mailboxes:\n\
         ----------\n\
         Inbox (2 unread) - 9 total\n  \
         Clients - 4 total\n    \
         Acme (1 unread) - 3 total\n\
         Trash - 0 total\n"
    );
    assert_eq!(
        arguments_of(&calls, "Mailbox/get"),
        json!({ "accountId": ACCOUNT, "ids": null })
    );
}

#[tokio::test]
async fn move_to_unknown_mailbox_issues_no_update() {
    let (client, calls) = connect(|method, _| match method {
        "Mailbox/query" => Ok(json!({ "ids": [] })),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: MoveByIdsArgs =
        parse_args_from(["move-by-ids", "--mailbox", "Archive", "id1", "id2"]).expect("parse");
    let mut out = Vec::new();
    let err = move_by_ids::run(&client, &args, &mut out)
        .await
        .expect_err("must fail");

    assert_eq!(err.to_string(), "Mailbox \"Archive\" not found");
    assert_eq!(err.exit_code(), 1);
    assert!(out.is_empty());
    assert_eq!(methods(&calls), vec!["Mailbox/query"]);
}

#[tokio::test]
async fn move_replaces_membership_and_reports_failures() {
    let (client, calls) = connect(|method, _| match method {
        "Mailbox/query" => Ok(json!({ "ids": ["mb-c"] })),
        "Email/set" => Ok(json!({
            "updated": { "id1": null, "id3": null },
            "notUpdated": { "id2": { "type": "notFound" } }
        })),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: MoveByIdsArgs =
        parse_args_from(["move-by-ids", "--mailbox", "Clients", "id1", "id2", "id3"])
            .expect("parse");
    let mut out = Vec::new();
    move_by_ids::run(&client, &args, &mut out).await.expect("run");

    assert_eq!(
        output(out),
        "Moving 3 email(s) to Clients...\n\
         Successfully moved 2 emails to Clients\n\
         \n\
         Failed to move 1 emails:\n\
         - id2: {\"type\":\"notFound\"}\n"
    );
    assert_eq!(
        arguments_of(&calls, "Email/set"),
        json!({
            "accountId": ACCOUNT,
            "update": {
                "id1": { "mailboxIds": { "mb-c": true } },
                "id2": { "mailboxIds": { "mb-c": true } },
                "id3": { "mailboxIds": { "mb-c": true } }
            }
        })
    );
}

#[tokio::test]
async fn delete_reports_partial_failure_without_error() {
    let (client, calls) = connect(|method, _| match method {
        "Email/set" => Ok(json!({
            "destroyed": ["id1", "id3"],
            "notDestroyed": { "id2": { "type": "notFound" } }
        })),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: DeleteEmailsArgs =
        parse_args_from(["delete-emails", "id1", "id2", "id3"]).expect("parse");
    let mut out = Vec::new();
    delete_emails::run(&client, &args, &mut out).await.expect("run");

    assert_eq!(
        output(out),
        "Deleting 3 email(s)...\n\
         Successfully deleted 2 emails\n\
         \n\
         Failed to delete 1 emails:\n\
         - id2: {\"type\":\"notFound\"}\n"
    );
    assert_eq!(
        arguments_of(&calls, "Email/set"),
        json!({ "accountId": ACCOUNT, "destroy": ["id1", "id2", "id3"] })
    );
}

#[tokio::test]
async fn delete_all_succeeded_has_no_failure_section() {
    let (client, _calls) = connect(|method, _| match method {
        "Email/set" => Ok(json!({ "destroyed": ["id1"], "notDestroyed": null })),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;

    let args: DeleteEmailsArgs = parse_args_from(["delete-emails", "id1"]).expect("parse");
    let mut out = Vec::new();
    delete_emails::run(&client, &args, &mut out).await.expect("run");

    assert_eq!(
        output(out),
        "Deleting 1 email(s)...\nSuccessfully deleted 1 emails\n"
    );
}

#[tokio::test]
async fn method_error_surfaces_as_protocol_error() {
    let (client, _calls) = connect(|_, _| {
        Err(json!({ "type": "serverFail", "description": "backend down" }))
    })
    .await;

    let args: ListMailboxesArgs = parse_args_from(["list-mailboxes"]).expect("parse");
    let mut out = Vec::new();
    let err = list_mailboxes::run(&client, &args, &mut out)
        .await
        .expect_err("must fail");

    assert!(matches!(err, AppError::Protocol(_)));
    assert!(err.to_string().contains("serverFail"));
    assert!(err.to_string().contains("backend down"));
}

#[tokio::test]
async fn configured_account_overrides_primary_account() {
    let (session_url, calls) = start_server(|method, _| match method {
        "Mailbox/get" => Ok(json!({ "list": [], "notFound": [] })),
        other => Err(json!({ "type": "unknownMethod", "description": other })),
    })
    .await;
    let client = JmapClient::connect(&config(&session_url, TOKEN, Some("acct-override")))
        .await
        .expect("connect");
    assert_eq!(client.account_id(), "acct-override");

    let args: ListMailboxesArgs = parse_args_from(["list-mailboxes"]).expect("parse");
    let mut out = Vec::new();
    list_mailboxes::run(&client, &args, &mut out).await.expect("run");

    assert_eq!(output(out), "Mailboxes:\n----------\n");
    assert_eq!(
        arguments_of(&calls, "Mailbox/get")["accountId"],
        json!("acct-override")
    );
}

#[tokio::test]
async fn rejected_token_is_a_transport_error() {
    let (session_url, calls) = start_server(|_, _| Ok(json!({}))).await;
    let err = JmapClient::connect(&config(&session_url, "wrong-token", None))
        .await
        .expect_err("must fail");

    assert!(matches!(err, AppError::Transport(_)));
    assert!(err.to_string().contains("401"));
    assert!(methods(&calls).is_empty());
}
