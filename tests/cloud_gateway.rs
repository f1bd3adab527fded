use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use parking_lot::Mutex;
use reqwest::Url;

use ilre::models::{CatalogEntry, RemoteRow, RemoteSettings};
use ilre::services::{CloudGateway, RemoteStore};
use ilre::GatewayError;

#[derive(Debug, Clone)]
struct Captured {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: String,
}

impl Captured {
    fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Local PostgREST stand-in: records each request and answers with a fixed reply.
#[derive(Clone)]
struct Recorder {
    requests: Arc<Mutex<Vec<Captured>>>,
    status: StatusCode,
    reply: String,
}

impl Recorder {
    fn requests(&self) -> Vec<Captured> {
        self.requests.lock().clone()
    }

    fn only_request(&self) -> Captured {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected one request, got {:?}", requests);
        requests[0].clone()
    }
}

async fn record(
    State(recorder): State<Recorder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let parsed = Url::parse(&format!("http://local{}", uri)).expect("request uri");
    recorder.requests.lock().push(Captured {
        method,
        path: parsed.path().to_string(),
        query: parsed.query_pairs().into_owned().collect(),
        headers,
        body,
    });
    (recorder.status, recorder.reply.clone())
}

async fn serve(status: StatusCode, reply: &str) -> (CloudGateway, Recorder) {
    // Keep loopback traffic off any proxy configured in the environment.
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    std::env::set_var("no_proxy", "127.0.0.1,localhost");

    let recorder = Recorder {
        requests: Arc::new(Mutex::new(Vec::new())),
        status,
        reply: reply.to_string(),
    };
    let app = Router::new().fallback(record).with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let gateway = CloudGateway::from_settings(&RemoteSettings {
        url: format!("http://{}", addr),
        key: "anon-key".to_string(),
        table: "prompts".to_string(),
    });
    assert!(gateway.is_connected());
    (gateway, recorder)
}

#[tokio::test]
async fn fetch_all_authenticates_and_decodes_rows() {
    let reply = r#"[
        {"id":"r1","title":"Dunes","prompt":"wind over sand","category":"txt2img",
         "tags":null,"output_media_url":"https://cdn.example/dunes.png",
         "created_at":"2024-05-01T10:00:00Z","user_id":"owner-1"},
        {"id":"r2","title":"Agent","prompt":"review code","category":"general","tags":["sys"]}
    ]"#;
    let (gateway, recorder) = serve(StatusCode::OK, reply).await;

    let rows = gateway.fetch_all().await.expect("fetch");
    assert_eq!(rows.len(), 2);
    assert!(rows[0].tags.is_empty());
    assert_eq!(rows[0].user_id.as_deref(), Some("owner-1"));
    assert_eq!(rows[0].output_media_url.as_deref(), Some("https://cdn.example/dunes.png"));
    assert_eq!(rows[1].tags, vec!["sys"]);
    assert_eq!(rows[1].created_at, None);

    let request = recorder.only_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/rest/v1/prompts");
    assert_eq!(request.param("select"), Some("*"));
    assert_eq!(request.header("apikey"), Some("anon-key"));
    assert_eq!(request.header("authorization"), Some("Bearer anon-key"));
}

#[tokio::test]
async fn ping_selects_a_single_id() {
    let (gateway, recorder) = serve(StatusCode::OK, "[]").await;

    gateway.ping().await.expect("ping");

    let request = recorder.only_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.param("select"), Some("id"));
    assert_eq!(request.param("limit"), Some("1"));
}

#[tokio::test]
async fn bulk_upsert_merges_duplicates_with_explicit_columns() {
    let (gateway, recorder) = serve(StatusCode::CREATED, "").await;
    let plain = CatalogEntry::new("Agent", "review code", "general");
    let mut row = RemoteRow::from(&plain);
    row.user_id = Some("never-sent".to_string());

    gateway.bulk_upsert(&[row]).await.expect("upsert");

    let request = recorder.only_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/rest/v1/prompts");
    assert_eq!(
        request.param("columns"),
        Some("category,created_at,id,prompt,tags,title")
    );
    assert_eq!(
        request.header("prefer"),
        Some("resolution=merge-duplicates,return=minimal")
    );
    assert_eq!(request.header("authorization"), Some("Bearer anon-key"));

    let body: serde_json::Value = serde_json::from_str(&request.body).expect("json body");
    let sent = body.as_array().expect("array body");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["id"], plain.id.as_str());
    assert_eq!(sent[0]["prompt"], "review code");
    assert!(sent[0].get("user_id").is_none());
    assert!(sent[0].get("dirty").is_none());
}

#[tokio::test]
async fn bulk_delete_filters_by_quoted_ids() {
    let (gateway, recorder) = serve(StatusCode::NO_CONTENT, "").await;

    gateway
        .bulk_delete(&["a1".to_string(), "b2".to_string()])
        .await
        .expect("delete");

    let request = recorder.only_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/rest/v1/prompts");
    assert_eq!(request.param("id"), Some(r#"in.("a1","b2")"#));
    assert_eq!(request.header("apikey"), Some("anon-key"));
}

#[tokio::test]
async fn empty_batches_make_no_request() {
    let (gateway, recorder) = serve(StatusCode::OK, "").await;

    gateway.bulk_upsert(&[]).await.expect("upsert");
    gateway.bulk_delete(&[]).await.expect("delete");

    assert!(recorder.requests().is_empty());
}

#[tokio::test]
async fn client_errors_are_rejected_with_the_server_message() {
    let (gateway, _recorder) = serve(StatusCode::UNAUTHORIZED, r#"{"message":"JWT expired"}"#).await;

    match gateway.fetch_all().await {
        Err(GatewayError::Rejected { status, message }) => {
            assert_eq!(status, 401);
            assert!(message.contains("JWT expired"));
        }
        other => panic!("expected a rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn server_errors_are_rejected() {
    let (gateway, recorder) = serve(StatusCode::SERVICE_UNAVAILABLE, "down for maintenance").await;
    let row = RemoteRow::from(&CatalogEntry::new("A", "b", "general"));

    assert!(matches!(
        gateway.bulk_upsert(&[row]).await,
        Err(GatewayError::Rejected { status: 503, .. })
    ));
    assert!(matches!(
        gateway.bulk_delete(&["a1".to_string()]).await,
        Err(GatewayError::Rejected { status: 503, .. })
    ));
    assert_eq!(recorder.requests().len(), 2);
}
