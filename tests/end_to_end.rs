//! End-to-end tests against local stand-ins for the language model and the
//! encyclopedia.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use wikilinker::llm::{LlmClient, LlmConfig};
use wikilinker::resolver::{WikiConfig, WikiResolver};
use wikilinker::server::{create_router, AppState};
use wikilinker::{GenerateRequest, Pipeline, PipelineError, ReportStatus};

struct FakeLlm {
    reply: String,
    status: StatusCode,
    hits: AtomicUsize,
    authorization: Mutex<Option<String>>,
    body: Mutex<Option<Value>>,
}

impl FakeLlm {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            status: StatusCode::OK,
            hits: AtomicUsize::new(0),
            authorization: Mutex::new(None),
            body: Mutex::new(None),
        })
    }

    fn failing(status: StatusCode) -> Arc<Self> {
        Arc::new(Self {
            reply: String::new(),
            status,
            hits: AtomicUsize::new(0),
            authorization: Mutex::new(None),
            body: Mutex::new(None),
        })
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn chat_completions(
    State(llm): State<Arc<FakeLlm>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    llm.hits.fetch_add(1, Ordering::SeqCst);
    *llm.authorization.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *llm.body.lock().unwrap() = Some(body);

    if llm.status != StatusCode::OK {
        return (llm.status, "upstream exploded").into_response();
    }
    Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": llm.reply } }]
    }))
    .into_response()
}

/// Encyclopedia with a handful of articles. Records raw request paths.
#[derive(Default)]
struct FakeWiki {
    paths: Mutex<Vec<String>>,
}

impl FakeWiki {
    fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

async fn article(State(wiki): State<Arc<FakeWiki>>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    wiki.paths.lock().unwrap().push(path.clone());

    match path.as_str() {
        "/wiki/Evangelion" | "/wiki/Tokyo-3" | "/wiki/Shinji%20Ikari" | "/wiki/NERV" => {
            StatusCode::OK.into_response()
        }
        "/wiki/Nerv" => Redirect::permanent("/wiki/NERV").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_llm(llm: Arc<FakeLlm>) -> String {
    spawn(
        Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(llm),
    )
    .await
}

async fn spawn_wiki(wiki: Arc<FakeWiki>) -> String {
    spawn(
        Router::new()
            .route("/wiki/*title", get(article))
            .with_state(wiki),
    )
    .await
}

fn pipeline(llm_url: &str, wiki_config: WikiConfig) -> Pipeline {
    let llm = LlmClient::new(
        LlmConfig::base_default()
            .with_endpoint(llm_url)
            .with_model("test-model"),
    )
    .unwrap();
    let resolver = WikiResolver::new(wiki_config).unwrap();
    Pipeline::new(Arc::new(llm), Arc::new(resolver))
}

struct Harness {
    llm: Arc<FakeLlm>,
    wiki: Arc<FakeWiki>,
    wiki_url: String,
    pipeline: Pipeline,
}

async fn harness(llm: Arc<FakeLlm>) -> Harness {
    let wiki = Arc::new(FakeWiki::default());
    let llm_url = spawn_llm(llm.clone()).await;
    let wiki_url = spawn_wiki(wiki.clone()).await;
    let pipeline = pipeline(&llm_url, WikiConfig::base_default().with_base_url(&wiki_url));
    Harness {
        llm,
        wiki,
        wiki_url,
        pipeline,
    }
}

#[tokio::test]
async fn annotates_only_keywords_with_articles() {
    let h = harness(FakeLlm::replying("Shinji, Evangelion")).await;

    let report = h
        .pipeline
        .generate(
            &GenerateRequest::new("Shinji pilots an Evangelion.")
                .with_credentials(Some("sk-test".to_string())),
        )
        .await
        .unwrap();

    assert_eq!(report.status, ReportStatus::Annotated);
    assert_eq!(
        report.annotated_text,
        format!(
            "Shinji pilots an [Evangelion]({}/wiki/Evangelion).",
            h.wiki_url
        )
    );
    assert_eq!(report.links.len(), 1);
    assert!(report.degraded.is_empty());

    let mut paths = h.wiki.paths();
    paths.sort();
    assert_eq!(paths, vec!["/wiki/Evangelion", "/wiki/Shinji"]);
}

#[tokio::test]
async fn sends_one_authorized_completion_request() {
    let h = harness(FakeLlm::replying("Evangelion")).await;

    h.pipeline
        .generate(
            &GenerateRequest::new("Shinji pilots an Evangelion.")
                .with_credentials(Some("sk-test".to_string())),
        )
        .await
        .unwrap();

    assert_eq!(h.llm.hits(), 1);
    assert_eq!(
        h.llm.authorization.lock().unwrap().as_deref(),
        Some("Bearer sk-test")
    );

    let body = h.llm.body.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("Shinji pilots an Evangelion."));
}

#[tokio::test]
async fn percent_encodes_article_paths() {
    let h = harness(FakeLlm::replying("Shinji Ikari, Tokyo-3")).await;

    let report = h
        .pipeline
        .generate(
            &GenerateRequest::new("Shinji Ikari lives in Tokyo-3.")
                .with_credentials(Some("sk-test".to_string())),
        )
        .await
        .unwrap();

    let paths = h.wiki.paths();
    assert!(paths.contains(&"/wiki/Shinji%20Ikari".to_string()));
    assert!(paths.contains(&"/wiki/Tokyo-3".to_string()));
    assert_eq!(
        report.annotated_text,
        format!(
            "[Shinji Ikari]({0}/wiki/Shinji%20Ikari) lives in [Tokyo-3]({0}/wiki/Tokyo-3).",
            h.wiki_url
        )
    );
}

#[tokio::test]
async fn missing_credential_makes_no_requests() {
    let h = harness(FakeLlm::replying("Evangelion")).await;

    for credentials in [None, Some(String::new()), Some("   ".to_string())] {
        let err = h
            .pipeline
            .generate(&GenerateRequest::new("Shinji pilots an Evangelion.").with_credentials(credentials))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingCredential));
    }

    assert_eq!(h.llm.hits(), 0);
    assert!(h.wiki.paths().is_empty());
}

#[tokio::test]
async fn falls_back_to_default_credential() {
    let h = harness(FakeLlm::replying("Evangelion")).await;
    let pipeline = h
        .pipeline
        .clone()
        .with_default_api_key(Some("sk-default".to_string()));

    pipeline
        .generate(&GenerateRequest::new("An Evangelion."))
        .await
        .unwrap();

    assert_eq!(
        h.llm.authorization.lock().unwrap().as_deref(),
        Some("Bearer sk-default")
    );
}

#[tokio::test]
async fn extraction_error_aborts_before_lookups() {
    let h = harness(FakeLlm::failing(StatusCode::INTERNAL_SERVER_ERROR)).await;

    let err = h
        .pipeline
        .generate(
            &GenerateRequest::new("Shinji pilots an Evangelion.")
                .with_credentials(Some("sk-test".to_string())),
        )
        .await
        .unwrap_err();

    match err {
        PipelineError::ExtractionFailed(msg) => assert!(msg.contains("500")),
        other => panic!("expected ExtractionFailed, got {:?}", other),
    }
    assert!(h.wiki.paths().is_empty());
}

#[tokio::test]
async fn redirect_is_not_an_article_by_default() {
    let h = harness(FakeLlm::replying("Nerv")).await;

    let report = h
        .pipeline
        .generate(
            &GenerateRequest::new("Gendo runs Nerv.").with_credentials(Some("sk-test".to_string())),
        )
        .await
        .unwrap();

    assert_eq!(report.annotated_text, "Gendo runs Nerv.");
    assert_eq!(h.wiki.paths(), vec!["/wiki/Nerv"]);
}

#[tokio::test]
async fn redirect_followed_when_configured() {
    let llm = FakeLlm::replying("Nerv");
    let wiki = Arc::new(FakeWiki::default());
    let llm_url = spawn_llm(llm).await;
    let wiki_url = spawn_wiki(wiki.clone()).await;

    let mut wiki_config = WikiConfig::base_default().with_base_url(&wiki_url);
    wiki_config.follow_redirects = true;
    let pipeline = pipeline(&llm_url, wiki_config);

    let report = pipeline
        .generate(
            &GenerateRequest::new("Gendo runs Nerv.").with_credentials(Some("sk-test".to_string())),
        )
        .await
        .unwrap();

    assert_eq!(
        report.annotated_text,
        format!("Gendo runs [Nerv]({}/wiki/Nerv).", wiki_url)
    );
    assert_eq!(wiki.paths(), vec!["/wiki/Nerv", "/wiki/NERV"]);
}

#[tokio::test]
async fn unreachable_encyclopedia_degrades() {
    let llm = FakeLlm::replying("Shinji, Evangelion");
    let llm_url = spawn_llm(llm).await;

    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed_url = format!("http://{}", closed.local_addr().unwrap());
    drop(closed);

    let pipeline = pipeline(&llm_url, WikiConfig::base_default().with_base_url(&closed_url));
    let report = pipeline
        .generate(
            &GenerateRequest::new("Shinji pilots an Evangelion.")
                .with_credentials(Some("sk-test".to_string())),
        )
        .await
        .unwrap();

    assert_eq!(report.annotated_text, "Shinji pilots an Evangelion.");
    assert!(report.links.is_empty());
    let mut degraded: Vec<_> = report.degraded.iter().map(|d| d.keyword.as_str()).collect();
    degraded.sort();
    assert_eq!(degraded, vec!["Evangelion", "Shinji"]);
}

#[tokio::test]
async fn empty_input_touches_nothing() {
    let h = harness(FakeLlm::replying("Evangelion")).await;

    let report = h
        .pipeline
        .generate(&GenerateRequest::new("").with_credentials(Some("sk-test".to_string())))
        .await
        .unwrap();

    assert_eq!(report.status, ReportStatus::EmptyInput);
    assert_eq!(report.annotated_text, "");
    assert_eq!(h.llm.hits(), 0);
    assert!(h.wiki.paths().is_empty());
}

#[tokio::test]
async fn http_api_round_trip() {
    let h = harness(FakeLlm::replying("Shinji, Evangelion")).await;
    let api_url = spawn(create_router(AppState::new(h.pipeline.clone()))).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/result", api_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    let resp = client
        .post(format!("{}/api/generate", api_url))
        .json(&json!({ "text": "Shinji pilots an Evangelion.", "credentials": "sk-test" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let expected = format!(
        "Shinji pilots an [Evangelion]({}/wiki/Evangelion).",
        h.wiki_url
    );
    assert_eq!(body["annotatedText"], expected.as_str());

    let body: Value = client
        .get(format!("{}/api/result", api_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["annotatedText"], expected.as_str());

    let resp = client
        .post(format!("{}/api/generate", api_url))
        .json(&json!({ "text": "Shinji pilots an Evangelion." }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
}
