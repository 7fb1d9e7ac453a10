use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use dsearch_api::{routes, state::AppState};
use dsearch_service::{
	AccessToken, BoxFuture, DriveItem, DriveProvider, Error, IndexProvider, Providers, Result,
	SearchService, TokenProvider,
};

struct StaticToken;
impl TokenProvider for StaticToken {
	fn access_token(&self) -> BoxFuture<'_, Result<AccessToken>> {
		Box::pin(async move { Ok(AccessToken::new("token")) })
	}
}

struct BrokenToken;
impl TokenProvider for BrokenToken {
	fn access_token(&self) -> BoxFuture<'_, Result<AccessToken>> {
		Box::pin(async move { Err(Error::Token { message: "store offline".to_string() }) })
	}
}

#[derive(Default)]
struct SpyDrive {
	calls: Arc<AtomicUsize>,
	search_status: Option<u16>,
	/// Fails the search without an upstream response; the flag marks a timeout.
	search_transport_timeout: Option<bool>,
	failing_id: Option<String>,
}
impl DriveProvider for SpyDrive {
	fn search_drive<'a>(
		&'a self,
		_token: &'a AccessToken,
		_sanitized: &'a str,
		_top: u32,
	) -> BoxFuture<'a, Result<Vec<DriveItem>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let result = match (self.search_status, self.search_transport_timeout) {
			(Some(status), _) => Err(Error::Upstream {
				status,
				body: json!({ "error": { "code": "accessDenied", "message": "Access denied." } }),
			}),
			(None, Some(timeout)) => {
				let message = if timeout { "request timed out" } else { "connection refused" };

				Err(Error::Transport { message: message.to_string(), timeout })
			},
			(None, None) => Ok(vec![item("r1"), item("r2")]),
		};

		Box::pin(async move { result })
	}

	fn fetch_item<'a>(
		&'a self,
		_token: &'a AccessToken,
		id: &'a str,
	) -> BoxFuture<'a, Result<DriveItem>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let result = if self.failing_id.as_deref() == Some(id) {
			Err(Error::Upstream {
				status: 404,
				body: json!({ "error": { "code": "itemNotFound" } }),
			})
		} else {
			Ok(item(id))
		};

		Box::pin(async move { result })
	}
}

struct StaticIndex(Vec<String>);
impl IndexProvider for StaticIndex {
	fn lookup<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
		let ids = self.0.clone();

		Box::pin(async move { Ok(ids) })
	}
}

struct BrokenIndex;
impl IndexProvider for BrokenIndex {
	fn lookup<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(async move { Err(Error::Index { message: "index.json is unreadable".to_string() }) })
	}
}

fn item(id: &str) -> DriveItem {
	serde_json::from_value(json!({
		"id": id,
		"name": format!("{id}.md"),
		"file": { "mimeType": "text/markdown" },
		"parentReference": { "id": "root" }
	}))
	.expect("Failed to build item.")
}

fn app(provider: &str, drive: SpyDrive, token: Arc<dyn TokenProvider>) -> axum::Router {
	let index = Arc::new(StaticIndex(vec!["id1".to_string(), "id2".to_string()]));

	app_with_index(provider, drive, token, index)
}

fn app_with_index(
	provider: &str,
	drive: SpyDrive,
	token: Arc<dyn TokenProvider>,
	index: Arc<dyn IndexProvider>,
) -> axum::Router {
	let cfg = dsearch_config::Search {
		provider: Some(provider.to_string()),
		max_items: 10,
		fetch_concurrency: 2,
		max_index_results: None,
		local_index: None,
	};
	let providers = Providers::new(token, Arc::new(drive), Some(index));
	let service = SearchService::new(&cfg, providers).expect("Failed to build service.");

	routes::router(AppState::with_service(service))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
	let response = app
		.oneshot(Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request."))
		.await
		.expect("Failed to call route.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = serde_json::from_slice(&body).expect("Failed to parse response.");

	(status, json)
}

#[tokio::test]
async fn health_ok() {
	let app = app("od", SpyDrive::default(), Arc::new(StaticToken));
	let response = app
		.oneshot(
			Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_query_returns_empty_list() {
	let drive = SpyDrive::default();
	let calls = drive.calls.clone();
	let (status, json) = get(app("od", drive, Arc::new(StaticToken)), "/search").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json, json!([]));
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeated_query_parameter_returns_empty_list() {
	let drive = SpyDrive::default();
	let calls = drive.calls.clone();
	let (status, json) = get(app("lua", drive, Arc::new(StaticToken)), "/search?q=a&q=b").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json, json!([]));
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn remote_search_returns_items() {
	let drive = SpyDrive::default();
	let calls = drive.calls.clone();
	let (status, json) =
		get(app("od", drive, Arc::new(StaticToken)), "/search?q=meeting%20notes").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json[0]["id"], "r1");
	assert_eq!(json[1]["parentReference"]["id"], "root");
	assert_eq!(json.as_array().map(Vec::len), Some(2));
	assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn remote_upstream_status_is_mirrored() {
	let drive = SpyDrive { search_status: Some(403), ..Default::default() };
	let (status, json) = get(app("od", drive, Arc::new(StaticToken)), "/search?q=x").await;

	assert_eq!(status, StatusCode::FORBIDDEN);
	assert_eq!(json["error"]["error"]["code"], "accessDenied");
}

#[tokio::test]
async fn local_index_search_returns_items_in_index_order() {
	let drive = SpyDrive::default();
	let calls = drive.calls.clone();
	let (status, json) = get(app("lua", drive, Arc::new(StaticToken)), "/search?q=report").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json, json!([
		{
			"id": "id1",
			"name": "id1.md",
			"file": { "mimeType": "text/markdown" },
			"parentReference": { "id": "root" }
		},
		{
			"id": "id2",
			"name": "id2.md",
			"file": { "mimeType": "text/markdown" },
			"parentReference": { "id": "root" }
		}
	]));
	assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn local_index_fetch_failure_fails_the_request() {
	let drive = SpyDrive { failing_id: Some("id2".to_string()), ..Default::default() };
	let (status, json) = get(app("lua", drive, Arc::new(StaticToken)), "/search?q=report").await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["error"]["error"]["code"], "itemNotFound");
	assert!(json.get("id").is_none());
}

#[tokio::test]
async fn unknown_provider_is_a_server_error() {
	let drive = SpyDrive::default();
	let calls = drive.calls.clone();
	let (status, json) = get(app("bogus", drive, Arc::new(StaticToken)), "/search?q=x").await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json, json!({ "error": "Unknown search provider" }));
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn token_failure_is_a_server_error() {
	let drive = SpyDrive::default();
	let calls = drive.calls.clone();
	let (status, json) = get(app("od", drive, Arc::new(BrokenToken)), "/search?q=x").await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json, json!({ "error": "Failed to acquire access token." }));
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn drive_timeout_is_a_gateway_timeout() {
	let drive = SpyDrive { search_transport_timeout: Some(true), ..Default::default() };
	let (status, json) = get(app("od", drive, Arc::new(StaticToken)), "/search?q=x").await;

	assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
	assert_eq!(json, json!({ "error": "request timed out" }));
}

#[tokio::test]
async fn drive_connection_failure_is_a_bad_gateway() {
	let drive = SpyDrive { search_transport_timeout: Some(false), ..Default::default() };
	let (status, json) = get(app("od", drive, Arc::new(StaticToken)), "/search?q=x").await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(json, json!({ "error": "connection refused" }));
}

#[tokio::test]
async fn index_failure_is_a_server_error_without_fetches() {
	let drive = SpyDrive::default();
	let calls = drive.calls.clone();
	let (status, json) = get(
		app_with_index("lua", drive, Arc::new(StaticToken), Arc::new(BrokenIndex)),
		"/search?q=report",
	)
	.await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json, json!({ "error": "Failed to query search index." }));
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}
