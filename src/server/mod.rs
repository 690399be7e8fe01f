//! HTTP server: post lookups, feed, sitemap, error reports and legacy redirects

use anyhow::Result;
use axum::{
    body::{Body, Bytes},
    extract::{Path, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{ContentLoader, PostRecord, RenderMode};
use crate::generator::{atom_feed, sitemap, XML_CONTENT_TYPE};
use crate::meta::{ContentRegistry, PostContent, VirtualModule};
use crate::redirects::RedirectTable;
use crate::report::{client_error, CapturedError, ErrorReporter, TracingReporter};
use crate::Blog;

/// Post data materialised once, at start-up
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub registry: ContentRegistry,
    pub redirects: RedirectTable,
}

impl Snapshot {
    /// Run one HTML extraction pass and derive everything from it
    pub async fn build(loader: &ContentLoader, config: &SiteConfig) -> crate::Result<Self> {
        let registry = ContentRegistry::build(loader).await?;
        let redirects = RedirectTable::new(&config.redirects, &registry.metadata());
        Ok(Self {
            registry,
            redirects,
        })
    }
}

/// Where request handlers get post data from
#[derive(Debug, Clone)]
pub enum MetaSource {
    /// Precomputed at start-up
    Snapshot(Arc<Snapshot>),
    /// Recomputed from the posts directory on every request (dev mode)
    Live(ContentLoader),
}

impl MetaSource {
    async fn post_content(&self, slug: &str) -> crate::Result<PostContent> {
        match self {
            MetaSource::Snapshot(snapshot) => snapshot.registry.get(slug),
            MetaSource::Live(loader) => loader.load_post(slug).await.map(PostContent::from),
        }
    }

    async fn records(&self, module: VirtualModule) -> crate::Result<Vec<PostRecord>> {
        match (self, module) {
            (MetaSource::Snapshot(snapshot), VirtualModule::PostMeta) => {
                Ok(snapshot.registry.metadata())
            }
            (MetaSource::Snapshot(snapshot), VirtualModule::PostMetaWithHtml) => {
                Ok(snapshot.registry.records().to_vec())
            }
            (MetaSource::Live(loader), module) => module.records(loader).await,
        }
    }

    async fn redirects(&self, config: &SiteConfig) -> crate::Result<RedirectTable> {
        match self {
            MetaSource::Snapshot(snapshot) => Ok(snapshot.redirects.clone()),
            MetaSource::Live(loader) => {
                let posts = loader.load_posts(RenderMode::Metadata).await?;
                Ok(RedirectTable::new(&config.redirects, &posts))
            }
        }
    }
}

/// Server state
pub struct ServerState {
    pub config: SiteConfig,
    pub source: MetaSource,
    pub reporter: Arc<dyn ErrorReporter>,
}

impl ServerState {
    pub fn new(config: SiteConfig, source: MetaSource, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            config,
            source,
            reporter,
        }
    }

    /// Map a pipeline error to a response, reporting anything but "not found"
    fn error_response(&self, err: crate::Error) -> Response {
        if err.is_not_found() {
            return (StatusCode::NOT_FOUND, "Not found").into_response();
        }
        tracing::error!("Request failed: {}", err);
        self.reporter.capture(&CapturedError::new(err.to_string()));
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    let feed_path = format!("/{}", state.config.feed.path.trim_start_matches('/'));

    let mut app: Router<Arc<ServerState>> = Router::new()
        .route("/blog/:post", get(post_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/report-error", post(report_error_handler));
    for module in VirtualModule::ALL {
        app = app.route(
            &format!("/{}", module.file_name()),
            get(move |state: State<Arc<ServerState>>| virtual_module_handler(state, module)),
        );
    }

    app.route(&feed_path, get(feed_handler))
        .fallback(fallback_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            redirect_on_not_found,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16, dev: bool) -> Result<()> {
    let loader = blog.loader();
    let source = if dev {
        tracing::info!("Dev mode: post metadata is recomputed on every request");
        MetaSource::Live(loader)
    } else {
        let snapshot = Snapshot::build(&loader, &blog.config).await?;
        tracing::info!("Loaded {} posts", snapshot.registry.len());
        MetaSource::Snapshot(Arc::new(snapshot))
    };

    let state = Arc::new(ServerState::new(
        blog.config.clone(),
        source,
        Arc::new(TracingReporter),
    ));
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Post route loader: metadata plus rendered body for one slug
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.source.post_content(&slug).await {
        Ok(content) => Json(content).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// Atom feed
async fn feed_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.source.records(VirtualModule::PostMetaWithHtml).await {
        Ok(posts) => xml_response(&state.config, atom_feed(&state.config, &posts, Utc::now())),
        Err(e) => state.error_response(e),
    }
}

/// Sitemap
async fn sitemap_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.source.records(VirtualModule::PostMeta).await {
        Ok(posts) => xml_response(&state.config, sitemap(&state.config, &posts)),
        Err(e) => state.error_response(e),
    }
}

/// Virtual module contents as JSON
async fn virtual_module_handler(
    State(state): State<Arc<ServerState>>,
    module: VirtualModule,
) -> Response {
    match state.source.records(module).await {
        Ok(posts) => Json(posts).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// Client-side error reports, forwarded to the tracker; always succeeds
async fn report_error_handler(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(payload) => {
            let error = payload
                .get("error")
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            state.reporter.capture(&client_error(&error));
        }
        Err(e) => tracing::debug!("Ignoring malformed error report: {}", e),
    }

    Json(serde_json::json!({ "success": true })).into_response()
}

async fn fallback_handler() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// Turn 404s on legacy paths into redirects
async fn redirect_on_not_found(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let origin = request_origin(request.headers(), &state.config);
    let url = format!("{}{}", origin, request.uri());

    let response = next.run(request).await;
    if response.status() != StatusCode::NOT_FOUND {
        return response;
    }

    let table = match state.source.redirects(&state.config).await {
        Ok(table) => table,
        Err(e) => {
            tracing::error!("Could not build redirect table: {}", e);
            state.reporter.capture(&CapturedError::new(e.to_string()));
            return response;
        }
    };

    if let Some(redirect) = table.find(&path) {
        let status =
            StatusCode::from_u16(redirect.status_code()).unwrap_or(StatusCode::MOVED_PERMANENTLY);
        return redirect_response(status, &format!("{}{}", origin, redirect.to));
    }

    match without_trailing_slash(&path) {
        Some(trimmed) => {
            let mut location = format!("{}{}", origin, trimmed);
            if let Some(query) = &query {
                location.push('?');
                location.push_str(query);
            }
            redirect_response(StatusCode::PERMANENT_REDIRECT, &location)
        }
        None => {
            state
                .reporter
                .capture(&CapturedError::new(format!("Page not found: {}", url)));
            response
        }
    }
}

/// `/blog/post/` → `/blog/post`; `None` for `/` and paths without one
fn without_trailing_slash(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    (trimmed.len() < path.len() && !trimmed.is_empty()).then_some(trimmed)
}

/// Scheme and host the client used, falling back to the configured site URL
fn request_origin(headers: &HeaderMap, config: &SiteConfig) -> String {
    let host = headers.get(header::HOST).and_then(|h| h.to_str().ok());
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http");

    match host {
        Some(host) => format!("{}://{}", proto, host),
        None => config.base_url().to_string(),
    }
}

fn redirect_response(status: StatusCode, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(location) => {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = status;
            response.headers_mut().insert(header::LOCATION, location);
            response
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

fn xml_response(config: &SiteConfig, body: String) -> Response {
    let cache_control = HeaderValue::from_str(&config.feed.cache_control)
        .unwrap_or_else(|_| HeaderValue::from_static("max-age=0, s-maxage=3600"));

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE)),
            (header::CACHE_CONTROL, cache_control),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NoopReporter;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingReporter {
        captured: Mutex<Vec<CapturedError>>,
    }

    impl ErrorReporter for RecordingReporter {
        fn capture(&self, error: &CapturedError) {
            self.captured.lock().unwrap().push(error.clone());
        }
    }

    fn snapshot_state(posts: Vec<PostRecord>, reporter: Arc<dyn ErrorReporter>) -> Arc<ServerState> {
        let config = SiteConfig::default();
        let redirects = RedirectTable::new(&config.redirects, &posts);
        let snapshot = Snapshot {
            registry: ContentRegistry::new(posts),
            redirects,
        };
        Arc::new(ServerState::new(
            config,
            MetaSource::Snapshot(Arc::new(snapshot)),
            reporter,
        ))
    }

    fn post(slug: &str) -> PostRecord {
        PostRecord::new(slug, "2023-01-01", 1, "<p>hi</p>".to_string())
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_post_handler_found() {
        let state = snapshot_state(vec![post("hello-world")], Arc::new(NoopReporter));
        let response = post_handler(State(state), Path("hello-world".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(r#""slug":"hello-world""#));
        assert!(body.contains(r#""html":"<p>hi</p>""#));
    }

    #[tokio::test]
    async fn test_post_handler_not_found_is_not_reported() {
        let reporter = Arc::new(RecordingReporter::default());
        let state = snapshot_state(vec![post("hello-world")], reporter.clone());
        let response = post_handler(State(state), Path("missing".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(reporter.captured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_feed_headers() {
        let state = snapshot_state(vec![post("hello-world")], Arc::new(NoopReporter));
        let response = feed_handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            HeaderValue::from_static("application/xml")
        );
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            HeaderValue::from_static("max-age=0, s-maxage=3600")
        );
        let body = body_string(response).await;
        assert!(body.contains("<![CDATA[ <p>hi</p> ]]>"));
    }

    #[tokio::test]
    async fn test_sitemap_handler() {
        let state = snapshot_state(vec![post("hello-world")], Arc::new(NoopReporter));
        let response = sitemap_handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("<loc>https://pzuraq.com/blog/hello-world</loc>"));
    }

    #[tokio::test]
    async fn test_report_error_prefixes_and_succeeds() {
        let reporter = Arc::new(RecordingReporter::default());
        let state = snapshot_state(Vec::new(), reporter.clone());

        let body = Bytes::from_static(br#"{"error":{"message":"oops","stack":"s"}}"#);
        let response = report_error_handler(State(state.clone()), body).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"success":true}"#);

        let response = report_error_handler(State(state), Bytes::from_static(b"not json")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let captured = reporter.captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].message, "CLIENT ERROR: oops");
        assert_eq!(captured[0].stack.as_deref(), Some("s"));
    }

    #[tokio::test]
    async fn test_live_source_missing_directory_is_server_error() {
        let reporter = Arc::new(RecordingReporter::default());
        let state = Arc::new(ServerState::new(
            SiteConfig::default(),
            MetaSource::Live(ContentLoader::with_dir("/definitely/not/here", 225)),
            reporter.clone(),
        ));
        let response = sitemap_handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reporter.captured.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_request_origin() {
        let config = SiteConfig::default();
        let mut headers = HeaderMap::new();
        assert_eq!(request_origin(&headers, &config), "https://www.pzuraq.com");

        headers.insert(header::HOST, HeaderValue::from_static("localhost:4000"));
        assert_eq!(request_origin(&headers, &config), "http://localhost:4000");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(request_origin(&headers, &config), "https://localhost:4000");
    }

    #[test]
    fn test_redirect_response() {
        let response = redirect_response(StatusCode::FOUND, "http://localhost/blog/a");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            HeaderValue::from_static("http://localhost/blog/a")
        );
    }

    #[test]
    fn test_without_trailing_slash() {
        assert_eq!(without_trailing_slash("/blog/a/"), Some("/blog/a"));
        assert_eq!(without_trailing_slash("/blog/a//"), Some("/blog/a"));
        assert_eq!(without_trailing_slash("/blog/a"), None);
        assert_eq!(without_trailing_slash("/"), None);
        assert_eq!(without_trailing_slash("//"), None);
    }
}
