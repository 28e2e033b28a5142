use std::{
   path::{Component, Path, PathBuf},
   sync::Arc,
};

use anyhow::{Context, Result};
use axum::{
   Extension, Router,
   extract::Query,
   http::{StatusCode, Uri, header},
   response::{IntoResponse, Response},
   routing::{any, get},
};
use console::style;
use serde::Serialize;
use tokio::{net::TcpListener, signal};

use crate::{
   catalog::Catalog, config, loader, search::SearchEngine, store::DatasetStore,
   types::ScoredResult,
};

const JSON_HEADERS: [(header::HeaderName, &str); 4] = [
   (header::CONTENT_TYPE, "application/json; charset=utf-8"),
   (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
   (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
   (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// Result limits applied to `limit` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
   pub default: usize,
   pub max:     usize,
}

impl Limits {
   pub fn from_config(cfg: &config::Config) -> Self {
      Self { default: cfg.default_limit, max: cfg.max_limit }
   }

   /// Absent or unparseable values fall back to the default, negative values
   /// mean zero and anything above the maximum is clamped.
   pub fn resolve(self, raw: Option<&str>) -> usize {
      match raw.map(str::trim).filter(|s| !s.is_empty()).map(str::parse::<i64>) {
         None | Some(Err(_)) => self.default.min(self.max),
         Some(Ok(n)) if n <= 0 => 0,
         Some(Ok(n)) => usize::try_from(n).map_or(self.max, |n| n.min(self.max)),
      }
   }
}

#[derive(Debug, Clone)]
pub struct AppState {
   search:   SearchEngine,
   catalog:  Catalog,
   limits:   Limits,
   site_dir: PathBuf,
}

impl AppState {
   pub fn new(store: Arc<DatasetStore>, limits: Limits, site_dir: PathBuf) -> Self {
      Self {
         search: SearchEngine::new(Arc::clone(&store)),
         catalog: Catalog::new(store),
         limits,
         site_dir,
      }
   }
}

/// Raw query pairs. Repeated keys are kept so the first value can win instead
/// of the whole request being rejected.
type QueryPairs = Vec<(String, String)>;

#[derive(Debug, Default)]
pub struct SearchParams {
   pub q:     Option<String>,
   pub limit: Option<String>,
}

impl SearchParams {
   fn from_pairs(pairs: &[(String, String)]) -> Self {
      Self { q: first_value(pairs, "q"), limit: first_value(pairs, "limit") }
   }
}

#[derive(Debug, Default)]
pub struct CategoryParams {
   pub category: Option<String>,
   pub limit:    Option<String>,
}

impl CategoryParams {
   fn from_pairs(pairs: &[(String, String)]) -> Self {
      Self { category: first_value(pairs, "category"), limit: first_value(pairs, "limit") }
   }
}

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
   pairs
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.clone())
}

#[derive(Debug, Serialize)]
struct ApiError {
   error: String,
   code:  u16,
}

pub struct ServeArgs {
   pub data_dir: Option<PathBuf>,
   pub site_dir: Option<PathBuf>,
   pub host:     Option<String>,
   pub port:     Option<u16>,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
   let cfg = config::get();
   let data_dir = args.data_dir.unwrap_or_else(|| cfg.data_dir.clone());
   let site_dir = args.site_dir.unwrap_or_else(|| cfg.site_dir.clone());
   let host = args.host.unwrap_or_else(|| cfg.host.clone());
   let port = args.port.unwrap_or(cfg.port);

   if !data_dir.is_dir() {
      anyhow::bail!(
         "data directory not found: {} (the CSV files must live there)",
         data_dir.display()
      );
   }
   if !site_dir.join("index.html").exists() {
      tracing::warn!(
         site_dir = %site_dir.display(),
         "index.html not found, static pages will return 404"
      );
   }

   let store = Arc::new(loader::load_store(&cfg.data_files(Some(&data_dir))));
   let app = router(AppState::new(store, Limits::from_config(cfg), site_dir));

   let listener = TcpListener::bind((host.as_str(), port))
      .await
      .with_context(|| format!("failed to bind {host}:{port}"))?;

   let base = format!("http://{host}:{port}");
   println!("{}", style("Starting edunari server...").green().bold());
   println!("Server: {}", style(&base).cyan());
   println!("API Search: {}", style(format!("{base}/api/search?q=chocolate")).dim());
   println!("API Status: {}", style(format!("{base}/api/status")).dim());
   println!("{}", style("Press Ctrl+C to stop").dim());
   tracing::info!(%base, "http server listening");

   axum::serve(listener, app)
      .with_graceful_shutdown(shutdown_signal())
      .await
      .context("http server failed")?;

   println!("{}", style("Server stopped").green());
   Ok(())
}

async fn shutdown_signal() {
   if let Err(e) = signal::ctrl_c().await {
      tracing::error!("failed to listen for ctrl-c: {e}");
      std::future::pending::<()>().await;
   }
   println!("\n{}", style("Shutting down...").yellow());
}

pub fn router(state: AppState) -> Router {
   Router::new()
      .route("/api/status", get(handle_status))
      .route("/api/search", get(handle_search))
      .route("/api/entrepreneurs", get(handle_entrepreneurs))
      .route("/api/products", get(handle_products))
      .route("/api/services", get(handle_services))
      .route("/api", any(handle_api_not_found))
      .route("/api/", any(handle_api_not_found))
      .route("/api/*rest", any(handle_api_not_found))
      .fallback(handle_static)
      .layer(Extension(Arc::new(state)))
}

async fn handle_status(Extension(state): Extension<Arc<AppState>>) -> Response {
   let catalog = state.catalog.clone();
   run_view("Error obteniendo estadísticas", move || catalog.statistics()).await
}

async fn handle_search(
   Extension(state): Extension<Arc<AppState>>,
   Query(pairs): Query<QueryPairs>,
) -> Response {
   let params = SearchParams::from_pairs(&pairs);
   let query = params.q.as_deref().unwrap_or_default().trim().to_string();
   if query.is_empty() {
      return json_response(StatusCode::OK, &Vec::<ScoredResult>::new());
   }

   let limit = state.limits.resolve(params.limit.as_deref());
   let engine = state.search.clone();
   run_view("Error en búsqueda", move || {
      let results = engine.search(&query, limit);
      tracing::info!(query = %query, results = results.len(), "search");
      results
   })
   .await
}

async fn handle_entrepreneurs(Extension(state): Extension<Arc<AppState>>) -> Response {
   let catalog = state.catalog.clone();
   run_view("Error obteniendo emprendimientos", move || catalog.ventures().to_vec()).await
}

async fn handle_products(
   Extension(state): Extension<Arc<AppState>>,
   Query(pairs): Query<QueryPairs>,
) -> Response {
   let params = CategoryParams::from_pairs(&pairs);
   handle_category(&state, params, "Error obteniendo productos", Catalog::products_by_category)
      .await
}

async fn handle_services(
   Extension(state): Extension<Arc<AppState>>,
   Query(pairs): Query<QueryPairs>,
) -> Response {
   let params = CategoryParams::from_pairs(&pairs);
   handle_category(&state, params, "Error obteniendo servicios", Catalog::services_by_category)
      .await
}

/// Without a category the answer is an empty list, never the whole table.
async fn handle_category(
   state: &AppState,
   params: CategoryParams,
   failure: &'static str,
   view: fn(&Catalog, &str, usize) -> Vec<ScoredResult>,
) -> Response {
   let category = params
      .category
      .as_deref()
      .unwrap_or_default()
      .trim()
      .to_string();
   if category.is_empty() {
      return json_response(StatusCode::OK, &Vec::<ScoredResult>::new());
   }

   let limit = state.limits.resolve(params.limit.as_deref());
   let catalog = state.catalog.clone();
   run_view(failure, move || view(&catalog, &category, limit)).await
}

async fn handle_api_not_found(uri: Uri) -> Response {
   tracing::debug!(path = uri.path(), "unknown api endpoint");
   error_response(StatusCode::NOT_FOUND, "Endpoint no encontrado")
}

/// Runs an engine call off the async workers. A panic inside the call
/// surfaces as a 500 for this request only.
async fn run_view<T, F>(failure: &'static str, view: F) -> Response
where
   F: FnOnce() -> T + Send + 'static,
   T: Serialize + Send + 'static,
{
   match tokio::task::spawn_blocking(view).await {
      Ok(body) => json_response(StatusCode::OK, &body),
      Err(e) => {
         tracing::error!("{failure}: {e}");
         error_response(StatusCode::INTERNAL_SERVER_ERROR, failure)
      },
   }
}

fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
   match serde_json::to_vec(body) {
      Ok(bytes) => (status, JSON_HEADERS, bytes).into_response(),
      Err(e) => {
         tracing::error!("failed to serialize response: {e}");
         (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
      },
   }
}

fn error_response(status: StatusCode, message: &str) -> Response {
   json_response(status, &ApiError { error: message.to_string(), code: status.as_u16() })
}

async fn handle_static(Extension(state): Extension<Arc<AppState>>, uri: Uri) -> Response {
   let Some(mut path) = resolve_static_path(&state.site_dir, uri.path()) else {
      return (StatusCode::NOT_FOUND, "Not Found").into_response();
   };

   if tokio::fs::metadata(&path)
      .await
      .is_ok_and(|meta| meta.is_dir())
   {
      path.push("index.html");
   }

   match tokio::fs::read(&path).await {
      Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response(),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
         (StatusCode::NOT_FOUND, "Not Found").into_response()
      },
      Err(e) => {
         tracing::warn!(path = %path.display(), "failed to read static file: {e}");
         (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
      },
   }
}

/// Maps a request path onto `root`, refusing anything that climbs out of it.
///
/// Segments are percent-decoded one at a time; a decoded segment must still be
/// a single plain file name, so `%2e%2e` or an encoded `/` is rejected.
fn resolve_static_path(root: &Path, request_path: &str) -> Option<PathBuf> {
   let mut path = root.to_path_buf();
   for segment in request_path.split('/') {
      let segment = urlencoding::decode(segment).ok()?;
      if segment.is_empty() || segment == "." {
         continue;
      }
      if segment.contains(['/', '\\', '\0']) {
         return None;
      }

      let mut components = Path::new(&*segment).components();
      match (components.next(), components.next()) {
         (Some(Component::Normal(name)), None) => path.push(name),
         _ => return None,
      }
   }
   Some(path)
}

fn content_type(path: &Path) -> &'static str {
   let extension = path
      .extension()
      .and_then(|e| e.to_str())
      .map(str::to_ascii_lowercase);
   match extension.as_deref() {
      Some("html" | "htm") => "text/html; charset=utf-8",
      Some("css") => "text/css; charset=utf-8",
      Some("js") => "text/javascript; charset=utf-8",
      Some("json") => "application/json",
      Some("csv") => "text/csv; charset=utf-8",
      Some("txt") => "text/plain; charset=utf-8",
      Some("svg") => "image/svg+xml",
      Some("png") => "image/png",
      Some("jpg" | "jpeg") => "image/jpeg",
      Some("gif") => "image/gif",
      Some("webp") => "image/webp",
      Some("ico") => "image/x-icon",
      Some("woff2") => "font/woff2",
      _ => "application/octet-stream",
   }
}
