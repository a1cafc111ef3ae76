use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use coursebook::courses::CourseRepository;
use coursebook::degrees::DegreeRepository;
use coursebook::resolve::{self, CodeClass};

const DEFAULT_SEARCH_LIMIT: usize = 50;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Directory of department JSON files.
    #[arg(long, default_value = "data/departments")]
    departments: PathBuf,

    /// Directory of degree-structure JSON files.
    #[arg(long, default_value = "data/degrees")]
    degrees: PathBuf,

    /// Static web assets directory (served if it exists).
    #[arg(long, default_value = "web/dist")]
    web_dir: PathBuf,
}

/// Repositories are built once at startup and shared immutably; requests
/// only ever read them, so no locking is involved.
#[derive(Clone)]
struct AppState {
    courses: Arc<CourseRepository>,
    degrees: Arc<DegreeRepository>,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    coursebook::logging::init()?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting coursebook-app");

    let department_set = coursebook::loader::load_departments(&args.departments)?;
    let degree_set = coursebook::loader::load_degrees(&args.degrees)?;
    let courses = Arc::new(CourseRepository::load(&department_set.sources));
    let degrees = Arc::new(DegreeRepository::new(
        degree_set.degrees,
        degree_set.failed_slugs,
    ));
    tracing::info!(
        courses = courses.len(),
        degrees = degrees.slugs().len(),
        source_issues = department_set.issues.len() + degree_set.issues.len(),
        "catalog loaded"
    );

    let state = AppState { courses, degrees };

    let mut app = Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/api/search", get(search_courses))
        .route("/api/courses", get(list_courses))
        .route("/api/courses/:code", get(get_course))
        .route("/api/degrees", get(list_degrees))
        .route("/api/degrees/:slug", get(get_degree))
        .route("/api/degrees/:slug/structure", get(get_degree_structure))
        .route("/api/graph", get(graph_feed))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let web_index = args.web_dir.join("index.html");
    if web_index.exists() {
        let static_files = ServeDir::new(args.web_dir).not_found_service(ServeFile::new(web_index));
        app = app.fallback_service(static_files);
    } else {
        app = app.fallback(|| async {
            Html(
                r#"<!doctype html>
<html>
  <head><meta charset="utf-8"><title>coursebook-app</title></head>
  <body>
    <h1>coursebook-app</h1>
    <p>web assets not found. Build the web app into <code>web/dist</code> or use the <code>/api</code> routes.</p>
  </body>
</html>
"#,
            )
        });
    }

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

async fn search_courses(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let results: Vec<_> = state
        .courses
        .search(&params.q, limit)
        .into_iter()
        .cloned()
        .collect();
    Json(results)
}

async fn list_courses(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.courses.all().to_vec())
}

/// An info-only entry synthesized for reserved-suffix project courses that
/// have no record of their own in the catalog.
#[derive(Debug, Serialize)]
struct SpecialCourseInfo {
    code: String,
    title: &'static str,
    credits: u32,
    info_only: bool,
}

async fn get_course(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    match resolve::classify_code(&code, &state.courses) {
        CodeClass::Resolved(course) => Json(course.clone()).into_response(),
        CodeClass::Special(special) => Json(SpecialCourseInfo {
            code: code.trim().to_owned(),
            title: special.title,
            credits: special.credits,
            info_only: true,
        })
        .into_response(),
        CodeClass::Placeholder | CodeClass::Missing => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn list_degrees(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.degrees.summaries())
}

async fn get_degree(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.degrees.get(&slug) {
        Some(data) => Json(data.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_degree_structure(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.degrees.get(&slug) {
        Some(data) => Json(resolve::degree_view(&slug, data, &state.courses)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Debug, Serialize)]
struct GraphNode {
    code: String,
    title: String,
    department: String,
}

#[derive(Debug, Serialize)]
struct GraphData {
    nodes: Vec<GraphNode>,
}

/// Feed for the network-graph page: one node per reconciled course.
async fn graph_feed(State(state): State<AppState>) -> impl IntoResponse {
    let nodes = state
        .courses
        .all()
        .iter()
        .map(|course| GraphNode {
            code: course.code.clone(),
            title: course.title.clone(),
            department: if course.department.trim().is_empty() {
                "Unknown".to_owned()
            } else {
                course.department.clone()
            },
        })
        .collect();
    Json(GraphData { nodes })
}
