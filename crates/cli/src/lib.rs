use anyhow::{Context as AnyhowContext, Result};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Form, Router,
};
use clap::{Args, Parser, Subcommand};
use decoder_protocol::{request_schema, serialize_json, ErrorEnvelope, ScoreRequest, ScoreResponse};
use decoder_scoring::{PageDraft, ScoreComposer};
use serde::Deserialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use crate::form::{FormAction, FormState};
use crate::render::{render_page, FormView};

mod form;
mod http_api;
mod render;
mod server_security;

const DEFAULT_MAX_PAGES: usize = 50;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "page-rank-decoder")]
#[command(about = "Heuristic page ranking score calculator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the page form and the JSON API over HTTP
    Serve(ServeArgs),

    /// Score a JSON request and print the JSON response
    Score(ScoreArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address (default: $PAGE_RANK_DECODER_BIND or 127.0.0.1:8050)
    #[arg(long)]
    bind: Option<String>,

    /// Allow binding to non-loopback addresses
    #[arg(long)]
    public: bool,

    /// Maximum number of page groups per submission
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,
}

#[derive(Args)]
struct ScoreArgs {
    /// Inline JSON payload (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to file containing JSON payload
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print JSON response
    #[arg(long)]
    pretty: bool,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // stdout carries the JSON response
    if matches!(cli.command, Commands::Score(_)) {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Serve(args) => serve_http(args).await?,
        Commands::Score(args) => run_score(args)?,
    }

    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<()> {
    let raw = read_payload(&args)?;
    let response = match serde_json::from_str::<ScoreRequest>(&raw) {
        Ok(request) => {
            let pages = request.into_submissions();
            log::debug!("scoring {} pages", pages.len());
            ScoreResponse::from_outcomes(&ScoreComposer::new().score_all(&pages))
        }
        Err(err) => ScoreResponse::rejected(ErrorEnvelope::new(
            "invalid_request",
            format!("Invalid JSON request: {err}"),
        )),
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serialize_json(&response)?
    };
    print_stdout(&output)?;

    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn read_payload(args: &ScoreArgs) -> Result<String> {
    if let Some(raw) = &args.json {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Score request is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}

async fn serve_http(args: ServeArgs) -> Result<()> {
    if args.max_pages == 0 {
        anyhow::bail!("--max-pages must be at least 1");
    }
    let bind = server_security::resolve_bind(args.bind.as_deref());
    let addrs = server_security::resolve_guarded_bind_addrs(&bind, args.public).await?;

    let state = Arc::new(HttpState::new(args.max_pages));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    let local_addr = listener.local_addr()?;
    let base_url = format!("http://{local_addr}");

    print_stdout(&format!("Serving page form: {base_url}/"))?;
    print_stdout(&format!("Score API: {base_url}/api/score"))?;
    print_stdout(&format!("Health endpoint: {base_url}/health"))?;
    if args.public {
        let addrs = addrs
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        print_stdout(&format!(
            "Public bind enabled (--public). Resolved addresses: {addrs}"
        ))?;
    }

    print_stdout(&format!(
        "Try: curl -X POST {base_url}/api/score -H 'Content-Type: application/json' -d '{{\"pages\":[{{\"title\":\"SEO Tips\",\"age_days\":10,\"keyword\":\"seo\"}}]}}'"
    ))?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Clone)]
struct HttpState {
    composer: ScoreComposer,
    max_pages: usize,
}

impl HttpState {
    fn new(max_pages: usize) -> Self {
        Self {
            composer: ScoreComposer::new(),
            max_pages,
        }
    }
}

fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/", get(form_page).post(form_submit))
        .route("/api/score", post(api_score))
        .route("/api/schema", get(api_schema))
        .route("/health", get(http_health))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct FormQuery {
    pages: Option<usize>,
}

async fn form_page(
    State(state): State<Arc<HttpState>>,
    Query(query): Query<FormQuery>,
) -> Result<Response, StatusCode> {
    let count = query.pages.unwrap_or(1).clamp(1, state.max_pages);
    let drafts = vec![PageDraft::new(); count];
    let html = render_page(&FormView {
        drafts: &drafts,
        ..FormView::default()
    });
    http_api::html_response(StatusCode::OK, html)
}

async fn form_submit(
    State(state): State<Arc<HttpState>>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, StatusCode> {
    let mut form = FormState::from_fields(&fields);
    let limit_notice = format!("At most {} pages per submission.", state.max_pages);

    if form.truncate_to(state.max_pages) {
        log::warn!("form: rejected post with more than {} page groups", state.max_pages);
        let html = render_page(&FormView {
            drafts: &form.drafts,
            notice: Some(limit_notice.as_str()),
            ..FormView::default()
        });
        return http_api::html_response(StatusCode::UNPROCESSABLE_ENTITY, html);
    }

    match form.action {
        FormAction::AddPage => {
            let notice = (!form.add_page(state.max_pages)).then_some(limit_notice.as_str());
            log::info!("form: add page ({} groups)", form.drafts.len());
            let html = render_page(&FormView {
                drafts: &form.drafts,
                notice,
                ..FormView::default()
            });
            http_api::html_response(StatusCode::OK, html)
        }
        FormAction::Submit => match form.validate() {
            Ok(pages) => {
                let outcomes = state.composer.score_all(&pages);
                let failed = outcomes.iter().filter(|outcome| outcome.is_err()).count();
                log::info!("form: scored {} pages ({failed} not scored)", pages.len());
                let html = render_page(&FormView {
                    drafts: &form.drafts,
                    results: Some((pages.as_slice(), outcomes.as_slice())),
                    ..FormView::default()
                });
                http_api::html_response(StatusCode::OK, html)
            }
            Err(errors) => {
                log::warn!("form: rejected submission with {} invalid fields", errors.len());
                let html = render_page(&FormView {
                    drafts: &form.drafts,
                    errors: &errors,
                    ..FormView::default()
                });
                http_api::html_response(StatusCode::UNPROCESSABLE_ENTITY, html)
            }
        },
    }
}

async fn api_score(
    State(state): State<Arc<HttpState>>,
    body: Bytes,
) -> Result<Response, StatusCode> {
    let request: ScoreRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let response =
                http_api::error_response("invalid_request", format!("Invalid JSON request: {err}"));
            return http_api::build_response(StatusCode::BAD_REQUEST, &response);
        }
    };
    if request.pages.len() > state.max_pages {
        let response = http_api::error_response(
            "invalid_request",
            format!(
                "Too many pages: {} (limit {})",
                request.pages.len(),
                state.max_pages
            ),
        );
        return http_api::build_response(StatusCode::BAD_REQUEST, &response);
    }

    let pages = request.into_submissions();
    let outcomes = state.composer.score_all(&pages);
    log::info!("api: scored {} pages", pages.len());
    http_api::build_response(StatusCode::OK, &ScoreResponse::from_outcomes(&outcomes))
}

async fn api_schema() -> Result<Response, StatusCode> {
    let schema = request_schema().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    http_api::json_response(StatusCode::OK, &schema)
}

async fn http_health() -> Result<Response, StatusCode> {
    let report = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    http_api::json_response(StatusCode::OK, &report)
}
