use actix_web::http::header;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use serde::Deserialize;

pub mod page;

use crate::config::ServerConfig;
use crate::output::DOWNLOAD_FILE_NAME;
use crate::sources::TranscriptSource;
use crate::transcript::TranscriptPipeline;
use page::PageView;

#[derive(Debug, Deserialize)]
pub struct TranscriptForm {
    #[serde(default)]
    pub url: String,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub transcript: String,
}

/// Register the form routes for a pipeline stored as app data
pub fn routes<S: TranscriptSource + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(index))
            .route(web::post().to(submit::<S>)),
    )
    .service(web::resource("/download").route(web::post().to(download)));
}

/// Serve the web form until the process is stopped
pub async fn run<S: TranscriptSource + 'static>(
    config: &ServerConfig,
    pipeline: TranscriptPipeline<S>,
) -> crate::Result<()> {
    let pipeline = web::Data::new(pipeline);
    let bind_addr = config.bind_addr.clone();

    tracing::info!("Serving transcript form on http://{}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(pipeline.clone())
            .configure(routes::<S>)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server
        .bind(bind_addr.as_str())
        .with_context(|| format!("Failed to bind {}", bind_addr))?
        .run()
        .await
        .context("Web server stopped with an error")
}

fn html(view: &PageView) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page::render(view))
}

pub async fn index() -> impl Responder {
    html(&PageView::default())
}

pub async fn submit<S: TranscriptSource + 'static>(
    form: web::Form<TranscriptForm>,
    pipeline: web::Data<TranscriptPipeline<S>>,
) -> impl Responder {
    let form = form.into_inner();
    let url = form.url.trim().to_string();
    tracing::info!("Transcript request: url={} language={:?}", url, form.language);

    // Languages stay on the page when a listed video fails later on
    let mut languages = Vec::new();
    let result = match pipeline.list(&url).await {
        Ok(listing) => {
            languages = listing.languages();
            pipeline.fetch(listing, form.language.as_deref()).await
        }
        Err(err) => Err(err),
    };

    let view = match result {
        Ok(outcome) => PageView {
            url,
            languages: outcome.languages,
            selected_language: Some(outcome.selected_language),
            transcript: Some(outcome.transcript),
            error: None,
        },
        Err(err) => {
            tracing::warn!("Transcript request failed: {}", err);
            PageView {
                url,
                languages,
                selected_language: form.language,
                transcript: None,
                error: Some(err.user_message()),
            }
        }
    };

    html(&view)
}

pub async fn download(form: web::Form<DownloadForm>) -> impl Responder {
    let transcript = form.into_inner().transcript;
    if transcript.is_empty() {
        return HttpResponse::BadRequest()
            .content_type("text/plain; charset=utf-8")
            .body("No transcript to download.");
    }

    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .append_header((
            header::CONTENT_DISPOSITION,
            format!(r#"attachment; filename="{}""#, DOWNLOAD_FILE_NAME),
        ))
        .append_header((header::CACHE_CONTROL, "no-store"))
        .body(transcript)
}
