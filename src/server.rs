use actix_web::http::header::{self, ContentType};
use actix_web::{get, middleware, web, App, HttpResponse, HttpServer, Responder};
use tracing::info;

use crate::config::ServeConfig;
use crate::snapshot::SnapshotFile;

const DASHBOARD: &str = include_str!("../static/index.html");

/// Current snapshot, verbatim, or `[]` when there is nothing usable yet.
#[get("/packets")]
async fn packets(snapshot: web::Data<SnapshotFile>) -> impl Responder {
    let body = snapshot.read_or_empty().await;

    HttpResponse::Ok()
        .content_type(ContentType::json())
        .insert_header((header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"))
        .insert_header((header::PRAGMA, "no-cache"))
        .insert_header((header::EXPIRES, "0"))
        .body(body)
}

#[get("/")]
async fn dashboard() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(DASHBOARD)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(packets).service(dashboard);
}

pub async fn run(config: ServeConfig) -> std::io::Result<()> {
    let snapshot = web::Data::new(SnapshotFile::new(&config.snapshot));
    info!(
        bind = %config.bind,
        snapshot = %config.snapshot.display(),
        "serving packet snapshot"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(snapshot.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(config.bind.as_str())?
    .run()
    .await
}
