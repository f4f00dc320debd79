//! `/collections` resource routes.

use crate::error::ApiError;
use actix_web::{web, HttpResponse};
use log::debug;
use serde::Deserialize;
use serde_json::json;
use wbdata_core::{CollectionId, CollectionService, ImportOutcome};

/// Body returned by the collection index when nothing has been imported.
pub const EMPTY_COLLECTIONS_MESSAGE: &str = "No collections found. Try importing a new one!";

type SharedService = web::Data<CollectionService>;

#[derive(Debug, Default, Deserialize)]
struct ImportParams {
    indicator_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct YearParams {
    q: Option<String>,
}

/// Registers all collection routes.
///
/// The application must provide `web::Data<CollectionService>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/collections", "/collections/"])
            .route(web::get().to(list_collections))
            .route(web::post().to(import_collection)),
    )
    .service(
        web::resource("/collections/{id}")
            .route(web::get().to(get_collection))
            .route(web::delete().to(delete_collection)),
    )
    .service(web::resource("/collections/{id}/{year}").route(web::get().to(year_entries)))
    .service(
        web::resource("/collections/{id}/{year}/{country}").route(web::get().to(country_entry)),
    );
}

async fn list_collections(service: SharedService) -> Result<HttpResponse, ApiError> {
    let collections = web::block(move || service.list_collections()).await??;
    if collections.is_empty() {
        return Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(EMPTY_COLLECTIONS_MESSAGE));
    }
    Ok(HttpResponse::Ok().json(collections))
}

async fn import_collection(
    service: SharedService,
    query: web::Query<ImportParams>,
    form: Option<web::Form<ImportParams>>,
) -> Result<HttpResponse, ApiError> {
    let indicator = query
        .into_inner()
        .indicator_id
        .or_else(|| form.and_then(|form| form.into_inner().indicator_id))
        .unwrap_or_default();
    debug!("event=http_request module=http route=import_collection indicator={indicator}");

    let outcome = web::block(move || service.import_collection(&indicator)).await??;
    Ok(match outcome {
        ImportOutcome::Created(detail) => HttpResponse::Created().json(detail),
        ImportOutcome::Existing(detail) => HttpResponse::Ok().json(detail),
    })
}

async fn get_collection(
    service: SharedService,
    path: web::Path<CollectionId>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let detail = web::block(move || service.get_collection(id)).await??;
    Ok(HttpResponse::Ok().json(detail))
}

async fn delete_collection(
    service: SharedService,
    path: web::Path<CollectionId>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    web::block(move || service.delete_collection(id)).await??;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Collection = {id} is removed from the database!")
    })))
}

async fn country_entry(
    service: SharedService,
    path: web::Path<(CollectionId, i32, String)>,
) -> Result<HttpResponse, ApiError> {
    let (id, year, country) = path.into_inner();
    let value = web::block(move || service.get_entry(id, year, &country)).await??;
    Ok(HttpResponse::Ok().json(value))
}

async fn year_entries(
    service: SharedService,
    path: web::Path<(CollectionId, i32)>,
    query: web::Query<YearParams>,
) -> Result<HttpResponse, ApiError> {
    let (id, year) = path.into_inner();
    let filter = query.into_inner().q;
    let entries = web::block(move || service.entries_for_year(id, year, filter.as_deref())).await??;
    Ok(HttpResponse::Ok().json(entries))
}
