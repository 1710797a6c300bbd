//! REST handlers for point operations

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::PointResult;
use crate::models::{Point, QueryPoints, ScoredPoint, SearchPoints, UpsertPoint};
use crate::repository::VectorStore;
use crate::service::PointService;

/// Response for search operations: the single best-matching point id
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchMatchResponse {
    pub id: String,
}

/// Upsert a point, deriving the embedding from text via keyword extraction
/// when no vector is supplied
#[utoipa::path(
    post,
    path = "/collections/{name}/upsert",
    tag = "points",
    params(
        ("name" = String, Path, description = "Collection name")
    ),
    request_body = UpsertPoint,
    responses(
        (status = 200, description = "Point upserted", body = Point),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Collection not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upsert<S: VectorStore>(
    State(service): State<Arc<PointService<S>>>,
    Path(name): Path<String>,
    Json(request): Json<UpsertPoint>,
) -> PointResult<Json<Point>> {
    let point = service.upsert_with_extraction(&name, request).await?;
    Ok(Json(point))
}

/// Upsert a point without the keyword-extraction stage
#[utoipa::path(
    post,
    path = "/collections/{name}/upsert/direct",
    tag = "points",
    params(
        ("name" = String, Path, description = "Collection name")
    ),
    request_body = UpsertPoint,
    responses(
        (status = 200, description = "Point upserted", body = Point),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Collection not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upsert_direct<S: VectorStore>(
    State(service): State<Arc<PointService<S>>>,
    Path(name): Path<String>,
    Json(request): Json<UpsertPoint>,
) -> PointResult<Json<Point>> {
    let point = service.upsert_direct(&name, request).await?;
    Ok(Json(point))
}

/// Get a point by id
#[utoipa::path(
    get,
    path = "/collections/{name}/points/{id}",
    tag = "points",
    params(
        ("name" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Point id")
    ),
    responses(
        (status = 200, description = "Point", body = Point),
        (status = 404, description = "Collection or point not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_point<S: VectorStore>(
    State(service): State<Arc<PointService<S>>>,
    Path((name, id)): Path<(String, String)>,
) -> PointResult<Json<Point>> {
    let point = service.get(&name, &id).await?;
    Ok(Json(point))
}

/// Delete a point by id
#[utoipa::path(
    delete,
    path = "/collections/{name}/points/{id}",
    tag = "points",
    params(
        ("name" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Point id")
    ),
    responses(
        (status = 204, description = "Point deleted"),
        (status = 404, description = "Collection not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_point<S: VectorStore>(
    State(service): State<Arc<PointService<S>>>,
    Path((name, id)): Path<(String, String)>,
) -> PointResult<impl IntoResponse> {
    service.delete(&name, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Query with a caller-supplied vector, returning the ranked result list
#[utoipa::path(
    post,
    path = "/collections/{name}/query",
    tag = "points",
    params(
        ("name" = String, Path, description = "Collection name")
    ),
    request_body = QueryPoints,
    responses(
        (status = 200, description = "Ranked results", body = Vec<ScoredPoint>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Collection not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn query<S: VectorStore>(
    State(service): State<Arc<PointService<S>>>,
    Path(name): Path<String>,
    Json(request): Json<QueryPoints>,
) -> PointResult<Json<Vec<ScoredPoint>>> {
    let results = service.query(&name, request).await?;
    Ok(Json(results))
}

/// Text search returning the single best-matching point id
#[utoipa::path(
    post,
    path = "/collections/{name}/search",
    tag = "points",
    params(
        ("name" = String, Path, description = "Collection name")
    ),
    request_body = SearchPoints,
    responses(
        (status = 200, description = "Best match", body = SearchMatchResponse),
        (status = 400, description = "Invalid request or dimension mismatch"),
        (status = 404, description = "Collection not found or no matching points"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn search<S: VectorStore>(
    State(service): State<Arc<PointService<S>>>,
    Path(name): Path<String>,
    Json(request): Json<SearchPoints>,
) -> PointResult<Json<SearchMatchResponse>> {
    let id = service.search(&name, request).await?;
    Ok(Json(SearchMatchResponse { id }))
}

/// OpenAPI documentation for the points API
#[derive(OpenApi)]
#[openapi(
    paths(upsert, upsert_direct, get_point, delete_point, query, search),
    components(
        schemas(
            Point, ScoredPoint,
            UpsertPoint, QueryPoints, SearchPoints,
            SearchMatchResponse
        )
    ),
    tags(
        (name = "points", description = "Point upsert and query operations")
    )
)]
pub struct PointsApiDoc;

/// Create the points router backed by the given service
pub fn router<S: VectorStore + 'static>(service: PointService<S>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/collections/{name}/upsert", post(upsert))
        .route("/collections/{name}/upsert/direct", post(upsert_direct))
        .route(
            "/collections/{name}/points/{id}",
            axum::routing::get(get_point).delete(delete_point),
        )
        .route("/collections/{name}/query", post(query))
        .route("/collections/{name}/search", post(search))
        .with_state(shared_service)
}
