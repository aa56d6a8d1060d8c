//! Service catalog handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateServiceRequest, ListServicesParams, ServiceItemDto, UpdateServiceRequest};
use crate::application::CatalogService;
use crate::domain::ServiceFilter;
use crate::interfaces::http::common::{
    page_request, parse_id, parse_optional, ApiResult, ErrorResponse, PageResponse,
    ValidatedJson,
};

/// Shared by the service and menu item handlers
#[derive(Clone)]
pub struct CatalogState {
    pub catalog: Arc<CatalogService>,
}

#[utoipa::path(
    get,
    path = "/services",
    tag = "Services",
    params(ListServicesParams),
    responses(
        (status = 200, description = "Filtered services", body = PageResponse<ServiceItemDto>),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    )
)]
pub async fn list_services(
    State(state): State<CatalogState>,
    Query(params): Query<ListServicesParams>,
) -> ApiResult<Json<PageResponse<ServiceItemDto>>> {
    let filter = ServiceFilter {
        category: params.category,
        min_rating: parse_optional::<f64>(params.min_rating.as_deref(), "min_rating")?,
        query: params.q.map(|q| q.trim().to_string()),
    };
    let page = page_request(params.offset.as_deref(), params.limit.as_deref())?;

    let page = state.catalog.list_services(filter, page).await?;
    Ok(Json(PageResponse::from_page(page, ServiceItemDto::from)))
}

#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "Services",
    params(("id" = u64, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = ServiceItemDto),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_service(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ServiceItemDto>> {
    let item = state.catalog.get_service(parse_id(&id)?).await?;
    Ok(Json(item.into()))
}

#[utoipa::path(
    post,
    path = "/admin/services",
    tag = "Services",
    security(("bearer_auth" = [])),
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Created", body = ServiceItemDto),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_service(
    State(state): State<CatalogState>,
    ValidatedJson(request): ValidatedJson<CreateServiceRequest>,
) -> ApiResult<(StatusCode, Json<ServiceItemDto>)> {
    let created = state.catalog.create_service(request.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    put,
    path = "/admin/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Replaced", body = ServiceItemDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_service(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateServiceRequest>,
) -> ApiResult<Json<ServiceItemDto>> {
    let updated = state
        .catalog
        .replace_service(parse_id(&id)?, request.into())
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/admin/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Deleted, images released"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_service(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_service(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
