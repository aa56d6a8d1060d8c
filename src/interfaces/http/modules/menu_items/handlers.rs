//! Menu (price list) handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateMenuItemRequest, ListMenuItemsParams, MenuItemDto, UpdateMenuItemRequest};
use crate::domain::MenuItemFilter;
use crate::interfaces::http::common::{
    page_request, parse_id, ApiResult, ErrorResponse, PageResponse, ValidatedJson,
};
use crate::interfaces::http::modules::services::CatalogState;

#[utoipa::path(
    get,
    path = "/menu-items",
    tag = "Menu",
    params(ListMenuItemsParams),
    responses(
        (status = 200, description = "Filtered menu items", body = PageResponse<MenuItemDto>),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    )
)]
pub async fn list_menu_items(
    State(state): State<CatalogState>,
    Query(params): Query<ListMenuItemsParams>,
) -> ApiResult<Json<PageResponse<MenuItemDto>>> {
    let filter = MenuItemFilter {
        category: params.category.map(|c| c.trim().to_string()),
        query: params.q.map(|q| q.trim().to_string()),
    };
    let page = page_request(params.offset.as_deref(), params.limit.as_deref())?;

    let page = state.catalog.list_menu_items(filter, page).await?;
    Ok(Json(PageResponse::from_page(page, MenuItemDto::from)))
}

#[utoipa::path(
    get,
    path = "/menu-items/{id}",
    tag = "Menu",
    params(("id" = u64, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item", body = MenuItemDto),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_menu_item(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MenuItemDto>> {
    let item = state.catalog.get_menu_item(parse_id(&id)?).await?;
    Ok(Json(item.into()))
}

#[utoipa::path(
    post,
    path = "/admin/menu-items",
    tag = "Menu",
    security(("bearer_auth" = [])),
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, description = "Created", body = MenuItemDto),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_menu_item(
    State(state): State<CatalogState>,
    ValidatedJson(request): ValidatedJson<CreateMenuItemRequest>,
) -> ApiResult<(StatusCode, Json<MenuItemDto>)> {
    let created = state.catalog.create_menu_item(request.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    put,
    path = "/admin/menu-items/{id}",
    tag = "Menu",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "Menu item ID")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Updated", body = MenuItemDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_menu_item(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateMenuItemRequest>,
) -> ApiResult<Json<MenuItemDto>> {
    let updated = state
        .catalog
        .update_menu_item(parse_id(&id)?, request.into())
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/admin/menu-items/{id}",
    tag = "Menu",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "Menu item ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_menu_item(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_menu_item(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
