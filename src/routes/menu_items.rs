//! Every handler answers with the `ApiResponse` envelope: the menu item or list sits in
//! `data`, next to a `message` and, for lists, `meta` with `skip`, `limit` and `total`.
//! Clients that expect a bare object or array must read `data`.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::menu_items::{MenuItemList, MenuItemRequest},
    error::AppResult,
    models::MenuItem,
    response::ApiResponse,
    routes::params::MenuItemQuery,
    services::menu_item_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/menu-items", get(list_menu_items).post(create_menu_item))
        .route("/menu-items/", get(list_menu_items).post(create_menu_item))
        .route(
            "/menu-items/{id}",
            get(get_menu_item)
                .put(update_menu_item)
                .delete(delete_menu_item),
        )
}

#[utoipa::path(
    get,
    path = "/menu-items/",
    params(MenuItemQuery),
    responses(
        (status = 200, description = "List menu items", body = ApiResponse<MenuItemList>)
    ),
    tag = "Menu"
)]
pub async fn list_menu_items(
    State(state): State<AppState>,
    Query(query): Query<MenuItemQuery>,
) -> AppResult<Json<ApiResponse<MenuItemList>>> {
    let resp = menu_item_service::list_menu_items(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/menu-items/{id}",
    params(
        ("id" = i32, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Get menu item", body = ApiResponse<MenuItem>),
        (status = 404, description = "Menu item not found"),
    ),
    tag = "Menu"
)]
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_item_service::get_menu_item(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/menu-items/",
    request_body = MenuItemRequest,
    responses(
        (status = 200, description = "Create menu item", body = ApiResponse<MenuItem>),
        (status = 400, description = "Invalid price"),
    ),
    tag = "Menu"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(payload): Json<MenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_item_service::create_menu_item(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/menu-items/{id}",
    params(
        ("id" = i32, Path, description = "Menu item ID")
    ),
    request_body = MenuItemRequest,
    responses(
        (status = 200, description = "Replace menu item fields", body = ApiResponse<MenuItem>),
        (status = 400, description = "Invalid price"),
        (status = 404, description = "Menu item not found"),
    ),
    tag = "Menu"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<MenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_item_service::update_menu_item(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/menu-items/{id}",
    params(
        ("id" = i32, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Menu item deleted"),
        (status = 404, description = "Menu item not found"),
        (status = 409, description = "Menu item is referenced by orders"),
    ),
    tag = "Menu"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = menu_item_service::delete_menu_item(&state, id).await?;
    Ok(Json(resp))
}
