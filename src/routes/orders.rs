//! Every handler answers with the `ApiResponse` envelope: the order or list sits in
//! `data`, next to a `message` and, for lists, `meta` with `skip`, `limit` and `total`.
//! Clients that expect a bare object or array must read `data`.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};

use crate::{
    dto::orders::{CreateOrderRequest, OrderList, UpdateStatusQuery},
    error::AppResult,
    models::Order,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_order_status))
}

#[utoipa::path(
    post,
    path = "/orders/",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created with its lines and total", body = ApiResponse<Order>),
        (status = 400, description = "Empty order or non-positive quantity"),
        (status = 404, description = "A referenced menu item does not exist"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::create_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/",
    params(OrderListQuery),
    responses(
        (status = 200, description = "List orders", body = ApiResponse<OrderList>),
        (status = 400, description = "Unknown status filter"),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Get order with lines", body = ApiResponse<Order>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    params(
        ("id" = i32, Path, description = "Order ID"),
        ("status" = String, Query, description = "One of: pending, preparing, served, paid")
    ),
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<UpdateStatusQuery>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::set_order_status(&state, id, &query.status).await?;
    Ok(Json(resp))
}
