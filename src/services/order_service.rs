use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::{
    dto::orders::{CreateOrderRequest, OrderList},
    entity::{
        menu_items::Entity as MenuItems,
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem, OrderStatus},
    money::{from_minor_units, line_total},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::unit_of_work::UnitOfWork,
    state::AppState,
};

/// Creates an order and its lines in one unit of work.
///
/// Every referenced menu item must exist; its current price becomes the line's
/// unit price. If any line fails, nothing is persisted.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    validate_order_request(&payload)?;

    let uow = UnitOfWork::begin(&state.orm).await?;
    let order = match compose_order(uow.conn(), &payload).await {
        Ok(order) => {
            uow.commit().await?;
            order
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                tracing::error!(error = %rollback_err, "order rollback failed");
            }
            tracing::warn!(
                table_number = payload.table_number,
                error = %err,
                "order creation rolled back"
            );
            return Err(err);
        }
    };

    tracing::info!(
        order_id = order.id,
        table_number = order.table_number,
        lines = order.items.len(),
        total = %order.total_amount,
        "order created"
    );

    Ok(ApiResponse::success(
        "Order created",
        order,
        Some(Meta::empty()),
    ))
}

fn validate_order_request(payload: &CreateOrderRequest) -> AppResult<()> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Order must contain at least one item".into()));
    }
    if let Some(line) = payload.items.iter().find(|line| line.quantity <= 0) {
        return Err(AppError::BadRequest(format!(
            "Quantity for menu item {} must be positive",
            line.menu_item_id
        )));
    }
    Ok(())
}

// Header first so lines have an order id to reference, then lines, then the total.
async fn compose_order<C>(conn: &C, payload: &CreateOrderRequest) -> AppResult<Order>
where
    C: ConnectionTrait,
{
    let header = OrderActive {
        id: NotSet,
        table_number: Set(payload.table_number),
        status: Set(OrderStatus::Pending.as_str().to_owned()),
        created_at: Set(Utc::now()),
        total_amount: Set(0),
    }
    .insert(conn)
    .await?;

    let mut total_amount: i64 = 0;
    let mut lines = Vec::with_capacity(payload.items.len());
    for requested in &payload.items {
        let menu_item = MenuItems::find_by_id(requested.menu_item_id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Menu item {}", requested.menu_item_id)))?;

        let line = OrderItemActive {
            id: NotSet,
            order_id: Set(header.id),
            menu_item_id: Set(menu_item.id),
            quantity: Set(requested.quantity),
            unit_price: Set(menu_item.price),
        }
        .insert(conn)
        .await?;

        total_amount = total_amount
            .checked_add(line_total(line.quantity, line.unit_price)?)
            .ok_or_else(|| AppError::BadRequest("Order total is out of range".into()))?;
        lines.push(line);
    }

    let mut active: OrderActive = header.into();
    active.total_amount = Set(total_amount);
    let header = active.update(conn).await?;

    order_from_entity(header, lines)
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (skip, limit) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status: OrderStatus = status.parse()?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }
    if let Some(table_number) = query.table_number {
        condition = condition.add(OrderCol::TableNumber.eq(table_number));
    }

    let finder = Orders::find().filter(condition).order_by_asc(OrderCol::Id);
    let total = finder.clone().count(&state.orm).await?;

    let headers = finder
        .limit(limit)
        .offset(skip)
        .all(&state.orm)
        .await?;

    let order_ids: Vec<i32> = headers.iter().map(|order| order.id).collect();
    let mut lines_by_order: HashMap<i32, Vec<OrderItemModel>> = HashMap::new();
    if !order_ids.is_empty() {
        let lines = OrderItems::find()
            .filter(OrderItemCol::OrderId.is_in(order_ids))
            .order_by_asc(OrderItemCol::Id)
            .all(&state.orm)
            .await?;
        for line in lines {
            lines_by_order.entry(line.order_id).or_default().push(line);
        }
    }

    let items = headers
        .into_iter()
        .map(|header| {
            let lines = lines_by_order.remove(&header.id).unwrap_or_default();
            order_from_entity(header, lines)
        })
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(skip, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order(state: &AppState, id: i32) -> AppResult<ApiResponse<Order>> {
    let order = find_order(&state.orm, id).await?;
    Ok(ApiResponse::success("Order", order, Some(Meta::empty())))
}

/// Sets any of the known statuses, regardless of the current one.
pub async fn set_order_status(
    state: &AppState,
    id: i32,
    status: &str,
) -> AppResult<ApiResponse<Order>> {
    let status: OrderStatus = status.parse()?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound(format!("Order {id}"))),
    };
    let previous = existing.status.clone();

    let mut active: OrderActive = existing.into();
    active.status = Set(status.as_str().to_owned());
    active.update(&state.orm).await?;

    tracing::info!(order_id = id, from = %previous, to = %status, "order status updated");

    let order = find_order(&state.orm, id).await?;
    Ok(ApiResponse::success(
        format!("Order status updated to {status}"),
        order,
        Some(Meta::empty()),
    ))
}

async fn find_order<C>(conn: &C, id: i32) -> AppResult<Order>
where
    C: ConnectionTrait,
{
    let header = Orders::find_by_id(id).one(conn).await?;
    let header = match header {
        Some(o) => o,
        None => return Err(AppError::NotFound(format!("Order {id}"))),
    };

    let lines = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(header.id))
        .order_by_asc(OrderItemCol::Id)
        .all(conn)
        .await?;

    order_from_entity(header, lines)
}

fn order_from_entity(model: OrderModel, lines: Vec<OrderItemModel>) -> AppResult<Order> {
    let status = model.status.parse::<OrderStatus>().map_err(|_| {
        AppError::Internal(anyhow::anyhow!(
            "order {} has unknown status {:?}",
            model.id,
            model.status
        ))
    })?;

    Ok(Order {
        id: model.id,
        table_number: model.table_number,
        status,
        created_at: model.created_at,
        total_amount: from_minor_units(model.total_amount),
        items: lines.into_iter().map(order_item_from_entity).collect(),
    })
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        menu_item_id: model.menu_item_id,
        quantity: model.quantity,
        unit_price: from_minor_units(model.unit_price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::orders::OrderLineRequest;

    fn request(lines: &[(i32, i32)]) -> CreateOrderRequest {
        CreateOrderRequest {
            table_number: 4,
            items: lines
                .iter()
                .map(|&(menu_item_id, quantity)| OrderLineRequest {
                    menu_item_id,
                    quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn rejects_empty_orders() {
        let err = validate_order_request(&request(&[])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn rejects_non_positive_quantities() {
        let err = validate_order_request(&request(&[(1, 2), (7, 0)])).unwrap_err();
        assert_eq!(err.to_string(), "Quantity for menu item 7 must be positive");
        assert!(validate_order_request(&request(&[(1, -3)])).is_err());
    }

    #[test]
    fn accepts_positive_quantities_and_any_table() {
        let mut payload = request(&[(1, 1), (2, 5)]);
        payload.table_number = -1;
        assert!(validate_order_request(&payload).is_ok());
    }
}
