use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::{
    dto::menu_items::{MenuItemList, MenuItemRequest},
    entity::{
        menu_items::{ActiveModel, Column, Entity as MenuItems, Model as MenuItemModel},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
    },
    error::{AppError, AppResult},
    models::MenuItem,
    money::{from_minor_units, to_minor_units},
    response::{ApiResponse, Meta},
    routes::params::MenuItemQuery,
    services::unit_of_work::UnitOfWork,
    state::AppState,
};

pub async fn list_menu_items(
    state: &AppState,
    query: MenuItemQuery,
) -> AppResult<ApiResponse<MenuItemList>> {
    let (skip, limit) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }
    if let Some(available) = query.available {
        condition = condition.add(Column::IsAvailable.eq(available));
    }

    let finder = MenuItems::find().filter(condition).order_by_asc(Column::Id);
    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .limit(limit)
        .offset(skip)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(menu_item_from_entity)
        .collect();

    let meta = Meta::new(skip, limit, total);
    Ok(ApiResponse::success("Menu items", MenuItemList { items }, Some(meta)))
}

pub async fn get_menu_item(state: &AppState, id: i32) -> AppResult<ApiResponse<MenuItem>> {
    let result = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(menu_item_from_entity);
    let result = match result {
        Some(item) => item,
        None => return Err(AppError::NotFound(format!("Menu item {id}"))),
    };
    Ok(ApiResponse::success("Menu item", result, Some(Meta::empty())))
}

pub async fn create_menu_item(
    state: &AppState,
    payload: MenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let price = to_minor_units(payload.price)?;
    let active = ActiveModel {
        id: NotSet,
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(price),
        category: Set(payload.category),
        is_available: Set(payload.is_available),
    };
    let item = active.insert(&state.orm).await?;

    tracing::info!(menu_item_id = item.id, name = %item.name, "menu item created");

    Ok(ApiResponse::success(
        "Menu item created",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

/// Replaces every field of an existing item. Orders already placed keep their prices.
pub async fn update_menu_item(
    state: &AppState,
    id: i32,
    payload: MenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let price = to_minor_units(payload.price)?;
    let existing = MenuItems::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(item) => item,
        None => return Err(AppError::NotFound(format!("Menu item {id}"))),
    };

    let mut active: ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.description = Set(payload.description);
    active.price = Set(price);
    active.category = Set(payload.category);
    active.is_available = Set(payload.is_available);

    let item = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Menu item updated",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

/// Items referenced by order lines cannot be deleted; mark them unavailable instead.
pub async fn delete_menu_item(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let uow = UnitOfWork::begin(&state.orm).await?;
    match delete_unreferenced(uow.conn(), id).await {
        Ok(()) => uow.commit().await?,
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                tracing::error!(error = %rollback_err, "menu item delete rollback failed");
            }
            return Err(err);
        }
    }

    tracing::info!(menu_item_id = id, "menu item deleted");

    Ok(ApiResponse::success(
        "Menu item deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

// A line inserted between the count and the delete still trips the foreign key,
// which is reported as the same conflict.
async fn delete_unreferenced<C>(conn: &C, id: i32) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if MenuItems::find_by_id(id).one(conn).await?.is_none() {
        return Err(AppError::NotFound(format!("Menu item {id}")));
    }

    let references = OrderItems::find()
        .filter(OrderItemCol::MenuItemId.eq(id))
        .count(conn)
        .await?;
    if references > 0 {
        return Err(AppError::Conflict(referenced_message(id)));
    }

    MenuItems::delete_by_id(id)
        .exec(conn)
        .await
        .map_err(|err| AppError::conflict_on_foreign_key(err, || referenced_message(id)))?;
    Ok(())
}

pub fn referenced_message(id: i32) -> String {
    format!("Menu item {id} is referenced by existing orders; mark it unavailable instead")
}

fn menu_item_from_entity(model: MenuItemModel) -> MenuItem {
    MenuItem {
        id: model.id,
        name: model.name,
        description: model.description,
        price: from_minor_units(model.price),
        category: model.category,
        is_available: model.is_available,
    }
}
