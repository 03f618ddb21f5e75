mod common;

use common::{add_menu_item, menu_request, order_request, price, setup};
use restaurant_order_api::{
    entity::MenuItems,
    error::AppError,
    routes::params::MenuItemQuery,
    services::{menu_item_service, order_service},
};
use sea_orm::EntityTrait;

#[tokio::test]
async fn create_get_update_delete_round_trip() -> anyhow::Result<()> {
    let db = setup().await?;

    let created = menu_item_service::create_menu_item(
        &db.state,
        menu_request("Tiramisu", "Desserts", "6.00"),
    )
    .await?
    .data
    .expect("menu item data");
    assert_eq!(created.name, "Tiramisu");
    assert_eq!(created.price, price("6.00"));
    assert!(created.is_available);

    let fetched = menu_item_service::get_menu_item(&db.state, created.id)
        .await?
        .data
        .expect("menu item data");
    assert_eq!(fetched, created);

    let mut replacement = menu_request("Tiramisu Classico", "Sweets", "7.25");
    replacement.is_available = false;
    menu_item_service::update_menu_item(&db.state, created.id, replacement).await?;

    let fetched = menu_item_service::get_menu_item(&db.state, created.id)
        .await?
        .data
        .expect("menu item data");
    assert_eq!(fetched.name, "Tiramisu Classico");
    assert_eq!(fetched.category, "Sweets");
    assert_eq!(fetched.price, price("7.25"));
    assert!(!fetched.is_available);

    let deleted = menu_item_service::delete_menu_item(&db.state, created.id).await?;
    assert_eq!(deleted.message, "Menu item deleted");

    let err = menu_item_service::get_menu_item(&db.state, created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn missing_items_are_not_found() -> anyhow::Result<()> {
    let db = setup().await?;

    let err = menu_item_service::update_menu_item(
        &db.state,
        41,
        menu_request("Ghost", "None", "1.00"),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Menu item 41 not found");

    let err = menu_item_service::delete_menu_item(&db.state, 41)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn negative_price_is_rejected() -> anyhow::Result<()> {
    let db = setup().await?;
    let err = menu_item_service::create_menu_item(
        &db.state,
        menu_request("Refund", "Misc", "-1.00"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn ordered_items_cannot_be_deleted() -> anyhow::Result<()> {
    let db = setup().await?;
    let pizza = add_menu_item(&db.state, "Margherita", "Mains", "9.50").await?;
    order_service::create_order(&db.state, order_request(4, &[(pizza.id, 1)])).await?;

    let err = menu_item_service::delete_menu_item(&db.state, pizza.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    assert_eq!(err.to_string(), menu_item_service::referenced_message(pizza.id));

    let still_there = menu_item_service::get_menu_item(&db.state, pizza.id).await?;
    assert!(still_there.data.is_some());
    Ok(())
}

#[tokio::test]
async fn foreign_key_violation_on_delete_is_a_conflict() -> anyhow::Result<()> {
    let db = setup().await?;
    let pizza = add_menu_item(&db.state, "Margherita", "Mains", "9.50").await?;
    order_service::create_order(&db.state, order_request(4, &[(pizza.id, 1)])).await?;

    // Skips the reference count, as a line inserted after the count would.
    let db_err = MenuItems::delete_by_id(pizza.id)
        .exec(&db.state.orm)
        .await
        .unwrap_err();
    let err = AppError::conflict_on_foreign_key(db_err, || {
        menu_item_service::referenced_message(pizza.id)
    });
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    let still_there = menu_item_service::get_menu_item(&db.state, pizza.id).await?;
    assert!(still_there.data.is_some());
    Ok(())
}

#[tokio::test]
async fn list_filters_by_category_and_availability() -> anyhow::Result<()> {
    let db = setup().await?;
    add_menu_item(&db.state, "Soup", "Starters", "5.50").await?;
    add_menu_item(&db.state, "Salad", "Starters", "7.50").await?;
    let steak = add_menu_item(&db.state, "Steak", "Mains", "24.00").await?;

    let mut unavailable = menu_request("Steak", "Mains", "24.00");
    unavailable.is_available = false;
    menu_item_service::update_menu_item(&db.state, steak.id, unavailable).await?;

    let starters = menu_item_service::list_menu_items(
        &db.state,
        MenuItemQuery {
            category: Some("Starters".into()),
            ..Default::default()
        },
    )
    .await?;
    let names: Vec<String> = starters
        .data
        .expect("menu list")
        .items
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["Soup", "Salad"]);

    let available = menu_item_service::list_menu_items(
        &db.state,
        MenuItemQuery {
            available: Some(true),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(available.meta.and_then(|m| m.total), Some(2));

    let second_page = menu_item_service::list_menu_items(
        &db.state,
        MenuItemQuery {
            skip: Some(2),
            limit: Some(10),
            ..Default::default()
        },
    )
    .await?;
    let items = second_page.data.expect("menu list").items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, steak.id);
    Ok(())
}
