#![allow(dead_code)]

use restaurant_order_api::{
    db::{create_orm_conn, run_migrations},
    dto::{
        menu_items::MenuItemRequest,
        orders::{CreateOrderRequest, OrderLineRequest},
    },
    models::MenuItem,
    services::menu_item_service,
    state::AppState,
};
use rust_decimal::Decimal;
use tempfile::TempDir;

/// App state over a fresh SQLite file; the directory is removed on drop.
pub struct TestDb {
    pub state: AppState,
    _dir: TempDir,
}

pub async fn setup() -> anyhow::Result<TestDb> {
    let dir = tempfile::tempdir()?;
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("restaurant.db").display()
    );
    let orm = create_orm_conn(&url).await?;
    run_migrations(&orm).await?;

    Ok(TestDb {
        state: AppState::new(orm),
        _dir: dir,
    })
}

pub fn price(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

pub fn menu_request(name: &str, category: &str, amount: &str) -> MenuItemRequest {
    MenuItemRequest {
        name: name.into(),
        description: format!("{name} description"),
        price: price(amount),
        category: category.into(),
        is_available: true,
    }
}

pub async fn add_menu_item(
    state: &AppState,
    name: &str,
    category: &str,
    amount: &str,
) -> anyhow::Result<MenuItem> {
    let resp =
        menu_item_service::create_menu_item(state, menu_request(name, category, amount)).await?;
    Ok(resp.data.expect("menu item data"))
}

pub fn order_request(table_number: i32, lines: &[(i32, i32)]) -> CreateOrderRequest {
    CreateOrderRequest {
        table_number,
        items: lines
            .iter()
            .map(|&(menu_item_id, quantity)| OrderLineRequest {
                menu_item_id,
                quantity,
            })
            .collect(),
    }
}
