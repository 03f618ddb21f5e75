use restaurant_order_api::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    entity::menu_items::{ActiveModel as MenuItemActive, Column, Entity as MenuItems},
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let inserted = seed_menu(&orm).await?;
    println!("Seed completed. {inserted} menu item(s) added");
    Ok(())
}

async fn seed_menu(orm: &OrmConn) -> anyhow::Result<usize> {
    // (name, description, price in cents, category)
    let menu = vec![
        ("Margherita Pizza", "Tomato, mozzarella, basil", 950, "Mains"),
        ("Caesar Salad", "Romaine, parmesan, croutons", 750, "Starters"),
        ("Tomato Soup", "Slow-roasted tomatoes, cream", 550, "Starters"),
        ("Tiramisu", "Mascarpone, espresso, cocoa", 600, "Desserts"),
        ("Lemonade", "Freshly squeezed", 350, "Drinks"),
    ];

    let mut inserted = 0;
    for (name, description, price, category) in menu {
        let exists = MenuItems::find()
            .filter(Column::Name.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        MenuItemActive {
            id: NotSet,
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            price: Set(price),
            category: Set(category.to_string()),
            is_available: Set(true),
        }
        .insert(orm)
        .await?;
        inserted += 1;
    }

    Ok(inserted)
}
