use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(pk_auto(MenuItems::Id))
                    .col(string(MenuItems::Name))
                    .col(string(MenuItems::Description))
                    .col(big_integer(MenuItems::Price))
                    .col(string(MenuItems::Category))
                    .col(boolean(MenuItems::IsAvailable).default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-menu_items-name")
                    .table(MenuItems::Table)
                    .col(MenuItems::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(pk_auto(Orders::Id))
                    .col(integer(Orders::TableNumber))
                    .col(string(Orders::Status))
                    .col(timestamp_with_time_zone(Orders::CreatedAt))
                    .col(big_integer(Orders::TotalAmount).default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(pk_auto(OrderItems::Id))
                    .col(integer(OrderItems::OrderId))
                    .col(integer(OrderItems::MenuItemId))
                    .col(integer(OrderItems::Quantity))
                    .col(big_integer(OrderItems::UnitPrice))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_items-order_id")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_items-menu_item_id")
                            .from(OrderItems::Table, OrderItems::MenuItemId)
                            .to(MenuItems::Table, MenuItems::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-order_items-order_id")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MenuItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MenuItems {
    Table,
    Id,
    Name,
    Description,
    Price,
    Category,
    IsAvailable,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    TableNumber,
    Status,
    CreatedAt,
    TotalAmount,
}

#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    MenuItemId,
    Quantity,
    UnitPrice,
}
