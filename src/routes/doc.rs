use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        menu_items::{MenuItemList, MenuItemRequest},
        orders::{CreateOrderRequest, OrderLineRequest, OrderList, UpdateStatusQuery},
    },
    models::{MenuItem, Order, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::{health, menu_items, orders, params},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Restaurant Management API",
        description = "Responses are wrapped in an envelope: `{ message, data, meta }`. \
            The resource or list is in `data`; errors carry `data.error`."
    ),
    paths(
        health::health_check,
        menu_items::list_menu_items,
        menu_items::create_menu_item,
        menu_items::get_menu_item,
        menu_items::update_menu_item,
        menu_items::delete_menu_item,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status
    ),
    components(
        schemas(
            MenuItem,
            Order,
            OrderItem,
            OrderStatus,
            MenuItemRequest,
            MenuItemList,
            CreateOrderRequest,
            OrderLineRequest,
            OrderList,
            UpdateStatusQuery,
            health::HealthData,
            params::Pagination,
            Meta,
            ApiResponse<MenuItem>,
            ApiResponse<MenuItemList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Menu", description = "Menu catalog endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
