use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Order;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub menu_item_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub table_number: i32,
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusQuery {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}
