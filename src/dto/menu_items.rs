use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::MenuItem;

/// Full set of menu item fields, used for both create and replace.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MenuItemRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct MenuItemList {
    #[schema(value_type = Vec<MenuItem>)]
    pub items: Vec<MenuItem>,
}
