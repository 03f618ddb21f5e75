pub mod menu_item_service;
pub mod order_service;
pub mod unit_of_work;
