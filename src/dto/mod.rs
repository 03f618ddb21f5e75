pub mod menu_items;
pub mod orders;
