pub mod menu_items;
pub mod order_items;
pub mod orders;

pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
