//! Domain models exchanged with the Cloud Kitchen backend.

pub mod dish;
pub mod order;
pub mod user;

pub use dish::{Category, Dish, MenuQuery, MenuSort, populated_categories, slugify};
pub use order::{
    Dashboard, DashboardStats, DailyOrders, DishRef, NewOrder, NewOrderLine, Order, OrderFilter,
    OrderLine, StatusUpdate,
};
pub use user::{AdminProfile, Profile};
