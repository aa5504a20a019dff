//! Plain-text rendering for command output.

use cloud_kitchen_client::cart::CartStore;
use cloud_kitchen_client::models::{Dashboard, Dish, Order};
use cloud_kitchen_client::session::Identity;

/// One menu line: id, name, price, category and markers.
pub fn dish_line(dish: &Dish) -> String {
    let veg = if dish.is_veg() { " (veg)" } else { "" };
    let unavailable = if dish.available { "" } else { " [unavailable]" };
    format!(
        "{}  {:<28} {:>8}  {}{veg}{unavailable}",
        dish.id,
        dish.name,
        dish.price.to_string(),
        dish.category
    )
}

/// The cart with subtotal, delivery fee and total.
pub fn cart_lines(cart: &CartStore) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Your cart is empty".to_string()];
    }

    let mut lines: Vec<String> = cart
        .items()
        .iter()
        .map(|item| {
            format!(
                "{}  {:<28} {:>3} x {:>7} = {:>8}",
                item.id,
                item.name,
                item.quantity,
                item.price.to_string(),
                item.line_total().to_string()
            )
        })
        .collect();

    let summary = cart.summary();
    lines.push(format!("Items: {}", cart.cart_count()));
    lines.push(format!("Subtotal: {}", summary.subtotal));
    lines.push(format!("Delivery: {}", summary.delivery_fee));
    lines.push(format!("Total: {}", summary.total));
    lines
}

/// One order line: short id, status, item count, total and date.
pub fn order_line(order: &Order) -> String {
    let placed = order
        .created_at
        .map_or_else(String::new, |at| at.format("%Y-%m-%d").to_string());
    format!(
        "#{}  {:<16} {:>3} items  {:>8}  {placed}",
        order.short_id(),
        order.status.as_str(),
        order.item_count(),
        order.total_amount.to_string()
    )
}

/// Headline numbers, recent orders and daily counts.
pub fn dashboard_lines(dashboard: &Dashboard) -> Vec<String> {
    let stats = &dashboard.stats;
    let mut lines = vec![
        format!("Total orders:     {}", stats.total_orders),
        format!("Pending orders:   {}", stats.pending_orders),
        format!("Completed orders: {}", stats.completed_orders),
        format!("Dishes on menu:   {}", stats.total_dishes),
    ];

    if !dashboard.recent_orders.is_empty() {
        lines.push("Recent orders:".to_string());
        lines.extend(dashboard.recent_orders.iter().map(|o| format!("  {}", order_line(o))));
    }
    if !dashboard.orders_by_day.is_empty() {
        lines.push("Orders by day:".to_string());
        lines.extend(
            dashboard
                .orders_by_day
                .iter()
                .map(|day| format!("  {}  {}", day.date, day.count)),
        );
    }
    lines
}

/// Who is signed in.
pub fn identity_line(identity: &Identity) -> String {
    match identity {
        Identity::Anonymous => "Not signed in".to_string(),
        Identity::Customer(session) => format!(
            "Signed in as {} <{}>",
            session.profile.greeting_name(),
            session.profile.email
        ),
        Identity::Admin(session) => format!("Signed in as admin <{}>", session.email),
    }
}
