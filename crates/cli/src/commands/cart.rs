//! Cart commands. The cart lives in the durable store, so these work
//! without signing in and persist across invocations.

use cloud_kitchen_client::error::AppError;
use cloud_kitchen_client::state::AppState;
use cloud_kitchen_core::DishId;

use super::render::cart_lines;

pub async fn show(state: &AppState) {
    let cart = state.cart().lock().await;
    for line in cart_lines(&cart) {
        println!("{line}");
    }
}

/// Look the dish up and add one unit of it.
pub async fn add(state: &AppState, id: &DishId) -> Result<(), AppError> {
    let dish = state.api().get_dish(id).await?;
    let mut cart = state.cart().lock().await;
    cart.add_to_cart(&dish);
    println!("Added {} ({} in cart)", dish.name, cart.cart_count());
    Ok(())
}

pub async fn remove(state: &AppState, id: &DishId) {
    let mut cart = state.cart().lock().await;
    cart.remove_from_cart(id);
    println!("{} in cart", cart.cart_count());
}

pub async fn change(state: &AppState, id: &DishId, delta: i64) {
    let mut cart = state.cart().lock().await;
    cart.update_quantity(id, delta);
    match cart.items().iter().find(|item| &item.id == id) {
        Some(item) => println!("{} x {}", item.quantity, item.name),
        None => println!("{id} is not in the cart"),
    }
}

pub async fn clear(state: &AppState) {
    state.cart().lock().await.clear_cart();
    println!("Cart cleared");
}
