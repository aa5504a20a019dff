//! Menu browsing.

use cloud_kitchen_client::api::DishParams;
use cloud_kitchen_client::error::AppError;
use cloud_kitchen_client::models::{MenuQuery, populated_categories};
use cloud_kitchen_client::state::AppState;

use super::render::dish_line;

/// Fetch the full menu and print the dishes `query` selects.
///
/// Filtering happens locally so category slugs and sorting behave the
/// same whatever the backend supports.
pub async fn list(state: &AppState, query: &MenuQuery) -> Result<(), AppError> {
    let dishes = state.api().list_dishes(&DishParams::default()).await?;
    let shown = query.apply(&dishes);

    if shown.is_empty() {
        println!("No dishes match");
        return Ok(());
    }
    for dish in shown {
        println!("{}", dish_line(dish));
    }
    Ok(())
}

/// Print categories that have at least one dish.
pub async fn categories(state: &AppState) -> Result<(), AppError> {
    let params = DishParams::default();
    let (categories, dishes) = tokio::try_join!(
        state.api().list_categories(),
        state.api().list_dishes(&params),
    )?;

    for category in populated_categories(&categories, &dishes) {
        println!("{:<20} {}", category.slug, category.name);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use cloud_kitchen_client::config::ClientConfig;
    use cloud_kitchen_client::storage::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_categories_reports_unreachable_backend() {
        let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", closed.local_addr().unwrap());
        drop(closed);

        let config = ClientConfig::from_lookup(|key| {
            (key == "KITCHEN_API_BASE_URL").then(|| url.clone())
        })
        .unwrap();
        let state = AppState::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        )
        .unwrap();

        let err = categories(&state).await.unwrap_err();
        assert!(err.is_unexpected());
    }
}
