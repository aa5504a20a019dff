//! Menu endpoints: dishes and categories.

use reqwest::Method;
use tracing::instrument;

use cloud_kitchen_core::DishId;

use super::{ApiClient, ApiError, Envelope};
use crate::models::{Category, Dish};

/// Server-side filters for `GET /api/dishes`.
#[derive(Debug, Clone, Default)]
pub struct DishParams {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl DishParams {
    fn pairs(&self) -> Vec<(&str, &str)> {
        [("category", &self.category), ("search", &self.search)]
            .into_iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
            .collect()
    }
}

impl ApiClient {
    /// `GET /api/dishes`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn list_dishes(&self, params: &DishParams) -> Result<Vec<Dish>, ApiError> {
        let builder = self.request_with_query(Method::GET, "/api/dishes", &params.pairs())?;
        let envelope: Envelope<Vec<Dish>> = self.send(builder).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    /// `GET /api/dishes/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the dish does not exist.
    #[instrument(skip(self, id), fields(dish_id = %id))]
    pub async fn get_dish(&self, id: &DishId) -> Result<Dish, ApiError> {
        let path = format!("/api/dishes/{id}");
        let envelope: Envelope<Dish> = self.send(self.request(Method::GET, &path)?).await?;
        envelope.into_required()
    }

    /// `GET /api/categories`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let envelope: Envelope<Vec<Category>> =
            self.send(self.request(Method::GET, "/api/categories")?).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dish_params_skip_unset() {
        assert!(DishParams::default().pairs().is_empty());

        let params = DishParams {
            category: None,
            search: Some("paneer".to_string()),
        };
        assert_eq!(params.pairs(), [("search", "paneer")]);
    }
}
