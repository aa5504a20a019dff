//! Customer order endpoints.

use async_trait::async_trait;
use reqwest::Method;
use tracing::instrument;

use cloud_kitchen_core::OrderId;

use super::{ApiClient, ApiError, Envelope, OrderBackend};
use crate::models::{NewOrder, Order};

impl ApiClient {
    /// `GET /api/orders/my-orders`: the signed-in customer's orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or no customer is signed in.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let envelope: Envelope<Vec<Order>> = self
            .send(self.request(Method::GET, "/api/orders/my-orders")?)
            .await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    /// `GET /api/orders/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the order is not visible.
    #[instrument(skip(self, id), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let path = format!("/api/orders/{id}");
        let envelope: Envelope<Order> = self.send(self.request(Method::GET, &path)?).await?;
        envelope.into_required()
    }
}

#[async_trait]
impl OrderBackend for ApiClient {
    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    async fn create_order(&self, order: &NewOrder) -> Result<Option<Order>, ApiError> {
        let builder = self.request(Method::POST, "/api/orders")?.json(order);
        let envelope: Envelope<serde_json::Value> = self.send(builder).await?;

        // The order is placed once the backend says so; an echo in an
        // unexpected shape must not turn that into a failure.
        Ok(envelope.into_data()?.and_then(|data| {
            serde_json::from_value(data)
                .map_err(|e| tracing::debug!(error = %e, "Order echo did not parse"))
                .ok()
        }))
    }
}
