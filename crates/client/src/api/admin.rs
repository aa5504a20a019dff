//! Admin endpoints: dashboard, dish creation, order management.
//!
//! These are authenticated by the session cookie set at `/admin/login`
//! (kept in the client's cookie store) or by the admin bearer token.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use cloud_kitchen_core::{DishType, OrderId, OrderStatus, Price};

use super::{AdminBackend, ApiClient, ApiError, Envelope};
use crate::models::{Dashboard, Order, StatusUpdate};

/// An image to upload with a new dish.
#[derive(Debug, Clone)]
pub struct DishImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl DishImage {
    /// Read an image from disk, guessing its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::File` if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self {
            mime: mime_for(path),
            file_name,
            bytes,
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Form fields for `POST /admin/add-dish`.
#[derive(Debug, Clone)]
pub struct NewDish {
    pub name: String,
    pub dish_type: DishType,
    pub category: String,
    pub price: Price,
    pub description: String,
    pub image: Option<DishImage>,
}

impl NewDish {
    fn into_form(self) -> Result<Form, ApiError> {
        let form = Form::new()
            .text("name", self.name)
            .text("type", self.dish_type.as_str())
            .text("category", self.category)
            .text("price", self.price.amount().to_string())
            .text("description", self.description);

        Ok(match self.image {
            Some(image) => form.part(
                "image",
                Part::bytes(image.bytes)
                    .file_name(image.file_name)
                    .mime_str(image.mime)?,
            ),
            None => form,
        })
    }
}

#[async_trait]
impl AdminBackend for ApiClient {
    #[instrument(skip(self))]
    async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        let envelope: Envelope<Dashboard> =
            self.send(self.request(Method::GET, "/admin/dashboard")?).await?;
        envelope.into_required()
    }

    #[instrument(skip(self, dish), fields(name = %dish.name))]
    async fn add_dish(&self, dish: NewDish) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/admin/add-dish")?
            .multipart(dish.into_form()?);
        let envelope: Envelope<serde_json::Value> = self.send(builder).await?;
        envelope.into_data().map(|_| ())
    }

    #[instrument(skip(self))]
    async fn admin_orders(&self) -> Result<Vec<Order>, ApiError> {
        let envelope: Envelope<Vec<Order>> =
            self.send(self.request(Method::GET, "/admin/orders")?).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    #[instrument(skip(self, id, status), fields(order_id = %id, status = %status))]
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let path = format!("/admin/orders/{id}/status");
        let builder = self
            .request(Method::POST, &path)?
            .json(&StatusUpdate { status });
        let envelope: Envelope<serde_json::Value> = self.send(builder).await?;
        envelope.into_data().map(|_| ())
    }
}
