use std::sync::Arc;

use client_core::ApiError;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use uuid::Uuid;
use validator::Validate;

use crate::gateway::{Payload, RequestGateway, RequestOptions};
use crate::models::inventory::{
    BulkAddRequest, BulkAddResponse, DetectedItem, InventoryItem, NewInventoryItem,
    ScanReceiptResponse, UpdateInventoryItem,
};

/// Ingredient inventory CRUD plus receipt scanning.
pub struct InventoryService {
    gateway: Arc<RequestGateway>,
}

impl InventoryService {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<InventoryItem>, ApiError> {
        let items: Vec<InventoryItem> = self.gateway.get("/inventory").await?;
        Ok(items.into_iter().map(InventoryItem::sanitized).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<InventoryItem, ApiError> {
        let item: InventoryItem = self.gateway.get(&format!("/inventory/{}", id)).await?;
        Ok(item.sanitized())
    }

    pub async fn create(&self, item: &NewInventoryItem) -> Result<InventoryItem, ApiError> {
        item.validate()?;
        let created: InventoryItem = self.gateway.post("/inventory", item).await?;
        Ok(created.sanitized())
    }

    pub async fn update(
        &self,
        id: Uuid,
        item: &NewInventoryItem,
    ) -> Result<InventoryItem, ApiError> {
        item.validate()?;
        let updated: InventoryItem = self
            .gateway
            .put(&format!("/inventory/{}", id), item)
            .await?;
        Ok(updated.sanitized())
    }

    pub async fn patch(
        &self,
        id: Uuid,
        update: &UpdateInventoryItem,
    ) -> Result<InventoryItem, ApiError> {
        let updated: InventoryItem = self
            .gateway
            .patch(&format!("/inventory/{}", id), update)
            .await?;
        Ok(updated.sanitized())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.gateway.delete(&format!("/inventory/{}", id)).await
    }

    pub async fn toggle_staple(&self, id: Uuid) -> Result<InventoryItem, ApiError> {
        let updated: InventoryItem = self
            .gateway
            .send(
                Method::POST,
                &format!("/inventory/{}/toggle-staple", id),
                Payload::Empty,
                RequestOptions::authenticated(),
            )
            .await?;
        Ok(updated.sanitized())
    }

    /// Upload a receipt image; returns the line items the backend detected.
    pub async fn scan_receipt(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Vec<DetectedItem>, ApiError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("image", part);

        let response: ScanReceiptResponse = self
            .gateway
            .send(
                Method::POST,
                "/inventory/scan-receipt",
                Payload::Multipart(form),
                RequestOptions::authenticated(),
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(DetectedItem::sanitized)
            .collect())
    }

    /// Add several items at once, typically the confirmed subset of a scan.
    pub async fn bulk_add(
        &self,
        items: Vec<NewInventoryItem>,
    ) -> Result<Vec<InventoryItem>, ApiError> {
        let request = BulkAddRequest { items };
        request.validate()?;

        let response: BulkAddResponse = self.gateway.post("/inventory/bulk-add", &request).await?;
        Ok(response
            .items
            .into_iter()
            .map(InventoryItem::sanitized)
            .collect())
    }
}
