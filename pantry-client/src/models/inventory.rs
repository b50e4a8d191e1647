use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::sanitize::{sanitize, Policy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub is_staple: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    pub fn sanitized(mut self) -> Self {
        self.name = sanitize(&self.name, Policy::Strict);
        self.category = self.category.map(|c| sanitize(&c, Policy::Strict));
        self.unit = self.unit.map(|u| sanitize(&u, Policy::Strict));
        self
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewInventoryItem {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub is_staple: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for `PATCH /inventory/:id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateInventoryItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staple: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Validate)]
pub struct BulkAddRequest {
    #[validate(nested)]
    pub items: Vec<NewInventoryItem>,
}

/// One line item recognized on a scanned receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedItem {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl DetectedItem {
    pub fn sanitized(mut self) -> Self {
        self.name = sanitize(&self.name, Policy::Strict);
        self.category = self.category.map(|c| sanitize(&c, Policy::Strict));
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct ScanReceiptResponse {
    pub items: Vec<DetectedItem>,
}

#[derive(Debug, Deserialize)]
pub struct BulkAddResponse {
    pub items: Vec<InventoryItem>,
}
