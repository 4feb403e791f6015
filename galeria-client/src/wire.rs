//! Backend JSON shapes
//!
//! The backend keys documents by `_id` and names sale lines per catalog
//! (`productId` / `ceramicId`); these DTOs translate to the shared model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{CatalogEntry, Sale, SaleLine, SalePayload};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireCatalogEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    #[serde(default)]
    pub active: bool,
    pub img_url: Option<String>,
}

impl From<WireCatalogEntry> for CatalogEntry {
    fn from(w: WireCatalogEntry) -> Self {
        Self {
            id: w.id,
            name: w.name,
            price: w.price,
            description: w.description,
            active: w.active,
            image_ref: w.img_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireProductLine {
    pub product_id: String,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireCeramicLine {
    pub ceramic_id: String,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
}

impl From<&SaleLine> for WireProductLine {
    fn from(line: &SaleLine) -> Self {
        Self {
            product_id: line.reference_id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.unit_price,
        }
    }
}

impl From<&SaleLine> for WireCeramicLine {
    fn from(line: &SaleLine) -> Self {
        Self {
            ceramic_id: line.reference_id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.unit_price,
        }
    }
}

impl From<WireProductLine> for SaleLine {
    fn from(w: WireProductLine) -> Self {
        Self {
            reference_id: w.product_id,
            name: w.name,
            quantity: w.quantity,
            unit_price: w.price,
        }
    }
}

impl From<WireCeramicLine> for SaleLine {
    fn from(w: WireCeramicLine) -> Self {
        Self {
            reference_id: w.ceramic_id,
            name: w.name,
            quantity: w.quantity,
            unit_price: w.price,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSaleRequest {
    pub products: Vec<WireProductLine>,
    pub ceramics: Vec<WireCeramicLine>,
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub date: DateTime<Utc>,
    pub is_expense: bool,
}

impl From<&SalePayload> for WireSaleRequest {
    fn from(p: &SalePayload) -> Self {
        Self {
            products: p.products.iter().map(Into::into).collect(),
            ceramics: p.ceramics.iter().map(Into::into).collect(),
            total_amount: p.total_amount,
            customer: p.customer.clone(),
            date: p.date,
            is_expense: p.is_expense,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSale {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub products: Vec<WireProductLine>,
    #[serde(default)]
    pub ceramics: Vec<WireCeramicLine>,
    pub total_amount: f64,
    pub customer: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_expense: bool,
}

impl From<WireSale> for Sale {
    fn from(w: WireSale) -> Self {
        Self {
            id: w.id,
            products: w.products.into_iter().map(Into::into).collect(),
            ceramics: w.ceramics.into_iter().map(Into::into).collect(),
            total_amount: w.total_amount,
            customer: w.customer,
            date: w.date,
            is_expense: w.is_expense,
        }
    }
}
