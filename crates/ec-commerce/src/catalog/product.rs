//! Product types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use ec_store::{Entity, EntityMeta, FieldValue};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Product status in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Product is in draft mode, not visible to customers.
    #[default]
    Draft,
    /// Product is visible and can be purchased.
    Published,
    /// Product is archived, not visible but data preserved.
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Published => "published",
            ProductStatus::Archived => "archived",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "Draft",
            ProductStatus::Published => "Published",
            ProductStatus::Archived => "Archived",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ProductStatus::Draft),
            "published" => Ok(ProductStatus::Published),
            "archived" => Ok(ProductStatus::Archived),
            other => Err(CommerceError::Validation(format!(
                "unknown product status: {other}"
            ))),
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identity and timestamps.
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Product name.
    pub name: String,
    /// Full description.
    pub description: String,
    /// Unit price in minor units (JPY).
    pub price: i64,
    /// Image URL for listings.
    pub image_url: Option<String>,
    /// Units in stock.
    pub stock: i64,
    /// Product visibility status.
    pub status: ProductStatus,
}

impl Product {
    /// Build a new product from validated create input.
    pub fn from_input(input: NewProduct) -> Self {
        Self {
            meta: EntityMeta::new(),
            name: input.name.trim().to_string(),
            description: input.description,
            price: input.price,
            image_url: input.image_url,
            stock: input.stock,
            status: input.status.unwrap_or_default(),
        }
    }

    /// Apply a patch, keeping every field the patch leaves unset.
    pub fn merged(&self, patch: ProductPatch) -> Self {
        Self {
            meta: self.meta.clone(),
            name: patch
                .name
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| self.name.clone()),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
            price: patch.price.unwrap_or(self.price),
            image_url: patch.image_url.unwrap_or_else(|| self.image_url.clone()),
            stock: patch.stock.unwrap_or(self.stock),
            status: patch.status.unwrap_or(self.status),
        }
    }

    /// Typed id for references from carts and orders.
    pub fn product_id(&self) -> ProductId {
        ProductId::new(self.meta.id())
    }

    /// Check if the product can be added to a cart.
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Published
    }

    /// Check if any units are in stock.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Entity for Product {
    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(self.name.as_str().into()),
            "price" => Some(self.price.into()),
            "stock" => Some(self.stock.into()),
            "status" => Some(self.status.as_str().into()),
            _ => None,
        }
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub image_url: Option<String>,
    pub stock: i64,
    /// Defaults to draft.
    pub status: Option<ProductStatus>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            name: name.into(),
            price,
            ..Default::default()
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Check field constraints.
    pub fn validate(&self) -> Result<(), CommerceError> {
        validate_name(&self.name)?;
        validate_non_negative("price", self.price)?;
        validate_non_negative("stock", self.stock)
    }
}

/// Partial update of a product. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    /// `Some(None)` removes the image; JSON `null` deserializes to it.
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    pub stock: Option<i64>,
    pub status: Option<ProductStatus>,
}

/// Wrap a field that was present in the input, even as `null`.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl ProductPatch {
    /// Patch that only changes the status.
    pub fn status(status: ProductStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Check constraints on the fields being set.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_non_negative("price", price)?;
        }
        if let Some(stock) = self.stock {
            validate_non_negative("stock", stock)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), CommerceError> {
    if name.trim().is_empty() {
        return Err(CommerceError::Validation("name must not be empty".into()));
    }
    Ok(())
}

fn validate_non_negative(field: &str, value: i64) -> Result<(), CommerceError> {
    if value < 0 {
        return Err(CommerceError::Validation(format!(
            "{field} must not be negative (got {value})"
        )));
    }
    Ok(())
}
