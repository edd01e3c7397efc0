//! Catalog service.

use super::product::{NewProduct, Product, ProductPatch, ProductStatus};
use super::seed::demo_products;
use crate::error::CommerceError;
use crate::pagination::{PageSettings, Pagination};
use ec_store::{CrudRepository, EntityStore, Filter, FindParams};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Catalog listing query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductQuery {
    /// Only products with this status.
    pub status: Option<ProductStatus>,
    /// 1-based page number.
    pub page: Option<usize>,
    /// Page size.
    pub limit: Option<usize>,
}

impl ProductQuery {
    pub fn published() -> Self {
        Self {
            status: Some(ProductStatus::Published),
            ..Default::default()
        }
    }

    fn filter(&self) -> Option<Filter> {
        self.status
            .map(|status| Filter::new().with("status", status.as_str()))
    }
}

/// One page of products, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// Product catalog backed by a CRUD repository.
pub struct CatalogService {
    repo: CrudRepository<Product, NewProduct, ProductPatch>,
    pages: PageSettings,
}

impl CatalogService {
    /// Create a catalog whose store starts with (and resets to) `seed`.
    pub fn new(pages: PageSettings, seed: Vec<Product>) -> Self {
        let store = Arc::new(EntityStore::with_seed(seed));
        Self {
            repo: CrudRepository::new(
                store,
                Product::from_input,
                |existing: &Product, patch: ProductPatch| existing.merged(patch),
            ),
            pages,
        }
    }

    /// Create a catalog seeded with the demo products.
    pub fn with_demo_data(pages: PageSettings) -> Self {
        Self::new(pages, demo_products())
    }

    /// List products matching the query.
    pub fn get_products(&self, query: &ProductQuery) -> ProductPage {
        let (page, limit) = self.pages.resolve(query.page, query.limit);
        let filter = query.filter();
        let total = self.repo.count(filter.as_ref());
        let pagination = Pagination::new(page, limit, total);

        let mut params = FindParams::new(limit, pagination.offset());
        params.filter = filter;

        ProductPage {
            products: self.repo.find_all(&params),
            pagination,
        }
    }

    pub fn get_product_by_id(&self, id: &str) -> Result<Product, CommerceError> {
        self.repo
            .find_by_id(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// Validate and create a product.
    pub fn create_product(&self, input: NewProduct) -> Result<Product, CommerceError> {
        input.validate()?;
        let product = self.repo.create(input);
        tracing::info!(product_id = %product.meta.id(), name = %product.name, "product created");
        Ok(product)
    }

    /// Validate and apply a partial update.
    pub fn update_product(&self, id: &str, patch: ProductPatch) -> Result<Product, CommerceError> {
        patch.validate()?;
        let product = self
            .repo
            .update(id, patch)
            .map_err(|_| CommerceError::ProductNotFound(id.to_string()))?;
        tracing::info!(product_id = %id, status = product.status.as_str(), "product updated");
        Ok(product)
    }

    /// Delete a product, returning whether it existed.
    pub fn delete_product(&self, id: &str) -> bool {
        let deleted = self.repo.delete(id);
        if deleted {
            tracing::info!(product_id = %id, "product deleted");
        }
        deleted
    }

    pub fn count(&self, status: Option<ProductStatus>) -> usize {
        let filter = status.map(|s| Filter::new().with("status", s.as_str()));
        self.repo.count(filter.as_ref())
    }

    /// Restore the seed catalog.
    pub fn reset(&self) {
        self.repo.store().reset();
    }
}
