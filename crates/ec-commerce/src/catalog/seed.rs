//! Demo catalog data.

use super::product::{Product, ProductStatus};
use chrono::{Duration, TimeZone, Utc};
use ec_store::EntityMeta;

/// Id of the first demo product.
pub const DEMO_PRODUCT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

const DEMO_PRODUCTS: &[(&str, &str, &str, i64, i64, ProductStatus)] = &[
    (
        DEMO_PRODUCT_ID,
        "Ceramic Mug",
        "Hand-thrown stoneware mug, 350ml.",
        1800,
        42,
        ProductStatus::Published,
    ),
    (
        "550e8400-e29b-41d4-a716-446655440001",
        "Linen Tote Bag",
        "Natural linen tote with inner pocket.",
        3200,
        15,
        ProductStatus::Published,
    ),
    (
        "550e8400-e29b-41d4-a716-446655440002",
        "Walnut Desk Lamp",
        "Adjustable LED lamp with a solid walnut base.",
        12800,
        6,
        ProductStatus::Published,
    ),
    (
        "550e8400-e29b-41d4-a716-446655440003",
        "Cotton Notebook",
        "A5 dot-grid notebook, 120 pages.",
        900,
        0,
        ProductStatus::Published,
    ),
    (
        "550e8400-e29b-41d4-a716-446655440004",
        "Brass Bookmark",
        "Engraved brass bookmark. Coming soon.",
        1500,
        25,
        ProductStatus::Draft,
    ),
    (
        "550e8400-e29b-41d4-a716-446655440005",
        "Glass Teapot",
        "Discontinued heat-resistant teapot.",
        4200,
        3,
        ProductStatus::Archived,
    ),
];

/// The demo product set.
///
/// Ids are fixed and creation times strictly increase in list order, so the
/// newest-first catalog listing is deterministic.
pub fn demo_products() -> Vec<Product> {
    let epoch = Utc
        .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);

    DEMO_PRODUCTS
        .iter()
        .enumerate()
        .map(|(i, (id, name, description, price, stock, status))| {
            let slug = name.to_lowercase().replace(' ', "-");
            Product {
                meta: EntityMeta::seeded(*id, epoch + Duration::days(i as i64)),
                name: name.to_string(),
                description: description.to_string(),
                price: *price,
                image_url: Some(format!("/images/products/{slug}.jpg")),
                stock: *stock,
                status: *status,
            }
        })
        .collect()
}
