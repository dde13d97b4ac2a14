//! Catalog products.

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Price, ProductId};

/// A product as served by `GET /product/`.
///
/// Immutable once loaded. A product without a price is shown in the catalog
/// but is not for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// Image path relative to the CDN base (e.g. `/5_Dots.svg`).
    pub image: String,
    pub category: String,
    pub price: Option<Price>,
}

impl Product {
    /// Whether the product can be put in the cart.
    #[must_use]
    pub const fn is_for_sale(&self) -> bool {
        self.price.is_some()
    }

    /// Price used for totals: a missing price counts as zero.
    #[must_use]
    pub fn price_or_zero(&self) -> Price {
        self.price.unwrap_or(Price::ZERO)
    }

    /// Resolve the image path against the CDN base URL.
    ///
    /// The image path is appended to the base as-is, so a base of
    /// `https://cdn.example/content/weblarek` and an image of `/Shell.svg`
    /// yields `https://cdn.example/content/weblarek/Shell.svg`.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined string is not a valid URL.
    pub fn image_url(&self, cdn_base: &Url) -> Result<Url, url::ParseError> {
        let base = cdn_base.as_str().trim_end_matches('/');
        let path = if self.image.starts_with('/') {
            self.image.clone()
        } else {
            format!("/{}", self.image)
        };
        Url::parse(&format!("{base}{path}"))
    }
}

/// Envelope returned by the product list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductList {
    pub total: u32,
    pub items: Vec<Product>,
}
