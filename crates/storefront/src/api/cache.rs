//! Cache types for API responses.

/// Cache key for API responses.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    ProductList,
}
