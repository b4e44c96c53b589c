//! Catalog configuration.
//!
//! Hosts may build a `CatalogConfig` by hand or deserialize it from whatever
//! settings format they already use; every field has a default matching the
//! public creature API.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/pokemon";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "./assets/images/pokeball_placeholder.png";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Collection endpoint; list and detail URLs are derived from it.
    pub base_url: String,
    pub page_size: u32,
    /// Image shown for records without any sprite.
    pub placeholder_image: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(())
    }
}
