//! JSON file persistence for product records
//!
//! The whole array is serialized in memory and replaces the file in one
//! write; there is no append or partial update.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::Product;
use crate::error::{ScraperError, ScraperResult};

/// Product array stored as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonProductStore {
    path: PathBuf,
}

impl JsonProductStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with `products`, creating the parent directory if needed
    pub async fn save(&self, products: &[Product]) -> ScraperResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ScraperError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(products)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| ScraperError::io(&self.path, e))?;

        info!("💾 Wrote {} product(s) to {}", products.len(), self.path.display());
        Ok(())
    }

    /// Read a previously written array back
    pub async fn load(&self) -> ScraperResult<Vec<Product>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScraperError::InputMissing {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(ScraperError::io(&self.path, e)),
        };

        let products: Vec<Product> = serde_json::from_str(&raw)?;
        debug!("Loaded {} product(s) from {}", products.len(), self.path.display());
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttributeKey, StockStatus};
    use tempfile::TempDir;

    fn sample() -> Product {
        let mut product = Product {
            name: "Pisco Acholado Añejo".into(),
            price: 89.9,
            regular_price: 99.9,
            sale_price: Some(89.9),
            stock_status: StockStatus::InStock,
            url: "https://panuts.com/producto/pisco-acholado/".into(),
            source: "panuts.com".into(),
            external_id: "pisco-acholado".into(),
            ..Default::default()
        };
        product.attributes.insert(AttributeKey::Pais, "Perú".into());
        product
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_keeps_non_ascii() {
        let dir = TempDir::new().unwrap();
        let store = JsonProductStore::new(dir.path().join("nested").join("products.json"));

        store.save(&[sample()]).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("Añejo"));
        assert!(raw.contains("\"pais\": \"Perú\""));
        assert!(raw.starts_with("[\n  {"));
    }

    #[tokio::test]
    async fn test_load_reads_back_saved_records() {
        let dir = TempDir::new().unwrap();
        let store = JsonProductStore::new(dir.path().join("products.json"));

        store.save(&[sample()]).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, vec![sample()]);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_input_missing() {
        let dir = TempDir::new().unwrap();
        let store = JsonProductStore::new(dir.path().join("absent.json"));

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, ScraperError::InputMissing { .. }));
    }

    #[tokio::test]
    async fn test_load_tolerates_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, r#"[{"name": "Vino", "url": "https://panuts.com/producto/vino/"}]"#).unwrap();

        let loaded = JsonProductStore::new(&path).load().await.unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Vino");
        assert!(loaded[0].attributes.is_empty());
    }
}
