use crate::domain::model::{Product, ProductId, Stock};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 以名稱存取單一字串的同步 key/value 儲存 (最後寫入者勝出)
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// 遠端商品與庫存查詢
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn product(&self, product_id: ProductId) -> Result<Product>;
    async fn stock(&self, product_id: ProductId) -> Result<Stock>;
    async fn products(&self) -> Result<Vec<Product>>;
}

/// 使用者可見的錯誤通知，發出後不等待回應
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}

#[async_trait]
impl<T: ProductSource + ?Sized> ProductSource for std::sync::Arc<T> {
    async fn product(&self, product_id: ProductId) -> Result<Product> {
        (**self).product(product_id).await
    }

    async fn stock(&self, product_id: ProductId) -> Result<Stock> {
        (**self).stock(product_id).await
    }

    async fn products(&self) -> Result<Vec<Product>> {
        (**self).products().await
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn error(&self, message: &str) {
        (**self).error(message)
    }
}
