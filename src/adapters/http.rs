use crate::core::{ConfigProvider, Product, ProductId, ProductSource, Stock};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// 透過 HTTP 查詢商品與庫存的 API 客戶端
#[derive(Debug, Clone)]
pub struct HttpProductSource {
    base_url: Url,
    client: Client,
}

impl HttpProductSource {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        // 確保以 `/` 結尾，join 時才不會覆蓋最後一段路徑
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            client: builder.build()?,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_base_url(), config.request_timeout())
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let body = response.error_for_status()?.json::<T>().await?;
        Ok(body)
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    async fn product(&self, product_id: ProductId) -> Result<Product> {
        self.get_json(&format!("products/{}", product_id)).await
    }

    async fn stock(&self, product_id: ProductId) -> Result<Stock> {
        self.get_json(&format!("stock/{}", product_id)).await
    }

    async fn products(&self) -> Result<Vec<Product>> {
        self.get_json("products").await
    }
}
