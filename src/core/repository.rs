use crate::core::{Cart, KeyValueStore};
use crate::utils::error::Result;

/// 購物車在儲存中的固定 key
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// 把整個購物車當作一個 JSON 字串存在固定 key 底下
pub struct CartRepository<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> CartRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 讀取已儲存的購物車。沒有資料、讀取失敗或內容無法解析時回傳空購物車。
    pub fn load(&self) -> Cart {
        let raw = match self.storage.get_item(CART_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No saved cart found, starting empty");
                return Cart::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read saved cart, starting empty: {}", e);
                return Cart::new();
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => {
                tracing::debug!("Loaded saved cart with {} products", cart.len());
                cart
            }
            Err(e) => {
                tracing::warn!("Saved cart is malformed, starting empty: {}", e);
                Cart::new()
            }
        }
    }

    /// 整份覆寫
    pub fn save(&self, cart: &Cart) -> Result<()> {
        let json = serde_json::to_string(cart)?;
        self.storage.set_item(CART_STORAGE_KEY, &json)?;
        tracing::debug!("Saved cart with {} products ({} bytes)", cart.len(), json.len());
        Ok(())
    }
}
