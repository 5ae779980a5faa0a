use crate::domain::model::ProductId;
use thiserror::Error;

/// 錯誤分類，對應購物車操作失敗的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 目標商品不在購物車中
    NotFound,
    /// 遠端商品或庫存查詢失敗
    Remote,
    /// 數量驗證失敗 (超出庫存、數量為 0)
    Validation,
    /// 持久化讀寫失敗
    Storage,
    /// 配置錯誤
    Config,
}

#[derive(Error, Debug)]
pub enum CartError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Remote lookup failed: {message}")]
    RemoteError { message: String },

    #[error("Product {product_id} is not in the cart")]
    ProductNotInCart { product_id: ProductId },

    #[error("Requested amount {requested} for product {product_id} exceeds stock of {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("Invalid amount {amount} for product {product_id}")]
    InvalidAmount { product_id: ProductId, amount: u32 },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl CartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::ApiError(_) | CartError::UrlError(_) | CartError::RemoteError { .. } => {
                ErrorKind::Remote
            }
            CartError::IoError(_) | CartError::SerializationError(_) | CartError::StorageError { .. } => {
                ErrorKind::Storage
            }
            CartError::ProductNotInCart { .. } => ErrorKind::NotFound,
            CartError::OutOfStock { .. } | CartError::InvalidAmount { .. } => ErrorKind::Validation,
            CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::MissingConfigError { .. } => ErrorKind::Config,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self.kind() {
            ErrorKind::NotFound => format!("Product not found in cart: {}", self),
            ErrorKind::Remote => format!("Could not reach the product API: {}", self),
            ErrorKind::Validation => self.to_string(),
            ErrorKind::Storage => format!("Could not read or write the saved cart: {}", self),
            ErrorKind::Config => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "Run `rocket-cart list` to see which products are in the cart",
            ErrorKind::Remote => "Check that the API is running and --api-url points to it",
            ErrorKind::Validation => "Choose an amount between 1 and the available stock",
            ErrorKind::Storage => "Check that --storage-path exists and is writable",
            ErrorKind::Config => "Fix the configuration file or command-line flags and retry",
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
