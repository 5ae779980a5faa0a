pub mod notice;
pub mod repository;
pub mod store;

pub use crate::domain::model::{Cart, LineItem, Product, ProductId, Stock, UpdateProductAmount};
pub use crate::domain::ports::{ConfigProvider, KeyValueStore, Notifier, ProductSource};
pub use crate::utils::error::Result;
