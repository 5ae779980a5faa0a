pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{
    http::HttpProductSource,
    notifier::{CollectingNotifier, ConsoleNotifier, TracingNotifier},
    storage::{FileStore, MemoryStore},
};
pub use config::TomlConfig;
pub use self::core::{
    notice::Notice,
    repository::{CartRepository, CART_STORAGE_KEY},
    store::CartStore,
};
pub use domain::model::{Cart, LineItem, Product, ProductId, Stock, UpdateProductAmount};
pub use utils::error::{CartError, ErrorKind, Result};
