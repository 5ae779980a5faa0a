use crate::config::toml_config::{LoggingConfig, TomlConfig};
use crate::core::ProductId;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "rocket-cart")]
#[command(about = "Manage a Rocket Shoes shopping cart from the command line")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Product API base URL (overrides the config file)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Directory where the cart is saved (overrides the config file)
    #[arg(long)]
    pub storage_path: Option<String>,

    /// Request timeout for the product API
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the products available in the store
    Catalog,
    /// Show the current cart
    List,
    /// Add a product, or one more unit of a product already in the cart
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set the amount of a product already in the cart
    Update { product_id: ProductId, amount: u32 },
}

impl CliConfig {
    /// 載入設定檔 (若有指定) 並套用命令列覆蓋
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(api_url) = &self.api_url {
            config.api.base_url = api_url.clone();
        }
        if let Some(storage_path) = &self.storage_path {
            config.storage.path = storage_path.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.api.timeout_seconds = Some(timeout);
        }
        if self.verbose || self.json_logs {
            let logging = config.logging.get_or_insert_with(LoggingConfig::default);
            if self.verbose {
                logging.verbose = Some(true);
            }
            if self.json_logs {
                logging.format = Some("json".to_string());
            }
        }

        Ok(config)
    }
}
