use anyhow::Context;
use clap::Parser;
use rocket_cart::core::{ConfigProvider, Notifier, ProductSource};
use rocket_cart::utils::{logger, validation::Validate};
use rocket_cart::{
    Cart, CartError, CartStore, CliConfig, Command, ConsoleNotifier, FileStore, HttpProductSource,
    Product, TracingNotifier, UpdateProductAmount,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose());
    }
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let source = HttpProductSource::from_config(&config)
        .context("failed to create product API client")?;
    let storage = FileStore::new(config.storage_path());
    // JSON 日誌模式下通知也進入日誌流
    let notifier: Box<dyn Notifier> = if config.json_logs() {
        Box::new(TracingNotifier)
    } else {
        Box::new(ConsoleNotifier)
    };
    let store = CartStore::new(storage, source, notifier);

    tracing::info!(
        "🛒 Cart loaded from {} ({} products)",
        config.storage_path(),
        store.cart().len()
    );

    let result = match cli.command {
        Command::Catalog => match store.source().products().await {
            Ok(products) => {
                print_catalog(&products, &store.cart());
                return Ok(());
            }
            Err(e) => Err(e),
        },
        Command::List => Ok(()),
        Command::Add { product_id } => store.add_product(product_id).await,
        Command::Remove { product_id } => store.remove_product(product_id),
        Command::Update { product_id, amount } => {
            store
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await
        }
    };

    if let Err(e) = result {
        report_failure(&e);
        std::process::exit(2);
    }

    print_cart(&store.cart());
    Ok(())
}

fn report_failure(e: &CartError) {
    tracing::error!("❌ Cart operation failed: {} (kind: {:?})", e, e.kind());
    tracing::info!("💡 Recovery suggestion: {}", e.recovery_suggestion());
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("🛒 Cart is empty");
        return;
    }

    println!("🛒 Cart ({} products)", cart.len());
    for item in cart {
        println!(
            "  #{:<4} {:<40} {:>3} x {:>10.2} = {:>10.2}",
            item.id,
            item.title,
            item.amount,
            item.price,
            item.subtotal()
        );
    }
    println!("  Total: {:.2}", cart.total());
}

fn print_catalog(products: &[Product], cart: &Cart) {
    let amounts = cart.amounts();

    for product in products {
        let in_cart = amounts.get(&product.id).copied().unwrap_or(0);
        println!(
            "  #{:<4} {:<40} {:>10.2}  [{} in cart]",
            product.id, product.title, product.price, in_cart
        );
    }
}
