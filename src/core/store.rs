use crate::core::notice::Notice;
use crate::core::repository::CartRepository;
use crate::core::{Cart, KeyValueStore, LineItem, Notifier, ProductId, ProductSource, UpdateProductAmount};
use crate::utils::error::{CartError, Result};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 購物車狀態容器。
///
/// 購物車只能透過 `add_product`、`remove_product`、`update_product_amount`
/// 修改；讀取一律回傳複本。每次成功的修改會先把整個購物車寫入儲存，寫入
/// 成功後才替換記憶體中的狀態。失敗時發出一則通知，狀態保持不變，並把
/// 錯誤回傳給呼叫端供記錄使用。
///
/// 同時進行的修改不做協調：每個操作在遠端呼叫前取得自己的快照，之後以該
/// 快照為基礎提交，最後寫入者勝出。
pub struct CartStore<S: KeyValueStore, P: ProductSource, N: Notifier> {
    repository: CartRepository<S>,
    source: P,
    notifier: N,
    cart: RwLock<Cart>,
}

impl<S: KeyValueStore, P: ProductSource, N: Notifier> CartStore<S, P, N> {
    /// 從儲存載入購物車並建立 store
    pub fn new(storage: S, source: P, notifier: N) -> Self {
        let repository = CartRepository::new(storage);
        let cart = repository.load();

        Self {
            repository,
            source,
            notifier,
            cart: RwLock::new(cart),
        }
    }

    /// 目前購物車的快照
    pub fn cart(&self) -> Cart {
        self.read_cart().clone()
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub async fn add_product(&self, product_id: ProductId) -> Result<()> {
        let snapshot = self.cart();

        if let Some(existing) = snapshot.get(product_id) {
            let amount = existing.amount.saturating_add(1);
            return self
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await;
        }

        let result = self.append_product(snapshot, product_id).await;
        self.report(result, |_| Notice::AddFailed)
    }

    pub fn remove_product(&self, product_id: ProductId) -> Result<()> {
        let mut next = self.cart();

        let result = match next.position(product_id) {
            Some(index) => {
                let removed = next.remove(index);
                tracing::debug!("Removing product {} ({})", removed.id, removed.title);
                self.commit(next)
            }
            None => Err(CartError::ProductNotInCart { product_id }),
        };

        self.report(result, |_| Notice::RemoveFailed)
    }

    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> Result<()> {
        let snapshot = self.cart();
        let result = self.apply_amount(snapshot, request).await;

        self.report(result, |e| match e {
            CartError::OutOfStock { .. } => Notice::OutOfStock,
            _ => Notice::UpdateFailed,
        })
    }

    async fn append_product(&self, mut snapshot: Cart, product_id: ProductId) -> Result<()> {
        tracing::debug!("Fetching product {}", product_id);
        let product = self.source.product(product_id).await?;

        snapshot.push(LineItem::from_product(product, 1));
        self.commit(snapshot)
    }

    async fn apply_amount(&self, mut snapshot: Cart, request: UpdateProductAmount) -> Result<()> {
        let UpdateProductAmount { product_id, amount } = request;

        if amount == 0 {
            return Err(CartError::InvalidAmount { product_id, amount });
        }

        tracing::debug!("Fetching stock for product {}", product_id);
        let stock = self.source.stock(product_id).await?;

        if amount > stock.amount {
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let item = snapshot
            .get_mut(product_id)
            .ok_or(CartError::ProductNotInCart { product_id })?;
        item.amount = amount;

        self.commit(snapshot)
    }

    /// 先寫入儲存，成功後才替換記憶體狀態
    fn commit(&self, next: Cart) -> Result<()> {
        self.repository.save(&next)?;
        *self.write_cart() = next;
        Ok(())
    }

    fn report(&self, result: Result<()>, notice_for: impl FnOnce(&CartError) -> Notice) -> Result<()> {
        if let Err(e) = &result {
            let notice = notice_for(e);
            tracing::warn!(kind = ?e.kind(), "{}: {}", notice, e);
            self.notifier.error(notice.message());
        }
        result
    }

    fn read_cart(&self) -> RwLockReadGuard<'_, Cart> {
        self.cart.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cart(&self) -> RwLockWriteGuard<'_, Cart> {
        self.cart.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notifier::CollectingNotifier;
    use crate::adapters::storage::MemoryStore;
    use crate::core::repository::CART_STORAGE_KEY;
    use crate::core::{Product, Stock};
    use crate::utils::error::ErrorKind;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeSource {
        products: HashMap<ProductId, Product>,
        stock: HashMap<ProductId, u32>,
    }

    impl FakeSource {
        fn with_product(mut self, id: ProductId, price: f64, stock: u32) -> Self {
            self.products.insert(
                id,
                Product {
                    id,
                    title: format!("Tênis {}", id),
                    price,
                    image: format!("https://example.com/{}.jpg", id),
                },
            );
            self.stock.insert(id, stock);
            self
        }
    }

    #[async_trait]
    impl ProductSource for FakeSource {
        async fn product(&self, product_id: ProductId) -> Result<Product> {
            // 讓出執行權，模擬遠端呼叫的暫停點
            tokio::task::yield_now().await;
            self.products
                .get(&product_id)
                .cloned()
                .ok_or_else(|| CartError::RemoteError {
                    message: format!("no product {}", product_id),
                })
        }

        async fn stock(&self, product_id: ProductId) -> Result<Stock> {
            self.stock
                .get(&product_id)
                .map(|&amount| Stock {
                    id: product_id,
                    amount,
                })
                .ok_or_else(|| CartError::RemoteError {
                    message: format!("no stock {}", product_id),
                })
        }

        async fn products(&self) -> Result<Vec<Product>> {
            Ok(self.products.values().cloned().collect())
        }
    }

    /// 讀取正常、寫入一律失敗的儲存
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.0.get_item(key)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(CartError::StorageError {
                message: "quota exceeded".to_string(),
            })
        }
    }

    type TestStore = CartStore<Arc<MemoryStore>, FakeSource, Arc<CollectingNotifier>>;

    fn store_with(source: FakeSource) -> (TestStore, Arc<MemoryStore>, Arc<CollectingNotifier>) {
        let storage = Arc::new(MemoryStore::new());
        let notifier = Arc::new(CollectingNotifier::new());
        let store = CartStore::new(storage.clone(), source, notifier.clone());
        (store, storage, notifier)
    }

    fn saved(storage: &MemoryStore) -> Option<String> {
        storage.get_item(CART_STORAGE_KEY).unwrap()
    }

    #[tokio::test]
    async fn test_add_new_product_appends_with_amount_one() {
        let source = FakeSource::default()
            .with_product(1, 100.0, 5)
            .with_product(2, 50.0, 5);
        let (store, storage, notifier) = store_with(source);

        store.add_product(2).await.unwrap();
        store.add_product(1).await.unwrap();

        let cart = store.cart();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0].id, 2);
        assert_eq!(cart.items()[1].id, 1);
        assert_eq!(cart.items()[1].amount, 1);
        assert_eq!(cart.items()[1].price, 100.0);
        assert_eq!(saved(&storage), Some(serde_json::to_string(&cart).unwrap()));
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_product_increments_amount() {
        let source = FakeSource::default().with_product(1, 100.0, 3);
        let (store, _storage, _notifier) = store_with(source);

        store.add_product(1).await.unwrap();
        store.add_product(1).await.unwrap();

        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).unwrap().amount, 2);
    }

    #[tokio::test]
    async fn test_add_existing_product_beyond_stock_reports_out_of_stock() {
        let source = FakeSource::default().with_product(1, 100.0, 1);
        let (store, storage, notifier) = store_with(source);

        store.add_product(1).await.unwrap();
        let before = saved(&storage);

        let err = store.add_product(1).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.cart().get(1).unwrap().amount, 1);
        assert_eq!(saved(&storage), before);
        assert_eq!(
            notifier.messages(),
            vec![Notice::OutOfStock.message().to_string()]
        );
    }

    #[tokio::test]
    async fn test_add_unknown_product_reports_add_failure() {
        let (store, storage, notifier) = store_with(FakeSource::default());

        let err = store.add_product(42).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Remote);

        assert!(store.cart().is_empty());
        assert_eq!(saved(&storage), None);
        assert_eq!(notifier.messages(), vec!["Erro na adição do produto".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_present_and_absent_products() {
        let source = FakeSource::default()
            .with_product(1, 100.0, 5)
            .with_product(2, 50.0, 5);
        let (store, storage, notifier) = store_with(source);
        store.add_product(1).await.unwrap();
        store.add_product(2).await.unwrap();

        store.remove_product(1).unwrap();
        assert_eq!(store.cart().len(), 1);
        assert!(!store.cart().contains(1));

        let before = saved(&storage);
        let err = store.remove_product(1).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(store.cart().len(), 1);
        assert_eq!(saved(&storage), before);
        assert_eq!(notifier.messages(), vec!["Erro na remoção do produto".to_string()]);
    }

    #[tokio::test]
    async fn test_update_amount_changes_only_target_item() {
        let source = FakeSource::default()
            .with_product(1, 100.0, 5)
            .with_product(2, 50.0, 5)
            .with_product(3, 20.0, 5);
        let (store, _storage, _notifier) = store_with(source);
        for id in [1, 2, 3] {
            store.add_product(id).await.unwrap();
        }
        let before = store.cart();

        store
            .update_product_amount(UpdateProductAmount {
                product_id: 2,
                amount: 5,
            })
            .await
            .unwrap();

        let after = store.cart();
        let ids: Vec<ProductId> = after.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(after.items()[0], before.items()[0]);
        assert_eq!(after.items()[1].amount, 5);
        assert_eq!(after.items()[2], before.items()[2]);
    }

    #[tokio::test]
    async fn test_update_missing_product_reports_update_failure() {
        let source = FakeSource::default().with_product(9, 10.0, 5);
        let (store, storage, notifier) = store_with(source);

        let err = store
            .update_product_amount(UpdateProductAmount {
                product_id: 9,
                amount: 2,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(store.cart().is_empty());
        assert_eq!(saved(&storage), None);
        assert_eq!(
            notifier.messages(),
            vec!["Erro na alteração de quantidade do produto".to_string()]
        );
    }

    #[tokio::test]
    async fn test_update_to_zero_is_rejected() {
        let source = FakeSource::default().with_product(1, 10.0, 5);
        let (store, _storage, notifier) = store_with(source);
        store.add_product(1).await.unwrap();

        let err = store
            .update_product_amount(UpdateProductAmount {
                product_id: 1,
                amount: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::InvalidAmount { .. }));
        assert_eq!(store.cart().get(1).unwrap().amount, 1);
        assert_eq!(notifier.messages(), vec![Notice::UpdateFailed.message().to_string()]);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let seeded = MemoryStore::new();
        seeded
            .set_item(
                CART_STORAGE_KEY,
                r#"[{"id":1,"title":"Tênis 1","price":100.0,"image":"","amount":1}]"#,
            )
            .unwrap();
        let notifier = Arc::new(CollectingNotifier::new());
        let source = FakeSource::default()
            .with_product(1, 100.0, 5)
            .with_product(2, 50.0, 5);
        let store = CartStore::new(ReadOnlyStore(seeded), source, notifier.clone());

        assert!(store.add_product(2).await.is_err());
        assert!(store.remove_product(1).is_err());

        let err = store
            .update_product_amount(UpdateProductAmount {
                product_id: 1,
                amount: 2,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);

        // 已在購物車中：走數量更新的路徑
        let err = store.add_product(1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);

        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).unwrap().amount, 1);
        assert_eq!(
            notifier.messages(),
            vec![
                Notice::AddFailed.message().to_string(),
                Notice::RemoveFailed.message().to_string(),
                Notice::UpdateFailed.message().to_string(),
                Notice::UpdateFailed.message().to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_overlapping_adds_keep_one_line_item() {
        let source = FakeSource::default().with_product(1, 100.0, 5);
        let (store, storage, notifier) = store_with(source);

        let (first, second) = tokio::join!(store.add_product(1), store.add_product(1));

        assert!(first.is_ok());
        assert!(second.is_ok());
        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).unwrap().amount, 1);
        assert_eq!(saved(&storage), Some(serde_json::to_string(&cart).unwrap()));
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_store_restores_saved_cart() {
        let storage = Arc::new(MemoryStore::new());
        let source = FakeSource::default()
            .with_product(1, 100.0, 5)
            .with_product(2, 50.0, 5);
        let first = CartStore::new(storage.clone(), source, CollectingNotifier::new());

        tokio_test::block_on(async {
            first.add_product(1).await.unwrap();
            first.add_product(2).await.unwrap();
            first.add_product(2).await.unwrap();
        });

        let second = CartStore::new(
            storage.clone(),
            FakeSource::default(),
            CollectingNotifier::new(),
        );
        assert_eq!(second.cart(), first.cart());
    }
}
