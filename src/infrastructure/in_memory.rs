use crate::domain::order::{Order, OrderId};
use crate::domain::ports::OrderStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for orders.
///
/// Uses `Arc<RwLock<HashMap<OrderId, Order>>>` to allow shared concurrent
/// access. Ideal for testing and batch runs where persistence is not
/// required.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn store(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id(), order);
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn all_orders(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_store_and_retrieve() {
        let store = InMemoryOrderStore::new();
        let order = Order::new(1, Amount::new(dec!(5000)).unwrap());

        store.store(order.clone()).await.unwrap();
        let retrieved = store.get(1).await.unwrap().unwrap();
        assert_eq!(retrieved, order);

        assert!(store.get(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_all_orders() {
        let store = InMemoryOrderStore::new();
        for id in 1..=3 {
            store
                .store(Order::new(id, Amount::new(dec!(100)).unwrap()))
                .await
                .unwrap();
        }

        let all = store.all_orders().await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_store_overwrites_same_id() {
        let store = InMemoryOrderStore::new();
        store
            .store(Order::new(1, Amount::new(dec!(100)).unwrap()))
            .await
            .unwrap();
        store
            .store(Order::new(1, Amount::new(dec!(200)).unwrap()))
            .await
            .unwrap();

        let retrieved = store.get(1).await.unwrap().unwrap();
        assert_eq!(retrieved.total_amount().value(), dec!(200));
        assert_eq!(store.all_orders().await.unwrap().len(), 1);
    }
}
