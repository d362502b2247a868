use super::order::{Order, OrderId, UpdateRecord};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence boundary for orders. Assumed strongly consistent for a
/// single order; a commit is a single `store` call.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn store(&self, order: Order) -> Result<()>;
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;
    async fn all_orders(&self) -> Result<Vec<Order>>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;

/// Delivery transport for client notifications.
///
/// Fire-and-forget from the engine's perspective: a failed notify is
/// logged and ignored, never blocking or reversing a commit.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify(&self, order: &Order, record: &UpdateRecord) -> Result<()>;
}

pub type NotificationDispatcherBox = Box<dyn NotificationDispatcher>;
