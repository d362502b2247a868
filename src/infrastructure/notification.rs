use crate::domain::order::{Order, UpdateRecord};
use crate::domain::ports::NotificationDispatcher;
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Logs each notification instead of delivering it. Stands in for the
/// real delivery transport, which lives outside the engine.
#[derive(Debug, Default, Clone)]
pub struct LoggingDispatcher;

impl LoggingDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationDispatcher for LoggingDispatcher {
    async fn notify(&self, order: &Order, record: &UpdateRecord) -> Result<()> {
        info!(
            order = order.id(),
            stage = %record.stage_at_record,
            note = %record.note,
            "client notified of update"
        );
        Ok(())
    }
}
