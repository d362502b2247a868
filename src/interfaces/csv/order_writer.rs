use crate::domain::order::{Order, OrderId, PaymentStatus};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// One summary row per order. Derived fields are recomputed at write time,
/// never read from stored state.
#[derive(Debug, Serialize)]
struct OrderRow {
    order: OrderId,
    stage: &'static str,
    total: Decimal,
    paid: Decimal,
    balance: Decimal,
    payment_status: PaymentStatus,
    updates: usize,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            order: order.id(),
            stage: order.current_stage().as_str(),
            total: order.total_amount().value().normalize(),
            paid: order.amount_paid().value().normalize(),
            balance: order.balance().value().normalize(),
            payment_status: order.payment_status(),
            updates: order.history().len(),
        }
    }
}

/// Writes order summaries as CSV to any `Write` sink.
pub struct OrderWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OrderWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_orders(&mut self, orders: &[Order]) -> Result<()> {
        for order in orders {
            self.writer.serialize(OrderRow::from(order))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
