use atelier::application::projector::{self, Progress};
use atelier::application::recorder::UpdateRecorder;
use atelier::domain::order::{Order, PaymentStatus};
use atelier::domain::ports::{NotificationDispatcherBox, OrderStoreBox};
use atelier::infrastructure::in_memory::InMemoryOrderStore;
use atelier::infrastructure::notification::LoggingDispatcher;
use atelier::interfaces::csv::order_writer::OrderWriter;
use atelier::interfaces::csv::update_reader::{Command, UpdateReader};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input update feed CSV file
    input: PathBuf,

    /// Emit full order reports (history and progress) as JSON instead of
    /// the CSV summary
    #[arg(long)]
    json: bool,
}

/// Full read-model for one order, as the presentation layer consumes it.
#[derive(Serialize)]
struct OrderReport {
    order: Order,
    balance: Decimal,
    payment_status: PaymentStatus,
    progress: Progress,
}

impl From<Order> for OrderReport {
    fn from(order: Order) -> Self {
        Self {
            balance: order.balance().value().normalize(),
            payment_status: order.payment_status(),
            progress: projector::project(&order),
            order,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let orders: OrderStoreBox = Box::new(InMemoryOrderStore::new());
    let dispatcher: NotificationDispatcherBox = Box::new(LoggingDispatcher::new());
    let recorder = UpdateRecorder::new(orders, dispatcher);

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = UpdateReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(Command::Open { order, total }) => {
                if let Err(e) = recorder.open_order(order, total).await {
                    warn!(order, error = %e, "could not open order");
                }
            }
            Ok(Command::Update { order, draft }) => {
                if let Err(e) = recorder.submit(order, draft).await {
                    warn!(order, error = %e, "update rejected");
                }
            }
            Err(e) => warn!(error = %e, "skipping malformed row"),
        }
    }

    let mut orders = recorder.into_results().await.into_diagnostic()?;
    orders.sort_by_key(Order::id);

    let stdout = io::stdout();
    if cli.json {
        let reports: Vec<OrderReport> = orders.into_iter().map(OrderReport::from).collect();
        serde_json::to_writer_pretty(stdout.lock(), &reports).into_diagnostic()?;
        println!();
    } else {
        let mut writer = OrderWriter::new(stdout.lock());
        writer.write_orders(&orders).into_diagnostic()?;
    }

    Ok(())
}
