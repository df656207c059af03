use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ct_core::{PurchaseOrder, TicketType, TicketTypeRequest};
use ct_purchase::{InvalidPurchase, PurchaseSummary, TicketServiceImpl};
use ct_runtime::metrics::{MetricsRegistry, RunTimer};
use ct_runtime::init_tracing;
use ct_services::{LoggingPaymentService, LoggingSeatReservationService};

/// Validate and price a cinema ticket purchase, then take payment and reserve seats.
#[derive(Debug, Parser)]
#[command(name = "purchase_demo")]
struct Args {
    /// Read the purchase from a JSON order file instead of the flags below.
    #[arg(long, conflicts_with_all = ["account_id", "adult", "child", "infant"])]
    order: Option<PathBuf>,

    #[arg(long, allow_negative_numbers = true)]
    account_id: Option<i64>,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    adult: i64,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    child: i64,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    infant: i64,
}

impl Args {
    fn into_order(self) -> Result<PurchaseOrder> {
        if let Some(path) = self.order {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading order file {}", path.display()))?;
            return PurchaseOrder::from_json(&raw)
                .with_context(|| format!("parsing order file {}", path.display()));
        }

        // Zero means "none of this type"; negatives still reach the constructor and fail there.
        let mut requests = Vec::new();
        for (ticket_type, n) in [
            (TicketType::Adult, self.adult),
            (TicketType::Child, self.child),
            (TicketType::Infant, self.infant),
        ] {
            if n != 0 {
                let req = TicketTypeRequest::new(ticket_type, n)
                    .with_context(|| format!("building {ticket_type} request"))?;
                requests.push(Some(req));
            }
        }
        Ok(PurchaseOrder { account_id: self.account_id, requests: Some(requests) })
    }
}

/// Runs one order through the service and records the outcome.
fn run_purchase(
    service: &TicketServiceImpl,
    order: &PurchaseOrder,
    metrics: &MetricsRegistry,
) -> Result<PurchaseSummary, InvalidPurchase> {
    match service.purchase_order(order) {
        Ok(summary) => {
            metrics.record_accepted(summary.tickets, summary.seats_reserved, summary.amount_paid);
            Ok(summary)
        }
        Err(err) => {
            metrics.inc_rejected(1);
            Err(err)
        }
    }
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let args = Args::parse();
    info!(?args, "purchase_demo starting");

    let order = args.into_order()?;
    let service = TicketServiceImpl::new(
        Arc::new(LoggingPaymentService),
        Arc::new(LoggingSeatReservationService),
    );
    info!(policy = ?service.policy(), "ticket policy");
    let metrics = MetricsRegistry::default();
    let timer = RunTimer::start();

    let code = match run_purchase(&service, &order, &metrics) {
        Ok(summary) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err} ({})", err.code());
            ExitCode::FAILURE
        }
    };

    println!("{}", metrics.snapshot().to_json_line("purchase_demo", Some(timer.elapsed())));
    Ok(code)
}
