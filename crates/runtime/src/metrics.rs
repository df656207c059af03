use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Clone, Default)]
pub struct MetricsRegistry {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    purchases_accepted: AtomicU64,
    purchases_rejected: AtomicU64,
    tickets_sold: AtomicU64,
    seats_reserved: AtomicU64,
    revenue: AtomicU64,
    largest_purchase: AtomicU64,
}

impl MetricsRegistry {
    pub fn record_accepted(&self, tickets: u64, seats: u64, amount: u64) {
        self.inner.purchases_accepted.fetch_add(1, Ordering::Relaxed);
        self.inner.tickets_sold.fetch_add(tickets, Ordering::Relaxed);
        self.inner.seats_reserved.fetch_add(seats, Ordering::Relaxed);
        self.inner.revenue.fetch_add(amount, Ordering::Relaxed);
        self.inner.largest_purchase.fetch_max(tickets, Ordering::Relaxed);
    }

    pub fn inc_rejected(&self, delta: u64) {
        self.inner.purchases_rejected.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            purchases_accepted: self.inner.purchases_accepted.load(Ordering::Relaxed),
            purchases_rejected: self.inner.purchases_rejected.load(Ordering::Relaxed),
            tickets_sold: self.inner.tickets_sold.load(Ordering::Relaxed),
            seats_reserved: self.inner.seats_reserved.load(Ordering::Relaxed),
            revenue: self.inner.revenue.load(Ordering::Relaxed),
            largest_purchase: self.inner.largest_purchase.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub purchases_accepted: u64,
    pub purchases_rejected: u64,
    pub tickets_sold: u64,
    pub seats_reserved: u64,
    pub revenue: u64,
    pub largest_purchase: u64,
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            label: &'a str,
            #[serde(flatten)]
            counters: &'a MetricsSnapshot,
            elapsed_ms: Option<u128>,
        }

        let payload = Snapshot {
            label,
            counters: self,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

pub struct RunTimer {
    start: Instant,
}

impl RunTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
