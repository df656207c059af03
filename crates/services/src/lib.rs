//! Collaborator traits for payment and seat booking, with logging and recording implementations.

use std::sync::{Mutex, MutexGuard};

use ct_core::{AccountId, Money};
use tracing::info;

/// Charges an account. Assumed to always succeed.
pub trait TicketPaymentService: Send + Sync {
    fn make_payment(&self, account_id: AccountId, total_amount_to_pay: Money);
}

/// Reserves seats for an account. Assumed to always succeed.
pub trait SeatReservationService: Send + Sync {
    fn reserve_seat(&self, account_id: AccountId, total_seats_to_allocate: u64);
}

/// Payment stub that only emits a tracing event.
#[derive(Debug, Default)]
pub struct LoggingPaymentService;

impl TicketPaymentService for LoggingPaymentService {
    fn make_payment(&self, account_id: AccountId, total_amount_to_pay: Money) {
        info!(%account_id, amount = total_amount_to_pay, "payment taken");
    }
}

/// Reservation stub that only emits a tracing event.
#[derive(Debug, Default)]
pub struct LoggingSeatReservationService;

impl SeatReservationService for LoggingSeatReservationService {
    fn reserve_seat(&self, account_id: AccountId, total_seats_to_allocate: u64) {
        info!(%account_id, seats = total_seats_to_allocate, "seats reserved");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentCall {
    pub account_id: AccountId,
    pub amount: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationCall {
    pub account_id: AccountId,
    pub seats: u64,
}

/// Payment double that keeps every call it receives.
#[derive(Debug, Default)]
pub struct RecordingPaymentService {
    calls: Mutex<Vec<PaymentCall>>,
}

impl RecordingPaymentService {
    pub fn calls(&self) -> Vec<PaymentCall> {
        lock(&self.calls).clone()
    }
}

impl TicketPaymentService for RecordingPaymentService {
    fn make_payment(&self, account_id: AccountId, total_amount_to_pay: Money) {
        lock(&self.calls).push(PaymentCall { account_id, amount: total_amount_to_pay });
    }
}

/// Reservation double that keeps every call it receives.
#[derive(Debug, Default)]
pub struct RecordingSeatReservationService {
    calls: Mutex<Vec<ReservationCall>>,
}

impl RecordingSeatReservationService {
    pub fn calls(&self) -> Vec<ReservationCall> {
        lock(&self.calls).clone()
    }
}

impl SeatReservationService for RecordingSeatReservationService {
    fn reserve_seat(&self, account_id: AccountId, total_seats_to_allocate: u64) {
        lock(&self.calls).push(ReservationCall { account_id, seats: total_seats_to_allocate });
    }
}

// A poisoned log is still a valid log.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
