//! Ticket purchase validation, pricing, and delegation to payment and seat booking.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use ct_core::{AccountId, Money, PurchaseOrder, TicketPolicy, TicketTypeRequest};
use ct_services::{SeatReservationService, TicketPaymentService};

pub mod error;
pub mod tally;

pub use error::InvalidPurchase;
pub use tally::TicketTally;

/// Outcome of an accepted purchase: what was charged and reserved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurchaseSummary {
    pub account_id: AccountId,
    pub tickets: u64,
    pub amount_paid: Money,
    pub seats_reserved: u64,
    pub tally: TicketTally,
}

pub trait TicketService {
    /// Validate, price, then charge and reserve. Nothing is charged or reserved on rejection.
    fn purchase_tickets(
        &self,
        account_id: AccountId,
        requests: &[TicketTypeRequest],
    ) -> Result<PurchaseSummary, InvalidPurchase>;
}

pub struct TicketServiceImpl {
    policy: TicketPolicy,
    payment: Arc<dyn TicketPaymentService>,
    reservation: Arc<dyn SeatReservationService>,
}

impl TicketServiceImpl {
    pub fn new(
        payment: Arc<dyn TicketPaymentService>,
        reservation: Arc<dyn SeatReservationService>,
    ) -> Self {
        Self::with_policy(TicketPolicy::default(), payment, reservation)
    }

    pub fn with_policy(
        policy: TicketPolicy,
        payment: Arc<dyn TicketPaymentService>,
        reservation: Arc<dyn SeatReservationService>,
    ) -> Self {
        Self { policy, payment, reservation }
    }

    pub fn policy(&self) -> &TicketPolicy {
        &self.policy
    }

    /// Purchase from an order whose account, list, or list entries may be absent.
    pub fn purchase_order(
        &self,
        order: &PurchaseOrder,
    ) -> Result<PurchaseSummary, InvalidPurchase> {
        let account_id = order.account_id.map(AccountId).ok_or(InvalidPurchase::MissingAccount);
        let account_id = self.reject_logged(account_id)?;
        self.reject_logged(check_account(account_id))?;

        let lines = order.requests.as_deref().ok_or(InvalidPurchase::NoRequests);
        let lines = self.reject_logged(lines)?;
        let requests = lines
            .iter()
            .enumerate()
            .map(|(index, line)| (*line).ok_or(InvalidPurchase::MissingRequest { index }))
            .collect::<Result<Vec<_>, _>>();
        let requests = self.reject_logged(requests)?;

        self.purchase_tickets(account_id, &requests)
    }

    /// Runs every rule and prices the purchase without touching the collaborators.
    pub fn quote(
        &self,
        account_id: AccountId,
        requests: &[TicketTypeRequest],
    ) -> Result<PurchaseSummary, InvalidPurchase> {
        check_account(account_id)?;
        if requests.is_empty() {
            return Err(InvalidPurchase::NoRequests);
        }

        let max = self.policy.max_tickets;
        let too_many = |requested| InvalidPurchase::TooManyTickets { requested, max };
        let tally = TicketTally::from_requests(requests).ok_or(too_many(u64::MAX))?;
        debug!(%account_id, ?tally, "tickets tallied");

        let requested = tally.total().ok_or(too_many(u64::MAX))?;
        if requested > max {
            return Err(too_many(requested));
        }
        if tally.adults == 0 && tally.has_minors() {
            return Err(InvalidPurchase::UnaccompaniedMinors {
                children: tally.children,
                infants: tally.infants,
            });
        }

        let amount_paid = tally.price(&self.policy).ok_or(InvalidPurchase::PriceOutOfRange)?;
        // Seats are a subset of the checked total.
        let seats_reserved = tally.seats().ok_or(too_many(requested))?;

        Ok(PurchaseSummary { account_id, tickets: requested, amount_paid, seats_reserved, tally })
    }

    fn reject_logged<T>(&self, result: Result<T, InvalidPurchase>) -> Result<T, InvalidPurchase> {
        result.map_err(|err| {
            warn!(code = err.code(), "purchase rejected: {err}");
            err
        })
    }
}

impl TicketService for TicketServiceImpl {
    fn purchase_tickets(
        &self,
        account_id: AccountId,
        requests: &[TicketTypeRequest],
    ) -> Result<PurchaseSummary, InvalidPurchase> {
        let summary = self.reject_logged(self.quote(account_id, requests))?;

        self.payment.make_payment(account_id, summary.amount_paid);
        self.reservation.reserve_seat(account_id, summary.seats_reserved);

        info!(
            %account_id,
            amount = summary.amount_paid,
            seats = summary.seats_reserved,
            "purchase completed"
        );
        Ok(summary)
    }
}

fn check_account(account_id: AccountId) -> Result<AccountId, InvalidPurchase> {
    if account_id.is_valid() {
        Ok(account_id)
    } else {
        Err(InvalidPurchase::InvalidAccount { account_id })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use ct_core::TicketType;
    use ct_services::{
        PaymentCall, RecordingPaymentService, RecordingSeatReservationService, ReservationCall,
    };

    struct Harness {
        payment: Arc<RecordingPaymentService>,
        reservation: Arc<RecordingSeatReservationService>,
        sut: TicketServiceImpl,
    }

    impl Harness {
        fn new() -> Self {
            let payment = Arc::new(RecordingPaymentService::default());
            let reservation = Arc::new(RecordingSeatReservationService::default());
            let sut = TicketServiceImpl::new(payment.clone(), reservation.clone());
            Self { payment, reservation, sut }
        }

        fn purchase(
            &self,
            account: i64,
            reqs: &[TicketTypeRequest],
        ) -> Result<PurchaseSummary, InvalidPurchase> {
            self.sut.purchase_tickets(AccountId(account), reqs)
        }

        fn assert_charged(&self, account: i64, amount: Money, seats: u64) {
            assert_eq!(
                self.payment.calls(),
                vec![PaymentCall { account_id: AccountId(account), amount }]
            );
            assert_eq!(
                self.reservation.calls(),
                vec![ReservationCall { account_id: AccountId(account), seats }]
            );
        }

        fn assert_untouched(&self) {
            assert!(self.payment.calls().is_empty());
            assert!(self.reservation.calls().is_empty());
        }
    }

    fn req(t: TicketType, n: i64) -> TicketTypeRequest {
        TicketTypeRequest::new(t, n).unwrap()
    }

    #[test]
    fn happy_path_charges_and_reserves() {
        let h = Harness::new();
        let lines = [
            req(TicketType::Adult, 2),
            req(TicketType::Child, 1),
            req(TicketType::Infant, 1),
        ];
        let summary = h.purchase(123, &lines).unwrap();
        assert_eq!(summary.tickets, 4);
        assert_eq!(summary.amount_paid, 65);
        assert_eq!(summary.seats_reserved, 3);
        h.assert_charged(123, 65, 3);
    }

    #[test]
    fn exactly_the_cap_is_allowed() {
        let h = Harness::new();
        h.purchase(10, &[req(TicketType::Adult, 20), req(TicketType::Child, 5)]).unwrap();
        h.assert_charged(10, 20 * 25 + 5 * 15, 25);

        let h = Harness::new();
        h.purchase(10, &[req(TicketType::Adult, 25)]).unwrap();
        h.assert_charged(10, 625, 25);

        let h = Harness::new();
        h.purchase(10, &[req(TicketType::Adult, 10), req(TicketType::Child, 15)]).unwrap();
        h.assert_charged(10, 475, 25);
    }

    #[test]
    fn infants_count_toward_cap_but_take_no_seat() {
        let h = Harness::new();
        let lines = [
            req(TicketType::Adult, 8),
            req(TicketType::Child, 12),
            req(TicketType::Infant, 5),
        ];
        h.purchase(10, &lines).unwrap();
        h.assert_charged(10, 380, 20);
    }

    #[test]
    fn rejects_non_positive_account() {
        for account in [0, -1, i64::MIN] {
            let h = Harness::new();
            let err = h.purchase(account, &[req(TicketType::Adult, 1)]).unwrap_err();
            assert_eq!(err, InvalidPurchase::InvalidAccount { account_id: AccountId(account) });
            h.assert_untouched();
        }
    }

    #[test]
    fn account_is_checked_before_the_list() {
        let h = Harness::new();
        let err = h.purchase(0, &[]).unwrap_err();
        assert_eq!(err.code(), "invalid_account");
    }

    #[test]
    fn rejects_empty_list() {
        let h = Harness::new();
        assert_eq!(h.purchase(10, &[]).unwrap_err(), InvalidPurchase::NoRequests);
        h.assert_untouched();
    }

    #[test]
    fn rejects_children_without_adults() {
        let h = Harness::new();
        let err = h.purchase(10, &[req(TicketType::Child, 2)]).unwrap_err();
        assert_eq!(err, InvalidPurchase::UnaccompaniedMinors { children: 2, infants: 0 });
        h.assert_untouched();
    }

    #[test]
    fn rejects_infants_without_adults() {
        let h = Harness::new();
        let err = h.purchase(10, &[req(TicketType::Infant, 1)]).unwrap_err();
        assert_eq!(err, InvalidPurchase::UnaccompaniedMinors { children: 0, infants: 1 });
        h.assert_untouched();
    }

    #[test]
    fn rejects_more_than_the_cap() {
        let h = Harness::new();
        let err = h.purchase(10, &[req(TicketType::Adult, 26)]).unwrap_err();
        assert_eq!(err, InvalidPurchase::TooManyTickets { requested: 26, max: 25 });

        let err = h.purchase(10, &[req(TicketType::Adult, 24), req(TicketType::Child, 2)]);
        assert_eq!(err.unwrap_err().code(), "too_many_tickets");

        let err = h.purchase(10, &[req(TicketType::Adult, 15), req(TicketType::Child, 11)]);
        assert_eq!(err.unwrap_err().code(), "too_many_tickets");
        h.assert_untouched();
    }

    #[test]
    fn cap_is_checked_before_accompaniment() {
        let h = Harness::new();
        let err = h.purchase(10, &[req(TicketType::Child, 30)]).unwrap_err();
        assert_eq!(err.code(), "too_many_tickets");
    }

    #[test]
    fn order_with_absent_parts_is_rejected() {
        let h = Harness::new();
        let adult = req(TicketType::Adult, 1);

        let err = h.sut.purchase_order(&PurchaseOrder {
            account_id: None,
            requests: Some(vec![Some(adult)]),
        });
        assert_eq!(err.unwrap_err(), InvalidPurchase::MissingAccount);

        let err = h.sut.purchase_order(&PurchaseOrder { account_id: Some(10), requests: None });
        assert_eq!(err.unwrap_err(), InvalidPurchase::NoRequests);

        let empty = PurchaseOrder { account_id: Some(10), requests: Some(vec![]) };
        let err = h.sut.purchase_order(&empty);
        assert_eq!(err.unwrap_err(), InvalidPurchase::NoRequests);

        let err = h.sut.purchase_order(&PurchaseOrder {
            account_id: Some(10),
            requests: Some(vec![Some(adult), None]),
        });
        assert_eq!(err.unwrap_err(), InvalidPurchase::MissingRequest { index: 1 });

        let err = h.sut.purchase_order(&PurchaseOrder { account_id: Some(-4), requests: None });
        assert_eq!(err.unwrap_err().code(), "invalid_account");

        h.assert_untouched();
    }

    #[test]
    fn order_with_every_part_present_purchases() {
        let h = Harness::new();
        let order = PurchaseOrder::new(42, [req(TicketType::Adult, 1), req(TicketType::Infant, 1)]);
        let summary = h.sut.purchase_order(&order).unwrap();
        assert_eq!(summary.tally, TicketTally { adults: 1, children: 0, infants: 1 });
        h.assert_charged(42, 25, 1);
    }

    #[test]
    fn quote_leaves_collaborators_alone() {
        let h = Harness::new();
        let summary = h.sut.quote(AccountId(3), &[req(TicketType::Adult, 2)]).unwrap();
        assert_eq!(summary.amount_paid, 50);
        h.assert_untouched();
    }

    #[test]
    fn custom_policy_changes_prices_and_cap() {
        let payment = Arc::new(RecordingPaymentService::default());
        let reservation = Arc::new(RecordingSeatReservationService::default());
        let policy =
            TicketPolicy { max_tickets: 3, adult_price: 12, child_price: 7, infant_price: 0 };
        let sut = TicketServiceImpl::with_policy(policy, payment.clone(), reservation);

        let lines = [req(TicketType::Adult, 1), req(TicketType::Child, 2)];
        let summary = sut.purchase_tickets(AccountId(1), &lines);
        assert_eq!(summary.unwrap().amount_paid, 26);
        let err = sut.purchase_tickets(AccountId(1), &[req(TicketType::Adult, 4)]).unwrap_err();
        assert_eq!(err, InvalidPurchase::TooManyTickets { requested: 4, max: 3 });
        assert_eq!(payment.calls().len(), 1);
    }

    #[test]
    fn unrepresentable_price_is_rejected_before_charging() {
        let payment = Arc::new(RecordingPaymentService::default());
        let reservation = Arc::new(RecordingSeatReservationService::default());
        let policy = TicketPolicy { adult_price: u64::MAX, child_price: 1, ..Default::default() };
        let sut = TicketServiceImpl::with_policy(policy, payment.clone(), reservation.clone());

        let lines = [req(TicketType::Adult, 1), req(TicketType::Child, 1)];
        let err = sut.purchase_tickets(AccountId(1), &lines).unwrap_err();
        assert_eq!(err, InvalidPurchase::PriceOutOfRange);
        assert_eq!(err.code(), "price_out_of_range");
        assert!(payment.calls().is_empty());
        assert!(reservation.calls().is_empty());

        let summary = sut.purchase_tickets(AccountId(1), &[req(TicketType::Adult, 1)]).unwrap();
        assert_eq!(summary.amount_paid, u64::MAX);
    }

    #[derive(Default)]
    struct CallLog(Mutex<Vec<&'static str>>);

    impl TicketPaymentService for CallLog {
        fn make_payment(&self, _account_id: AccountId, _total_amount_to_pay: Money) {
            self.0.lock().unwrap().push("payment");
        }
    }

    impl SeatReservationService for CallLog {
        fn reserve_seat(&self, _account_id: AccountId, _total_seats_to_allocate: u64) {
            self.0.lock().unwrap().push("reservation");
        }
    }

    #[test]
    fn payment_happens_before_reservation() {
        let log = Arc::new(CallLog::default());
        let sut = TicketServiceImpl::new(log.clone(), log.clone());
        sut.purchase_tickets(AccountId(1), &[req(TicketType::Adult, 1)]).unwrap();
        assert_eq!(*log.0.lock().unwrap(), vec!["payment", "reservation"]);
    }
}
