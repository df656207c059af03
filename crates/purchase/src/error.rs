use ct_core::AccountId;

/// Every business-rule rejection of a purchase. The variant doubles as a reason code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPurchase {
    #[error("invalid purchase: account id is missing")]
    MissingAccount,
    #[error("invalid purchase: account id {account_id} must be greater than 0")]
    InvalidAccount { account_id: AccountId },
    #[error("invalid purchase: no ticket requests")]
    NoRequests,
    #[error("invalid purchase: ticket request {index} is missing")]
    MissingRequest { index: usize },
    #[error("invalid purchase: {requested} tickets requested, at most {max} allowed")]
    TooManyTickets { requested: u64, max: u64 },
    #[error("invalid purchase: {children} child and {infants} infant tickets without an adult")]
    UnaccompaniedMinors { children: u64, infants: u64 },
    #[error("invalid purchase: total price does not fit in an amount")]
    PriceOutOfRange,
}

impl InvalidPurchase {
    pub fn code(&self) -> &'static str {
        match self {
            InvalidPurchase::MissingAccount => "missing_account",
            InvalidPurchase::InvalidAccount { .. } => "invalid_account",
            InvalidPurchase::NoRequests => "no_requests",
            InvalidPurchase::MissingRequest { .. } => "missing_request",
            InvalidPurchase::TooManyTickets { .. } => "too_many_tickets",
            InvalidPurchase::UnaccompaniedMinors { .. } => "unaccompanied_minors",
            InvalidPurchase::PriceOutOfRange => "price_out_of_range",
        }
    }
}
