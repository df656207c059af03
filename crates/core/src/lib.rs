//! Core types for cinema ticket purchases.

use std::fmt;

use serde::{Deserialize, Serialize};

pub type Money = u64;

/// Identity of the purchasing account. Only checked for positivity, never dereferenced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl AccountId {
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pricing and cap rules applied to every purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketPolicy {
    pub max_tickets: u64,
    pub adult_price: Money,
    pub child_price: Money,
    pub infant_price: Money,
}

impl Default for TicketPolicy {
    fn default() -> Self {
        Self { max_tickets: 25, adult_price: 25, child_price: 15, infant_price: 0 }
    }
}

impl TicketPolicy {
    pub fn price_of(&self, ticket_type: TicketType) -> Money {
        match ticket_type {
            TicketType::Adult => self.adult_price,
            TicketType::Child => self.child_price,
            TicketType::Infant => self.infant_price,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub mod order;
pub mod ticket;

pub use order::PurchaseOrder;
pub use ticket::{TicketRequestError, TicketType, TicketTypeRequest};
