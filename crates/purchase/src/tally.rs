use serde::{Deserialize, Serialize};

use ct_core::{Money, TicketPolicy, TicketType, TicketTypeRequest};

/// Per-category ticket counts for one purchase.
///
/// Every derived figure is checked; `None` means the value does not fit in a `u64`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketTally {
    pub adults: u64,
    pub children: u64,
    pub infants: u64,
}

impl TicketTally {
    /// Accumulates same-category lines. `None` if a category count overflows.
    pub fn from_requests(requests: &[TicketTypeRequest]) -> Option<Self> {
        let mut tally = TicketTally::default();
        for req in requests {
            tally.add(req)?;
        }
        Some(tally)
    }

    pub fn add(&mut self, req: &TicketTypeRequest) -> Option<()> {
        let n = u64::from(req.no_of_tickets());
        let slot = match req.ticket_type() {
            TicketType::Adult => &mut self.adults,
            TicketType::Child => &mut self.children,
            TicketType::Infant => &mut self.infants,
        };
        *slot = slot.checked_add(n)?;
        Some(())
    }

    pub fn count(&self, ticket_type: TicketType) -> u64 {
        match ticket_type {
            TicketType::Adult => self.adults,
            TicketType::Child => self.children,
            TicketType::Infant => self.infants,
        }
    }

    pub fn total(&self) -> Option<u64> {
        TicketType::ALL
            .into_iter()
            .try_fold(0u64, |acc, t| acc.checked_add(self.count(t)))
    }

    pub fn seats(&self) -> Option<u64> {
        TicketType::ALL
            .into_iter()
            .filter(|t| t.occupies_seat())
            .try_fold(0u64, |acc, t| acc.checked_add(self.count(t)))
    }

    pub fn price(&self, policy: &TicketPolicy) -> Option<Money> {
        TicketType::ALL.into_iter().try_fold(0, |acc: Money, t| {
            acc.checked_add(policy.price_of(t).checked_mul(self.count(t))?)
        })
    }

    pub fn has_minors(&self) -> bool {
        self.children > 0 || self.infants > 0
    }
}
