use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    Adult,
    Child,
    Infant,
}

impl TicketType {
    pub const ALL: [TicketType; 3] = [TicketType::Adult, TicketType::Child, TicketType::Infant];

    /// Infants sit on an adult's lap.
    pub fn occupies_seat(self) -> bool {
        !matches!(self, TicketType::Infant)
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TicketType::Adult => "ADULT",
            TicketType::Child => "CHILD",
            TicketType::Infant => "INFANT",
        };
        f.write_str(name)
    }
}

/// Raised while building a [`TicketTypeRequest`], before any purchase is attempted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketRequestError {
    #[error("ticket type is required")]
    MissingTicketType,
    #[error("number of tickets must be greater than 0, got {0}")]
    NonPositiveQuantity(i64),
    #[error("number of tickets {0} is out of range")]
    QuantityOutOfRange(i64),
}

/// One purchase line: a ticket category and how many of it.
///
/// Immutable once built; the quantity is always at least one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawTicketRequest", into = "RawTicketRequest")]
pub struct TicketTypeRequest {
    ticket_type: TicketType,
    no_of_tickets: u32,
}

impl TicketTypeRequest {
    pub fn new(ticket_type: TicketType, no_of_tickets: i64) -> Result<Self, TicketRequestError> {
        if no_of_tickets <= 0 {
            return Err(TicketRequestError::NonPositiveQuantity(no_of_tickets));
        }
        let no_of_tickets = u32::try_from(no_of_tickets)
            .map_err(|_| TicketRequestError::QuantityOutOfRange(no_of_tickets))?;
        Ok(Self { ticket_type, no_of_tickets })
    }

    pub fn ticket_type(&self) -> TicketType {
        self.ticket_type
    }

    pub fn no_of_tickets(&self) -> u32 {
        self.no_of_tickets
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTicketRequest {
    #[serde(default)]
    ticket_type: Option<TicketType>,
    no_of_tickets: i64,
}

impl TryFrom<RawTicketRequest> for TicketTypeRequest {
    type Error = TicketRequestError;

    fn try_from(raw: RawTicketRequest) -> Result<Self, Self::Error> {
        let ticket_type = raw.ticket_type.ok_or(TicketRequestError::MissingTicketType)?;
        TicketTypeRequest::new(ticket_type, raw.no_of_tickets)
    }
}

impl From<TicketTypeRequest> for RawTicketRequest {
    fn from(req: TicketTypeRequest) -> Self {
        Self {
            ticket_type: Some(req.ticket_type),
            no_of_tickets: i64::from(req.no_of_tickets),
        }
    }
}
