use serde::{Deserialize, Serialize};

use crate::{CoreError, TicketTypeRequest};

/// A purchase as it arrives from outside: every part of it may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub requests: Option<Vec<Option<TicketTypeRequest>>>,
}

impl PurchaseOrder {
    pub fn new(account_id: i64, requests: impl IntoIterator<Item = TicketTypeRequest>) -> Self {
        Self {
            account_id: Some(account_id),
            requests: Some(requests.into_iter().map(Some).collect()),
        }
    }

    pub fn from_json(input: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(input)?)
    }
}
