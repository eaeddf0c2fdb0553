//! Layout fetch bookkeeping: request payload and staleness suppression.
//!
//! Fetches are not cancelled. Each one takes a ticket from a generation
//! counter; only the most recently issued ticket may apply its result.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Preferences POSTed to the layout generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub num_people: u32,
    pub budget: String,
    pub climate: String,
    pub needs: String,
    pub style: String,
}

impl Default for LayoutRequest {
    fn default() -> Self {
        Self {
            num_people: 2,
            budget: "50000".to_string(),
            climate: "temperate".to_string(),
            needs: "kitchen, bathroom".to_string(),
            style: "practical".to_string(),
        }
    }
}

impl LayoutRequest {
    pub fn to_json(&self) -> String {
        // Plain strings and integers always serialise.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Last-issued-request-wins generation counter.
#[derive(Debug, Default)]
pub struct FetchTracker {
    issued: u64,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    pub fn latest(&self) -> u64 {
        self.issued
    }

    /// Ok if `ticket` is still the newest fetch.
    pub fn check(&self, ticket: FetchTicket) -> Result<()> {
        if ticket.0 == self.issued {
            Ok(())
        } else {
            Err(EngineError::StaleResponse {
                ticket: ticket.0,
                latest: self.issued,
            })
        }
    }
}
