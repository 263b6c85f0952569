//! Detail fetch lifecycle for a single record.

use crate::error::FetchError;
use crate::feed::Phase;
use crate::types::{DetailRecord, Ticket};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRequest {
    pub ticket: Ticket,
    pub id: String,
}

pub struct DetailFeed {
    id: Option<String>,
    record: Option<DetailRecord>,
    phase: Phase,
    pending: Option<Ticket>,
}

impl DetailFeed {
    /// Blank ids count as missing
    pub fn new(id: Option<&str>) -> Self {
        let id = id.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            id,
            record: None,
            phase: Phase::Loading,
            pending: None,
        }
    }

    /// First fetch after mounting. Without an id the feed fails on the spot
    /// and nothing is requested.
    pub fn mount(&mut self) -> Option<DetailRequest> {
        self.begin()
    }

    fn begin(&mut self) -> Option<DetailRequest> {
        let Some(id) = self.id.clone() else {
            self.pending = None;
            self.phase = Phase::Failed(FetchError::MissingId);
            return None;
        };
        let ticket = Ticket::issue();
        self.pending = Some(ticket);
        self.phase = Phase::Loading;
        log::debug!("[detail] begin ticket={} id={id}", ticket.value());
        Some(DetailRequest { ticket, id })
    }

    /// Returns `false` for stale tickets
    pub fn settle(&mut self, ticket: Ticket, result: Result<DetailRecord, FetchError>) -> bool {
        if self.pending != Some(ticket) {
            log::debug!("[detail] dropping stale ticket={}", ticket.value());
            return false;
        }
        self.pending = None;
        match result {
            Ok(record) => {
                self.record = Some(record);
                self.phase = Phase::Loaded;
            }
            Err(e) => {
                log::warn!("[detail] fetch failed kind={} msg={}", e.kind(), e);
                self.phase = Phase::Failed(e);
            }
        }
        true
    }

    /// Repeat the same request; only honoured while failed
    pub fn retry(&mut self) -> Option<DetailRequest> {
        if !matches!(self.phase, Phase::Failed(_)) {
            return None;
        }
        self.begin()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn record(&self) -> Option<&DetailRecord> {
        self.record.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.phase {
            Phase::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }
}
