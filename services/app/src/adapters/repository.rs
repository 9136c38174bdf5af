//! services/app/src/adapters/repository.rs
//!
//! Maps the domain `Session` and `Ticket` types to the JSON blobs kept in a
//! `KeyValueStore`. Each repository owns exactly one key and always reads or
//! writes the whole blob.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ticketflow_core::domain::{Session, Ticket, TicketId};
use ticketflow_core::ports::{KeyValueStore, PortError, PortResult};
use tracing::{error, warn};

//=========================================================================================
// "Impure" Storage Record Structs
//=========================================================================================

#[derive(Serialize, Deserialize)]
struct SessionRecord {
    email: String,
    token: String,
}

impl SessionRecord {
    fn to_domain(self) -> Session {
        Session {
            email: self.email,
            token: self.token,
        }
    }

    fn from_domain(session: &Session) -> Self {
        Self {
            email: session.email.clone(),
            token: session.token.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TicketRecord {
    id: TicketId,
    title: String,
    #[serde(default)]
    description: String,
    status: String,
    priority: String,
}

impl TicketRecord {
    fn to_domain(self) -> PortResult<Ticket> {
        let status = self
            .status
            .parse()
            .map_err(|e| PortError::Corrupt(format!("ticket {}: {}", self.id, e)))?;
        let priority = self
            .priority
            .parse()
            .map_err(|e| PortError::Corrupt(format!("ticket {}: {}", self.id, e)))?;
        Ok(Ticket {
            id: self.id,
            title: self.title,
            description: self.description,
            status,
            priority,
        })
    }

    fn from_domain(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            status: ticket.status.as_str().to_string(),
            priority: ticket.priority.as_str().to_string(),
        }
    }
}

//=========================================================================================
// Session Repository
//=========================================================================================

#[derive(Clone)]
pub struct SessionRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Reads the persisted session.
    ///
    /// A malformed blob is removed from the store and reported as absent.
    pub fn load(&self) -> PortResult<Option<Session>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) => Ok(Some(record.to_domain())),
            Err(e) => {
                warn!(key = %self.key, "Discarding corrupt session blob: {}", e);
                if let Err(e) = self.store.remove(&self.key) {
                    error!(key = %self.key, "Failed to remove corrupt session blob: {:?}", e);
                }
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> PortResult<()> {
        let json = serde_json::to_string(&SessionRecord::from_domain(session))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.store.set(&self.key, &json)
    }

    pub fn clear(&self) -> PortResult<()> {
        self.store.remove(&self.key)
    }
}

//=========================================================================================
// Ticket Repository
//=========================================================================================

#[derive(Clone)]
pub struct TicketRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl TicketRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Reads the full collection. An absent key is an empty collection.
    ///
    /// Records that do not decode are skipped and handed back verbatim in
    /// `StoredTickets::unreadable` so the next `save` can keep them. A blob
    /// that is not a JSON array at all is `PortError::Corrupt`.
    pub fn load(&self) -> PortResult<StoredTickets> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(StoredTickets::default());
        };
        let values: Vec<serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| PortError::Corrupt(e.to_string()))?;

        let mut stored = StoredTickets::default();
        for (index, value) in values.into_iter().enumerate() {
            let decoded = serde_json::from_value::<TicketRecord>(value.clone())
                .map_err(|e| PortError::Corrupt(e.to_string()))
                .and_then(TicketRecord::to_domain);
            match decoded {
                Ok(ticket) => stored.tickets.push(ticket),
                Err(e) => {
                    warn!(key = %self.key, index, "Skipping unreadable ticket record: {}", e);
                    stored.unreadable.push(UnreadableRecord {
                        id: value.get("id").and_then(serde_json::Value::as_u64),
                        raw: value,
                    });
                }
            }
        }
        Ok(stored)
    }

    /// Replaces the stored collection in a single write. Unreadable records
    /// are written back unchanged after the valid ones.
    pub fn save(&self, tickets: &[Ticket], unreadable: &[UnreadableRecord]) -> PortResult<()> {
        let mut values = tickets
            .iter()
            .map(|t| serde_json::to_value(TicketRecord::from_domain(t)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        values.extend(unreadable.iter().map(|r| r.raw.clone()));
        let json =
            serde_json::to_string(&values).map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.store.set(&self.key, &json)
    }
}

/// A stored record that could not be decoded into a `Ticket`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnreadableRecord {
    id: Option<TicketId>,
    raw: serde_json::Value,
}

impl UnreadableRecord {
    /// The record's numeric id, if it has one.
    pub fn id(&self) -> Option<TicketId> {
        self.id
    }
}

/// The result of reading the tickets key.
#[derive(Debug, Clone, Default)]
pub struct StoredTickets {
    pub tickets: Vec<Ticket>,
    pub unreadable: Vec<UnreadableRecord>,
}
