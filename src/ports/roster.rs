//! Worker Roster Port - read-only access to the authoritative worker list.

use async_trait::async_trait;

use crate::domain::{WorkerId, WorkerRecord};

/// Read-only roster of tradespeople.
///
/// The core never mutates worker records; concurrent reads across sessions
/// are safe against a single shared roster.
#[async_trait]
pub trait WorkerRoster: Send + Sync {
    /// Returns every worker in the roster.
    async fn list_all(&self) -> Result<Vec<WorkerRecord>, RosterError>;

    /// Looks up a worker by id, returning `None` for unknown ids.
    async fn find_by_id(&self, id: &WorkerId) -> Result<Option<WorkerRecord>, RosterError>;
}

/// Roster access errors.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("roster unavailable: {0}")]
    Unavailable(String),
}
