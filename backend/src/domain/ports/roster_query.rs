//! Driving port for roster read models.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, RosterData};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterQuery: Send + Sync {
    /// Ensure the current week exists and return its assembled view.
    async fn current_week(&self) -> Result<RosterData, Error>;

    /// Assembled view of one roster.
    async fn roster_data(&self, roster_id: &Uuid) -> Result<RosterData, Error>;

    /// Every roster, newest week first, each with its assembled data.
    async fn history(&self) -> Result<Vec<RosterData>, Error>;
}
