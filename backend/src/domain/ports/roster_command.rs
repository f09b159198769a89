//! Driving port for materialising the current week's roster.

use async_trait::async_trait;

use crate::domain::{Error, WeeklyRoster};

/// Use-case port invoked on startup and before every roster read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterCommand: Send + Sync {
    /// Ensure a fully derived roster exists for the week containing "now".
    ///
    /// Repeated calls within one week return the same roster and never
    /// re-derive or duplicate its standing items.
    async fn ensure_current_week(&self) -> Result<WeeklyRoster, Error>;
}
