//! Driven port for completion announcements.
//!
//! Notifications are best effort: callers log failures and never surface them
//! to the resident who completed the chore.

use async_trait::async_trait;

use crate::domain::Resident;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification adapters.
    pub enum NotifierError {
        /// The request never reached the provider.
        Transport { message: String } => "notification transport failed: {message}",
        /// The provider answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "notification rejected with status {status}: {message}",
    }
}

/// Details of one completed chore to announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionNotice {
    /// Resident who completed the chore.
    pub resident: Resident,
    /// Task or bathroom label.
    pub chore: String,
    /// Public URL of the proof photo.
    pub photo_url: String,
    /// Stored photo name.
    pub file_name: String,
}

impl CompletionNotice {
    /// Caption sent alongside the photo.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{} has completed her cleaning duty for this week!", self.resident)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    /// Announce a completion to the household.
    async fn notify_completion(&self, notice: &CompletionNotice) -> Result<(), NotifierError>;
}

/// Notifier used when no provider credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCompletionNotifier;

#[async_trait]
impl CompletionNotifier for NoOpCompletionNotifier {
    async fn notify_completion(&self, _notice: &CompletionNotice) -> Result<(), NotifierError> {
        Ok(())
    }
}
