//! Chat delivery of completion notices.

mod green_api_notifier;

pub use green_api_notifier::{GreenApiConfig, GreenApiNotifier, GreenApiSetupError};
