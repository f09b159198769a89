//! HTTP inbound adapter exposing the roster REST API.
//!
//! Handlers translate JSON bodies into driving-port requests, enforce the
//! session or admin requirement, and map domain errors onto responses.

pub mod auth;
pub mod bathrooms;
pub mod error;
pub mod health;
pub mod photos;
pub mod roster;
pub mod session;
pub mod session_config;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
