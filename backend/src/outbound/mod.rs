//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: volatile repositories for local runs and tests
//! - **photos**: proof photo files on local disk
//! - **notify**: chat delivery of completion notices
//! - **security**: password encoding
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod notify;
pub mod persistence;
pub mod photos;
pub mod security;
