//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ChoreCommand, ChoreQuery, LoginService, RosterCommand, RosterQuery, UsersQuery,
};

/// Port bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub roster: Arc<dyn RosterCommand>,
    pub roster_query: Arc<dyn RosterQuery>,
    pub chores: Arc<dyn ChoreCommand>,
    pub chores_query: Arc<dyn ChoreQuery>,
}
