//! Session helpers so handlers never touch actix-session directly.
//!
//! The session cookie carries the authenticated [`Principal`], including a
//! role that may have been elevated at login. Elevation lives only in the
//! cookie and ends with it.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Principal};

pub(crate) const PRINCIPAL_KEY: &str = "principal";

/// Principal-aware view over the actix session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store `principal`, rotating the session id first.
    pub fn persist_principal(&self, principal: &Principal) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(PRINCIPAL_KEY, principal)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in principal, if any.
    ///
    /// Undecodable session content is treated as signed out.
    pub fn principal(&self) -> Result<Option<Principal>, Error> {
        match self.0.get::<Principal>(PRINCIPAL_KEY) {
            Ok(principal) => Ok(principal),
            Err(error) => {
                warn!(%error, "discarding unreadable session principal");
                self.0.remove(PRINCIPAL_KEY);
                Ok(None)
            }
        }
    }

    /// Require a signed-in principal or fail with `401`.
    pub fn require_principal(&self) -> Result<Principal, Error> {
        self.principal()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require the admin claim, failing with `401` or `403`.
    pub fn require_admin(&self) -> Result<Principal, Error> {
        let principal = self.require_principal()?;
        if !principal.is_admin() {
            return Err(Error::forbidden("admin access required"));
        }
        Ok(principal)
    }

    /// End the session.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
