//! Per-route authorization checks.
//!
//! Each guard is a single step from an unchecked request to either
//! `Proceed` with the verified identity or `Reject`. The owner and
//! administrator guards run the authentication check first and propagate its
//! rejection unchanged.

use axum::http::StatusCode;

use super::{AuthError, IdentityClaim, JwtKeys};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard<'a> {
    Authenticated,
    /// Caller must be the account named by the route.
    SameIdentity(&'a str),
    Administrator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reason: AuthError,
    pub status: StatusCode,
}

impl Rejection {
    fn unauthenticated(reason: AuthError) -> Self {
        Self {
            reason,
            status: StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed(IdentityClaim),
    Reject(Rejection),
}

impl GuardOutcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GuardOutcome::Proceed(_))
    }
}

impl Guard<'_> {
    pub fn check(&self, keys: &JwtKeys, token: Option<&str>) -> GuardOutcome {
        let claim = match token.map(|t| keys.verify(t)) {
            Some(Ok(claim)) => claim,
            Some(Err(reason)) => return GuardOutcome::Reject(Rejection::unauthenticated(reason)),
            None => return GuardOutcome::Reject(Rejection::unauthenticated(AuthError::MissingToken)),
        };
        self.authorize(claim)
    }

    /// Applies the policy to an already verified identity.
    pub fn authorize(&self, claim: IdentityClaim) -> GuardOutcome {
        match self {
            Guard::Authenticated => GuardOutcome::Proceed(claim),
            Guard::SameIdentity(target) if claim.subject == *target => GuardOutcome::Proceed(claim),
            Guard::SameIdentity(target) => GuardOutcome::Reject(Rejection::unauthenticated(AuthError::NotOwner {
                subject: claim.subject,
                target: target.to_string(),
            })),
            Guard::Administrator if claim.is_admin => GuardOutcome::Proceed(claim),
            Guard::Administrator => {
                GuardOutcome::Reject(Rejection::unauthenticated(AuthError::NotAdministrator(claim.subject)))
            }
        }
    }
}
