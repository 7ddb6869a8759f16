//! Authorization policy: which check a route needs and why a request was refused.
//!
//! A route is configured with a [`Capability`]. At request time the capability is combined
//! with the matched path parameters into an [`AccessCheck`], which `AuthService::authorize`
//! evaluates after the token has been verified.
use std::collections::HashMap;

use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::jwt::TokenError;

/// Resources whose recorded owner can be compared against the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Post,
    Comment,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

/// What a guarded route requires from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The `{username}` in the path must be the caller.
    Identity,
    /// The caller must own the resource addressed by `{id}`.
    Ownership(ResourceKind),
    /// Any caller whose account still exists.
    Existence,
}

pub const USERNAME_PARAM: &str = "username";
pub const RESOURCE_ID_PARAM: &str = "id";

/// A capability bound to the concrete target of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessCheck<'a> {
    Identity { username: &'a str },
    Ownership { kind: ResourceKind, resource_id: i64 },
    Existence,
}

impl Capability {
    /// `None` when the route does not carry the parameter the capability needs.
    pub fn resolve<'a>(&self, params: &'a HashMap<String, String>) -> Option<AccessCheck<'a>> {
        match *self {
            Capability::Identity => params
                .get(USERNAME_PARAM)
                .map(|username| AccessCheck::Identity {
                    username: username.as_str(),
                }),
            Capability::Ownership(kind) => params
                .get(RESOURCE_ID_PARAM)
                .and_then(|raw| raw.parse::<i64>().ok())
                .map(|resource_id| AccessCheck::Ownership { kind, resource_id }),
            Capability::Existence => Some(AccessCheck::Existence),
        }
    }
}

/// Why a request was denied. Only ever logged, never sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingToken,
    UnresolvedTarget,
    UnknownPathUser,
    IdentityMismatch,
    ResourceMissing,
    NotOwner,
    AccountGone,
}

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("token rejected: {0}")]
    Token(#[from] TokenError),
    #[error("access denied: {0:?}")]
    Denied(DenyReason),
    #[error("store failure during authorization")]
    Store(#[from] RepoError),
}

impl AuthzError {
    pub fn denied(reason: DenyReason) -> Self {
        Self::Denied(reason)
    }
}
