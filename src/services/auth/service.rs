use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};

use crate::services::auth::{
    jwt::{IssuedToken, JwtCodec, TokenError, VerifiedToken},
    lookup::AccountLookup,
    policy::{AccessCheck, AuthzError, Capability, DenyReason, ResourceKind},
};

/// Issues access tokens and decides whether a token may act on a target.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    jwt: JwtCodec,
    lookup: Arc<dyn AccountLookup>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("jwt", &self.jwt)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(jwt: JwtCodec, lookup: Arc<dyn AccountLookup>) -> Self {
        Self { jwt, lookup }
    }

    pub fn issue_access_token(&self, user_id: i64) -> Result<IssuedToken, TokenError> {
        self.jwt.issue(user_id, Utc::now())
    }

    pub fn access_token_ttl_seconds(&self) -> u64 {
        self.jwt.ttl_seconds()
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        self.jwt.verify(token, now)
    }

    /// Runs the whole check: signature, expiry, then the target-specific comparison.
    ///
    /// "Not found" during the lookup is a denial; a failing store is `AuthzError::Store`.
    pub async fn authorize(
        &self,
        token: Option<&str>,
        check: AccessCheck<'_>,
        now: DateTime<Utc>,
    ) -> Result<VerifiedToken, AuthzError> {
        let verified = self.authenticate(token, now)?;
        self.check_access(verified, check).await
    }

    /// Same as `authorize`, with the target taken from a route's path parameters.
    ///
    /// An unresolvable target is still reported after the token, so an expired token always
    /// answers as expired.
    pub async fn authorize_route(
        &self,
        token: Option<&str>,
        capability: Capability,
        params: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<VerifiedToken, AuthzError> {
        match capability.resolve(params) {
            Some(check) => self.authorize(token, check, now).await,
            None => {
                self.authenticate(token, now)?;
                Err(AuthzError::denied(DenyReason::UnresolvedTarget))
            }
        }
    }

    fn authenticate(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<VerifiedToken, AuthzError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthzError::denied(DenyReason::MissingToken))?;

        Ok(self.verify(token, now)?)
    }

    async fn check_access(
        &self,
        verified: VerifiedToken,
        check: AccessCheck<'_>,
    ) -> Result<VerifiedToken, AuthzError> {
        let caller = verified.user_id;

        match check {
            AccessCheck::Identity { username } => {
                let user = self
                    .lookup
                    .user_by_name(username)
                    .await?
                    .ok_or(AuthzError::denied(DenyReason::UnknownPathUser))?;
                if user.id != caller {
                    return Err(AuthzError::denied(DenyReason::IdentityMismatch));
                }
            }
            AccessCheck::Ownership { kind, resource_id } => {
                let owner = self.owner_of(kind, resource_id).await?;
                tracing::debug!(kind = kind.as_str(), resource_id, ?owner, caller, "ownership check");
                match owner {
                    None => return Err(AuthzError::denied(DenyReason::ResourceMissing)),
                    Some(owner) if owner != caller => {
                        return Err(AuthzError::denied(DenyReason::NotOwner));
                    }
                    Some(_) => {}
                }
            }
            AccessCheck::Existence => {
                if self.lookup.user_by_id(caller).await?.is_none() {
                    return Err(AuthzError::denied(DenyReason::AccountGone));
                }
            }
        }

        Ok(verified)
    }

    async fn owner_of(&self, kind: ResourceKind, id: i64) -> Result<Option<i64>, AuthzError> {
        let owner = match kind {
            ResourceKind::Post => self.lookup.post(id).await?.map(|p| p.user_id),
            ResourceKind::Comment => self.lookup.comment(id).await?.map(|c| c.user_id),
        };
        Ok(owner)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;

    use super::*;
    use crate::services::auth::lookup::memory::MemoryLookup;

    fn service(lookup: MemoryLookup) -> AuthService {
        AuthService::new(JwtCodec::new("test-secret", 900), Arc::new(lookup))
    }

    fn token_for(svc: &AuthService, user_id: i64) -> String {
        svc.issue_access_token(user_id).unwrap().token
    }

    fn denied_for(err: AuthzError) -> DenyReason {
        match err {
            AuthzError::Denied(reason) => reason,
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn identity_matches_path_user() {
        let svc = service(
            MemoryLookup::new()
                .with_user(1, "alice")
                .with_user(2, "bob"),
        );
        let alice = token_for(&svc, 1);
        let bob = token_for(&svc, 2);
        let check = AccessCheck::Identity { username: "alice" };

        let ok = svc.authorize(Some(alice.as_str()), check, Utc::now()).await.unwrap();
        assert_eq!(ok.user_id, 1);

        let err = svc.authorize(Some(bob.as_str()), check, Utc::now()).await.unwrap_err();
        assert_eq!(denied_for(err), DenyReason::IdentityMismatch);
    }

    #[tokio::test]
    async fn identity_for_unknown_path_user_is_denied() {
        let svc = service(MemoryLookup::new().with_user(1, "alice"));
        let alice = token_for(&svc, 1);

        let err = svc
            .authorize(
                Some(alice.as_str()),
                AccessCheck::Identity { username: "ghost" },
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert_eq!(denied_for(err), DenyReason::UnknownPathUser);
    }

    #[tokio::test]
    async fn ownership_of_posts_and_comments() {
        let svc = service(
            MemoryLookup::new()
                .with_user(42, "owner")
                .with_user(7, "other")
                .with_post(100, 42)
                .with_post(101, 7)
                .with_comment(500, 100, 7),
        );
        let token = token_for(&svc, 42);

        let own_post = AccessCheck::Ownership {
            kind: ResourceKind::Post,
            resource_id: 100,
        };
        assert!(svc.authorize(Some(token.as_str()), own_post, Utc::now()).await.is_ok());

        let foreign_post = AccessCheck::Ownership {
            kind: ResourceKind::Post,
            resource_id: 101,
        };
        let err = svc
            .authorize(Some(token.as_str()), foreign_post, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(denied_for(err), DenyReason::NotOwner);

        // comment 500 sits on 42's post but was written by 7
        let foreign_comment = AccessCheck::Ownership {
            kind: ResourceKind::Comment,
            resource_id: 500,
        };
        let err = svc
            .authorize(Some(token.as_str()), foreign_comment, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(denied_for(err), DenyReason::NotOwner);
    }

    #[tokio::test]
    async fn missing_resource_is_denied_not_an_error() {
        let svc = service(MemoryLookup::new().with_user(42, "owner"));
        let token = token_for(&svc, 42);

        let err = svc
            .authorize(
                Some(token.as_str()),
                AccessCheck::Ownership {
                    kind: ResourceKind::Post,
                    resource_id: 9999,
                },
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert_eq!(denied_for(err), DenyReason::ResourceMissing);
    }

    #[tokio::test]
    async fn existence_rejects_deleted_accounts() {
        let lookup = Arc::new(MemoryLookup::new().with_user(3, "carol"));
        let svc = AuthService::new(JwtCodec::new("test-secret", 900), lookup.clone());
        let token = token_for(&svc, 3);

        assert!(
            svc.authorize(Some(token.as_str()), AccessCheck::Existence, Utc::now())
                .await
                .is_ok()
        );

        lookup.remove_user(3);
        let err = svc
            .authorize(Some(token.as_str()), AccessCheck::Existence, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(denied_for(err), DenyReason::AccountGone);
    }

    #[tokio::test]
    async fn token_problems_come_before_any_lookup() {
        // broken store: reaching it would yield Store, not Token
        let svc = service(MemoryLookup::broken());

        let err = svc
            .authorize(Some("garbage"), AccessCheck::Existence, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::Token(TokenError::Malformed)));

        let token = token_for(&svc, 1);
        let later = Utc::now() + ChronoDuration::minutes(16);
        let err = svc
            .authorize(Some(token.as_str()), AccessCheck::Existence, later)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::Token(TokenError::Expired)));

        let foreign = AuthService::new(
            JwtCodec::new("someone-else", 900),
            Arc::new(MemoryLookup::new()),
        );
        let forged = token_for(&foreign, 1);
        let err = svc
            .authorize(Some(forged.as_str()), AccessCheck::Existence, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::Token(TokenError::BadSignature)));
    }

    #[tokio::test]
    async fn missing_token_is_denied() {
        let svc = service(MemoryLookup::new());

        for token in [None, Some(""), Some("   ")] {
            let err = svc
                .authorize(token, AccessCheck::Existence, Utc::now())
                .await
                .unwrap_err();
            assert_eq!(denied_for(err), DenyReason::MissingToken);
        }
    }

    #[tokio::test]
    async fn route_params_resolve_after_the_token_is_checked() {
        let svc = service(MemoryLookup::new().with_user(42, "owner").with_post(100, 42));
        let token = token_for(&svc, 42);
        let cap = Capability::Ownership(ResourceKind::Post);

        let params: HashMap<String, String> = [("id".to_string(), "100".to_string())].into();
        let ok = svc
            .authorize_route(Some(token.as_str()), cap, &params, Utc::now())
            .await
            .unwrap();
        assert_eq!(ok.user_id, 42);

        let bad_id: HashMap<String, String> = [("id".to_string(), "x".to_string())].into();
        let err = svc
            .authorize_route(Some(token.as_str()), cap, &bad_id, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(denied_for(err), DenyReason::UnresolvedTarget);

        // an expired token says so even when the target cannot be resolved
        let later = Utc::now() + ChronoDuration::minutes(30);
        let err = svc
            .authorize_route(Some(token.as_str()), cap, &bad_id, later)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::Token(TokenError::Expired)));
    }

    #[tokio::test]
    async fn store_failure_is_not_a_denial() {
        let svc = service(MemoryLookup::broken());
        let token = token_for(&svc, 1);

        let err = svc
            .authorize(
                Some(token.as_str()),
                AccessCheck::Ownership {
                    kind: ResourceKind::Comment,
                    resource_id: 1,
                },
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::Store(_)));
    }
}
