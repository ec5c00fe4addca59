//! Identity provider: users, passwords and bearer tokens
//!
//! The REST layer only needs three answers from identity: who is this token,
//! can this email/password pair log in, and may this email register. The
//! [`IdentityProvider`] trait captures that contract; the in-memory provider
//! backs the demo app and tests.

use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use storefront_core::config::AuthSettings;
use storefront_rbac::principal::Principal;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

const MAX_FIELD_LEN: usize = 255;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("The email has already been taken.")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid access token")]
    InvalidToken,

    #[error("Access token expired")]
    TokenExpired,

    #[error("{0}")]
    Validation(String),

    /// Failure inside a provider backend
    #[error("identity backend failure: {0}")]
    Backend(String),
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::EmailTaken => ApiError::Conflict(err.to_string()),
            IdentityError::InvalidCredentials
            | IdentityError::InvalidToken
            | IdentityError::TokenExpired => ApiError::Unauthenticated(err.to_string()),
            IdentityError::Validation(msg) => ApiError::Validation(msg),
            IdentityError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

/// A registered user as exposed by the API. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The principal the role gate sees for this user
    pub fn principal(&self) -> Principal {
        Principal::new(self.id.to_string()).with_roles(self.roles.iter().cloned())
    }
}

/// Opaque bearer token handed out on register and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    fn validate(&self) -> Result<(), IdentityError> {
        let name = self.name.trim();
        if name.is_empty() || name.len() > MAX_FIELD_LEN {
            return Err(IdentityError::Validation(
                "The name field is required and may not exceed 255 characters.".to_string(),
            ));
        }
        if !looks_like_email(&self.email) || self.email.len() > MAX_FIELD_LEN {
            return Err(IdentityError::Validation(
                "The email must be a valid email address.".to_string(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::Validation(format!(
                "The password must be at least {} characters.",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

/// Credential checks and token bookkeeping
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a user with the provider's default roles and issue a token
    async fn register(&self, registration: Registration)
    -> Result<(User, AccessToken), IdentityError>;

    async fn login(&self, email: &str, password: &str)
    -> Result<(User, AccessToken), IdentityError>;

    /// Resolve a bearer token to its user
    async fn authenticate(&self, token: &str) -> Result<User, IdentityError>;

    /// Revoke a token; later `authenticate` calls with it fail
    async fn revoke(&self, token: &str) -> Result<(), IdentityError>;
}

struct StoredUser {
    user: User,
    password_hash: String,
}

struct TokenRecord {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Process-local identity provider.
///
/// Passwords are kept as bcrypt hashes. Tokens are random UUIDs valid for
/// the configured lifetime; expired ones are dropped on lookup and whenever
/// a new token is issued.
pub struct InMemoryIdentityProvider {
    users: RwLock<HashMap<Uuid, StoredUser>>,
    emails: RwLock<HashMap<String, Uuid>>,
    tokens: RwLock<HashMap<String, TokenRecord>>,
    token_ttl: Duration,
    default_roles: Vec<String>,
    hash_cost: u32,
}

impl InMemoryIdentityProvider {
    pub fn new(token_ttl: Duration, default_roles: Vec<String>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            emails: RwLock::new(HashMap::new()),
            tokens: RwLock::new(HashMap::new()),
            token_ttl,
            default_roles,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// bcrypt work factor for new password hashes
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(
            Duration::days(settings.token_ttl_days),
            settings.default_roles.clone(),
        )
    }

    /// Create a user with explicit roles, e.g. an administrator at startup
    pub async fn create_user<I, S>(
        &self,
        registration: Registration,
        roles: I,
    ) -> Result<User, IdentityError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        registration.validate()?;
        let email = normalize_email(&registration.email);

        let mut emails = self.emails.write().await;
        if emails.contains_key(&email) {
            return Err(IdentityError::EmailTaken);
        }

        let password_hash = hash_password(registration.password, self.hash_cost).await?;
        let user = User {
            id: Uuid::new_v4(),
            name: registration.name.trim().to_string(),
            email: email.clone(),
            roles: roles.into_iter().map(Into::into).collect(),
            created_at: Utc::now(),
        };
        let stored = StoredUser {
            password_hash,
            user: user.clone(),
        };

        emails.insert(email, user.id);
        self.users.write().await.insert(user.id, stored);
        info!(user_id = %user.id, roles = ?user.roles, "User created");
        Ok(user)
    }

    async fn issue_token(&self, user_id: Uuid) -> AccessToken {
        let token = Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, record| record.expires_at > now);
        if tokens.len() < before {
            debug!(purged = before - tokens.len(), "Expired tokens purged");
        }
        tokens.insert(token.clone(), TokenRecord { user_id, expires_at });

        AccessToken {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_at,
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn register(
        &self,
        registration: Registration,
    ) -> Result<(User, AccessToken), IdentityError> {
        let user = self
            .create_user(registration, self.default_roles.iter().cloned())
            .await?;
        let token = self.issue_token(user.id).await;
        Ok((user, token))
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(User, AccessToken), IdentityError> {
        let user_id = self
            .emails
            .read()
            .await
            .get(&normalize_email(email))
            .copied();
        let (user, password_hash) = {
            let users = self.users.read().await;
            let stored = user_id
                .and_then(|id| users.get(&id))
                .ok_or(IdentityError::InvalidCredentials)?;
            (stored.user.clone(), stored.password_hash.clone())
        };

        if !verify_password(password.to_string(), password_hash).await? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(IdentityError::InvalidCredentials);
        }

        let token = self.issue_token(user.id).await;
        debug!(user_id = %user.id, "Login succeeded");
        Ok((user, token))
    }

    async fn authenticate(&self, token: &str) -> Result<User, IdentityError> {
        let user_id = {
            let tokens = self.tokens.read().await;
            let record = tokens.get(token).ok_or(IdentityError::InvalidToken)?;
            (record.expires_at > Utc::now()).then_some(record.user_id)
        };
        let Some(user_id) = user_id else {
            self.tokens.write().await.remove(token);
            return Err(IdentityError::TokenExpired);
        };

        self.users
            .read()
            .await
            .get(&user_id)
            .map(|stored| stored.user.clone())
            .ok_or(IdentityError::InvalidToken)
    }

    async fn revoke(&self, token: &str) -> Result<(), IdentityError> {
        match self.tokens.write().await.remove(token) {
            Some(record) => {
                debug!(user_id = %record.user_id, "Token revoked");
                Ok(())
            }
            None => Err(IdentityError::InvalidToken),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

// bcrypt is deliberately slow, so it runs off the async workers
async fn hash_password(password: String, cost: u32) -> Result<String, IdentityError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| IdentityError::Backend(e.to_string()))?
        .map_err(|e| IdentityError::Backend(e.to_string()))
}

async fn verify_password(password: String, hash: String) -> Result<bool, IdentityError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| IdentityError::Backend(e.to_string()))?
        .map_err(|e| IdentityError::Backend(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str) -> Registration {
        Registration {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: "correct horse".to_string(),
        }
    }

    fn provider() -> InMemoryIdentityProvider {
        InMemoryIdentityProvider::from_settings(&AuthSettings::default())
            .with_hash_cost(4)
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let provider = provider();
        let (user, token) = provider.register(registration("ada@example.com")).await.unwrap();

        assert!(user.roles.contains("user"));
        assert_eq!(token.token_type, "Bearer");
        let resolved = provider.authenticate(&token.access_token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let provider = provider();
        provider.register(registration("ada@example.com")).await.unwrap();
        let err = provider
            .register(registration("ADA@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err, IdentityError::EmailTaken);
    }

    #[tokio::test]
    async fn login_checks_password() {
        let provider = provider();
        provider.register(registration("ada@example.com")).await.unwrap();

        assert!(provider.login("ada@example.com", "correct horse").await.is_ok());
        assert_eq!(
            provider.login("ada@example.com", "wrong").await.unwrap_err(),
            IdentityError::InvalidCredentials
        );
        assert_eq!(
            provider.login("nobody@example.com", "x").await.unwrap_err(),
            IdentityError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn revoked_token_no_longer_authenticates() {
        let provider = provider();
        let (_, token) = provider.register(registration("ada@example.com")).await.unwrap();

        provider.revoke(&token.access_token).await.unwrap();
        assert_eq!(
            provider.authenticate(&token.access_token).await.unwrap_err(),
            IdentityError::InvalidToken
        );
    }

    #[tokio::test]
    async fn expired_token_rejected_and_evicted() {
        let provider =
            InMemoryIdentityProvider::new(Duration::zero(), vec!["user".into()]).with_hash_cost(4);
        let (_, token) = provider.register(registration("ada@example.com")).await.unwrap();
        assert_eq!(
            provider.authenticate(&token.access_token).await.unwrap_err(),
            IdentityError::TokenExpired
        );
        assert!(provider.tokens.read().await.is_empty());
        assert_eq!(
            provider.authenticate(&token.access_token).await.unwrap_err(),
            IdentityError::InvalidToken
        );
    }

    #[tokio::test]
    async fn issuing_purges_expired_tokens() {
        let provider =
            InMemoryIdentityProvider::new(Duration::zero(), vec!["user".into()]).with_hash_cost(4);
        provider.register(registration("ada@example.com")).await.unwrap();
        for _ in 0..3 {
            provider.login("ada@example.com", "correct horse").await.unwrap();
        }
        assert_eq!(provider.tokens.read().await.len(), 1);
    }

    #[tokio::test]
    async fn validation() {
        let provider = provider();
        let mut short = registration("ada@example.com");
        short.password = "short".into();
        assert!(matches!(
            provider.register(short).await,
            Err(IdentityError::Validation(_))
        ));
        assert!(matches!(
            provider.register(registration("not-an-email")).await,
            Err(IdentityError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn passwords_stored_as_salted_bcrypt() {
        let provider = provider();
        let (user, _) = provider.register(registration("ada@example.com")).await.unwrap();
        let (other, _) = provider.register(registration("bob@example.com")).await.unwrap();

        let users = provider.users.read().await;
        let hash = &users[&user.id].password_hash;
        assert!(hash.starts_with("$2"));
        assert!(!hash.contains("correct horse"));
        assert_ne!(hash, &users[&other.id].password_hash);
    }

    #[test]
    fn principal_carries_roles() {
        let user = User {
            id: Uuid::nil(),
            name: "Root".into(),
            email: "root@example.com".into(),
            roles: ["admin".to_string()].into_iter().collect(),
            created_at: Utc::now(),
        };
        assert!(user.principal().has_role("admin"));
    }
}
