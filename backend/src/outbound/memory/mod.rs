//! In-memory account directory implementing [`AuthService`] and
//! [`UserService`].
//!
//! State sits behind a single `RwLock`; guards are never held across an
//! `.await`. Passwords are stored as salted SHA-256 digests. Access and reset
//! tokens are random opaque strings with a fixed lifetime read from the
//! injected [`Clock`]; each user holds at most [`MAX_SESSIONS_PER_USER`]
//! access tokens and one reset token.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::LoggingResetNotifier;
use crate::domain::ports::{AuthService, ResetDelivery, ResetNotifier, ResetToken, UserService};
use crate::domain::{
    AccessToken, AuthResponse, ChangePasswordRequest, CreateUserRequest, Error,
    ForgotPasswordRequest, LoginRequest, Password, RegisterRequest, ResetPasswordRequest,
    UpdateUserRequest, User, UserId, UserPage, UserQuery, UserRole,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";
const ACCESS_TOKEN_TTL_HOURS: i64 = 12;
const RESET_TOKEN_TTL_MINUTES: i64 = 30;

/// Access tokens kept per user; issuing another evicts the oldest.
pub const MAX_SESSIONS_PER_USER: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PasswordDigest {
    salt: [u8; 16],
    hash: Vec<u8>,
}

impl PasswordDigest {
    fn new(password: &Password) -> Self {
        let salt = Uuid::new_v4().into_bytes();
        let hash = Self::hash(&salt, password);
        Self { salt, hash }
    }

    fn hash(salt: &[u8], password: &Password) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.expose().as_bytes());
        hasher.finalize().to_vec()
    }

    fn verify(&self, password: &Password) -> bool {
        digests_match(&Self::hash(&self.salt, password), &self.hash)
    }
}

/// Compare two digests without short-circuiting on the first differing byte.
fn digests_match(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}

fn random_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: PasswordDigest,
}

#[derive(Debug, Clone, Copy)]
struct Session {
    user: UserId,
    sequence: u64,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct PendingReset {
    user: UserId,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Directory {
    accounts: HashMap<UserId, Account>,
    by_email: HashMap<String, UserId>,
    access_tokens: HashMap<AccessToken, Session>,
    reset_tokens: HashMap<String, PendingReset>,
    next_sequence: u64,
}

struct NewAccount {
    email: String,
    password: Password,
    name: String,
    phone: Option<String>,
    role: UserRole,
    is_active: bool,
}

impl Directory {
    fn insert(&mut self, new: NewAccount, now: DateTime<Utc>) -> Result<User, Error> {
        let email = normalise_email(&new.email);
        if self.by_email.contains_key(&email) {
            return Err(Error::conflict("email is already registered"));
        }
        let user = User {
            id: UserId::random(),
            email: email.clone(),
            name: new.name,
            phone: new.phone,
            role: new.role,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };
        self.by_email.insert(email, user.id);
        self.accounts.insert(
            user.id,
            Account {
                user: user.clone(),
                password: PasswordDigest::new(&new.password),
            },
        );
        Ok(user)
    }

    fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.by_email
            .get(&normalise_email(email))
            .and_then(|id| self.accounts.get(id))
    }

    fn account_mut(&mut self, id: &UserId) -> Result<&mut Account, Error> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    fn issue_access_token(&mut self, user: &User, now: DateTime<Utc>) -> AuthResponse {
        self.access_tokens.retain(|_, session| session.expires_at > now);
        let mut held: Vec<(u64, AccessToken)> = self
            .access_tokens
            .iter()
            .filter(|(_, session)| session.user == user.id)
            .map(|(token, session)| (session.sequence, token.clone()))
            .collect();
        if held.len() >= MAX_SESSIONS_PER_USER {
            held.sort_unstable_by_key(|(sequence, _)| *sequence);
            let excess = held.len() + 1 - MAX_SESSIONS_PER_USER;
            for (_, token) in held.into_iter().take(excess) {
                self.access_tokens.remove(&token);
            }
        }

        let token = AccessToken::new(random_token());
        self.next_sequence += 1;
        self.access_tokens.insert(
            token.clone(),
            Session {
                user: user.id,
                sequence: self.next_sequence,
                expires_at: now + TimeDelta::hours(ACCESS_TOKEN_TTL_HOURS),
            },
        );
        AuthResponse::bearer(token, user.clone())
    }

    fn issue_reset_token(
        &mut self,
        user: UserId,
        now: DateTime<Utc>,
    ) -> (ResetToken, DateTime<Utc>) {
        self.reset_tokens
            .retain(|_, pending| pending.user != user && pending.expires_at > now);
        let token = random_token();
        let expires_at = now + TimeDelta::minutes(RESET_TOKEN_TTL_MINUTES);
        self.reset_tokens
            .insert(token.clone(), PendingReset { user, expires_at });
        (ResetToken::new(token), expires_at)
    }

    fn revoke_tokens_for(&mut self, id: &UserId) {
        self.access_tokens.retain(|_, session| session.user != *id);
        self.reset_tokens.retain(|_, pending| pending.user != *id);
    }
}

fn normalise_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::internal("account directory lock poisoned")
}

/// Process-local account directory.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use marketplace_api::outbound::{InMemoryAccounts, ResetOutbox};
///
/// let outbox = Arc::new(ResetOutbox::default());
/// let accounts = InMemoryAccounts::new().with_notifier(outbox);
/// assert_eq!(accounts.len().expect("lock healthy"), 0);
/// ```
pub struct InMemoryAccounts {
    directory: RwLock<Directory>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn ResetNotifier>,
}

impl fmt::Debug for InMemoryAccounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryAccounts")
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryAccounts {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAccounts {
    /// Empty directory using the system clock and [`LoggingResetNotifier`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            directory: RwLock::new(Directory::default()),
            clock: Arc::new(DefaultClock),
            notifier: Arc::new(LoggingResetNotifier),
        }
    }

    /// Replace the channel reset tokens are delivered through.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn ResetNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replace the clock used for timestamps and token expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Number of registered accounts.
    ///
    /// # Errors
    /// Fails only when the lock is poisoned.
    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.read()?.accounts.len())
    }

    /// Whether no account is registered.
    ///
    /// # Errors
    /// Fails only when the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, Error> {
        self.len().map(|count| count == 0)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Directory>, Error> {
        self.directory.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Directory>, Error> {
        self.directory.write().map_err(poisoned)
    }
}

#[async_trait]
impl AuthService for InMemoryAccounts {
    async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, Error> {
        let now = self.now();
        let mut directory = self.write()?;
        let user = directory.insert(
            NewAccount {
                email: request.email,
                password: request.password,
                name: request.name,
                phone: request.phone,
                role: UserRole::Customer,
                is_active: true,
            },
            now,
        )?;
        info!(user_id = %user.id, "account registered");
        Ok(directory.issue_access_token(&user, now))
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthResponse, Error> {
        let now = self.now();
        let mut directory = self.write()?;
        let user = match directory.account_by_email(&request.email) {
            Some(account) if account.password.verify(&request.password) => account.user.clone(),
            _ => return Err(Error::unauthorized(INVALID_CREDENTIALS)),
        };
        if !user.is_active {
            return Err(Error::forbidden("account is disabled"));
        }
        Ok(directory.issue_access_token(&user, now))
    }

    async fn authenticate(&self, token: &AccessToken) -> Result<User, Error> {
        let now = self.now();
        let directory = self.read()?;
        directory
            .access_tokens
            .get(token)
            .filter(|session| session.expires_at > now)
            .and_then(|session| directory.accounts.get(&session.user))
            .filter(|account| account.user.is_active)
            .map(|account| account.user.clone())
            .ok_or_else(|| Error::unauthorized("invalid or expired access token"))
    }

    async fn change_password(
        &self,
        user: &UserId,
        request: ChangePasswordRequest,
    ) -> Result<(), Error> {
        let now = self.now();
        let mut directory = self.write()?;
        let account = directory.account_mut(user)?;
        if !account.password.verify(&request.current_password) {
            return Err(Error::unauthorized("current password is incorrect"));
        }
        account.password = PasswordDigest::new(&request.new_password);
        account.user.updated_at = now;
        info!(user_id = %user, "password changed");
        Ok(())
    }

    async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<(), Error> {
        let now = self.now();
        let delivery = {
            let mut directory = self.write()?;
            let Some((id, email)) = directory
                .account_by_email(&request.email)
                .filter(|account| account.user.is_active)
                .map(|account| (account.user.id, account.user.email.clone()))
            else {
                debug!("password reset requested for unknown or inactive email");
                return Ok(());
            };
            let (token, expires_at) = directory.issue_reset_token(id, now);
            info!(user_id = %id, "password reset requested");
            ResetDelivery {
                email,
                token,
                expires_at,
            }
        };

        if let Err(err) = self.notifier.deliver(&delivery).await {
            warn!(error = %err, "reset token delivery failed; token withdrawn");
            if let Ok(mut directory) = self.write() {
                directory.reset_tokens.remove(delivery.token.as_str());
            }
        }
        Ok(())
    }

    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), Error> {
        let now = self.now();
        let mut directory = self.write()?;
        let Some(pending) = directory
            .reset_tokens
            .remove(&request.token)
            .filter(|pending| pending.expires_at > now)
        else {
            warn!("reset attempted with unknown or expired token");
            return Err(Error::invalid_request("Invalid or expired reset token"));
        };
        let account = directory.account_mut(&pending.user)?;
        account.password = PasswordDigest::new(&request.new_password);
        account.user.updated_at = now;
        directory.revoke_tokens_for(&pending.user);
        info!(user_id = %pending.user, "password reset completed");
        Ok(())
    }
}

#[async_trait]
impl UserService for InMemoryAccounts {
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        let now = self.now();
        let user = self.write()?.insert(
            NewAccount {
                email: request.email,
                password: request.password,
                name: request.name,
                phone: request.phone,
                role: request.role.unwrap_or_default(),
                is_active: request.is_active.unwrap_or(true),
            },
            now,
        )?;
        info!(user_id = %user.id, role = ?user.role, "user created");
        Ok(user)
    }

    async fn update_user(&self, id: &UserId, request: UpdateUserRequest) -> Result<User, Error> {
        let now = self.now();
        let mut directory = self.write()?;
        let account = directory.account_mut(id)?;
        let UpdateUserRequest {
            name,
            phone,
            role,
            is_active,
        } = request;
        let user = &mut account.user;
        let changed = name.is_some() || phone.is_some() || role.is_some() || is_active.is_some();
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(phone) = phone {
            user.phone = Some(phone);
        }
        if let Some(role) = role {
            user.role = role;
        }
        if let Some(is_active) = is_active {
            user.is_active = is_active;
        }
        if changed {
            user.updated_at = now;
        }
        Ok(user.clone())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.read()?
            .accounts
            .get(id)
            .map(|account| account.user.clone())
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn list_users(&self, query: &UserQuery) -> Result<UserPage, Error> {
        let mut matching: Vec<User> = self
            .read()?
            .accounts
            .values()
            .map(|account| &account.user)
            .filter(|user| query.matches(user))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let (page, limit) = (query.page(), query.limit());
        let skip = usize::try_from(u64::from(page - 1) * u64::from(limit)).unwrap_or(usize::MAX);
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(skip)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();
        Ok(UserPage {
            items,
            total,
            page,
            limit,
        })
    }
}
