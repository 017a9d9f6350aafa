use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use learnhub_model::{NewUser, StreakState, UserKey, UserRecord, UserRole};
use tracing::{debug, info, instrument, warn};

use super::crypto::AuthCrypto;
use super::streak::StreakCalendar;
use crate::database::ports::users::UsersRepository;
use crate::error::{LearnError, Result, StoreError};
use crate::security::RateLimiters;
use crate::validation::is_valid_email;

pub const MISSING_CREDENTIALS: &str = "Please provide user ID and password";
pub const MIN_PASSWORD_LEN: usize = 8;

/// Credential checks and login streak bookkeeping.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepository>,
    crypto: Arc<AuthCrypto>,
    limiters: Arc<RateLimiters>,
    calendar: StreakCalendar,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("users", &std::any::type_name_of_val(self.users.as_ref()))
            .field("calendar", &self.calendar)
            .field("login_remaining", &self.limiters.login.remaining())
            .finish()
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        crypto: Arc<AuthCrypto>,
        limiters: Arc<RateLimiters>,
    ) -> Self {
        Self {
            users,
            crypto,
            limiters,
            calendar: StreakCalendar::default(),
        }
    }

    pub fn with_calendar(mut self, calendar: StreakCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn limiters(&self) -> &RateLimiters {
        &self.limiters
    }

    /// Verifies `(login_id, role)` credentials and refreshes the streak.
    ///
    /// `role` defaults to [`UserRole::Student`]. Unknown users, role
    /// mismatches and wrong passwords are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        login_id: &str,
        password: &str,
        role: Option<UserRole>,
    ) -> Result<UserRecord> {
        let login_id = login_id.trim();
        if login_id.is_empty() || password.is_empty() {
            return Err(LearnError::validation(MISSING_CREDENTIALS));
        }
        let role = role.unwrap_or_default();

        let limiter = &self.limiters.login;
        if !limiter.can_make_request() {
            let retry_after = limiter.wait_time();
            warn!(?retry_after, "login attempts exhausted");
            return Err(LearnError::RateLimited { retry_after });
        }
        limiter.record_request();

        let record = match self.users.find_for_login(login_id, role).await {
            Ok(record) => record,
            Err(StoreError::NoRows) => {
                debug!("no user for login id and role");
                return Err(LearnError::InvalidCredentials);
            }
            Err(err) => return Err(err.into()),
        };

        let verified = self
            .crypto
            .verify_password(password, &record.password_hash)
            .unwrap_or_else(|err| {
                warn!(user = %record.user.id, error = %err, "stored password hash is unreadable");
                false
            });
        if !verified {
            return Err(LearnError::InvalidCredentials);
        }

        let mut user = record.user;
        if let Some(streak) = self.refresh_streak(user.id).await {
            user.last_login = streak.last_login;
            user.current_streak = streak.current;
            user.longest_streak = streak.longest;
        }
        info!(user = %user.id, streak = user.current_streak, "login succeeded");
        Ok(user)
    }

    /// Applies today's login to the stored streak and returns the current
    /// streak. Failures are logged and read as 0.
    pub async fn update_login_streak(&self, user: UserKey) -> u32 {
        self.refresh_streak(user)
            .await
            .map(|streak| streak.current)
            .unwrap_or(0)
    }

    async fn refresh_streak(&self, user: UserKey) -> Option<StreakState> {
        let previous = match self.users.get_streak(user).await {
            Ok(previous) => previous,
            Err(err) => {
                warn!(%user, error = %err, "could not read login streak");
                return None;
            }
        };
        let Some(next) = self.calendar.next_state(Utc::now(), &previous) else {
            return Some(previous);
        };
        match self.users.record_login(user, &next).await {
            Ok(()) => Some(next),
            Err(err) => {
                warn!(%user, error = %err, "could not persist login streak");
                None
            }
        }
    }

    /// Creates a user with a hashed password.
    #[instrument(skip(self, user, password), fields(login_id = %user.login_id, role = %user.role))]
    pub async fn register(&self, user: NewUser, password: &str) -> Result<UserRecord> {
        let login_id = user.login_id.trim();
        if login_id.is_empty() {
            return Err(LearnError::validation("User ID is required"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(LearnError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if let Some(email) = user.email.as_deref()
            && !is_valid_email(email)
        {
            return Err(LearnError::validation("Invalid email format"));
        }

        let limiter = &self.limiters.registration;
        if !limiter.can_make_request() {
            return Err(LearnError::RateLimited {
                retry_after: limiter.wait_time(),
            });
        }
        limiter.record_request();

        let user = NewUser {
            login_id: login_id.to_string(),
            ..user
        };
        let hash = self.crypto.hash_password(password)?;
        let created = self.users.create_user(&user, &hash).await?;
        info!(user = %created.id, "user registered");
        Ok(created)
    }

    pub async fn set_password(&self, user: UserKey, password: &str) -> Result<()> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(LearnError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let hash = self.crypto.hash_password(password)?;
        self.users.set_password_hash(user, &hash).await?;
        Ok(())
    }
}
