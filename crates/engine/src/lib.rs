use std::sync::Arc;

use sea_orm::DatabaseConnection;
use uuid::Uuid;

pub use balance::Balance;
pub use error::EngineError;
pub use session::{
    Identity, MemorySessionStore, SESSION_TTL_HOURS, SessionData, SessionStore,
};
pub use store::{DatabaseStore, MemoryStore, NewUser, User, UserChanges, UserStore};

mod balance;
mod error;
mod session;
mod store;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;

/// Username the administrator logs in with. The administrator is never a
/// record in the user store.
pub const ADMIN_USERNAME: &str = "admin";
/// Password the administrator logs in with.
pub const ADMIN_PASSWORD: &str = "admingorka";

/// Validated registration input, before the store assigns an id.
#[derive(Clone, Debug)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub password_confirmation: Option<String>,
    pub balance: Option<Balance>,
}

/// The session-authenticated account engine.
///
/// Owns the user store and the session repository and implements the whole
/// auth gate: registration, the two login flavours, logout, and the
/// admin-guarded account management operations. HTTP handlers hold the
/// engine behind an [`Arc`] and pass the caller's cookie token in.
pub struct Engine {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    async fn session(&self, token: Option<Uuid>) -> ResultEngine<Option<SessionData>> {
        match token {
            Some(token) => self.sessions.get(token).await,
            None => Ok(None),
        }
    }

    async fn require_admin(&self, token: Option<Uuid>) -> ResultEngine<()> {
        match self.session(token).await? {
            Some(SessionData {
                identity: Identity::Admin,
                ..
            }) => Ok(()),
            _ => Err(EngineError::Forbidden(
                "administrator privileges required".to_string(),
            )),
        }
    }

    fn validate_credentials(username: &str, password: &str) -> ResultEngine<()> {
        if username.trim().is_empty() {
            return Err(EngineError::InvalidInput("username is required".to_string()));
        }
        if password.is_empty() {
            return Err(EngineError::InvalidInput("password is required".to_string()));
        }
        Ok(())
    }

    /// Creates a new account. The balance defaults to zero when omitted.
    pub async fn register(&self, registration: Registration) -> ResultEngine<User> {
        Self::validate_credentials(&registration.username, &registration.password)?;
        if let Some(confirmation) = &registration.password_confirmation {
            if *confirmation != registration.password {
                return Err(EngineError::InvalidInput(
                    "passwords do not match".to_string(),
                ));
            }
        }

        self.users
            .create(NewUser {
                username: registration.username,
                password: registration.password,
                balance: registration.balance.unwrap_or(Balance::ZERO),
            })
            .await
    }

    /// Authenticates an account and opens a fresh user session.
    ///
    /// Any session the caller already held (user or admin) is destroyed
    /// first, so the two identities never coexist on one client.
    pub async fn login(
        &self,
        prior: Option<Uuid>,
        username: &str,
        password: &str,
    ) -> ResultEngine<(Uuid, User)> {
        let unauthorized = || EngineError::Unauthorized("invalid username or password".to_string());

        let user = self
            .users
            .by_username(username)
            .await?
            .ok_or_else(unauthorized)?;
        if user.password != password {
            return Err(unauthorized());
        }

        if let Some(prior) = prior {
            self.sessions.remove(prior).await?;
        }
        let token = self
            .sessions
            .insert(SessionData::new(Identity::User(user.id.clone())))
            .await?;
        Ok((token, user))
    }

    /// Authenticates the fixed administrator identity.
    ///
    /// The credentials are compared against the compiled-in constants; the
    /// user store is never consulted.
    pub async fn admin_login(
        &self,
        prior: Option<Uuid>,
        username: &str,
        password: &str,
    ) -> ResultEngine<Uuid> {
        if username != ADMIN_USERNAME || password != ADMIN_PASSWORD {
            return Err(EngineError::Unauthorized(
                "invalid administrator credentials".to_string(),
            ));
        }

        if let Some(prior) = prior {
            self.sessions.remove(prior).await?;
        }
        self.sessions.insert(SessionData::new(Identity::Admin)).await
    }

    /// Destroys the caller's session. Logging out without a session is a
    /// no-op; only a failing session backing surfaces an error.
    pub async fn logout(&self, token: Option<Uuid>) -> ResultEngine<()> {
        match token {
            Some(token) => self.sessions.remove(token).await,
            None => Ok(()),
        }
    }

    /// Resolves the caller's session to their account record.
    pub async fn current_user(&self, token: Option<Uuid>) -> ResultEngine<User> {
        let session = self
            .session(token)
            .await?
            .ok_or_else(|| EngineError::Unauthorized("not logged in".to_string()))?;

        let user_id = match session.identity {
            Identity::User(id) => id,
            Identity::Admin => {
                return Err(EngineError::Unauthorized("not logged in".to_string()));
            }
        };

        self.users
            .by_id(&user_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not found".to_string()))
    }

    /// Returns whether the caller holds a live administrator session.
    /// Never errors; backing-store failures read as `false`.
    pub async fn is_admin(&self, token: Option<Uuid>) -> bool {
        matches!(
            self.session(token).await,
            Ok(Some(SessionData {
                identity: Identity::Admin,
                ..
            }))
        )
    }

    /// Lists every account. Admin-only.
    pub async fn users(&self, token: Option<Uuid>) -> ResultEngine<Vec<User>> {
        self.require_admin(token).await?;
        self.users.list().await
    }

    /// Replaces username, password and balance of an account. Admin-only.
    pub async fn update_user(
        &self,
        token: Option<Uuid>,
        id: &str,
        changes: UserChanges,
    ) -> ResultEngine<User> {
        self.require_admin(token).await?;
        Self::validate_credentials(&changes.username, &changes.password)?;
        self.users.update(id, changes).await
    }
}

/// Builder for [`Engine`]. Defaults to in-memory backings for both the user
/// store and the session repository; a database connection switches the user
/// store to the persistent implementation.
#[derive(Default)]
pub struct EngineBuilder {
    database: Option<DatabaseConnection>,
    sessions: Option<Arc<dyn SessionStore>>,
}

impl EngineBuilder {
    #[must_use]
    pub fn database(mut self, db: DatabaseConnection) -> Self {
        self.database = Some(db);
        self
    }

    #[must_use]
    pub fn session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    #[must_use]
    pub fn build(self) -> Engine {
        let users: Arc<dyn UserStore> = match self.database {
            Some(db) => Arc::new(DatabaseStore::new(db)),
            None => Arc::new(MemoryStore::new()),
        };
        let sessions = self
            .sessions
            .unwrap_or_else(|| Arc::new(MemorySessionStore::new()));

        Engine { users, sessions }
    }
}
