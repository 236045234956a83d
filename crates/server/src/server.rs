use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::{admin, auth};
use api_types::{BalanceInput, user::UserView};
use engine::{Balance, Engine, SESSION_TTL_HOURS, User};

/// Name of the cookie carrying the session token.
pub(crate) const SESSION_COOKIE: &str = "kasa_session";

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Whether session cookies carry the `Secure` flag (on behind TLS).
    pub secure_cookies: bool,
}

/// Reads the session token out of the request's cookie jar. A malformed
/// token reads as no session.
pub(crate) fn session_token(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

/// Builds the session cookie set on login: HTTP-only, site-wide,
/// 24-hour max age.
pub(crate) fn session_cookie(token: Uuid, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(time::Duration::hours(SESSION_TTL_HOURS));
    cookie
}

/// Cookie used to clear the session on logout.
pub(crate) fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie
}

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        password: user.password,
        balance: user.balance.to_string(),
    }
}

/// Normalizes a wire balance (string or number) into cents.
pub(crate) fn parse_balance(input: BalanceInput) -> Result<Balance, crate::ServerError> {
    let balance = match input {
        BalanceInput::Number(value) => Balance::try_from(value)?,
        BalanceInput::Text(text) => text.parse()?,
    };
    Ok(balance)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/admin-login", post(auth::admin_login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/check-admin", get(auth::check_admin))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}", put(admin::update_user))
        .with_state(state)
}

pub async fn run(engine: Engine, secure_cookies: bool) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, secure_cookies, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    secure_cookies: bool,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        secure_cookies,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    secure_cookies: bool,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, secure_cookies, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
