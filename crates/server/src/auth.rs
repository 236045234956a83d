//! Session and authentication endpoints.

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;

use api_types::{
    session::Acknowledged,
    user::{LoggedIn, LoginUser, Registered, RegisterUser, UserView},
};
use engine::Registration;

use crate::{
    ServerError,
    server::{ServerState, parse_balance, removal_cookie, session_cookie, session_token, user_view},
};

/// Handle requests for creating a new account.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterUser>,
) -> Result<(StatusCode, Json<Registered>), ServerError> {
    let balance = payload.balance.map(parse_balance).transpose()?;

    let user = state
        .engine
        .register(Registration {
            username: payload.username,
            password: payload.password,
            password_confirmation: payload.confirm_password,
            balance,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Registered {
            id: user.id,
            username: user.username,
        }),
    ))
}

/// Handle user login. A fresh session token replaces whatever session the
/// caller held before.
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(payload): Json<LoginUser>,
) -> Result<(CookieJar, Json<LoggedIn>), ServerError> {
    let prior = session_token(&jar);
    let (token, user) = state
        .engine
        .login(prior, &payload.username, &payload.password)
        .await?;

    let jar = jar.add(session_cookie(token, state.secure_cookies));
    Ok((
        jar,
        Json(LoggedIn {
            id: user.id,
            username: user.username,
            balance: user.balance.to_string(),
        }),
    ))
}

/// Handle administrator login against the fixed credentials.
pub async fn admin_login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(payload): Json<LoginUser>,
) -> Result<(CookieJar, Json<Acknowledged>), ServerError> {
    let prior = session_token(&jar);
    let token = state
        .engine
        .admin_login(prior, &payload.username, &payload.password)
        .await?;

    let jar = jar.add(session_cookie(token, state.secure_cookies));
    Ok((jar, Json(Acknowledged { success: true })))
}

/// Returns the account of the currently logged-in user.
pub async fn me(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.current_user(session_token(&jar)).await?;
    Ok(Json(user_view(user)))
}

/// Returns whether the caller holds an administrator session.
pub async fn check_admin(State(state): State<ServerState>, jar: CookieJar) -> Json<bool> {
    Json(state.engine.is_admin(session_token(&jar)).await)
}

/// Destroys the caller's session and clears the cookie. Idempotent.
pub async fn logout(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Acknowledged>), ServerError> {
    state.engine.logout(session_token(&jar)).await?;
    let jar = jar.remove(removal_cookie());
    Ok((jar, Json(Acknowledged { success: true })))
}
