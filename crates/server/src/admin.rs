//! Administrator endpoints for account management.

use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::cookie::CookieJar;

use api_types::user::{UpdateUser, UserView};
use engine::UserChanges;

use crate::{
    ServerError,
    server::{ServerState, parse_balance, session_token, user_view},
};

/// Lists every registered account. Requires an administrator session.
pub async fn list_users(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<Json<Vec<UserView>>, ServerError> {
    let users = state.engine.users(session_token(&jar)).await?;
    Ok(Json(users.into_iter().map(user_view).collect()))
}

/// Replaces username, password and balance of one account. Requires an
/// administrator session.
pub async fn update_user(
    State(state): State<ServerState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUser>,
) -> Result<Json<UserView>, ServerError> {
    let balance = parse_balance(payload.balance)?;

    let user = state
        .engine
        .update_user(
            session_token(&jar),
            &id,
            UserChanges {
                username: payload.username,
                password: payload.password,
                balance,
            },
        )
        .await?;

    Ok(Json(user_view(user)))
}
