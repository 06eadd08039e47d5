//! Authentication: Discord OAuth2 code flow + opaque session cookies.
//!
//! `login` sends the browser to Discord with a random `state` nonce;
//! `callback` checks the nonce, exchanges the code for a token, fetches
//! the user's identity, and issues a server-side session referenced by
//! an HttpOnly cookie. The session token is opaque; everything about
//! the user lives in the store.

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use serde::Deserialize;

use armory_store::{create_session, delete_session, get_session, User};

use crate::error::HttpError;
use crate::state::{AppState, SharedState};

pub const SESSION_COOKIE: &str = "armory_session";
const STATE_COOKIE: &str = "armory_oauth_state";

const AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";
const TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const IDENTITY_URL: &str = "https://discord.com/api/users/@me";

/// Resolve the caller's session, or fail with 401.
pub fn require_session(state: &AppState, jar: &CookieJar) -> Result<User, HttpError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| HttpError::unauthorized("no session"))?;
    let user = state.store.with_conn(|conn| get_session(conn, &token))?;
    user.ok_or_else(|| HttpError::unauthorized("session expired or unknown"))
}

fn nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

pub async fn login(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), HttpError> {
    let discord = state
        .config
        .discord
        .as_ref()
        .ok_or_else(|| HttpError::internal("authentication is not configured"))?;

    let nonce = nonce();
    let authorize = format!(
        "{AUTHORIZE_URL}?client_id={}&response_type=code&scope=identify&redirect_uri={}&state={nonce}",
        discord.client_id,
        urlencoding::encode(&discord.redirect_url),
    );
    let jar = jar.add(cookie(STATE_COOKIE, nonce));
    Ok((jar, Redirect::to(&authorize)))
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: String,
    state: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct DiscordUser {
    id: String,
    username: String,
    avatar: Option<String>,
}

pub async fn callback(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Redirect), HttpError> {
    let discord = state
        .config
        .discord
        .as_ref()
        .ok_or_else(|| HttpError::internal("authentication is not configured"))?;

    let expected = jar
        .get(STATE_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| HttpError::bad_request("missing oauth state cookie"))?;
    if expected != query.state {
        return Err(HttpError::bad_request("oauth state mismatch"));
    }

    let auth_err = |e: reqwest::Error| HttpError::unauthorized(format!("oauth failed: {e}"));
    let token: TokenResponse = state
        .http
        .post(TOKEN_URL)
        .form(&[
            ("client_id", discord.client_id.as_str()),
            ("client_secret", discord.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", query.code.as_str()),
            ("redirect_uri", discord.redirect_url.as_str()),
        ])
        .send()
        .await
        .map_err(auth_err)?
        .error_for_status()
        .map_err(auth_err)?
        .json()
        .await
        .map_err(auth_err)?;

    let identity: DiscordUser = state
        .http
        .get(IDENTITY_URL)
        .bearer_auth(&token.access_token)
        .send()
        .await
        .map_err(auth_err)?
        .error_for_status()
        .map_err(auth_err)?
        .json()
        .await
        .map_err(auth_err)?;

    let user = User {
        avatar_url: identity.avatar.as_ref().map(|hash| {
            format!(
                "https://cdn.discordapp.com/avatars/{}/{hash}.png",
                identity.id
            )
        }),
        id: format!("discord:{}", identity.id),
        name: identity.username,
    };

    let ttl = chrono::Duration::days(state.config.session_ttl_days);
    let session = state
        .store
        .with_conn(|conn| create_session(conn, &user, ttl))?;
    log::info!("session created for {}", user.name);

    let jar = jar
        .remove(removal(STATE_COOKIE))
        .add(cookie(SESSION_COOKIE, session.token));
    Ok((jar, Redirect::to("/")))
}

pub async fn logout(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), HttpError> {
    if let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        state
            .store
            .with_conn(|conn| delete_session(conn, &token))?;
    }
    Ok((jar.remove(removal(SESSION_COOKIE)), Redirect::to("/")))
}
