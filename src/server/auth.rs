//! Admin authentication: login, signed session cookies and API keys.

use crate::catalog::AdminSession;
use crate::config::AuthConfig;
use crate::server::{ApiError, AppContext};
use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    Json,
};
use axum_extra::{
    extract::cookie::{Cookie, CookieJar, SameSite},
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeader,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sweetshop_common::Error;

const SESSION_COOKIE_NAME: &str = "sweetshop_session";

/// Name reported for requests authenticated with the API key.
const API_KEY_USER: &str = "api-key";

type HmacSha256 = Hmac<Sha256>;

/// Login request payload
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl LoginResponse {
    fn failure(message: &str) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.to_string(),
            expires_at: None,
        })
    }
}

/// Session data stored in the cookie as `<base64 json>.<hex hmac>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SessionData {
    username: String,
    expires_at: i64,
}

impl SessionData {
    fn new(username: &str, timeout_hours: u64) -> Self {
        let expires_at = chrono::Utc::now().timestamp() + (timeout_hours as i64) * 3600;
        Self {
            username: username.to_string(),
            expires_at,
        }
    }

    fn is_valid(&self) -> bool {
        chrono::Utc::now().timestamp() < self.expires_at
    }

    fn encode(&self, secret: &[u8]) -> Option<String> {
        let json = serde_json::to_string(self).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mut mac = HmacSha256::new_from_slice(secret).ok()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Some(format!("{}.{}", payload, signature))
    }

    fn decode(encoded: &str, secret: &[u8]) -> Option<Self> {
        let (payload, signature) = encoded.split_once('.')?;

        let mut mac = HmacSha256::new_from_slice(secret).ok()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&hex::decode(signature).ok()?).ok()?;

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

/// Resolve the admin behind a request, if any.
fn check_auth(
    auth_config: &AuthConfig,
    secret: &[u8],
    bearer_token: Option<&str>,
    session_cookie: Option<&str>,
) -> Option<AdminSession> {
    if !auth_config.enabled {
        let username = auth_config.username.as_deref().unwrap_or("admin");
        return Some(AdminSession::new(username));
    }

    // Check API key first (for programmatic access)
    if let (Some(token), Some(api_key)) = (bearer_token, auth_config.api_key.as_deref()) {
        if token == api_key {
            return Some(AdminSession::new(API_KEY_USER));
        }
    }

    // Check session cookie (for the admin UI)
    session_cookie
        .and_then(|value| SessionData::decode(value, secret))
        .filter(SessionData::is_valid)
        .map(|session| AdminSession::new(session.username))
}

fn request_credentials(parts: &Parts) -> (Option<String>, Option<String>) {
    let bearer = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());
    let cookie = CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string());
    (bearer, cookie)
}

/// Only authenticated admins get an `AdminSession`; everyone else is
/// rejected with 401.
#[axum::async_trait]
impl FromRequestParts<AppContext> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, ctx: &AppContext) -> Result<Self, Self::Rejection> {
        let (bearer, cookie) = request_credentials(parts);

        check_auth(
            &ctx.config.server.auth,
            ctx.session_secret(),
            bearer.as_deref(),
            cookie.as_deref(),
        )
        .ok_or_else(|| {
            tracing::debug!("Rejected unauthenticated request to {}", parts.uri.path());
            ApiError::from(Error::Unauthorized)
        })
    }
}

/// Login handler
pub async fn login(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), (StatusCode, Json<LoginResponse>)> {
    let auth_config = &ctx.config.server.auth;

    // Check if auth is configured
    let (expected_username, password_hash) =
        match (&auth_config.username, &auth_config.password_hash) {
            (Some(u), Some(h)) => (u, h),
            _ => {
                return Err((
                    StatusCode::SERVICE_UNAVAILABLE,
                    LoginResponse::failure("Authentication not configured"),
                ));
            }
        };

    if payload.username != *expected_username {
        tracing::warn!("Failed login attempt for unknown user '{}'", payload.username);
        return Err((
            StatusCode::UNAUTHORIZED,
            LoginResponse::failure("Invalid credentials"),
        ));
    }

    match bcrypt::verify(&payload.password, password_hash) {
        Ok(true) => {
            let session = SessionData::new(&payload.username, auth_config.session_timeout_hours);
            let Some(value) = session.encode(ctx.session_secret()) else {
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    LoginResponse::failure("Failed to create session"),
                ));
            };

            let cookie = Cookie::build((SESSION_COOKIE_NAME, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .max_age(time::Duration::hours(
                    auth_config.session_timeout_hours as i64,
                ))
                .build();

            tracing::info!(admin = %payload.username, "Admin logged in");
            Ok((
                jar.add(cookie),
                Json(LoginResponse {
                    success: true,
                    message: "Login successful".to_string(),
                    expires_at: Some(session.expires_at),
                }),
            ))
        }
        Ok(false) | Err(_) => {
            tracing::warn!("Failed login attempt for '{}'", payload.username);
            Err((
                StatusCode::UNAUTHORIZED,
                LoginResponse::failure("Invalid credentials"),
            ))
        }
    }
}

/// Logout handler
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();

    (jar.remove(cookie), StatusCode::OK)
}

/// Check current auth status
pub async fn auth_status(
    State(ctx): State<AppContext>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    jar: CookieJar,
) -> Json<AuthStatusResponse> {
    let auth_config = &ctx.config.server.auth;

    if !auth_config.enabled {
        return Json(AuthStatusResponse {
            auth_enabled: false,
            authenticated: true,
            username: None,
        });
    }

    let bearer_token = bearer.map(|b| b.token().to_string());
    let session_cookie = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string());

    let session = check_auth(
        auth_config,
        ctx.session_secret(),
        bearer_token.as_deref(),
        session_cookie.as_deref(),
    );

    Json(AuthStatusResponse {
        auth_enabled: true,
        authenticated: session.is_some(),
        username: session.map(|s| s.username().to_string()),
    })
}

#[derive(Serialize)]
pub struct AuthStatusResponse {
    pub auth_enabled: bool,
    pub authenticated: bool,
    pub username: Option<String>,
}

/// Generate a bcrypt password hash
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Generate a random API key
pub fn generate_api_key() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a random session signing secret
pub fn generate_secret() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}
