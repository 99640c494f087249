use std::sync::Arc;

use axum::{
    extract::State,
    http::{self, Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{json, Value};

use crate::{model::CurrentUser, AppState};

pub const SESSION_COOKIE: &str = "token";

const SESSION_TTL_DAYS: i64 = 30;

// Claims embedded in the session token
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub name: String,
    pub exp: usize,
}

pub fn issue_token(user: &CurrentUser, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (Utc::now() + Duration::days(SESSION_TTL_DAYS)).timestamp() as usize;
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

pub async fn mw_require_auth<B>(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    // Session cookie first, then an Authorization: Bearer fallback
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            request
                .headers()
                .get(http::header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok())
                .and_then(|header| header.strip_prefix("Bearer "))
                .map(|token| token.to_string())
        });

    let token = if let Some(token) = token {
        token
    } else {
        return Err(unauthorized());
    };

    match decode_token(&token, &data.jwt_secret) {
        Ok(claims) => {
            request.extensions_mut().insert(CurrentUser {
                id: claims.sub,
                email: claims.email,
                name: claims.name,
            });
        }
        Err(err) => {
            tracing::debug!("session token rejected: {}", err);
            return Err(unauthorized());
        }
    }

    Ok(next.run(request).await)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"})))
}
