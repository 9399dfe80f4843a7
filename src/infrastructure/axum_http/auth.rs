use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::config_model::AuthSecret,
    domain::value_objects::caller::Caller,
    infrastructure::axum_http::error_responses::AppError,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub is_staff: bool,
    pub email: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub is_staff: bool,
}

impl AuthUser {
    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.user_id,
            is_staff: self.is_staff,
        }
    }
}

pub fn validate_jwt(token: &str, auth_secret: &AuthSecret) -> anyhow::Result<Claims> {
    let decoding_key = DecodingKey::from_secret(auth_secret.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    match &auth_secret.jwt_audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_secret = parts
            .extensions
            .get::<Arc<AuthSecret>>()
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("auth secret is not configured")))?;

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::Unauthorized("Missing or invalid Authorization header".to_string())
                })?;

        let claims = validate_jwt(bearer.token(), &auth_secret).map_err(|err| {
            warn!(error = %err, "auth: token rejected");
            AppError::Unauthorized("Invalid token".to_string())
        })?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
            is_staff: claims.is_staff,
        })
    }
}

#[cfg(test)]
mod tests;
