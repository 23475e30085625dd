use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, services::customer_service, state::AppState};

/// Token claims issued by the external identity provider. `sub` is the
/// customer id.
#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// The customer on whose behalf a request runs. Passed explicitly to every
/// service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCustomer {
    pub customer_id: i32,
}

/// Verify a bearer token and read the customer id from it.
pub fn decode_token(token: &str, secret: &str) -> Result<AuthCustomer, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let customer_id = decoded
        .claims
        .sub
        .parse::<i32>()
        .map_err(|_| AppError::Unauthorized)?;

    Ok(AuthCustomer { customer_id })
}

impl FromRequestParts<AppState> for AuthCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        let customer = decode_token(token, &state.jwt_secret)?;

        // Tokens outlive accounts; a deleted customer must not act.
        if customer_service::find_active(&state.orm, customer.customer_id)
            .await?
            .is_none()
        {
            return Err(AppError::Unauthorized);
        }

        Ok(customer)
    }
}
