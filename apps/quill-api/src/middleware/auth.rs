//! Authentication gate, expressed as an extractor.
//!
//! `Identity` verifies the bearer token *and* re-checks that the account
//! still exists, so a token for a deleted user is indistinguishable from an
//! invalid one. Handlers that take an `Identity` parameter are protected;
//! everything else is public.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use quill_core::ports::{AuthError, TokenService, UserRepository};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated user identity.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: uuid::Uuid,
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
                tracing::error!("AppState not found in app data");
                AppError::Internal("Server configuration error".to_string())
            })?;

            let token = bearer_token(&req)?;
            let claims = state.tokens.validate_token(token)?;

            // Signature alone is not enough: the account may be gone.
            match state.users.find_by_id(claims.user_id).await? {
                Some(_) => Ok(Identity {
                    user_id: claims.user_id,
                }),
                None => Err(AuthError::UnknownAccount.into()),
            }
        })
    }
}
