// Role policy middleware for protected routes
//
// Routes declare which roles they accept once, in the router; handlers never
// repeat the check. A request that passes the policy carries its
// `AuthenticatedUser` in the request extensions.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    models::{Role, STAFF_ROLES},
    token::TokenService,
};

/// Identity of a caller that passed a route's role policy
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Declarative policy: the caller must hold one of the listed roles
#[derive(Clone)]
pub struct RequireRole {
    allowed: Arc<[Role]>,
    token_service: Arc<TokenService>,
}

impl RequireRole {
    /// Policy accepting any of `roles`
    pub fn any_of(roles: &[Role], token_service: Arc<TokenService>) -> Self {
        Self {
            allowed: Arc::from(roles),
            token_service,
        }
    }

    /// Policy for restaurant management routes (admin or restaurant owner)
    pub fn staff(token_service: Arc<TokenService>) -> Self {
        Self::any_of(&STAFF_ROLES, token_service)
    }

    /// Policy for routes open to every signed-in user
    pub fn signed_in(token_service: Arc<TokenService>) -> Self {
        Self::any_of(&Role::ALL, token_service)
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    /// Check the bearer token in `headers` against this policy
    pub fn authorize(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = self.token_service.validate_access_token(token)?;

        if !self.allows(claims.role) {
            return Err(AuthError::InsufficientPermissions {
                allowed: self.describe_allowed(),
                actual: claims.role.to_string(),
            });
        }

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }

    fn describe_allowed(&self) -> String {
        self.allowed
            .iter()
            .map(|role| role.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Middleware entry point, installed with `axum::middleware::from_fn_with_state`
pub async fn require_role(
    State(policy): State<RequireRole>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    let user = policy.authorize(request.headers()).map_err(|e| {
        warn!("Authorization failed for endpoint {}: {}", endpoint, e);
        e
    })?;

    debug!(
        "Authorization successful: user_id={}, role={}, endpoint={}",
        user.user_id, user.role, endpoint
    );

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
