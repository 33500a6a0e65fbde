use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{AuthUser, Claims, Role, TokenCodec};
use crate::error::ApiError;

use super::route_scope::{RouteScope, RouteTable};

pub const PUBLIC_ROOT: &str = "/";
pub const ADMIN_LANDING: &str = "/admin";
pub const EMPLOYEE_LANDING: &str = "/employee";

/// Outcome of the gatekeeper for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Let the request through, with the verified claims if a valid token was presented
    Proceed(Option<Claims>),
    Redirect(&'static str),
}

/// Per-request authorization decision point
#[derive(Clone, Debug)]
pub struct Gatekeeper {
    codec: Arc<TokenCodec>,
    routes: Arc<RouteTable>,
    cookie_name: Arc<str>,
}

impl Gatekeeper {
    pub fn new(codec: Arc<TokenCodec>, routes: Arc<RouteTable>, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            codec,
            routes,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Decide whether a request for `path` carrying `token` proceeds or is redirected
    pub fn decide(&self, path: &str, token: Option<&str>) -> AccessDecision {
        let scope = self.routes.classify(path);

        match (scope, token) {
            (RouteScope::PublicRoot, Some(token)) => match self.codec.verify(token) {
                Ok(claims) => {
                    let target = landing_for(&claims.role);
                    tracing::debug!(path, role = %claims.role, redirect = target, "signed-in visitor sent to landing page");
                    AccessDecision::Redirect(target)
                }
                Err(invalid) => {
                    tracing::debug!(path, reason = invalid.reason(), "ignoring invalid token on public root");
                    AccessDecision::Proceed(None)
                }
            },
            (RouteScope::PublicRoot, None) | (RouteScope::PublicAsset, _) => AccessDecision::Proceed(None),
            (_, None) => {
                tracing::debug!(path, scope = scope.as_str(), "no token, redirecting to root");
                AccessDecision::Redirect(PUBLIC_ROOT)
            }
            (_, Some(token)) => match self.codec.verify(token) {
                Err(invalid) => {
                    tracing::info!(path, scope = scope.as_str(), reason = invalid.reason(), "token rejected");
                    AccessDecision::Redirect(PUBLIC_ROOT)
                }
                Ok(claims) => self.authorize(path, scope, claims),
            },
        }
    }

    fn authorize(&self, path: &str, scope: RouteScope, claims: Claims) -> AccessDecision {
        let decision = match scope {
            RouteScope::AdminArea if !claims.role.is_admin_capable() => {
                AccessDecision::Redirect(EMPLOYEE_LANDING)
            }
            RouteScope::EmployeeArea if !claims.role.is_employee_capable() => {
                AccessDecision::Redirect(ADMIN_LANDING)
            }
            _ => AccessDecision::Proceed(Some(claims.clone())),
        };

        match &decision {
            AccessDecision::Redirect(target) => tracing::info!(
                path,
                scope = scope.as_str(),
                role = %claims.role,
                redirect = *target,
                "role not allowed in area"
            ),
            AccessDecision::Proceed(_) => tracing::debug!(
                path,
                scope = scope.as_str(),
                role = %claims.role,
                "access granted"
            ),
        }

        decision
    }

    /// Pull this gatekeeper's cookie out of the request headers
    pub fn extract_token<'h>(&self, headers: &'h HeaderMap) -> Option<&'h str> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == &*self.cookie_name)
            .map(|(_, value)| value.trim_matches('"'))
            .filter(|value| !value.is_empty())
    }
}

/// Landing page for a signed-in role
pub fn landing_for(role: &Role) -> &'static str {
    if role.is_admin_capable() {
        ADMIN_LANDING
    } else {
        EMPLOYEE_LANDING
    }
}

/// Gatekeeper middleware: every gated request ends here in a proceed or a redirect
pub async fn gatekeeper_middleware(
    State(gatekeeper): State<Gatekeeper>,
    mut request: Request,
    next: Next,
) -> Response {
    let decision = {
        // Nested routers see a stripped path; classify the one the client sent
        let path = match request.extensions().get::<OriginalUri>() {
            Some(OriginalUri(uri)) => uri.path(),
            None => request.uri().path(),
        };
        let token = gatekeeper.extract_token(request.headers());
        gatekeeper.decide(path, token)
    };

    match decision {
        AccessDecision::Redirect(target) => Redirect::temporary(target).into_response(),
        AccessDecision::Proceed(claims) => {
            if let Some(claims) = claims {
                request.extensions_mut().insert(AuthUser::from(claims));
            }
            next.run(request).await
        }
    }
}

/// Handlers behind the gatekeeper take the signed-in user as an extractor
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Sign in required"))
    }
}
