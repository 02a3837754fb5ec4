//! API key authentication.
//!
//! The credential is read from `x-api-key`, falling back to
//! `Authorization: Bearer <key>`. A malformed key and an unknown key are
//! indistinguishable to the caller: both end in the same 401 body.

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{HeaderMap, header, request::Parts};
use axum_helpers::{AppError, AuditEvent, AuditOutcome};
use observability::IngestionMetrics;
use std::sync::Arc;

use crate::error::EnvironmentResult;
use crate::models::AuthenticatedEnvironment;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Keys longer than this are rejected without a lookup.
pub const MAX_API_KEY_LEN: usize = 256;

/// Resolves request credentials to an environment.
///
/// `Ok(None)` means "no valid credential" and is a normal outcome.
/// `Err` is reserved for lookup faults.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> EnvironmentResult<Option<AuthenticatedEnvironment>>;
}

/// Raw credential from the request headers, if any.
pub fn credential_from_headers(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(API_KEY_HEADER) {
        return value.to_str().ok();
    }

    let authorization = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = authorization.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
}

/// Non-empty, bounded, visible ASCII only.
pub fn is_well_formed(api_key: &str) -> bool {
    !api_key.is_empty()
        && api_key.len() <= MAX_API_KEY_LEN
        && api_key.bytes().all(|b| b.is_ascii_graphic())
}

/// Router state carrying a domain service next to the shared authenticator.
pub struct AuthState<S> {
    pub service: S,
    pub authenticator: Arc<dyn Authenticator>,
}

impl<S: Clone> Clone for AuthState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

impl<S> AuthState<S> {
    pub fn new(service: S, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            service,
            authenticator,
        }
    }
}

impl<S> FromRef<AuthState<S>> for Arc<dyn Authenticator> {
    fn from_ref(state: &AuthState<S>) -> Self {
        Arc::clone(&state.authenticator)
    }
}

/// Extractor for the environment behind the request's API key.
///
/// Rejects with 401 `{"error":"Invalid or Missing API key"}`. Place it after
/// path extractors and before the body so the dispatch order holds.
#[derive(Debug, Clone)]
pub struct AuthenticatedEnv(pub AuthenticatedEnvironment);

impl<S> FromRequestParts<S> for AuthenticatedEnv
where
    Arc<dyn Authenticator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = <Arc<dyn Authenticator> as FromRef<S>>::from_ref(state);

        match authenticator.authenticate(&parts.headers).await? {
            Some(environment) => Ok(Self(environment)),
            None => {
                IngestionMetrics::api_key_rejected();
                AuditEvent::new(None, "api_key.rejected", AuditOutcome::Denied)
                    .with_resource(parts.uri.path())
                    .with_request_headers(&parts.headers)
                    .log();
                Err(AppError::invalid_api_key())
            }
        }
    }
}
