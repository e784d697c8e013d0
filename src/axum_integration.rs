//! Axum web framework integration.
//!
//! This module provides:
//! - A [`RequestScope`] extractor that begins one registry scope per request
//!   and ends it when the handler finishes
//! - The operations demo routes returning the comparison reports as JSON
//! - Mapping of registry errors to `500` responses

use std::convert::Infallible;
use std::ops::Deref;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::operations::{ComparisonReport, MultipleReport, SimpleReport};
use crate::{CapabilityKey, InstanceRecord, Lifetime, LifetimeRegistry, RegistryError, ScopeHandle};

/// Extractor for the request's registry scope.
///
/// A new scope is started from the [`LifetimeRegistry`] in router state for
/// every request. Dropping the extractor ends the scope, discarding its
/// per-scope records.
pub struct RequestScope {
    scope: ScopeHandle,
}

impl RequestScope {
    /// Get the underlying scope handle
    pub fn scope(&self) -> &ScopeHandle {
        &self.scope
    }
}

impl Deref for RequestScope {
    type Target = ScopeHandle;

    fn deref(&self) -> &ScopeHandle {
        &self.scope
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestScope
where
    LifetimeRegistry: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let registry = LifetimeRegistry::from_ref(state);
        Ok(RequestScope {
            scope: registry.begin_scope(),
        })
    }
}

/// Rejection returned when a handler's resolution fails
#[derive(Debug)]
pub struct RegistryRejection(pub RegistryError);

impl From<RegistryError> for RegistryRejection {
    fn from(err: RegistryError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    capability: String,
}

impl IntoResponse for RegistryRejection {
    fn into_response(self) -> Response {
        tracing::error!(target: "lifetime_registry", error = %self.0, "request aborted");
        let body = ErrorBody {
            error: self.0.to_string(),
            capability: self.0.key().to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Binding as reported by the registry endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingView {
    pub key: CapabilityKey,
    pub lifetime: Lifetime,
    pub label: &'static str,
}

/// Registry state as reported by the registry endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryReport {
    pub bindings: Vec<BindingView>,
    pub instances_created: u64,
    pub process_instances: Vec<InstanceRecord>,
}

/// Builds the demo router with `registry` as state.
///
/// Routes:
/// - `GET /api/operations`: handler vs service comparison
/// - `GET /api/operations/simple`: current ids, call repeatedly
/// - `GET /api/operations/multiple`: two resolutions within one request
/// - `GET /api/registry`: bindings and per-process records
pub fn router(registry: LifetimeRegistry) -> Router {
    Router::new()
        .route("/api/operations", get(comparison))
        .route("/api/operations/simple", get(simple))
        .route("/api/operations/multiple", get(multiple))
        .route("/api/registry", get(registry_report))
        .with_state(registry)
}

async fn comparison(scope: RequestScope) -> Result<Json<ComparisonReport>, RegistryRejection> {
    tracing::info!(target: "lifetime_registry", scope_id = scope.id(), "getting operation ids");
    Ok(Json(ComparisonReport::build(&scope)?))
}

async fn simple(scope: RequestScope) -> Result<Json<SimpleReport>, RegistryRejection> {
    Ok(Json(SimpleReport::build(&scope)?))
}

async fn multiple(scope: RequestScope) -> Result<Json<MultipleReport>, RegistryRejection> {
    Ok(Json(MultipleReport::build(&scope)?))
}

async fn registry_report(State(registry): State<LifetimeRegistry>) -> Json<RegistryReport> {
    let bindings = registry
        .bindings()
        .into_iter()
        .map(|(key, lifetime)| BindingView {
            key,
            lifetime,
            label: lifetime.label(),
        })
        .collect();

    Json(RegistryReport {
        bindings,
        instances_created: registry.instances_created(),
        process_instances: registry.process_instances(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperationsModule;
    use crate::{Registrations, RegistrationsExt};

    #[tokio::test]
    async fn test_request_scope_extraction() {
        let mut registrations = Registrations::new();
        registrations.add_module(OperationsModule);
        let registry = registrations.build();

        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let scope = RequestScope::from_request_parts(&mut parts, &registry)
            .await
            .unwrap();

        assert!(!scope.is_ended());
        scope.resolve(&crate::config::OPERATION_SCOPED).unwrap();
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_rejection_is_server_error() {
        let err = RegistryError::MissingScope("svc".into());
        let response = RegistryRejection::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
