//! Tenant resolution from the inbound request's host and path.
//!
//! Every request is classified exactly once, before routing:
//!
//! 1. Administrative path prefixes bypass tenant resolution entirely.
//! 2. `/store/{slug}/...` paths name the tenant by slug (primary routing).
//! 3. Subdomains of the platform root domain name the tenant by subdomain.
//! 4. Any other non-loopback, non-internal host is a tenant custom domain.
//! 5. Everything else is the platform itself (marketing pages).
//!
//! Resolution is a pure string computation - it never touches the database.
//! The resolved reference is attached as a request extension; mapping it to
//! a tenant row is the consuming handler's job, and a reference that matches
//! no active tenant must surface as a not-found error, never a fallback.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderValue, header};
use axum::{extract::Request, middleware::Next, response::Response};

use crate::config::DomainConfig;
use crate::error::AppError;

/// Response header echoing the resolved tenant reference.
pub const TENANT_REF_HEADER: &str = "x-tenant-ref";

/// Path prefixes that never belong to a tenant storefront.
const ADMIN_PREFIXES: &[&str] = &[
    "/admin",
    "/super-admin",
    "/auth",
    "/onboarding",
    "/api/admin",
    "/api/super-admin",
    "/api/auth",
    "/api/onboarding",
    "/health",
    "/static",
];

/// Loopback hosts that are never tenant custom domains.
const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1", "0.0.0.0"];

/// How a tenant reference was derived from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantRefKind {
    /// `/store/{slug}/...` path segment.
    PathSlug,
    /// Leftmost label of a `*.{root_domain}` host.
    Subdomain,
    /// The entire host, configured by the tenant as a custom domain.
    CustomDomain,
}

/// An unverified tenant reference extracted from the request.
///
/// This is a claim, not a row: the consuming handler still has to look it up
/// and reject it if no active tenant matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRef {
    /// The raw reference string (slug, subdomain label, or full host).
    pub reference: String,
    /// Where the reference came from.
    pub kind: TenantRefKind,
}

/// Outcome of classifying a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantRoute {
    /// Administrative route - proceeds with no tenant context.
    AdminBypass,
    /// Request belongs to a tenant storefront.
    Tenant(TenantRef),
    /// Platform-level request (marketing pages, bare root domain).
    Platform,
}

/// Classify a request by host and path. First match wins.
#[must_use]
pub fn resolve(host: &str, path: &str, domains: &DomainConfig) -> TenantRoute {
    if ADMIN_PREFIXES.iter().any(|prefix| {
        path == *prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
    }) {
        return TenantRoute::AdminBypass;
    }

    if let Some(slug) = path_slug(path) {
        return TenantRoute::Tenant(TenantRef {
            reference: slug.to_owned(),
            kind: TenantRefKind::PathSlug,
        });
    }

    let host = strip_port(host);

    // Internal deployment hosts may live under the root domain; classify them
    // before the subdomain rule so a deploy host never resolves as a tenant.
    if host.ends_with(&domains.internal_host_suffix) {
        return TenantRoute::Platform;
    }

    if let Some(label) = subdomain_label(host, &domains.root_domain) {
        return TenantRoute::Tenant(TenantRef {
            reference: label.to_owned(),
            kind: TenantRefKind::Subdomain,
        });
    }

    if is_custom_domain(host, domains) {
        return TenantRoute::Tenant(TenantRef {
            reference: host.to_owned(),
            kind: TenantRefKind::CustomDomain,
        });
    }

    TenantRoute::Platform
}

/// Extract the `{slug}` from a `/store/{slug}` or `/store/{slug}/...` path.
fn path_slug(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("/store/")?;
    let slug = rest.split('/').next().unwrap_or(rest);
    (!slug.is_empty()).then_some(slug)
}

/// Leftmost label of `host` when it is a non-`www` subdomain of `root_domain`.
fn subdomain_label<'a>(host: &'a str, root_domain: &str) -> Option<&'a str> {
    let prefix = host.strip_suffix(root_domain)?.strip_suffix('.')?;
    let label = prefix.split('.').next().unwrap_or(prefix);
    (!label.is_empty() && label != "www").then_some(label)
}

/// Whether `host` should be treated as a tenant custom domain.
///
/// Internal deployment hosts are already excluded before this check runs.
fn is_custom_domain(host: &str, domains: &DomainConfig) -> bool {
    !host.is_empty()
        && host != domains.root_domain
        && host != format!("www.{}", domains.root_domain)
        && !LOOPBACK_HOSTS.contains(&host)
}

/// Strip an optional `:port` suffix, tolerating bracketed IPv6 hosts.
fn strip_port(host: &str) -> &str {
    if let Some(stripped) = host.strip_prefix('[') {
        return stripped.split(']').next().unwrap_or(stripped);
    }
    host.rsplit_once(':')
        .filter(|(_, port)| port.chars().all(|c| c.is_ascii_digit()))
        .map_or(host, |(h, _)| h)
}

/// Middleware classifying every request and attaching the result.
///
/// The [`TenantRoute`] lands in request extensions for downstream handlers
/// and extractors; tenant-scoped responses also echo the raw reference in
/// the `x-tenant-ref` header for diagnosability.
pub async fn tenant_context_middleware(
    axum::extract::State(state): axum::extract::State<crate::state::AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let path = request.uri().path().to_owned();

    let route = resolve(&host, &path, &state.config().domains);
    let reference = match &route {
        TenantRoute::Tenant(tenant_ref) => Some(tenant_ref.reference.clone()),
        TenantRoute::AdminBypass | TenantRoute::Platform => None,
    };
    request.extensions_mut().insert(route);

    let mut response = next.run(request).await;

    if let Some(reference) = reference
        && let Ok(value) = HeaderValue::from_str(&reference)
    {
        response.headers_mut().insert(TENANT_REF_HEADER, value);
    }

    response
}

/// Extractor yielding the [`TenantRef`] attached by the middleware.
///
/// Rejects with a tenant not-found error when the request carries no tenant
/// context (admin or platform routes have no business calling tenant-scoped
/// handlers).
pub struct ResolvedTenant(pub TenantRef);

impl<S> FromRequestParts<S> for ResolvedTenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<TenantRoute>() {
            Some(TenantRoute::Tenant(tenant_ref)) => Ok(Self(tenant_ref.clone())),
            _ => Err(AppError::TenantNotFound),
        }
    }
}
