use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use courier_config::AuthConfig;
use courier_core::{Forbidden, Partner, Raised, Unauthenticated};
use secrecy::ExposeSecret;

/// Partner records keyed by their API token
#[derive(Clone, Default)]
pub struct PartnerDirectory {
    by_token: Arc<HashMap<String, Partner>>,
}

impl PartnerDirectory {
    pub fn from_config(config: &AuthConfig) -> Self {
        let by_token = config
            .partners
            .iter()
            .map(|p| {
                let partner = Partner {
                    id: p.id,
                    name: p.name.clone(),
                    phone: p.phone.clone(),
                    active: p.active,
                };
                (p.token.expose_secret().to_owned(), partner)
            })
            .collect();

        Self {
            by_token: Arc::new(by_token),
        }
    }

    pub fn find(&self, token: &str) -> Option<&Partner> {
        self.by_token.get(token)
    }
}

/// Resolve the bearer token to a [`Partner`] and attach it to the request
///
/// Requests without a known token are rejected as unauthenticated.
pub async fn auth_middleware(partners: PartnerDirectory, mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Raised::new(Unauthenticated::default()).into_response();
    };

    let Some(partner) = partners.find(token.trim()).cloned() else {
        tracing::warn!("partner authentication failed");
        return Raised::new(Unauthenticated::new("Invalid partner token.")).into_response();
    };

    request.extensions_mut().insert(partner);
    next.run(request).await
}

/// Reject partners whose account has been deactivated
#[track_caller]
pub fn require_active(partner: &Partner) -> Result<(), Raised> {
    if partner.active {
        Ok(())
    } else {
        Err(Raised::new(Forbidden::new("Your account is not active")))
    }
}
