use std::sync::Arc;

use crate::auth::AuthProbe;
use crate::request::Request;
use crate::router::Router;
use crate::session::SessionStore;

/// Host request state visible to resolvers.
///
/// Every part is optional: console invocations have no request, session or
/// route, and resolvers that need one degrade to absent.
#[derive(Clone, Default)]
pub struct RequestContextSnapshot {
    session: Option<Arc<dyn SessionStore>>,
    router: Option<Arc<dyn Router>>,
    request: Option<Arc<dyn Request>>,
    auth_probes: Vec<Arc<dyn AuthProbe>>,
}

impl RequestContextSnapshot {
    /// No facades bound, as in a console invocation
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_session(mut self, session: impl SessionStore + 'static) -> Self {
        self.session = Some(Arc::new(session));
        self
    }

    pub fn with_router(mut self, router: impl Router + 'static) -> Self {
        self.router = Some(Arc::new(router));
        self
    }

    pub fn with_request(mut self, request: impl Request + 'static) -> Self {
        self.request = Some(Arc::new(request));
        self
    }

    /// Probes are consulted in the order they were added
    pub fn with_auth_probe(mut self, probe: impl AuthProbe + 'static) -> Self {
        self.auth_probes.push(Arc::new(probe));
        self
    }

    pub fn session(&self) -> Option<&dyn SessionStore> {
        self.session.as_deref()
    }

    pub fn router(&self) -> Option<&dyn Router> {
        self.router.as_deref()
    }

    pub fn request(&self) -> Option<&dyn Request> {
        self.request.as_deref()
    }

    pub fn auth_probes(&self) -> &[Arc<dyn AuthProbe>] {
        &self.auth_probes
    }
}

impl std::fmt::Debug for RequestContextSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContextSnapshot")
            .field("session", &self.session.is_some())
            .field("router", &self.router.is_some())
            .field("request", &self.request.is_some())
            .field(
                "auth_probes",
                &self.auth_probes.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
