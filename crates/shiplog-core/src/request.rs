use std::collections::HashMap;

/// Read-only view of the current HTTP request
pub trait Request: Send + Sync {
    /// Request path as the host reports it, with or without a leading `/`
    fn path(&self) -> String;

    fn query_string(&self) -> Option<String>;

    fn method(&self) -> String;

    /// Server variable such as `SERVER_ADDR` or `HTTP_USER_AGENT`
    fn server(&self, name: &str) -> Option<String>;

    /// Client address after proxy-header resolution
    fn client_ip(&self) -> Option<String>;
}

/// Owned copy of a request taken at the time of the log call
#[derive(Debug, Clone, Default)]
pub struct RequestSnapshot {
    path: String,
    query: Option<String>,
    method: String,
    server: HashMap<String, String>,
    /// Keyed by lowercase header name
    headers: HashMap<String, String>,
    trusted_proxies: Vec<String>,
}

impl RequestSnapshot {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_server(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.server.insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_trusted_proxy(mut self, addr: impl Into<String>) -> Self {
        self.trusted_proxies.push(addr.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn is_trusted(&self, addr: &str) -> bool {
        self.trusted_proxies.iter().any(|proxy| proxy == addr)
    }

    /// Client address behind trusted proxies.
    ///
    /// Forwarding headers are only honoured when the direct peer is a trusted
    /// proxy; the right-most untrusted `X-Forwarded-For` hop is the client.
    fn resolve_client_ip(&self) -> Option<String> {
        let remote = self.server.get("REMOTE_ADDR").cloned();
        let behind_proxy = remote.as_deref().is_some_and(|addr| self.is_trusted(addr));
        if !behind_proxy {
            return remote;
        }

        if let Some(forwarded) = self.header("x-forwarded-for") {
            let hops: Vec<&str> = forwarded
                .split(',')
                .map(str::trim)
                .filter(|hop| !hop.is_empty())
                .collect();
            if let Some(client) = hops.iter().rev().find(|hop| !self.is_trusted(hop)) {
                return Some(client.to_string());
            }
            if let Some(first) = hops.first() {
                return Some(first.to_string());
            }
        }

        if let Some(real_ip) = self.header("x-real-ip").map(str::trim)
            && !real_ip.is_empty()
        {
            return Some(real_ip.to_string());
        }

        remote
    }
}

impl Request for RequestSnapshot {
    fn path(&self) -> String {
        self.path.clone()
    }

    fn query_string(&self) -> Option<String> {
        self.query.clone().filter(|q| !q.is_empty())
    }

    fn method(&self) -> String {
        self.method.clone()
    }

    fn server(&self, name: &str) -> Option<String> {
        self.server.get(name).cloned()
    }

    fn client_ip(&self) -> Option<String> {
        self.resolve_client_ip()
    }
}
