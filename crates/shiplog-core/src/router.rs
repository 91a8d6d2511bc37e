/// Route matched for the current request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// Registered route name; unnamed routes have none
    pub name: Option<String>,
}

impl Route {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn unnamed() -> Self {
        Self { name: None }
    }
}

/// Read-only view of the host router
pub trait Router: Send + Sync {
    fn current_route(&self) -> Option<Route>;
}

#[derive(Debug, Clone, Default)]
pub struct RouterSnapshot {
    current: Option<Route>,
}

impl RouterSnapshot {
    pub fn new(current: Option<Route>) -> Self {
        Self { current }
    }
}

impl Router for RouterSnapshot {
    fn current_route(&self) -> Option<Route> {
        self.current.clone()
    }
}
