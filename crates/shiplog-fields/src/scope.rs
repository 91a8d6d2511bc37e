use shiplog_core::{RequestContextSnapshot, RuntimeInfo, UnitOfWork};
use shiplog_types::LogOccurrence;

/// Everything a resolver may look at for one log occurrence
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    pub occurrence: &'a LogOccurrence,
    pub request: &'a RequestContextSnapshot,
    pub runtime: &'a RuntimeInfo,
    pub unit: &'a UnitOfWork,
}

impl<'a> Scope<'a> {
    pub fn new(
        occurrence: &'a LogOccurrence,
        request: &'a RequestContextSnapshot,
        runtime: &'a RuntimeInfo,
        unit: &'a UnitOfWork,
    ) -> Self {
        Self {
            occurrence,
            request,
            runtime,
            unit,
        }
    }
}
