//
// class_validator.rs
//
// Contract for the pluggable class-structure validator
//

use crate::diagnostics::Diagnostic;
use crate::scope::{Scope, ScopeContext};

/// Class-structure validation (circular inheritance, field overrides) is a
/// collaborator: the scope invokes it during its pipeline and appends
/// whatever diagnostics it produced. The algorithm is the collaborator's
/// business; the core only fixes the call shape.
pub trait ClassValidator {
    fn validate(&self, scope: &Scope, ctx: &ScopeContext<'_>) -> Vec<Diagnostic>;
}

/// Validator that accepts every class hierarchy. Useful for hosts that have
/// not wired a real validator yet, and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClassValidator;

impl ClassValidator for NoopClassValidator {
    fn validate(&self, _scope: &Scope, _ctx: &ScopeContext<'_>) -> Vec<Diagnostic> {
        Vec::new()
    }
}
