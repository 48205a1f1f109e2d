//
// callables.rs
//
// Callable declarations and the containers that tie them to scopes
//

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::files::SourceFile;
use crate::ranges::Range;

/// A declared parameter. Optional parameters are trailing in this language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableParam {
    pub name: String,
    pub name_range: Range,
    pub is_optional: bool,
}

/// A named function or subroutine declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callable {
    pub name: String,
    pub name_range: Range,
    pub params: Vec<CallableParam>,
    pub has_namespace: bool,
    pub documentation: Option<String>,
    pub short_description: Option<String>,
}

impl Callable {
    pub fn lower_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// Minimum accepted argument count (non-optional parameters).
    pub fn min_args(&self) -> usize {
        self.params.iter().filter(|p| !p.is_optional).count()
    }

    /// Maximum accepted argument count (all parameters).
    pub fn max_args(&self) -> usize {
        self.params.len()
    }

    /// Display string for arity diagnostics: `max` when fixed, `min-max`
    /// when a range.
    pub fn arg_count_display(&self) -> String {
        let (min, max) = (self.min_args(), self.max_args());
        if min == max {
            max.to_string()
        } else {
            format!("{min}-{max}")
        }
    }
}

/// A callable paired with the scope that surfaced it. Containers resolve
/// override/ancestry disputes: the same declaration may be reachable through
/// several scopes, and which scope surfaced it decides how collisions are
/// reported.
#[derive(Debug, Clone)]
pub struct CallableContainer {
    pub file: Rc<SourceFile>,
    /// Index into `file.callables`.
    pub callable_index: usize,
    /// Name of the scope that surfaced the callable.
    pub scope_name: String,
}

impl CallableContainer {
    pub fn callable(&self) -> &Callable {
        &self.file.callables[self.callable_index]
    }
}
