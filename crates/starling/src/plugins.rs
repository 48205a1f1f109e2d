//
// plugins.rs
//
// Observer bus fired around scope validation
//

use std::rc::Rc;

use indexmap::IndexMap;

use crate::callables::CallableContainer;
use crate::files::SourceFile;
use crate::scope::Scope;

/// Payload handed to plugins around a scope validation. Plugins may
/// contribute diagnostics through [`Scope::push_diagnostic`]; they must not
/// re-trigger validation of the scope currently validating.
pub struct ScopeValidationEvent<'a> {
    pub scope: &'a Scope,
    pub files: &'a [Rc<SourceFile>],
    pub callable_container_map: &'a IndexMap<String, Vec<CallableContainer>>,
}

/// External analyzer hooked into the validation pipeline. Both hooks default
/// to no-ops so implementors override only what they need.
pub trait AnalyzerPlugin {
    fn before_scope_validate(&self, _event: &ScopeValidationEvent<'_>) {}
    fn after_scope_validate(&self, _event: &ScopeValidationEvent<'_>) {}
}

/// Plugin registry. Handlers run synchronously, in registration order.
#[derive(Default)]
pub struct PluginBus {
    plugins: Vec<Box<dyn AnalyzerPlugin>>,
}

impl std::fmt::Debug for PluginBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginBus")
            .field("plugins", &self.plugins.len())
            .finish()
    }
}

impl PluginBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, plugin: Box<dyn AnalyzerPlugin>) {
        self.plugins.push(plugin);
    }

    pub fn emit_before_scope_validate(&self, event: &ScopeValidationEvent<'_>) {
        for plugin in &self.plugins {
            plugin.before_scope_validate(event);
        }
    }

    pub fn emit_after_scope_validate(&self, event: &ScopeValidationEvent<'_>) {
        for plugin in &self.plugins {
            plugin.after_scope_validate(event);
        }
    }
}
