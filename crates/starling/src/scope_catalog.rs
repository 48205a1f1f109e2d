//
// scope_catalog.rs
//
// Named scope collection with the distinguished global scope
//

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::dependency_graph::DependencyGraph;
use crate::scope::{Scope, ScopeKind, GLOBAL_SCOPE_NAME};

/// All scopes of one Program, addressable by name. Owns the global scope,
/// which exists for the catalog's whole lifetime and cannot be removed.
#[derive(Debug)]
pub struct ScopeCatalog {
    scopes: IndexMap<String, Scope>,
    /// Lowercase component name -> scope name, for parent resolution.
    components: HashMap<String, String>,
}

impl ScopeCatalog {
    /// Create the catalog and its global scope. The global scope subscribes
    /// to the graph like any other scope.
    pub fn new(graph: &mut DependencyGraph) -> Self {
        let global = Scope::global(graph);
        let mut scopes = IndexMap::new();
        scopes.insert(global.name().to_string(), global);
        Self {
            scopes,
            components: HashMap::new(),
        }
    }

    pub fn global_scope(&self) -> &Scope {
        self.scopes
            .get(GLOBAL_SCOPE_NAME)
            .expect("catalog always holds the global scope")
    }

    pub fn get_scope(&self, name: &str) -> Option<&Scope> {
        self.scopes.get(name)
    }

    /// Case-insensitive lookup of a component's scope.
    pub fn get_component_scope(&self, component_name: &str) -> Option<&Scope> {
        self.components
            .get(&component_name.to_lowercase())
            .and_then(|name| self.scopes.get(name))
    }

    /// Register a scope. Replacing an existing name returns the old scope,
    /// whose subscriptions the caller must still dispose.
    pub fn add_scope(&mut self, scope: Scope) -> Option<Scope> {
        if let ScopeKind::Component { component_name } = scope.kind() {
            self.components
                .insert(component_name.to_lowercase(), scope.name().to_string());
        }
        self.scopes.insert(scope.name().to_string(), scope)
    }

    /// Remove and dispose a scope. The global scope is not removable.
    pub fn remove_scope(&mut self, name: &str, graph: &mut DependencyGraph) -> bool {
        if name == GLOBAL_SCOPE_NAME {
            return false;
        }
        match self.scopes.shift_remove(name) {
            Some(mut scope) => {
                if let ScopeKind::Component { component_name } = scope.kind() {
                    self.components.remove(&component_name.to_lowercase());
                }
                scope.dispose(graph);
                true
            }
            None => false,
        }
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.values()
    }

    /// Scope names in deterministic (sorted) order.
    pub fn scope_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scopes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_always_has_global() {
        let mut graph = DependencyGraph::new();
        let catalog = ScopeCatalog::new(&mut graph);
        assert_eq!(catalog.global_scope().name(), GLOBAL_SCOPE_NAME);
        assert!(catalog.global_scope().is_global());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_global_scope_is_not_removable() {
        let mut graph = DependencyGraph::new();
        let mut catalog = ScopeCatalog::new(&mut graph);
        assert!(!catalog.remove_scope(GLOBAL_SCOPE_NAME, &mut graph));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_add_and_remove_source_scope() {
        let mut graph = DependencyGraph::new();
        let mut catalog = ScopeCatalog::new(&mut graph);
        let scope = Scope::source("source", "scope:source", &mut graph);
        assert!(catalog.add_scope(scope).is_none());
        assert!(catalog.get_scope("source").is_some());

        assert!(catalog.remove_scope("source", &mut graph));
        assert!(catalog.get_scope("source").is_none());
        assert!(!catalog.remove_scope("source", &mut graph));
    }

    #[test]
    fn test_component_scope_lookup_is_case_insensitive() {
        let mut graph = DependencyGraph::new();
        let mut catalog = ScopeCatalog::new(&mut graph);
        let scope = Scope::component("components/Widget.xml", "Widget", &mut graph);
        catalog.add_scope(scope);

        assert!(catalog.get_component_scope("widget").is_some());
        assert!(catalog.get_component_scope("WIDGET").is_some());
        assert!(catalog.get_component_scope("other").is_none());

        catalog.remove_scope("components/Widget.xml", &mut graph);
        assert!(catalog.get_component_scope("widget").is_none());
    }

    #[test]
    fn test_scope_names_sorted() {
        let mut graph = DependencyGraph::new();
        let mut catalog = ScopeCatalog::new(&mut graph);
        catalog.add_scope(Scope::source("zeta", "scope:zeta", &mut graph));
        catalog.add_scope(Scope::source("alpha", "scope:alpha", &mut graph));
        assert_eq!(catalog.scope_names(), ["alpha", "global", "zeta"]);
    }
}
