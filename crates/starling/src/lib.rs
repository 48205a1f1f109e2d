//! Static-analysis core for the Starling scripting dialect.
//!
//! From parsed source files and XML component descriptors the core computes
//! *scopes* (named collections of declarations reachable together at
//! runtime), validates them, and reports semantic diagnostics. Parsing,
//! file I/O, and editor protocol surfaces live in collaborating crates; this
//! crate owns the scope graph, its cached lookup tables, and the
//! dependency-driven invalidation protocol.

pub mod builtins;
pub mod cache;
pub mod callables;
pub mod class_validator;
pub mod config;
pub mod dependency_graph;
pub mod diagnostics;
pub mod files;
pub mod namespaces;
pub mod perf;
pub mod plugins;
pub mod ranges;
pub mod scope;
pub mod scope_catalog;

#[cfg(test)]
pub mod test_utils;

pub use cache::Cache;
pub use callables::{Callable, CallableContainer, CallableParam};
pub use class_validator::{ClassValidator, NoopClassValidator};
pub use config::DiagnosticFilter;
pub use dependency_graph::{DependencyGraph, Subscription};
pub use diagnostics::{Diagnostic, DiagnosticData, RelatedInformation, Severity, SourceLocation};
pub use files::{FileProvider, ParseMode, SourceFile};
pub use namespaces::{NamespaceContainer, NamespaceLookup};
pub use plugins::{AnalyzerPlugin, PluginBus, ScopeValidationEvent};
pub use ranges::{Position, Range};
pub use scope::{Scope, ScopeContext, ScopeKind, COMPONENT_KEY_PREFIX, GLOBAL_SCOPE_NAME};
pub use scope_catalog::ScopeCatalog;
