//
// scope.rs
//
// Scope entity: member files, cached lookup tables, and the validation
// pipeline
//

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, MarkupContent, MarkupKind,
};

use crate::builtins;
use crate::cache::Cache;
use crate::callables::CallableContainer;
use crate::class_validator::ClassValidator;
use crate::dependency_graph::{DependencyGraph, Subscription};
use crate::diagnostics::{catalog, Diagnostic, RelatedInformation, SourceLocation};
use crate::files::{
    pkg_path_key, ClassStatement, FileProvider, NewExpression, ParseMode, SourceFile,
};
use crate::namespaces::NamespaceLookup;
use crate::perf;
use crate::plugins::{PluginBus, ScopeValidationEvent};
use crate::ranges::Position;
use crate::scope_catalog::ScopeCatalog;

/// Name of the distinguished global scope.
pub const GLOBAL_SCOPE_NAME: &str = "global";

/// Dependency-graph keys for component dependencies carry this prefix to
/// distinguish component identifiers from file paths.
pub const COMPONENT_KEY_PREFIX: &str = "component:";

/// Everything a scope needs from its surroundings while answering queries or
/// validating. The host assembles one per Program and passes it by reference;
/// all members are shared, never mutated by the scope.
pub struct ScopeContext<'a> {
    pub catalog: &'a ScopeCatalog,
    pub graph: &'a DependencyGraph,
    pub files: &'a dyn FileProvider,
    pub plugins: &'a PluginBus,
    pub class_validator: &'a dyn ClassValidator,
}

/// What kind of scope this is; decides parent resolution and own-file
/// enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    /// The distinguished ancestor of every other scope.
    Global,
    /// A scope backed by a source tree.
    Source,
    /// A scope backed by an XML component descriptor.
    Component { component_name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationState {
    Invalid,
    Validating,
    Valid,
}

/// Values stored in the scope cache, one variant per derived table. Reading
/// a slot back at the wrong variant is a programming error and panics.
#[derive(Debug, Clone)]
enum ScopeData {
    Files(Rc<Vec<Rc<SourceFile>>>),
    Namespaces(Rc<NamespaceLookup>),
    Classes(Rc<HashMap<String, ClassStatement>>),
    ParentScopeName(String),
}

/// State shared with the dependency-graph change handler. The handler holds
/// a weak reference, so after disposal it degrades to a no-op.
#[derive(Debug)]
struct ScopeShared {
    state: Cell<ValidationState>,
    cache: Cache<ScopeData>,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

/// A `new` expression decorated with the file it appears in.
#[derive(Debug, Clone)]
pub struct ScopedNewExpression {
    pub file: Rc<SourceFile>,
    pub expression: NewExpression,
}

/// A named collection of files whose declarations are mutually visible at
/// runtime.
///
/// A scope subscribes to its dependency-graph key at construction; any
/// change reachable from that key resets the validation state and clears the
/// cached tables. `dispose` must run before the scope is dropped so the
/// subscription is released.
pub struct Scope {
    name: String,
    dependency_graph_key: String,
    kind: ScopeKind,
    shared: Rc<ScopeShared>,
    subscriptions: Vec<Subscription>,
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("name", &self.name)
            .field("key", &self.dependency_graph_key)
            .field("kind", &self.kind)
            .field("validated", &self.is_validated())
            .finish()
    }
}

impl Scope {
    fn new(
        name: impl Into<String>,
        dependency_graph_key: impl Into<String>,
        kind: ScopeKind,
        graph: &mut DependencyGraph,
    ) -> Self {
        let name = name.into();
        let dependency_graph_key = dependency_graph_key.into();
        let shared = Rc::new(ScopeShared {
            state: Cell::new(ValidationState::Invalid),
            cache: Cache::new(),
            diagnostics: RefCell::new(Vec::new()),
        });
        let weak: Weak<ScopeShared> = Rc::downgrade(&shared);
        let subscription = graph.on_change(
            &dependency_graph_key,
            move |_key| {
                if let Some(shared) = weak.upgrade() {
                    shared.state.set(ValidationState::Invalid);
                    shared.cache.clear();
                }
            },
            false,
        );
        Self {
            name,
            dependency_graph_key,
            kind,
            shared,
            subscriptions: vec![subscription],
        }
    }

    /// The global scope. Created once per catalog.
    pub(crate) fn global(graph: &mut DependencyGraph) -> Self {
        Self::new(GLOBAL_SCOPE_NAME, "scope:global", ScopeKind::Global, graph)
    }

    /// A scope backed by a source tree.
    pub fn source(
        name: impl Into<String>,
        dependency_graph_key: impl Into<String>,
        graph: &mut DependencyGraph,
    ) -> Self {
        Self::new(name, dependency_graph_key, ScopeKind::Source, graph)
    }

    /// A scope backed by an XML component descriptor. Its dependency-graph
    /// key is derived from the component name.
    pub fn component(
        name: impl Into<String>,
        component_name: impl Into<String>,
        graph: &mut DependencyGraph,
    ) -> Self {
        let component_name = component_name.into();
        let key = format!("{}{}", COMPONENT_KEY_PREFIX, component_name.to_lowercase());
        Self::new(
            name,
            key,
            ScopeKind::Component { component_name },
            graph,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependency_graph_key(&self) -> &str {
        &self.dependency_graph_key
    }

    pub fn kind(&self) -> &ScopeKind {
        &self.kind
    }

    pub fn is_global(&self) -> bool {
        self.kind == ScopeKind::Global
    }

    pub fn is_validated(&self) -> bool {
        self.shared.state.get() == ValidationState::Valid
    }

    /// Reset the validation state and drop every cached table. The next
    /// `validate` rebuilds everything.
    pub fn invalidate(&self) {
        log::trace!("invalidating scope '{}'", self.name);
        self.shared.state.set(ValidationState::Invalid);
        self.shared.cache.clear();
    }

    /// Release the dependency-graph subscriptions. Must be called before the
    /// scope is dropped; handlers left behind degrade to no-ops but still
    /// occupy the graph.
    pub fn dispose(&mut self, graph: &mut DependencyGraph) {
        for subscription in self.subscriptions.drain(..) {
            graph.unsubscribe(subscription);
        }
    }

    /// Append a diagnostic to the scope's current list. Plugins use this
    /// from validation events.
    pub fn push_diagnostic(&self, diagnostic: Diagnostic) {
        self.shared.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Snapshot of the scope-owned diagnostics from the last `validate`.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.shared.diagnostics.borrow().clone()
    }

    /// Merged scope and own-file diagnostics, with the host's suppression
    /// predicate applied.
    pub fn get_diagnostics(
        &self,
        ctx: &ScopeContext<'_>,
        is_suppressed: &dyn Fn(&Diagnostic) -> bool,
    ) -> Vec<Diagnostic> {
        let mut result: Vec<Diagnostic> = self
            .shared
            .diagnostics
            .borrow()
            .iter()
            .filter(|d| !is_suppressed(d))
            .cloned()
            .collect();
        self.enumerate_own_files(ctx, |file| {
            result.extend(file.diagnostics.iter().filter(|d| !is_suppressed(d)).cloned());
        });
        result
    }

    /// Parent scope: none for the global scope, the extended component's
    /// scope for component scopes when it exists, the global scope otherwise.
    pub fn get_parent_scope<'c>(&self, ctx: &ScopeContext<'c>) -> Option<&'c Scope> {
        match &self.kind {
            ScopeKind::Global => None,
            ScopeKind::Source => Some(ctx.catalog.global_scope()),
            ScopeKind::Component { component_name } => {
                let cached = self.shared.cache.get_or_add("parent_scope_name", || {
                    let descriptor = ctx.files.get_component(component_name)?;
                    let extends = descriptor.component.as_ref()?.extends.clone()?;
                    let parent = ctx.catalog.get_component_scope(&extends)?;
                    Some(ScopeData::ParentScopeName(parent.name().to_string()))
                });
                match cached {
                    Some(ScopeData::ParentScopeName(name)) => Some(
                        ctx.catalog
                            .get_scope(&name)
                            .unwrap_or_else(|| ctx.catalog.global_scope()),
                    ),
                    None => Some(ctx.catalog.global_scope()),
                    Some(_) => unreachable!("parent_scope_name slot holds a scope name"),
                }
            }
        }
    }

    fn resolve_dependency_file(
        ctx: &ScopeContext<'_>,
        dependency: &str,
    ) -> Option<Rc<SourceFile>> {
        match dependency.strip_prefix(COMPONENT_KEY_PREFIX) {
            Some(component_name) => ctx.files.get_component(component_name),
            None => ctx.files.get_file_by_pkg_path(dependency),
        }
    }

    fn collect_files(
        ctx: &ScopeContext<'_>,
        dependencies: Vec<String>,
    ) -> Rc<Vec<Rc<SourceFile>>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut files = Vec::new();
        for dependency in dependencies {
            // Missing files are skipped silently; the file provider owns
            // reporting for absent sources.
            if let Some(file) = Self::resolve_dependency_file(ctx, &dependency) {
                if seen.insert(pkg_path_key(&file.pkg_path)) {
                    files.push(file);
                }
            }
        }
        Rc::new(files)
    }

    fn expect_files(data: Option<ScopeData>) -> Rc<Vec<Rc<SourceFile>>> {
        match data {
            Some(ScopeData::Files(files)) => files,
            _ => unreachable!("file slot holds a file list"),
        }
    }

    /// Files that are direct dependencies of this scope's key, in
    /// dependency-graph order, deduplicated by pkg path.
    pub fn get_own_files(&self, ctx: &ScopeContext<'_>) -> Rc<Vec<Rc<SourceFile>>> {
        Self::expect_files(self.shared.cache.get_or_add("own_files", || {
            let deps = ctx.graph.get_dependencies(&self.dependency_graph_key);
            Some(ScopeData::Files(Self::collect_files(ctx, deps)))
        }))
    }

    /// Union of own and inherited files: every file reachable from this
    /// scope's key, in traversal order, deduplicated by pkg path.
    pub fn get_all_files(&self, ctx: &ScopeContext<'_>) -> Rc<Vec<Rc<SourceFile>>> {
        Self::expect_files(self.shared.cache.get_or_add("all_files", || {
            let deps = ctx.graph.get_all_dependencies(&self.dependency_graph_key);
            Some(ScopeData::Files(Self::collect_files(ctx, deps)))
        }))
    }

    /// Visit own files, skipping those superseded by a typedef sibling.
    pub fn enumerate_own_files(&self, ctx: &ScopeContext<'_>, mut cb: impl FnMut(&Rc<SourceFile>)) {
        for file in self.get_own_files(ctx).iter() {
            if !file.has_typedef {
                cb(file);
            }
        }
    }

    /// Visit all reachable files, skipping those superseded by a typedef
    /// sibling.
    pub fn enumerate_all_files(&self, ctx: &ScopeContext<'_>, mut cb: impl FnMut(&Rc<SourceFile>)) {
        for file in self.get_all_files(ctx).iter() {
            if !file.has_typedef {
                cb(file);
            }
        }
    }

    /// Case-insensitive lookup among all reachable files.
    pub fn get_file_by_pkg_path(
        &self,
        ctx: &ScopeContext<'_>,
        pkg_path: &str,
    ) -> Option<Rc<SourceFile>> {
        let wanted = pkg_path_key(pkg_path);
        self.get_all_files(ctx)
            .iter()
            .find(|file| pkg_path_key(&file.pkg_path) == wanted)
            .cloned()
    }

    pub fn has_file(&self, ctx: &ScopeContext<'_>, pkg_path: &str) -> bool {
        self.get_file_by_pkg_path(ctx, pkg_path).is_some()
    }

    /// Callables declared by this scope's own files.
    pub fn get_own_callables(&self, ctx: &ScopeContext<'_>) -> Vec<CallableContainer> {
        let mut containers = Vec::new();
        self.enumerate_own_files(ctx, |file| {
            for callable_index in 0..file.callables.len() {
                containers.push(CallableContainer {
                    file: Rc::clone(file),
                    callable_index,
                    scope_name: self.name.clone(),
                });
            }
        });
        containers
    }

    /// Own callables concatenated with the parent chain's callables, nearest
    /// scope first. Each container records the scope that surfaced it. A
    /// cyclic parent chain (possible with malformed component `extends`) is
    /// walked once.
    pub fn get_all_callables(&self, ctx: &ScopeContext<'_>) -> Vec<CallableContainer> {
        let mut containers = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            if !visited.insert(scope.name().to_string()) {
                break;
            }
            containers.extend(scope.get_own_callables(ctx));
            current = scope.get_parent_scope(ctx);
        }
        containers
    }

    /// Case-insensitive callable lookup; the first match wins, so own-scope
    /// callables take precedence over ancestors'.
    pub fn get_callable_by_name(
        &self,
        ctx: &ScopeContext<'_>,
        name: &str,
    ) -> Option<CallableContainer> {
        let lower = name.to_lowercase();
        self.get_all_callables(ctx)
            .into_iter()
            .find(|container| container.callable().lower_name() == lower)
    }

    fn get_class_map(&self, ctx: &ScopeContext<'_>) -> Rc<HashMap<String, ClassStatement>> {
        let data = self.shared.cache.get_or_add("class_map", || {
            let mut map = HashMap::new();
            self.enumerate_all_files(ctx, |file| {
                for class in &file.references.class_statements {
                    map.entry(class.lower_full_name()).or_insert_with(|| class.clone());
                }
            });
            Some(ScopeData::Classes(Rc::new(map)))
        });
        match data {
            Some(ScopeData::Classes(map)) => map,
            _ => unreachable!("class slot holds the class map"),
        }
    }

    /// Class lookup by lowercase fully-namespaced name.
    pub fn get_class(&self, ctx: &ScopeContext<'_>, lower_full_name: &str) -> Option<ClassStatement> {
        self.get_class_map(ctx).get(lower_full_name).cloned()
    }

    /// The namespace lookup over all reachable files: one entry per prefix
    /// of every declared namespace path. Cached until invalidation.
    pub fn build_namespace_lookup(&self, ctx: &ScopeContext<'_>) -> Rc<NamespaceLookup> {
        let data = self.shared.cache.get_or_add("namespace_lookup", || {
            let mut files = Vec::new();
            self.enumerate_all_files(ctx, |file| files.push(Rc::clone(file)));
            let lookup = NamespaceLookup::build(files.iter().map(Rc::as_ref));
            Some(ScopeData::Namespaces(Rc::new(lookup)))
        });
        match data {
            Some(ScopeData::Namespaces(lookup)) => lookup,
            _ => unreachable!("namespace slot holds the lookup"),
        }
    }

    /// True when `name` equals a declared namespace path or a prefix of one.
    pub fn is_known_namespace(&self, ctx: &ScopeContext<'_>, name: &str) -> bool {
        self.build_namespace_lookup(ctx)
            .contains_key(&name.to_lowercase())
    }

    /// All `new` expressions in reachable files, decorated with the owning
    /// file.
    pub fn get_new_expressions(&self, ctx: &ScopeContext<'_>) -> Vec<ScopedNewExpression> {
        let mut result = Vec::new();
        self.enumerate_all_files(ctx, |file| {
            for expression in &file.references.new_expressions {
                result.push(ScopedNewExpression {
                    file: Rc::clone(file),
                    expression: expression.clone(),
                });
            }
        });
        result
    }

    // ------------------------------------------------------------------
    // Validation pipeline
    // ------------------------------------------------------------------

    /// Validate the scope, rebuilding diagnostics. A no-op when already
    /// valid unless `force`; parents validate before their children.
    pub fn validate(&self, ctx: &ScopeContext<'_>, force: bool) {
        match self.shared.state.get() {
            ValidationState::Valid if !force => return,
            // Re-entry from a plugin or parent chain cycle: ignore.
            ValidationState::Validating => return,
            _ => {}
        }
        self.shared.state.set(ValidationState::Validating);

        if let Some(parent) = self.get_parent_scope(ctx) {
            if !parent.is_validated() {
                parent.validate(ctx, force);
            }
        }

        perf::time(log::Level::Debug, &format!("validate '{}'", self.name), || {
            self.shared.diagnostics.borrow_mut().clear();

            let own_files = self.get_own_files(ctx);
            let all_files = self.get_all_files(ctx);

            let mut callables = self.get_all_callables(ctx);
            // Deterministic emission order: declaring file path, then name.
            callables.sort_by(|a, b| {
                let file_a = a.file.path_absolute.to_string_lossy();
                let file_b = b.file.path_absolute.to_string_lossy();
                file_a
                    .cmp(&file_b)
                    .then_with(|| a.callable().name.cmp(&b.callable().name))
            });

            let mut callable_container_map: IndexMap<String, Vec<CallableContainer>> =
                IndexMap::new();
            for container in callables {
                callable_container_map
                    .entry(container.callable().lower_name())
                    .or_default()
                    .push(container);
            }

            let event = ScopeValidationEvent {
                scope: self,
                files: &all_files,
                callable_container_map: &callable_container_map,
            };
            ctx.plugins.emit_before_scope_validate(&event);

            self.diagnostic_find_duplicate_function_declarations(&callable_container_map);
            self.diagnostic_validate_script_import_paths(ctx);
            self.validate_classes(ctx);

            let namespace_lookup = self.build_namespace_lookup(ctx);
            let class_map = self.get_class_map(ctx);
            for file in own_files.iter() {
                if file.has_typedef {
                    continue;
                }
                self.diagnostic_detect_calls_to_unknown_functions(
                    file,
                    &callable_container_map,
                );
                self.diagnostic_detect_shadowed_local_vars(file, &callable_container_map, &class_map);
                self.diagnostic_detect_function_collisions(file, &class_map);
                self.diagnostic_detect_namespace_collisions(ctx, file, &namespace_lookup);
            }

            ctx.plugins.emit_after_scope_validate(&event);
        });

        self.shared.state.set(ValidationState::Valid);
    }

    fn validate_classes(&self, ctx: &ScopeContext<'_>) {
        let diagnostics = ctx.class_validator.validate(self, ctx);
        self.shared.diagnostics.borrow_mut().extend(diagnostics);
    }

    fn diagnostic_find_duplicate_function_declarations(
        &self,
        callable_container_map: &IndexMap<String, Vec<CallableContainer>>,
    ) {
        for (lower_name, containers) in callable_container_map {
            let own: Vec<&CallableContainer> = containers
                .iter()
                .filter(|c| c.scope_name == self.name)
                .collect();
            let ancestors: Vec<&CallableContainer> = containers
                .iter()
                .filter(|c| c.scope_name != self.name && c.scope_name != GLOBAL_SCOPE_NAME)
                .collect();

            // Redeclaring an ancestor's callable is intentional for `init`,
            // and meaningless when both declarations share a file.
            if !own.is_empty() && !ancestors.is_empty() && lower_name != "init" {
                let deepest = ancestors[ancestors.len() - 1];
                for container in &own {
                    if pkg_path_key(&container.file.pkg_path)
                        == pkg_path_key(&deepest.file.pkg_path)
                    {
                        continue;
                    }
                    let callable = container.callable();
                    self.push_diagnostic(Diagnostic::new(
                        catalog::overrides_ancestor_function(
                            &callable.name,
                            &self.name,
                            &deepest.file.pkg_path,
                            &deepest.scope_name,
                        ),
                        container.file.pkg_path.clone(),
                        callable.name_range,
                    ));
                }
            }

            if own.len() >= 2 {
                for container in &own {
                    let callable = container.callable();
                    self.push_diagnostic(Diagnostic::new(
                        catalog::duplicate_function_implementation(&callable.name, &self.name),
                        container.file.pkg_path.clone(),
                        callable.name_range,
                    ));
                }
            }
        }
    }

    fn diagnostic_validate_script_import_paths(&self, ctx: &ScopeContext<'_>) {
        let own_files = self.get_own_files(ctx);
        for file in own_files.iter() {
            if file.has_typedef {
                continue;
            }
            for import in &file.script_imports {
                if import.text.is_empty() {
                    self.push_diagnostic(Diagnostic::new(
                        catalog::script_src_cannot_be_empty(),
                        file.pkg_path.clone(),
                        import.range,
                    ));
                    continue;
                }
                match self.get_file_by_pkg_path(ctx, &import.pkg_path) {
                    None => self.push_diagnostic(Diagnostic::new(
                        catalog::referenced_file_does_not_exist(),
                        file.pkg_path.clone(),
                        import.range,
                    )),
                    Some(actual) => {
                        if actual.pkg_path != import.pkg_path {
                            self.push_diagnostic(Diagnostic::new(
                                catalog::script_import_case_mismatch(&actual.pkg_path),
                                file.pkg_path.clone(),
                                import.range,
                            ));
                        }
                    }
                }
            }
        }
    }

    fn diagnostic_detect_calls_to_unknown_functions(
        &self,
        file: &Rc<SourceFile>,
        callable_container_map: &IndexMap<String, Vec<CallableContainer>>,
    ) {
        for call in &file.function_calls {
            let lower = call.name.to_lowercase();
            if lower == "super" && file.parse_mode() == ParseMode::Brighter {
                continue;
            }
            // A local variable with the call's name satisfies the call;
            // whether it is actually callable is a type concern.
            let satisfied_locally = file
                .function_scope_at(call.name_range.start)
                .is_some_and(|scope| {
                    scope
                        .variables
                        .iter()
                        .any(|v| v.name.to_lowercase() == lower)
                });
            if satisfied_locally {
                continue;
            }
            match callable_container_map.get(&lower) {
                None => self.push_diagnostic(Diagnostic::new(
                    catalog::call_to_unknown_function(&call.name, &self.name),
                    file.pkg_path.clone(),
                    call.name_range,
                )),
                Some(containers) => {
                    let callable = containers[0].callable();
                    let (min, max) = (callable.min_args(), callable.max_args());
                    if call.arg_count < min || call.arg_count > max {
                        self.push_diagnostic(Diagnostic::new(
                            catalog::mismatch_argument_count(
                                &callable.arg_count_display(),
                                call.arg_count,
                            ),
                            file.pkg_path.clone(),
                            call.name_range,
                        ));
                    }
                }
            }
        }
    }

    fn diagnostic_detect_shadowed_local_vars(
        &self,
        file: &Rc<SourceFile>,
        callable_container_map: &IndexMap<String, Vec<CallableContainer>>,
        class_map: &HashMap<String, ClassStatement>,
    ) {
        for function_scope in &file.function_scopes {
            for var in &function_scope.variables {
                let lower = var.name.to_lowercase();
                if var.is_function_type {
                    if builtins::is_global_callable(&var.name) {
                        self.push_diagnostic(Diagnostic::new(
                            catalog::local_var_function_shadows_parent(&var.name, "stdlib"),
                            file.pkg_path.clone(),
                            var.name_range,
                        ));
                    } else if callable_container_map.contains_key(&lower) {
                        self.push_diagnostic(Diagnostic::new(
                            catalog::local_var_function_shadows_parent(&var.name, "scope"),
                            file.pkg_path.clone(),
                            var.name_range,
                        ));
                    }
                } else if builtins::is_global_callable(&var.name) {
                    // Plain locals may shadow built-ins.
                } else if callable_container_map.contains_key(&lower) {
                    self.push_diagnostic(Diagnostic::new(
                        catalog::local_var_shadowed_by_scoped_function(&var.name),
                        file.pkg_path.clone(),
                        var.name_range,
                    ));
                } else if let Some(class) = class_map.get(&lower) {
                    self.push_diagnostic(Diagnostic::new(
                        catalog::local_var_same_name_as_class(&class.full_name()),
                        file.pkg_path.clone(),
                        var.name_range,
                    ));
                }
            }
        }
    }

    fn diagnostic_detect_function_collisions(
        &self,
        file: &Rc<SourceFile>,
        class_map: &HashMap<String, ClassStatement>,
    ) {
        for callable in &file.callables {
            if builtins::is_global_callable(&callable.name) {
                self.push_diagnostic(Diagnostic::new(
                    catalog::scope_function_shadowed_by_built_in(&callable.name),
                    file.pkg_path.clone(),
                    callable.name_range,
                ));
            }
            if let Some(class) = class_map.get(&callable.lower_name()) {
                self.push_diagnostic(Diagnostic::new(
                    catalog::function_same_name_as_class(&class.full_name()),
                    file.pkg_path.clone(),
                    callable.name_range,
                ));
            }
        }
    }

    fn namespace_related_information(
        &self,
        ctx: &ScopeContext<'_>,
        lookup: &NamespaceLookup,
        lower_name: &str,
    ) -> Option<RelatedInformation> {
        let container = lookup.get(lower_name)?;
        let file = self.get_file_by_pkg_path(ctx, &container.file_pkg_path)?;
        Some(RelatedInformation {
            message: format!("Namespace '{}' is declared here", container.full_name),
            location: SourceLocation {
                uri: file.uri()?,
                range: container.name_range,
            },
        })
    }

    fn diagnostic_detect_namespace_collisions(
        &self,
        ctx: &ScopeContext<'_>,
        file: &Rc<SourceFile>,
        lookup: &NamespaceLookup,
    ) {
        for callable in &file.callables {
            for param in &callable.params {
                let lower = param.name.to_lowercase();
                if lookup.contains_key(&lower) {
                    let mut diagnostic = Diagnostic::new(
                        catalog::parameter_same_name_as_namespace(&param.name),
                        file.pkg_path.clone(),
                        param.name_range,
                    );
                    if let Some(related) =
                        self.namespace_related_information(ctx, lookup, &lower)
                    {
                        diagnostic = diagnostic.with_related(related);
                    }
                    self.push_diagnostic(diagnostic);
                }
            }
        }
        for assignment in &file.references.assignment_statements {
            let lower = assignment.name.to_lowercase();
            if lookup.contains_key(&lower) {
                let mut diagnostic = Diagnostic::new(
                    catalog::variable_same_name_as_namespace(&assignment.name),
                    file.pkg_path.clone(),
                    assignment.name_range,
                );
                if let Some(related) = self.namespace_related_information(ctx, lookup, &lower) {
                    diagnostic = diagnostic.with_related(related);
                }
                self.push_diagnostic(diagnostic);
            }
        }
    }

    // ------------------------------------------------------------------
    // Completion & definition providers
    // ------------------------------------------------------------------

    /// One completion per reachable callable. In the brighter parse mode,
    /// namespaced callables are omitted (the namespace completion path
    /// surfaces those).
    pub fn get_callables_as_completions(
        &self,
        ctx: &ScopeContext<'_>,
        parse_mode: ParseMode,
    ) -> Vec<CompletionItem> {
        self.get_all_callables(ctx)
            .iter()
            .filter(|container| {
                !(parse_mode == ParseMode::Brighter && container.callable().has_namespace)
            })
            .map(|container| {
                let callable = container.callable();
                CompletionItem {
                    label: callable.name.clone(),
                    kind: Some(CompletionItemKind::FUNCTION),
                    detail: callable.short_description.clone(),
                    documentation: callable.documentation.as_ref().map(|doc| {
                        Documentation::MarkupContent(MarkupContent {
                            kind: MarkupKind::Markdown,
                            value: doc.clone(),
                        })
                    }),
                    ..Default::default()
                }
            })
            .collect()
    }

    /// Property-name completions of every reachable file.
    pub fn get_property_name_completions(&self, ctx: &ScopeContext<'_>) -> Vec<CompletionItem> {
        let mut items = Vec::new();
        self.enumerate_all_files(ctx, |file| {
            items.extend(file.property_name_completions.iter().cloned());
        });
        items
    }

    /// Definition lookup hook. The scope graph itself has no definition
    /// sources; hosts layer component- or parser-aware lookups on top.
    pub fn get_definition(
        &self,
        _file: &SourceFile,
        _position: Position,
    ) -> Vec<SourceLocation> {
        Vec::new()
    }
}
