//
// test_utils/fixture.rs
//
// Miniature Program for exercising scopes: an in-memory file store, a
// dependency graph, and builders for source-file models
//

use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::callables::{Callable, CallableParam};
use crate::class_validator::NoopClassValidator;
use crate::dependency_graph::DependencyGraph;
use crate::diagnostics::Diagnostic;
use crate::files::{
    pkg_path_key, Assignment, ClassStatement, ComponentInterface, FileProvider, FunctionCall,
    FunctionScope, LocalVar, NamespaceStatement, ScriptImport, SourceFile,
};
use crate::plugins::PluginBus;
use crate::ranges::Range;
use crate::scope::{Scope, ScopeContext, COMPONENT_KEY_PREFIX};
use crate::scope_catalog::ScopeCatalog;

/// In-memory implementation of the file provider.
#[derive(Debug, Default)]
pub struct FileStore {
    files: HashMap<String, Rc<SourceFile>>,
    components: HashMap<String, Rc<SourceFile>>,
}

impl FileStore {
    pub fn insert(&mut self, file: SourceFile) -> Rc<SourceFile> {
        let file = Rc::new(file);
        if let Some(component) = &file.component {
            self.components
                .insert(component.name.to_lowercase(), Rc::clone(&file));
        }
        self.files
            .insert(pkg_path_key(&file.pkg_path), Rc::clone(&file));
        file
    }

    pub fn remove(&mut self, pkg_path: &str) {
        if let Some(file) = self.files.remove(&pkg_path_key(pkg_path)) {
            if let Some(component) = &file.component {
                self.components.remove(&component.name.to_lowercase());
            }
        }
    }
}

impl FileProvider for FileStore {
    fn get_file_by_pkg_path(&self, pkg_path: &str) -> Option<Rc<SourceFile>> {
        self.files.get(&pkg_path_key(pkg_path)).cloned()
    }

    fn get_component(&self, name: &str) -> Option<Rc<SourceFile>> {
        self.components.get(&name.to_lowercase()).cloned()
    }
}

/// The external Program role, reduced to what scope tests need: it owns the
/// graph, the catalog, and the file store, and wires edges the way the real
/// project loader does.
pub struct TestProgram {
    pub graph: DependencyGraph,
    pub catalog: ScopeCatalog,
    pub store: FileStore,
    pub plugins: PluginBus,
    pub class_validator: NoopClassValidator,
}

impl Default for TestProgram {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProgram {
    pub fn new() -> Self {
        let mut graph = DependencyGraph::new();
        let catalog = ScopeCatalog::new(&mut graph);
        Self {
            graph,
            catalog,
            store: FileStore::default(),
            plugins: PluginBus::new(),
            class_validator: NoopClassValidator,
        }
    }

    pub fn ctx(&self) -> ScopeContext<'_> {
        ScopeContext {
            catalog: &self.catalog,
            graph: &self.graph,
            files: &self.store,
            plugins: &self.plugins,
            class_validator: &self.class_validator,
        }
    }

    pub fn scope_key(name: &str) -> String {
        format!("scope:{name}")
    }

    pub fn add_source_scope(&mut self, name: &str) {
        let scope = Scope::source(name, Self::scope_key(name), &mut self.graph);
        self.catalog.add_scope(scope);
    }

    /// Store a file and make it a direct dependency of `scope_name`.
    pub fn add_file(&mut self, scope_name: &str, file: SourceFile) -> Rc<SourceFile> {
        let pkg_path = file.pkg_path.clone();
        let stored = self.store.insert(file);
        self.graph.add_edge(&Self::scope_key(scope_name), &pkg_path);
        stored
    }

    /// Detach and forget a file previously added with `add_file`.
    pub fn remove_file(&mut self, scope_name: &str, pkg_path: &str) {
        self.graph.remove_edge(&Self::scope_key(scope_name), pkg_path);
        self.store.remove(pkg_path);
    }

    /// Register a component: its XML descriptor, its scripts, and the edges
    /// a project loader would add. The scope is named after the descriptor's
    /// pkg path.
    pub fn add_component(&mut self, xml: SourceFile, scripts: Vec<SourceFile>) {
        let component = xml
            .component
            .clone()
            .expect("component fixture needs a descriptor");
        let xml_pkg_path = xml.pkg_path.clone();
        let scope_name = xml_pkg_path.clone();
        self.store.insert(xml);

        let scope = Scope::component(scope_name.as_str(), component.name.as_str(), &mut self.graph);
        let key = scope.dependency_graph_key().to_string();
        self.catalog.add_scope(scope);

        self.graph.add_edge(&key, &xml_pkg_path);
        for script in scripts {
            let script_pkg_path = script.pkg_path.clone();
            self.store.insert(script);
            self.graph.add_edge(&key, &script_pkg_path);
        }
        if let Some(extends) = &component.extends {
            self.graph.add_edge(
                &xml_pkg_path,
                &format!("{}{}", COMPONENT_KEY_PREFIX, extends.to_lowercase()),
            );
        }
    }

    pub fn validate(&self, scope_name: &str) {
        let ctx = self.ctx();
        self.catalog
            .get_scope(scope_name)
            .expect("scope exists")
            .validate(&ctx, false);
    }

    pub fn validate_force(&self, scope_name: &str) {
        let ctx = self.ctx();
        self.catalog
            .get_scope(scope_name)
            .expect("scope exists")
            .validate(&ctx, true);
    }

    /// Merged diagnostics with no suppression.
    pub fn diagnostics(&self, scope_name: &str) -> Vec<Diagnostic> {
        let ctx = self.ctx();
        self.catalog
            .get_scope(scope_name)
            .expect("scope exists")
            .get_diagnostics(&ctx, &|_| false)
    }
}

/// Builder for source-file models. Declaration ranges auto-increment by line
/// so emission order is deterministic; checks that assert exact anchors pass
/// ranges explicitly.
pub struct FileBuilder {
    file: SourceFile,
    next_line: i32,
}

impl FileBuilder {
    /// A script file; extension is taken from the path.
    pub fn script(pkg_path: &str) -> Self {
        let extension = match pkg_path.rsplit_once('.') {
            Some((_, ext)) => format!(".{ext}"),
            None => String::new(),
        };
        let relative = pkg_path.trim_start_matches("pkg:/").replace('\\', "/");
        Self {
            file: SourceFile {
                pkg_path: pkg_path.to_string(),
                path_absolute: PathBuf::from(format!("/project/{relative}")),
                extension,
                ..Default::default()
            },
            next_line: 0,
        }
    }

    /// An XML component descriptor.
    pub fn component(pkg_path: &str, name: &str, extends: Option<&str>) -> Self {
        let mut builder = Self::script(pkg_path);
        builder.file.component = Some(ComponentInterface {
            name: name.to_string(),
            extends: extends.map(str::to_string),
        });
        builder
    }

    fn next_range(&mut self, width: usize) -> Range {
        let line = self.next_line;
        self.next_line += 1;
        Range::new(line, 4, line, 4 + width as i32)
    }

    pub fn typedef(mut self) -> Self {
        self.file.has_typedef = true;
        self
    }

    pub fn callable(self, name: &str) -> Self {
        self.callable_with_params(name, &[])
    }

    /// `params` are `(name, is_optional)` pairs.
    pub fn callable_with_params(mut self, name: &str, params: &[(&str, bool)]) -> Self {
        let name_range = self.next_range(name.len());
        let params = params
            .iter()
            .enumerate()
            .map(|(i, (param_name, is_optional))| CallableParam {
                name: param_name.to_string(),
                name_range: Range::new(
                    name_range.start.line,
                    20 + i as i32 * 12,
                    name_range.start.line,
                    20 + i as i32 * 12 + param_name.len() as i32,
                ),
                is_optional: *is_optional,
            })
            .collect();
        self.file.callables.push(Callable {
            name: name.to_string(),
            name_range,
            params,
            has_namespace: false,
            documentation: None,
            short_description: None,
        });
        self
    }

    pub fn namespaced_callable(mut self, name: &str) -> Self {
        self = self.callable(name);
        self.file.callables.last_mut().unwrap().has_namespace = true;
        self
    }

    pub fn documented_callable(mut self, name: &str, detail: &str, docs: &str) -> Self {
        self = self.callable(name);
        let callable = self.file.callables.last_mut().unwrap();
        callable.short_description = Some(detail.to_string());
        callable.documentation = Some(docs.to_string());
        self
    }

    pub fn call(mut self, name: &str, arg_count: usize, name_range: Range) -> Self {
        self.file.function_calls.push(FunctionCall {
            name: name.to_string(),
            name_range,
            arg_count,
        });
        self
    }

    /// `vars` are `(name, is_function_type)` pairs; their declared ranges
    /// land inside `range`.
    pub fn function_scope(mut self, range: Range, vars: &[(&str, bool)]) -> Self {
        let variables = vars
            .iter()
            .enumerate()
            .map(|(i, (name, is_function_type))| LocalVar {
                name: name.to_string(),
                name_range: Range::new(
                    range.start.line,
                    8 + i as i32 * 10,
                    range.start.line,
                    8 + i as i32 * 10 + name.len() as i32,
                ),
                is_function_type: *is_function_type,
            })
            .collect();
        self.file.function_scopes.push(FunctionScope { range, variables });
        self
    }

    pub fn namespace(mut self, name: &str, name_range: Range) -> Self {
        self.file.references.namespace_statements.push(NamespaceStatement {
            name: name.to_string(),
            name_range,
            functions: vec![],
            classes: vec![],
        });
        self
    }

    pub fn class(mut self, name: &str, namespace: Option<&str>) -> Self {
        let name_range = self.next_range(name.len());
        self.file.references.class_statements.push(ClassStatement {
            name: name.to_string(),
            name_range,
            namespace_name: namespace.map(str::to_string),
            parent_name: None,
        });
        self
    }

    pub fn import(mut self, text: &str, pkg_path: &str, range: Range) -> Self {
        self.file.script_imports.push(ScriptImport {
            text: text.to_string(),
            pkg_path: pkg_path.to_string(),
            range,
        });
        self
    }

    pub fn assignment(mut self, name: &str, name_range: Range) -> Self {
        self.file.references.assignment_statements.push(Assignment {
            name: name.to_string(),
            name_range,
        });
        self
    }

    pub fn build(self) -> SourceFile {
        self.file
    }
}
