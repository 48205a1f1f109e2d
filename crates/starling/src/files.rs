//
// files.rs
//
// Observable model of parsed source files and XML component descriptors
//

use std::path::PathBuf;
use std::rc::Rc;

use lsp_types::CompletionItem;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::callables::Callable;
use crate::diagnostics::Diagnostic;
use crate::ranges::{Position, Range};

/// Which grammar a file was parsed with. `.bs` files use the brighter
/// dialect (namespaces, classes, `super`); `.brs` files use the classic one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    Classic,
    Brighter,
}

/// A `<script>` tag import (XML files) or an `import` statement (script
/// files). `text` is the raw source text of the path; `pkg_path` is the
/// normalized target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptImport {
    pub text: String,
    pub pkg_path: String,
    pub range: Range,
}

/// A call site observed in a file body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub name_range: Range,
    pub arg_count: usize,
}

/// A variable declared inside a function body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalVar {
    pub name: String,
    pub name_range: Range,
    /// True when the declaration's inferred type is a function type.
    pub is_function_type: bool,
}

/// A function-local scope: the body extent plus its variable declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionScope {
    pub range: Range,
    pub variables: Vec<LocalVar>,
}

/// A function statement declared inside a namespace body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceFunction {
    pub name: String,
    pub name_range: Range,
}

/// A class declaration. `namespace_name` carries the dotted path of the
/// enclosing namespace when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStatement {
    pub name: String,
    pub name_range: Range,
    pub namespace_name: Option<String>,
    /// Name of the extended class, for the class-structure validator.
    pub parent_name: Option<String>,
}

impl ClassStatement {
    /// Fully-namespaced display name, e.g. `Net.Http.Client`.
    pub fn full_name(&self) -> String {
        match &self.namespace_name {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// Lowercase lookup key for the class map.
    pub fn lower_full_name(&self) -> String {
        self.full_name().to_lowercase()
    }
}

/// A namespace declaration with the members observable by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceStatement {
    /// Dotted path as written, e.g. `Net.Http`.
    pub name: String,
    pub name_range: Range,
    pub functions: Vec<NamespaceFunction>,
    pub classes: Vec<ClassStatement>,
}

/// A `new` expression as parsed (not yet tied to a file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpression {
    pub class_name: String,
    pub name_range: Range,
}

/// An assignment-statement target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub name_range: Range,
}

/// Statement lists the parser surfaces for cross-file analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileReferences {
    pub namespace_statements: Vec<NamespaceStatement>,
    /// All classes in the file, including namespaced ones.
    pub class_statements: Vec<ClassStatement>,
    pub new_expressions: Vec<NewExpression>,
    pub assignment_statements: Vec<Assignment>,
}

/// Component descriptor attributes of an XML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInterface {
    pub name: String,
    pub extends: Option<String>,
}

/// A parsed source file or XML component descriptor, reduced to the
/// attributes the scope graph observes. Produced by the parser collaborator;
/// immutable once handed to the core.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    /// Canonical package-relative path, e.g. `pkg:/source/main.brs`.
    pub pkg_path: String,
    pub path_absolute: PathBuf,
    /// Extension including the dot: `.brs`, `.bs`, or `.xml`.
    pub extension: String,
    /// Files with a typedef sibling are skipped for analysis.
    pub has_typedef: bool,
    pub callables: Vec<Callable>,
    pub function_calls: Vec<FunctionCall>,
    pub function_scopes: Vec<FunctionScope>,
    pub property_name_completions: Vec<CompletionItem>,
    pub references: FileReferences,
    pub script_imports: Vec<ScriptImport>,
    /// File-own (parse) diagnostics, merged into scope output.
    pub diagnostics: Vec<Diagnostic>,
    /// Present only for XML component descriptors.
    pub component: Option<ComponentInterface>,
}

impl SourceFile {
    pub fn is_xml(&self) -> bool {
        self.extension.eq_ignore_ascii_case(".xml")
    }

    pub fn parse_mode(&self) -> ParseMode {
        if self.extension.eq_ignore_ascii_case(".bs") {
            ParseMode::Brighter
        } else {
            ParseMode::Classic
        }
    }

    /// File URI for related-information locations. None when the absolute
    /// path is not expressible as a file URL.
    pub fn uri(&self) -> Option<Url> {
        Url::from_file_path(&self.path_absolute).ok()
    }

    /// The innermost function scope containing `position`, if any.
    pub fn function_scope_at(&self, position: Position) -> Option<&FunctionScope> {
        let mut innermost: Option<&FunctionScope> = None;
        for scope in &self.function_scopes {
            if !scope.range.contains(position) {
                continue;
            }
            innermost = match innermost {
                Some(current) if !scope.range.is_within(&current.range) => Some(current),
                _ => Some(scope),
            };
        }
        innermost
    }
}

/// Case-insensitive, separator-normalized comparison key for pkg paths.
pub fn pkg_path_key(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

/// Upstream file access consumed by scopes. Implemented by the Program (or a
/// test fixture); both lookups are case-insensitive.
pub trait FileProvider {
    fn get_file_by_pkg_path(&self, pkg_path: &str) -> Option<Rc<SourceFile>>;
    /// The XML descriptor registered for a component name.
    fn get_component(&self, name: &str) -> Option<Rc<SourceFile>>;
}
