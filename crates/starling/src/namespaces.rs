//
// namespaces.rs
//
// Namespace lookup tree keyed at every prefix of every declared path
//

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::files::{ClassStatement, NamespaceFunction, SourceFile};
use crate::ranges::Range;

/// A statement carried by a namespace body.
#[derive(Debug, Clone)]
pub enum NamespaceMember {
    Function(NamespaceFunction),
    Class(ClassStatement),
}

/// One node of the namespace tree. Children are addressed by their key in
/// the flat lookup map; nodes never hold parent pointers.
#[derive(Debug, Clone)]
pub struct NamespaceContainer {
    /// Pkg path of the file whose declaration introduced this node.
    pub file_pkg_path: String,
    /// Full dotted path with original casing, e.g. `Net.Http`.
    pub full_name: String,
    /// Final path segment with original casing.
    pub last_part_name: String,
    /// Name range of the introducing declaration.
    pub name_range: Range,
    /// Body statements; sibling declarations with the same full name
    /// coalesce here in encounter order.
    pub statements: Vec<NamespaceMember>,
    /// Lowercase class name -> class declared in this namespace body.
    pub class_statements: HashMap<String, ClassStatement>,
    /// Lowercase function name -> function declared in this namespace body.
    pub function_statements: HashMap<String, NamespaceFunction>,
    /// Lowercase child part -> the child's key in the flat lookup.
    pub namespaces: HashMap<String, String>,
}

/// Flat lookup over all namespace nodes, keyed by lowercase full name.
/// Preserves insertion order; the parent-child wiring pass runs over that
/// order after coalescing.
#[derive(Debug, Clone, Default)]
pub struct NamespaceLookup {
    map: IndexMap<String, NamespaceContainer>,
}

impl NamespaceLookup {
    /// Build the lookup from the namespace statements of `files`. Every
    /// prefix of every declared path receives an entry; bodies attach to the
    /// full-path entry only.
    pub fn build<'a>(files: impl IntoIterator<Item = &'a SourceFile>) -> Self {
        let mut map: IndexMap<String, NamespaceContainer> = IndexMap::new();

        for file in files {
            for statement in &file.references.namespace_statements {
                let parts: Vec<&str> = statement.name.split('.').collect();
                for depth in 1..=parts.len() {
                    let full_name = parts[..depth].join(".");
                    let key = full_name.to_lowercase();
                    let entry = map.entry(key).or_insert_with(|| NamespaceContainer {
                        file_pkg_path: file.pkg_path.clone(),
                        full_name,
                        last_part_name: parts[depth - 1].to_string(),
                        name_range: statement.name_range,
                        statements: Vec::new(),
                        class_statements: HashMap::new(),
                        function_statements: HashMap::new(),
                        namespaces: HashMap::new(),
                    });
                    if depth == parts.len() {
                        for function in &statement.functions {
                            entry
                                .function_statements
                                .insert(function.name.to_lowercase(), function.clone());
                            entry.statements.push(NamespaceMember::Function(function.clone()));
                        }
                        for class in &statement.classes {
                            entry
                                .class_statements
                                .insert(class.name.to_lowercase(), class.clone());
                            entry.statements.push(NamespaceMember::Class(class.clone()));
                        }
                    }
                }
            }
        }

        // Parent-child wiring, in insertion order.
        let links: Vec<(String, String, String)> = map
            .keys()
            .filter_map(|key| {
                key.rsplit_once('.').map(|(parent, part)| {
                    (parent.to_string(), part.to_string(), key.clone())
                })
            })
            .collect();
        for (parent_key, part, child_key) in links {
            if let Some(parent) = map.get_mut(&parent_key) {
                parent.namespaces.insert(part, child_key);
            }
        }

        Self { map }
    }

    pub fn get(&self, lower_full_name: &str) -> Option<&NamespaceContainer> {
        self.map.get(lower_full_name)
    }

    pub fn contains_key(&self, lower_full_name: &str) -> bool {
        self.map.contains_key(lower_full_name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.map.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &NamespaceContainer)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
