//
// diagnostics.rs
//
// Diagnostic payloads and the message catalog
//

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ranges::Range;

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A location in another file that a diagnostic points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub uri: Url,
    pub range: Range,
}

/// Supplementary information attached to a diagnostic, anchored at a
/// location elsewhere (e.g. the declaration a name collides with).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedInformation {
    pub message: String,
    pub location: SourceLocation,
}

/// The catalog's contribution to a diagnostic: code, message, and severity.
/// The core supplies range, file, and related information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticData {
    pub code: u16,
    pub message: String,
    pub severity: Severity,
}

/// A fully-anchored diagnostic as surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: u16,
    pub message: String,
    pub severity: Severity,
    pub range: Range,
    /// Canonical pkg path of the file the diagnostic is anchored in.
    pub file: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<RelatedInformation>,
}

impl Diagnostic {
    pub fn new(data: DiagnosticData, file: impl Into<String>, range: Range) -> Self {
        Self {
            code: data.code,
            message: data.message,
            severity: data.severity,
            range,
            file: file.into(),
            related_information: Vec::new(),
        }
    }

    pub fn with_related(mut self, related: RelatedInformation) -> Self {
        self.related_information.push(related);
        self
    }
}

/// Stable diagnostic codes. Codes are append-only; renumbering breaks
/// host-side suppression lists.
pub mod codes {
    pub const CALL_TO_UNKNOWN_FUNCTION: u16 = 1001;
    pub const MISMATCH_ARGUMENT_COUNT: u16 = 1002;
    pub const DUPLICATE_FUNCTION_IMPLEMENTATION: u16 = 1003;
    pub const OVERRIDES_ANCESTOR_FUNCTION: u16 = 1004;
    pub const SCOPE_FUNCTION_SHADOWED_BY_BUILT_IN: u16 = 1005;
    pub const FUNCTION_SAME_NAME_AS_CLASS: u16 = 1006;
    pub const LOCAL_VAR_FUNCTION_SHADOWS_PARENT: u16 = 1007;
    pub const LOCAL_VAR_SHADOWED_BY_SCOPED_FUNCTION: u16 = 1008;
    pub const LOCAL_VAR_SAME_NAME_AS_CLASS: u16 = 1009;
    pub const PARAMETER_SAME_NAME_AS_NAMESPACE: u16 = 1010;
    pub const VARIABLE_SAME_NAME_AS_NAMESPACE: u16 = 1011;
    pub const SCRIPT_SRC_CANNOT_BE_EMPTY: u16 = 1012;
    pub const REFERENCED_FILE_DOES_NOT_EXIST: u16 = 1013;
    pub const SCRIPT_IMPORT_CASE_MISMATCH: u16 = 1014;
}

/// Pure factory functions for every diagnostic the validator emits.
/// Each returns code/message/severity only; callers anchor the result.
pub mod catalog {
    use super::{codes, DiagnosticData, Severity};

    pub fn call_to_unknown_function(name: &str, scope_name: &str) -> DiagnosticData {
        DiagnosticData {
            code: codes::CALL_TO_UNKNOWN_FUNCTION,
            message: format!("Cannot find function with name '{name}' when this file is included in scope '{scope_name}'"),
            severity: Severity::Error,
        }
    }

    pub fn mismatch_argument_count(expected: &str, got: usize) -> DiagnosticData {
        DiagnosticData {
            code: codes::MISMATCH_ARGUMENT_COUNT,
            message: format!("Expected {expected} arguments, but got {got}"),
            severity: Severity::Error,
        }
    }

    pub fn duplicate_function_implementation(name: &str, scope_name: &str) -> DiagnosticData {
        DiagnosticData {
            code: codes::DUPLICATE_FUNCTION_IMPLEMENTATION,
            message: format!("Duplicate function implementation for '{name}' when this file is included in scope '{scope_name}'"),
            severity: Severity::Error,
        }
    }

    pub fn overrides_ancestor_function(
        name: &str,
        scope_name: &str,
        ancestor_file: &str,
        ancestor_scope: &str,
    ) -> DiagnosticData {
        DiagnosticData {
            code: codes::OVERRIDES_ANCESTOR_FUNCTION,
            message: format!("Function '{name}' included in '{scope_name}' overrides function in '{ancestor_file}' included in '{ancestor_scope}'"),
            severity: Severity::Info,
        }
    }

    pub fn scope_function_shadowed_by_built_in(name: &str) -> DiagnosticData {
        DiagnosticData {
            code: codes::SCOPE_FUNCTION_SHADOWED_BY_BUILT_IN,
            message: format!("Scope function '{name}' will not be accessible because it has the same name as a built-in function"),
            severity: Severity::Warning,
        }
    }

    pub fn function_same_name_as_class(name: &str) -> DiagnosticData {
        DiagnosticData {
            code: codes::FUNCTION_SAME_NAME_AS_CLASS,
            message: format!("Function has the same name as class '{name}'"),
            severity: Severity::Error,
        }
    }

    /// `shadowed_kind` is the display word for what got shadowed:
    /// "stdlib" for a built-in, "scope" for a scope function.
    pub fn local_var_function_shadows_parent(name: &str, shadowed_kind: &str) -> DiagnosticData {
        DiagnosticData {
            code: codes::LOCAL_VAR_FUNCTION_SHADOWS_PARENT,
            message: format!("Local variable function '{name}' has same name as {shadowed_kind} function and will never be called"),
            severity: Severity::Warning,
        }
    }

    pub fn local_var_shadowed_by_scoped_function(name: &str) -> DiagnosticData {
        DiagnosticData {
            code: codes::LOCAL_VAR_SHADOWED_BY_SCOPED_FUNCTION,
            message: format!("Local variable '{name}' has same name as scoped function and will not be accessible"),
            severity: Severity::Warning,
        }
    }

    pub fn local_var_same_name_as_class(full_class_name: &str) -> DiagnosticData {
        DiagnosticData {
            code: codes::LOCAL_VAR_SAME_NAME_AS_CLASS,
            message: format!("Local variable has same name as class '{full_class_name}'"),
            severity: Severity::Warning,
        }
    }

    pub fn parameter_same_name_as_namespace(name: &str) -> DiagnosticData {
        DiagnosticData {
            code: codes::PARAMETER_SAME_NAME_AS_NAMESPACE,
            message: format!("Parameter '{name}' may not have the same name as a namespace"),
            severity: Severity::Error,
        }
    }

    pub fn variable_same_name_as_namespace(name: &str) -> DiagnosticData {
        DiagnosticData {
            code: codes::VARIABLE_SAME_NAME_AS_NAMESPACE,
            message: format!("Variable '{name}' may not have the same name as a namespace"),
            severity: Severity::Error,
        }
    }

    pub fn script_src_cannot_be_empty() -> DiagnosticData {
        DiagnosticData {
            code: codes::SCRIPT_SRC_CANNOT_BE_EMPTY,
            message: "Script import cannot be empty".to_string(),
            severity: Severity::Error,
        }
    }

    pub fn referenced_file_does_not_exist() -> DiagnosticData {
        DiagnosticData {
            code: codes::REFERENCED_FILE_DOES_NOT_EXIST,
            message: "Referenced file does not exist".to_string(),
            severity: Severity::Error,
        }
    }

    pub fn script_import_case_mismatch(canonical_path: &str) -> DiagnosticData {
        DiagnosticData {
            code: codes::SCRIPT_IMPORT_CASE_MISMATCH,
            message: format!("Script import path does not match casing of actual file '{canonical_path}'"),
            severity: Severity::Warning,
        }
    }
}
