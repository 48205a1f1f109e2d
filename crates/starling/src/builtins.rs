//
// builtins.rs
//
// Process-wide table of built-in (standard library) callable names
//

use std::collections::HashSet;
use std::sync::OnceLock;

/// Names of the runtime's built-in global functions, lowercase. The language
/// is case-insensitive, so membership checks lowercase their input.
pub const GLOBAL_CALLABLE_NAMES: &[&str] = &[
    "abs",
    "asc",
    "atn",
    "cdbl",
    "chr",
    "cint",
    "cos",
    "createobject",
    "csng",
    "exp",
    "findmemberfunction",
    "fix",
    "formatjson",
    "getglobalaa",
    "getinterface",
    "instr",
    "int",
    "lcase",
    "left",
    "len",
    "log",
    "mid",
    "parsejson",
    "rebootsystem",
    "right",
    "rnd",
    "runx",
    "sgn",
    "sin",
    "sleep",
    "sqr",
    "str",
    "stri",
    "string",
    "stringi",
    "substitute",
    "tan",
    "tr",
    "trim",
    "type",
    "ucase",
    "uptime",
    "val",
    "wait",
];

static GLOBAL_CALLABLE_MAP: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// The built-in callable membership table. Initialized on first use and
/// immutable afterwards.
pub fn global_callable_map() -> &'static HashSet<&'static str> {
    GLOBAL_CALLABLE_MAP.get_or_init(|| GLOBAL_CALLABLE_NAMES.iter().copied().collect())
}

/// Case-insensitive membership test against the built-in callable table.
pub fn is_global_callable(name: &str) -> bool {
    global_callable_map().contains(name.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_case_insensitive() {
        assert!(is_global_callable("ucase"));
        assert!(is_global_callable("UCase"));
        assert!(is_global_callable("CREATEOBJECT"));
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert!(!is_global_callable("frobnicate"));
        assert!(!is_global_callable(""));
        assert!(!is_global_callable("ucase "));
    }

    #[test]
    fn test_table_matches_constant() {
        for name in GLOBAL_CALLABLE_NAMES {
            assert!(
                is_global_callable(name),
                "GLOBAL_CALLABLE_NAMES contains '{}' but the map rejects it",
                name
            );
        }
        assert_eq!(global_callable_map().len(), GLOBAL_CALLABLE_NAMES.len());
    }

    #[test]
    fn test_names_are_stored_lowercase() {
        for name in GLOBAL_CALLABLE_NAMES {
            assert_eq!(*name, name.to_lowercase());
        }
    }
}
