//! Test-only helpers: programmatic file fixtures and a miniature Program.

pub mod fixture;
