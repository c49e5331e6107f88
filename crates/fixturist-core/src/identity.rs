//! Stable names for scenarios and handlers.
//!
//! Both functions feed the fixture key, so their output must not change for a
//! given input across runs or platforms.

use regex::Regex;
use std::sync::LazyLock;

/// `HTTPServer` -> `HTTP_Server`
static ACRONYM_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z\d]+)([A-Z][a-z])").unwrap_or_else(|e| panic!("invalid regex: {e}"))
});

/// `usersController` -> `users_Controller`
static WORD_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-z\d])([A-Z])").unwrap_or_else(|e| panic!("invalid regex: {e}"))
});

/// Trailing segment suffixes that name the role rather than the resource.
const ROLE_SUFFIXES: &[&str] = &["_controller", "_handler"];

/// Derives a scenario identifier from its human name.
///
/// Lower-cases and replaces whitespace with underscores. Characters that stay
/// uppercase after lowercasing (no lowercase mapping, e.g. `🄰`) become
/// underscores too, so the result never contains an uppercase character.
/// Idempotent: `identifier(&identifier(s)) == identifier(s)`.
///
/// # Example
///
/// ```
/// use fixturist_core::identifier;
///
/// assert_eq!(identifier("Admin Permissions"), "admin_permissions");
/// assert_eq!(identifier("admin_permissions"), "admin_permissions");
/// ```
pub fn identifier(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_whitespace() || c.is_uppercase() { '_' } else { c })
        .collect()
}

/// Derives the on-disk namespace of a handler from its fully qualified name.
///
/// Generic arguments are dropped, each `::` segment is converted from
/// CamelCase to snake_case, and a trailing `_controller`/`_handler` is
/// removed from the last segment.
///
/// # Example
///
/// ```
/// use fixturist_core::handler_namespace;
///
/// assert_eq!(handler_namespace("app::api::v1::UsersController"), "app/api/v1/users");
/// ```
pub fn handler_namespace(qualified_name: &str) -> String {
    let base = qualified_name
        .split('<')
        .next()
        .unwrap_or(qualified_name)
        .trim();

    let mut segments: Vec<String> = base
        .split("::")
        .filter(|segment| !segment.is_empty())
        .map(underscore)
        .collect();

    if let Some(last) = segments.last_mut() {
        for suffix in ROLE_SUFFIXES {
            if let Some(stripped) = last.strip_suffix(suffix)
                && !stripped.is_empty()
            {
                *last = stripped.to_string();
                break;
            }
        }
    }

    segments.join("/")
}

fn underscore(segment: &str) -> String {
    let spaced = ACRONYM_BOUNDARY.replace_all(segment, "${1}_${2}");
    let spaced = WORD_BOUNDARY.replace_all(&spaced, "${1}_${2}");
    spaced.replace('-', "_").to_lowercase()
}
