//! Naming conventions for generated identifiers.
//!
//! Names are derived from declared entity and action names only, never from
//! the backend, so every backend emits the same class and method names.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `user_profile` | [`to_pascal_case`] | `UserProfile` |
//! | `get_by_id` | [`to_camel_case`] | `getById` |
//! | `auth` (service) | [`class_name`] | `AuthClient` |

use crate::definition::EntityKind;

/// Suffix appended to service class names.
pub const SERVICE_SUFFIX: &str = "Client";

/// Convert snake_case or kebab-case to camelCase.
///
/// # Examples
///
/// ```
/// use sdkgen_core::naming::to_camel_case;
///
/// assert_eq!(to_camel_case("get_by_id"), "getById");
/// assert_eq!(to_camel_case("list-all"), "listAll");
/// assert_eq!(to_camel_case("show"), "show");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' || c == '-' {
            capitalize_next = !result.is_empty();
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert a declared name to PascalCase ("studly" case).
///
/// Splits on `-`, `_`, `.` and whitespace and upper-cases the first letter
/// of every word. The rest of each word is kept as written, so names that
/// are already PascalCase pass through unchanged.
///
/// # Examples
///
/// ```
/// use sdkgen_core::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("user_profile"), "UserProfile");
/// assert_eq!(to_pascal_case("order-item"), "OrderItem");
/// assert_eq!(to_pascal_case("userProfile"), "UserProfile");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .map(capitalize)
        .collect()
}

/// Capitalize the first letter of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Generated class name for an entity of the given kind.
///
/// Services get the [`SERVICE_SUFFIX`] appended.
pub fn class_name(kind: EntityKind, name: &str) -> String {
    match kind {
        EntityKind::Service => format!("{}{SERVICE_SUFFIX}", to_pascal_case(name)),
        EntityKind::Model | EntityKind::Resource => to_pascal_case(name),
    }
}

/// Local alias under which a model class is imported (`UserModel`).
pub fn model_alias(name: &str) -> String {
    format!("{}Model", to_pascal_case(name))
}
