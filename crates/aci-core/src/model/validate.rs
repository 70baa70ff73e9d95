// Identifier rules shared by the concrete classes.

const MAX_NAME: usize = 64;
const MAX_DESCRIPTION: usize = 128;

/// Fabric node name: up to 64 of `[A-Za-z0-9_-]`, not ending in `-` or `_`.
/// An empty name is allowed; the controller then derives one.
pub fn node_name(name: &str) -> bool {
    name.len() <= MAX_NAME
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !name.ends_with(['-', '_'])
}

/// Location level name: 1-64 characters, the first alphanumeric, the rest
/// alphanumeric or one of `-.:_`.
pub fn location_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= MAX_NAME
        && first.is_ascii_alphanumeric()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | ':' | '_'))
}

/// Tenant and VRF name: 1-64 of `[A-Za-z0-9_.:-]`.
pub fn object_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-'))
}

/// Free-text description: up to 128 characters of alphanumerics,
/// whitespace and `!#$%()*,-.:;@_{|}~?&+`.
pub fn description(text: &str) -> bool {
    text.chars().count() <= MAX_DESCRIPTION
        && text.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || c.is_whitespace()
                || "!#$%()*,-.:;@_{|}~?&+".contains(c)
        })
}
