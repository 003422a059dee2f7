/// Labels requested when the caller does not name any.
pub const DEFAULT_ENTITY_TYPES: &[&str] = &[
    "Person",
    "Organization",
    "Location",
    "Event",
    "Product",
    "Service",
    "Technology",
    "Concept",
    "Time",
    "Money",
    "Quantity",
    "ClassName",
    "Library",
    "Framework",
    "Language",
    "Tool",
    "Methodology",
    "Standard",
    "Protocol",
    "API Endpoint",
    "Date",
];

pub fn default_entity_types() -> Vec<String> {
    DEFAULT_ENTITY_TYPES.iter().map(|s| s.to_string()).collect()
}

/// The caller's labels, or the defaults when none were given.
pub fn resolve_entity_types(requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        default_entity_types()
    } else {
        requested.to_vec()
    }
}
